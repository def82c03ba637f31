//! `c <== a * b`

use calcwit::field;
use calcwit::{ComponentId, Result, TemplateInfo, WitnessContext};

/// out `c`, in `a` `b`
pub const INFO: TemplateInfo = TemplateInfo::new("Multiplier", 1, 2, 3, 0);

pub fn run(ctx: &mut WitnessContext, id: ComponentId) -> Result<()> {
    let start = ctx.signal_start(id)?;
    let a = ctx.signal(start + 1)?;
    let b = ctx.signal(start + 2)?;
    ctx.set_signal(start, field::mul(&a, &b));
    Ok(())
}
