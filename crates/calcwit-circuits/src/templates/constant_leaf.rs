//! Component without inputs; both outputs come from the constant pool.

use calcwit::field;
use calcwit::{ComponentId, Result, TemplateInfo, WitnessContext};

use crate::SEED_CONSTANT;

/// out `seed`, `square`
pub const INFO: TemplateInfo = TemplateInfo::new("ConstantLeaf", 2, 0, 2, 0);

pub fn run(ctx: &mut WitnessContext, id: ComponentId) -> Result<()> {
    let start = ctx.signal_start(id)?;
    let seed = ctx.constant(SEED_CONSTANT);
    ctx.set_signal(start, seed);
    ctx.set_signal(start + 1, field::mul(&seed, &seed));
    Ok(())
}
