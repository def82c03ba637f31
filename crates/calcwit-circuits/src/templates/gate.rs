//! `y <== isZero(x) + (flag ? sum(bits(x)) : 0)`
//!
//! The bit decomposition child is only instantiated when `flag` is set, so
//! its slot may stay unallocated.

use calcwit::field;
use calcwit::{ComponentId, Result, TemplateInfo, WitnessContext};

use super::{is_zero, num2bits};
use crate::ids;

/// out `y`, in `x` `flag`
pub const INFO: TemplateInfo = TemplateInfo::new("Gate", 1, 2, 3, 2);

pub const SUBTREE_SIGNALS: usize = INFO.signals + is_zero::INFO.signals + num2bits::INFO.signals;
pub const SUBTREE_COMPONENTS: usize = 3;

pub fn run(ctx: &mut WitnessContext, id: ComponentId) -> Result<()> {
    let start = ctx.signal_start(id)?;
    let label = ctx.label(id);
    let x = ctx.signal(start + 1)?;
    let flag = ctx.signal(start + 2)?;

    let zero_start = start + INFO.signals;
    let child_id = ctx.child_handle(id, 1)?;
    ctx.create_subcomponent(
        id,
        0,
        child_id,
        ids::IS_ZERO,
        zero_start,
        format!("{label}.iszero"),
    )?;
    let zero = ctx.subcomponent(id, 0)?;
    ctx.write_input(zero, 1, x)?;
    let mut y = ctx.signal(zero_start)?;

    if field::is_true(&flag) {
        let bits_start = zero_start + is_zero::INFO.signals;
        let child_id = ctx.child_handle(id, 2)?;
        ctx.create_subcomponent(
            id,
            1,
            child_id,
            ids::NUM2BITS,
            bits_start,
            format!("{label}.n2b"),
        )?;
        let bits = ctx.subcomponent(id, 1)?;
        ctx.write_input(bits, num2bits::BITS, x)?;
        for i in 0..num2bits::BITS {
            let bit = ctx.signal(bits_start + i)?;
            y = field::add(&y, &bit);
        }
    }

    ctx.set_signal(start, y);
    ctx.release_children(id)
}
