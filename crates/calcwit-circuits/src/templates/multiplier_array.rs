//! `K` multipliers reached through the subcomponent array.
//!
//! Layout: out `c[K]`, in `a[K]`, in `b[K]`. The children follow the
//! parent's own block, three signals each, with handles `id + 1 + i`.

use calcwit::{ComponentId, Result, TemplateInfo, WitnessContext};

use super::multiplier;
use crate::ids;

pub const fn info<const K: usize>() -> TemplateInfo {
    TemplateInfo::new("MultiplierArray", K, 2 * K, 3 * K, K)
}

/// Signals used by one instance including its children.
pub const fn subtree_signals(k: usize) -> usize {
    3 * k + k * multiplier::INFO.signals
}

/// Components in one instance including itself.
pub const fn subtree_components(k: usize) -> usize {
    k + 1
}

pub fn run<const K: usize>(ctx: &mut WitnessContext, id: ComponentId) -> Result<()> {
    let start = ctx.signal_start(id)?;
    let label = ctx.label(id);

    for i in 0..K {
        let child_id = ctx.child_handle(id, 1 + i as u32)?;
        ctx.create_subcomponent(
            id,
            i,
            child_id,
            ids::MULTIPLIER,
            start + 3 * K + multiplier::INFO.signals * i,
            format!("{label}.mult[{i}]"),
        )?;
    }

    for i in 0..K {
        let mult = ctx.subcomponent(id, i)?;
        let a = ctx.signal(start + K + i)?;
        let b = ctx.signal(start + 2 * K + i)?;
        // Odd children get `b` first.
        if i % 2 == 0 {
            ctx.write_input(mult, 1, a)?;
            ctx.write_input(mult, 2, b)?;
        } else {
            ctx.write_input(mult, 2, b)?;
            ctx.write_input(mult, 1, a)?;
        }
        let mult_start = ctx.signal_start(mult)?;
        let c = ctx.signal(mult_start)?;
        ctx.set_signal(start + i, c);
    }

    ctx.release_children(id)
}
