//! Top-level template of the sample circuit.
//!
//! | local | signal |
//! |-------|--------|
//! | 0     | out `result` |
//! | 1     | out `seed` |
//! | 2..5  | in `a[3]` |
//! | 5..8  | in `b[3]` |
//! | 8     | in `x` |
//! | 9     | in `flag` |
//! | 10    | `dot`, intermediate |

use calcwit::field::{self, Fr};
use calcwit::{ComponentId, Result, TemplateInfo, WitnessContext};

use super::{constant_leaf, multiplier_array};
use crate::{ids, ARRAY_LEN};

pub const INFO: TemplateInfo = TemplateInfo::new("Main", 2, 2 * ARRAY_LEN + 2, 2 * ARRAY_LEN + 5, 3);

const A: usize = 2;
const B: usize = A + ARRAY_LEN;
const X: usize = B + ARRAY_LEN;
const FLAG: usize = X + 1;
const DOT: usize = FLAG + 1;

pub fn run(ctx: &mut WitnessContext, id: ComponentId) -> Result<()> {
    let start = ctx.signal_start(id)?;
    let label = ctx.label(id);

    let leaf_start = start + INFO.signals;
    let child_id = ctx.child_handle(id, 1)?;
    ctx.create_subcomponent(
        id,
        0,
        child_id,
        ids::CONSTANT_LEAF,
        leaf_start,
        format!("{label}.leaf"),
    )?;

    let array_start = leaf_start + constant_leaf::INFO.signals;
    let array_info = multiplier_array::info::<ARRAY_LEN>();
    let child_id = ctx.child_handle(id, 2)?;
    ctx.create_subcomponent(
        id,
        1,
        child_id,
        ids::MULTIPLIER_ARRAY,
        array_start,
        format!("{label}.arr"),
    )?;
    let array = ctx.subcomponent(id, 1)?;
    for i in 0..ARRAY_LEN {
        let a = ctx.signal(start + A + i)?;
        ctx.write_input(array, array_info.input_start() + i, a)?;
    }
    for i in 0..ARRAY_LEN {
        let b = ctx.signal(start + B + i)?;
        ctx.write_input(array, array_info.input_start() + ARRAY_LEN + i, b)?;
    }

    let mut dot = Fr::from(0u64);
    for i in 0..ARRAY_LEN {
        let product = ctx.signal(array_start + i)?;
        dot = field::add(&dot, &product);
    }
    ctx.set_signal(start + DOT, dot);

    let gate_start = array_start + multiplier_array::subtree_signals(ARRAY_LEN);
    let gate_offset = 2 + multiplier_array::subtree_components(ARRAY_LEN) as u32;
    let gate_id = ctx.child_handle(id, gate_offset)?;
    ctx.create_subcomponent(id, 2, gate_id, ids::GATE, gate_start, format!("{label}.gate"))?;
    let gate = ctx.subcomponent(id, 2)?;
    let x = ctx.signal(start + X)?;
    let flag = ctx.signal(start + FLAG)?;
    ctx.write_input(gate, 1, x)?;
    ctx.write_input(gate, 2, flag)?;

    let dot = ctx.signal(start + DOT)?;
    let square = ctx.signal(leaf_start + 1)?;
    let y = ctx.signal(gate_start)?;
    ctx.set_signal(start, field::add(&field::add(&dot, &square), &y));
    let seed = ctx.signal(leaf_start)?;
    ctx.set_signal(start + 1, seed);

    ctx.release_children(id)
}
