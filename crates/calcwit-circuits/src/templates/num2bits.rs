//! Little-endian decomposition of `in` into `BITS` bits.

use calcwit::field::{self, Fr};
use calcwit::{ComponentId, Result, TemplateInfo, WitnessContext};

pub const BITS: usize = 4;

/// out `bits[BITS]`, in `in`
pub const INFO: TemplateInfo = TemplateInfo::new("Num2Bits", BITS, 1, BITS + 1, 0);

pub const BIT_ASSERT_LINE: u32 = 9;
pub const SUM_ASSERT_LINE: u32 = 12;

pub fn run(ctx: &mut WitnessContext, id: ComponentId) -> Result<()> {
    let start = ctx.signal_start(id)?;
    let one = ctx.constant(0);
    let input = ctx.signal(start + BITS)?;

    let mut sum = Fr::from(0u64);
    let mut weight = one;
    for i in 0..BITS {
        let bit = field::band(&field::shr(&input, &Fr::from(i as u64)), &one);
        ctx.set_signal(start + i, bit);

        let bit = ctx.signal(start + i)?;
        let binary = field::eq(&field::mul(&bit, &field::sub(&bit, &one)), &Fr::from(0u64));
        ctx.assert_true(id, &binary, BIT_ASSERT_LINE)?;

        sum = field::add(&sum, &field::mul(&bit, &weight));
        weight = field::add(&weight, &weight);
    }
    ctx.assert_true(id, &field::eq(&sum, &input), SUM_ASSERT_LINE)
}
