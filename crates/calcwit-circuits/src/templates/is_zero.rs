use calcwit::field::{self, Fr};
use calcwit::{ComponentId, Result, TemplateInfo, WitnessContext};

/// out `out`, in `in`, intermediate `inv`
pub const INFO: TemplateInfo = TemplateInfo::new("IsZero", 1, 1, 3, 0);

pub fn run(ctx: &mut WitnessContext, id: ComponentId) -> Result<()> {
    let start = ctx.signal_start(id)?;
    let input = ctx.signal(start + 1)?;

    ctx.set_signal(start + 2, field::inv(&input));
    let inv = ctx.signal(start + 2)?;
    let out = field::add(&field::neg(&field::mul(&input, &inv)), &ctx.constant(0));
    ctx.set_signal(start, out);

    let product = field::mul(&input, &out);
    ctx.assert_true(id, &field::eq(&product, &Fr::from(0u64)), 8)
}
