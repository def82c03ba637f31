//! Field facade over the BN254 scalar field.
//!
//! Component bodies only ever see `Fr`. Comparisons and shifts follow the
//! conventions of generated witness code: an element above `(p - 1) / 2`
//! is read as the negative number `x - p`.

use std::cmp::Ordering;
use std::sync::OnceLock;

use ark_ff::{Field, One, PrimeField, Zero};
use num_bigint::{BigInt, BigUint, Sign};

use crate::error::{Result, WitnessError};

pub use ark_bn254::Fr;

/// Width used by shifts and bitwise operations.
pub const FIELD_BITS: u32 = 254;

struct Bounds {
    modulus: BigUint,
    half: BigUint,
    mask: BigUint,
}

fn bounds() -> &'static Bounds {
    static BOUNDS: OnceLock<Bounds> = OnceLock::new();
    BOUNDS.get_or_init(|| {
        let modulus = BigUint::from(Fr::MODULUS);
        let half = (modulus.clone() - 1u32) >> 1usize;
        let mask = (BigUint::from(1u32) << FIELD_BITS as usize) - 1u32;
        Bounds { modulus, half, mask }
    })
}

pub fn to_biguint(a: &Fr) -> BigUint {
    (*a).into()
}

pub fn from_biguint(value: BigUint) -> Fr {
    Fr::from(value)
}

pub fn from_bool(value: bool) -> Fr {
    if value {
        Fr::one()
    } else {
        Fr::zero()
    }
}

/// Signed reading of an element, in `(-(p-1)/2, (p-1)/2]`.
fn signed(a: &Fr) -> BigInt {
    let bounds = bounds();
    let value = to_biguint(a);
    if value > bounds.half {
        BigInt::from(value) - BigInt::from(bounds.modulus.clone())
    } else {
        BigInt::from(value)
    }
}

pub fn compare(a: &Fr, b: &Fr) -> Ordering {
    signed(a).cmp(&signed(b))
}

pub fn copy(a: &Fr) -> Fr {
    *a
}

pub fn add(a: &Fr, b: &Fr) -> Fr {
    *a + b
}

pub fn sub(a: &Fr, b: &Fr) -> Fr {
    *a - b
}

pub fn mul(a: &Fr, b: &Fr) -> Fr {
    *a * b
}

pub fn neg(a: &Fr) -> Fr {
    -*a
}

/// Multiplicative inverse, with zero mapped to zero.
pub fn inv(a: &Fr) -> Fr {
    a.inverse().unwrap_or_else(Fr::zero)
}

pub fn div(a: &Fr, b: &Fr) -> Fr {
    *a * inv(b)
}

pub fn eq(a: &Fr, b: &Fr) -> Fr {
    from_bool(a == b)
}

pub fn neq(a: &Fr, b: &Fr) -> Fr {
    from_bool(a != b)
}

pub fn lt(a: &Fr, b: &Fr) -> Fr {
    from_bool(compare(a, b) == Ordering::Less)
}

pub fn leq(a: &Fr, b: &Fr) -> Fr {
    from_bool(compare(a, b) != Ordering::Greater)
}

pub fn gt(a: &Fr, b: &Fr) -> Fr {
    from_bool(compare(a, b) == Ordering::Greater)
}

pub fn geq(a: &Fr, b: &Fr) -> Fr {
    from_bool(compare(a, b) != Ordering::Less)
}

enum Shift {
    Left(u32),
    Right(u32),
}

fn shift_amount(b: &Fr) -> Shift {
    let amount = signed(b);
    let n = match amount.magnitude().to_u32_digits().as_slice() {
        [] => 0,
        [n] => *n,
        _ => u32::MAX,
    };
    if amount.sign() == Sign::Minus {
        Shift::Left(n)
    } else {
        Shift::Right(n)
    }
}

fn shift_right(a: &Fr, n: u32) -> Fr {
    if n >= FIELD_BITS {
        return Fr::zero();
    }
    from_biguint(to_biguint(a) >> n as usize)
}

fn shift_left(a: &Fr, n: u32) -> Fr {
    if n >= FIELD_BITS {
        return Fr::zero();
    }
    from_biguint((to_biguint(a) << n as usize) & &bounds().mask)
}

/// `a >> b`. A negative `b` shifts left instead.
pub fn shr(a: &Fr, b: &Fr) -> Fr {
    match shift_amount(b) {
        Shift::Right(n) => shift_right(a, n),
        Shift::Left(n) => shift_left(a, n),
    }
}

/// `a << b`, masked to [`FIELD_BITS`] and reduced. A negative `b` shifts right.
pub fn shl(a: &Fr, b: &Fr) -> Fr {
    match shift_amount(b) {
        Shift::Right(n) => shift_left(a, n),
        Shift::Left(n) => shift_right(a, n),
    }
}

pub fn band(a: &Fr, b: &Fr) -> Fr {
    from_biguint(to_biguint(a) & to_biguint(b))
}

pub fn is_true(a: &Fr) -> bool {
    !a.is_zero()
}

/// Converts an element to a machine integer. Only used for indexing.
pub fn to_int(a: &Fr) -> Result<usize> {
    let overflow = || WitnessError::IndexOverflow {
        value: a.to_string(),
    };
    match to_biguint(a).to_u64_digits().as_slice() {
        [] => Ok(0),
        [digit] => usize::try_from(*digit).map_err(|_| overflow()),
        _ => Err(overflow()),
    }
}

/// Parses a decimal or `0x` hex literal, with an optional leading minus.
/// Values at or above the modulus are reduced.
pub fn parse(text: &str) -> Option<Fr> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let value = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => BigUint::parse_bytes(hex.as_bytes(), 16)?,
        None => BigUint::parse_bytes(digits.as_bytes(), 10)?,
    };
    let element = from_biguint(value);
    Some(if negative { -element } else { element })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fr(v: u64) -> Fr {
        Fr::from(v)
    }

    #[test]
    fn negative_elements_compare_below_zero() {
        let minus_one = neg(&Fr::one());
        assert!(is_true(&lt(&minus_one, &Fr::zero())));
        assert!(is_true(&geq(&fr(3), &fr(3))));
        assert!(!is_true(&gt(&fr(2), &fr(3))));
    }

    #[test]
    fn shifts_and_masks() {
        assert_eq!(shr(&fr(8), &fr(1)), fr(4));
        assert_eq!(shr(&fr(8), &fr(300)), Fr::zero());
        // negative amount flips direction
        assert_eq!(shr(&fr(1), &neg(&fr(3))), fr(8));
        assert_eq!(shl(&fr(1), &fr(254)), Fr::zero());
        assert_eq!(
            shl(&fr(1), &fr(253)),
            from_biguint(BigUint::from(1u32) << 253usize)
        );
        assert_eq!(band(&fr(0b1100), &fr(0b1010)), fr(0b1000));
    }

    #[test]
    fn to_int_rejects_wide_values() {
        assert_eq!(to_int(&fr(42)).unwrap(), 42);
        assert!(matches!(
            to_int(&neg(&Fr::one())),
            Err(WitnessError::IndexOverflow { .. })
        ));
    }

    #[test]
    fn parse_literals() {
        assert_eq!(parse("16"), Some(fr(16)));
        assert_eq!(parse("0x10"), Some(fr(16)));
        assert_eq!(parse("-1"), Some(neg(&Fr::one())));
        assert_eq!(parse(""), None);
        assert_eq!(parse("12a"), None);
    }

    #[test]
    fn inverse_of_zero_is_zero() {
        assert_eq!(inv(&Fr::zero()), Fr::zero());
        assert_eq!(mul(&inv(&fr(5)), &fr(5)), Fr::one());
    }
}
