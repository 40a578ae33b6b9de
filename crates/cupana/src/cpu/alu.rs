//! Pure arithmetic and logic on masked operands.
//!
//! Every function takes operands already masked to `width` and returns the
//! masked result together with the arithmetic flags (Z, C, N, V) it
//! produced. Callers merge these into the flags register; control bits are
//! never touched here.

use super::{Flags, Width};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AluResult {
    pub value: u16,
    pub flags: Flags,
}

impl AluResult {
    fn new(value: u16, width: Width, carry: bool, overflow: bool) -> Self {
        let value = value & width.mask();
        let mut flags = Flags::empty();
        flags.set(Flags::ZERO, value == 0);
        flags.set(Flags::NEGATIVE, value & width.sign_bit() != 0);
        flags.set(Flags::CARRY, carry);
        flags.set(Flags::OVERFLOW, overflow);
        Self { value, flags }
    }
}

/// Interpret `value` as a two's complement number of the given width.
#[inline]
fn signed(value: u16, width: Width) -> i32 {
    match width {
        Width::Word => value as i16 as i32,
        Width::Byte => value as u8 as i8 as i32,
    }
}

pub(crate) fn add(a: u16, b: u16, width: Width) -> AluResult {
    let sum = a as u32 + b as u32;
    let result = sum as u16 & width.mask();
    let overflow = (a ^ result) & (b ^ result) & width.sign_bit() != 0;
    AluResult::new(result, width, sum > width.mask() as u32, overflow)
}

/// `a - b`. Carry reports a borrow.
pub(crate) fn sub(a: u16, b: u16, width: Width) -> AluResult {
    let result = a.wrapping_sub(b) & width.mask();
    let overflow = (a ^ b) & (a ^ result) & width.sign_bit() != 0;
    AluResult::new(result, width, b > a, overflow)
}

pub(crate) fn mul(a: u16, b: u16, width: Width) -> AluResult {
    let product = a as u32 * b as u32;
    let signed_product = signed(a, width) * signed(b, width);
    let (min, max) = match width {
        Width::Word => (i16::MIN as i32, i16::MAX as i32),
        Width::Byte => (i8::MIN as i32, i8::MAX as i32),
    };
    let overflow = signed_product < min || signed_product > max;
    AluResult::new(
        product as u16,
        width,
        product > width.mask() as u32,
        overflow,
    )
}

/// Unsigned quotient, or `None` when `b` is zero.
pub(crate) fn div(a: u16, b: u16, width: Width) -> Option<AluResult> {
    a.checked_div(b)
        .map(|q| AluResult::new(q, width, false, false))
}

/// Unsigned remainder, or `None` when `b` is zero.
pub(crate) fn rem(a: u16, b: u16, width: Width) -> Option<AluResult> {
    a.checked_rem(b)
        .map(|r| AluResult::new(r, width, false, false))
}

pub(crate) fn and(a: u16, b: u16, width: Width) -> AluResult {
    AluResult::new(a & b, width, false, false)
}

pub(crate) fn or(a: u16, b: u16, width: Width) -> AluResult {
    AluResult::new(a | b, width, false, false)
}

pub(crate) fn xor(a: u16, b: u16, width: Width) -> AluResult {
    AluResult::new(a ^ b, width, false, false)
}

pub(crate) fn not(a: u16, width: Width) -> AluResult {
    AluResult::new(!a, width, false, false)
}

/// Logical shift left by `count`. Carry is the last bit shifted out; a
/// count past the operand width shifts everything out and leaves carry
/// clear.
pub(crate) fn shl(a: u16, count: u16, width: Width) -> AluResult {
    let bits = width.bits();
    let count = count as u32;
    match count {
        0 => AluResult::new(a, width, false, false),
        c if c <= bits => {
            let carry = (a as u32 >> (bits - c)) & 1 != 0;
            AluResult::new(((a as u32) << c) as u16, width, carry, false)
        }
        _ => AluResult::new(0, width, false, false),
    }
}

/// Logical shift right by `count`, with the same carry rules as [`shl`].
pub(crate) fn shr(a: u16, count: u16, width: Width) -> AluResult {
    let bits = width.bits();
    let count = count as u32;
    match count {
        0 => AluResult::new(a, width, false, false),
        c if c <= bits => {
            let carry = (a as u32 >> (c - 1)) & 1 != 0;
            AluResult::new((a as u32 >> c) as u16, width, carry, false)
        }
        _ => AluResult::new(0, width, false, false),
    }
}
