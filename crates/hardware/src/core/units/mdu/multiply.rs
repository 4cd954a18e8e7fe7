//! Iterative shift-and-add multiplier.
//!
//! Operands are reduced to magnitudes according to the operation's signedness,
//! multiplied one multiplier bit per step, and the 64-bit product is negated at
//! the end when exactly one signed operand was negative.

use crate::core::control::signals::MduOp;

/// Splits `value` into a magnitude and a sign flag.
///
/// Unsigned operands are returned unchanged with a clear sign. The magnitude of
/// `0x8000_0000` is `0x8000_0000` (2^31), which still fits in 32 unsigned bits.
pub(super) const fn magnitude(value: u32, signed: bool) -> (u32, bool) {
    if signed && (value as i32) < 0 {
        (value.wrapping_neg(), true)
    } else {
        (value, false)
    }
}

/// Datapath registers of an in-flight multiply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Multiplier {
    acc: u64,
    multiplicand: u64,
    multiplier: u32,
    negate: bool,
}

impl Multiplier {
    /// Captures the operands of a multiply.
    ///
    /// # Arguments
    ///
    /// * `op` - One of the four multiply operations.
    /// * `a` - First operand (`rs1`).
    /// * `b` - Second operand (`rs2`).
    pub const fn new(op: MduOp, a: u32, b: u32) -> Self {
        let a_signed = matches!(op, MduOp::Mulh | MduOp::Mulhsu);
        let b_signed = matches!(op, MduOp::Mulh);
        let (ma, sa) = magnitude(a, a_signed);
        let (mb, sb) = magnitude(b, b_signed);
        Self {
            acc: 0,
            multiplicand: ma as u64,
            multiplier: mb,
            negate: sa != sb,
        }
    }

    /// Consumes one multiplier bit.
    pub const fn step(&mut self) {
        if self.multiplier & 1 != 0 {
            self.acc = self.acc.wrapping_add(self.multiplicand);
        }
        self.multiplicand <<= 1;
        self.multiplier >>= 1;
    }

    /// Returns the signed-corrected 64-bit product.
    pub const fn product(&self) -> u64 {
        if self.negate {
            self.acc.wrapping_neg()
        } else {
            self.acc
        }
    }
}
