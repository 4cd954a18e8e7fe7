//! Iterative restoring divider.
//!
//! Signed operands are reduced to magnitudes, one quotient bit is produced per
//! step (most significant first), and the signs are re-applied at the end:
//! the quotient takes the XOR of the input signs, the remainder the dividend's.

use crate::core::control::signals::MduOp;

use super::multiply::magnitude;

/// Datapath registers of an in-flight divide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Divider {
    dividend: u32,
    divisor: u32,
    original_dividend: u32,
    quotient: u32,
    remainder: u64,
    next_bit: u32,
    negate_quotient: bool,
    negate_remainder: bool,
}

impl Divider {
    /// Captures the operands of a divide or remainder.
    ///
    /// # Arguments
    ///
    /// * `op` - One of `Div`, `Divu`, `Rem`, `Remu`.
    /// * `a` - Dividend (`rs1`).
    /// * `b` - Divisor (`rs2`).
    pub const fn new(op: MduOp, a: u32, b: u32) -> Self {
        let signed = matches!(op, MduOp::Div | MduOp::Rem);
        let (ma, sa) = magnitude(a, signed);
        let (mb, sb) = magnitude(b, signed);
        Self {
            dividend: ma,
            divisor: mb,
            original_dividend: a,
            quotient: 0,
            remainder: 0,
            next_bit: 32,
            negate_quotient: sa != sb,
            negate_remainder: sa,
        }
    }

    /// Produces one quotient bit: shift in the next dividend bit, trial-subtract, restore on underflow.
    pub const fn step(&mut self) {
        if self.next_bit == 0 {
            return;
        }
        self.next_bit -= 1;
        let bit = (self.dividend >> self.next_bit) & 1;
        self.remainder = (self.remainder << 1) | bit as u64;
        if self.remainder >= self.divisor as u64 {
            self.remainder -= self.divisor as u64;
            self.quotient |= 1 << self.next_bit;
        }
    }

    /// Returns `(quotient, remainder)` with signs applied.
    ///
    /// A zero divisor yields an all-ones quotient and the original dividend as
    /// remainder. The signed overflow case (`i32::MIN / -1`) falls out of the
    /// magnitude arithmetic as quotient `0x8000_0000`, remainder 0.
    pub const fn result(&self) -> (u32, u32) {
        if self.divisor == 0 {
            return (u32::MAX, self.original_dividend);
        }
        let q = if self.negate_quotient {
            self.quotient.wrapping_neg()
        } else {
            self.quotient
        };
        let r = self.remainder as u32;
        let r = if self.negate_remainder {
            r.wrapping_neg()
        } else {
            r
        };
        (q, r)
    }
}
