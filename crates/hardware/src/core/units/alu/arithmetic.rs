//! ALU arithmetic operations.
//!
//! Two's-complement addition and subtraction on 32-bit operands. Overflow wraps
//! silently, as RISC-V defines no arithmetic overflow exception.

use crate::core::control::signals::AluOp;

/// `a + b` or `a - b` modulo 2^32. Other ops yield zero.
pub const fn execute(op: AluOp, a: u32, b: u32) -> u32 {
    match op {
        AluOp::Add => a.wrapping_add(b),
        AluOp::Sub => a.wrapping_sub(b),
        _ => 0,
    }
}
