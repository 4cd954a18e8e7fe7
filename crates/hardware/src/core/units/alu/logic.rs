//! Bitwise and set-less-than operations.

use crate::core::control::signals::AluOp;

/// Bitwise ops act lane by lane; `Slt`/`Sltu` produce 0 or 1.
pub const fn execute(op: AluOp, a: u32, b: u32) -> u32 {
    match op {
        AluOp::Or => a | b,
        AluOp::And => a & b,
        AluOp::Xor => a ^ b,
        AluOp::Slt => ((a as i32) < (b as i32)) as u32,
        AluOp::Sltu => (a < b) as u32,
        _ => 0,
    }
}
