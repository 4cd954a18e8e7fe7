//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the single-cycle RV32I integer ALU used in the Execute
//! state. Results wrap modulo 2^32; there is no saturation and no internal state.
//! Multiply and divide are not handled here; they run on the iterative MDU.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub
//! - [`logic`]:      Or, And, Xor, Slt, Sltu
//! - [`shifts`]:     Sll, Srl, Sra

/// Integer addition and subtraction.
pub mod arithmetic;

/// Bitwise logical and comparison operations (or, and, xor, slt).
pub mod logic;

/// Shift operations (sll, srl, sra).
pub mod shifts;

use crate::core::control::signals::{AluOp, BranchCond};

/// Arithmetic Logic Unit (ALU) for RV32I integer operations.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Combinational result of `op` on `a` and `b`. For shifts only `b[4:0]` is used.
    ///
    /// # Examples
    ///
    /// ```
    /// use rv32im_core::core::units::alu::Alu;
    /// use rv32im_core::core::control::signals::AluOp;
    ///
    /// assert_eq!(Alu::execute(AluOp::Add, 0xFFFF_FFFF, 1), 0);
    /// assert_eq!(Alu::execute(AluOp::Sll, 1, 36), 0x10); // shamt = 36 & 31
    /// assert_eq!(Alu::execute(AluOp::Slt, -5_i32 as u32, 10), 1);
    /// assert_eq!(Alu::execute(AluOp::Sltu, -5_i32 as u32, 10), 0);
    /// ```
    pub const fn execute(op: AluOp, a: u32, b: u32) -> u32 {
        match op {
            AluOp::Add | AluOp::Sub => arithmetic::execute(op, a, b),
            AluOp::Or | AluOp::And | AluOp::Xor | AluOp::Slt | AluOp::Sltu => {
                logic::execute(op, a, b)
            }
            AluOp::Sll | AluOp::Srl | AluOp::Sra => shifts::execute(op, a, b),
        }
    }

    /// Evaluates a branch condition.
    ///
    /// The comparison is computed with the same operation the decoder selected
    /// for the branch (`Sub` for equality, `Slt`/`Sltu` for ordering).
    /// `a` is `rs1` and `b` is `rs2`.
    pub const fn branch_taken(cond: BranchCond, a: u32, b: u32) -> bool {
        match cond {
            BranchCond::Eq => Self::execute(AluOp::Sub, a, b) == 0,
            BranchCond::Ne => Self::execute(AluOp::Sub, a, b) != 0,
            BranchCond::Lt => Self::execute(AluOp::Slt, a, b) == 1,
            BranchCond::Ge => Self::execute(AluOp::Slt, a, b) == 0,
            BranchCond::Ltu => Self::execute(AluOp::Sltu, a, b) == 1,
            BranchCond::Geu => Self::execute(AluOp::Sltu, a, b) == 0,
        }
    }
}
