//! RISC-V Multiply/Divide Extension (M).
//!
//! The 'M' extension adds instructions for integer multiplication and division.
//! These instructions share the `OP_REG` opcode with base integer arithmetic
//! but are distinguished by the `funct7` field being set to 1 (`M_EXTENSION`).
//! The core executes them on the iterative MDU rather than the ALU.

/// Function code 3 definitions for multiply/divide operations.
pub mod funct3;

/// Multiply/divide extension opcodes.
pub mod opcodes;
