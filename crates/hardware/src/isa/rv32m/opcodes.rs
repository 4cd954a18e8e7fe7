//! RISC-V Multiply/Divide Extension (M) selector.
//!
//! The M extension shares the `OP_REG` opcode with base integer instructions.

/// M-Extension selector in the funct7 field.
pub const M_EXTENSION: u32 = 0b0000001;
