//! RISC-V Base Integer (I) Function Codes (funct7).
//!
//! The `funct7` field (bits 31-25) distinguishes ADD from SUB and SRL from SRA.
//! For RV32 shift-immediates it occupies the same bits above the 5-bit shamt.

/// Default operation (ADD, SRL, etc.).
pub const DEFAULT: u32 = 0b0000000;

/// Alternate operation (SUB).
pub const SUB: u32 = 0b0100000;

/// Alternate operation (SRA, SRAI).
pub const SRA: u32 = 0b0100000;
