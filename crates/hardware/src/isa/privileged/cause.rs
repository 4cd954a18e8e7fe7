//! RISC-V Trap Cause Codes.
//!
//! Cause codes written to `mcause`. Bit 31 marks an interrupt; the low bits
//! hold the exception code or the interrupt line index.

/// Standard machine-level interrupt line indices.
///
/// Any of the 32 lines may be raised; these three carry their architectural names.
pub mod interrupt {
    /// Machine software interrupt line.
    pub const MACHINE_SOFTWARE: u32 = 3;

    /// Machine timer interrupt line.
    pub const MACHINE_TIMER: u32 = 7;

    /// Machine external interrupt line.
    pub const MACHINE_EXTERNAL: u32 = 11;
}

/// Exception codes (bit 31 clear).
pub mod exception {
    /// Instruction address misaligned (0).
    pub const INSTRUCTION_ADDRESS_MISALIGNED: u32 = 0;
    /// Instruction access fault (1).
    pub const INSTRUCTION_ACCESS_FAULT: u32 = 1;
    /// Illegal instruction (2).
    pub const ILLEGAL_INSTRUCTION: u32 = 2;
    /// Breakpoint (3).
    pub const BREAKPOINT: u32 = 3;
    /// Load address misaligned (4).
    pub const LOAD_ADDRESS_MISALIGNED: u32 = 4;
    /// Load access fault (5).
    pub const LOAD_ACCESS_FAULT: u32 = 5;
    /// Store address misaligned (6).
    pub const STORE_ADDRESS_MISALIGNED: u32 = 6;
    /// Store access fault (7).
    pub const STORE_ACCESS_FAULT: u32 = 7;
    /// Environment call from M-mode (11).
    pub const ENVIRONMENT_CALL_FROM_M_MODE: u32 = 11;
}
