//! Global System Constants.
//!
//! This module defines constants shared across the model. It includes:
//! 1. **Instruction Constants:** Instruction size and the canonical NOP used for reset fill.
//! 2. **Trap Constants:** The interrupt marker bit in `mcause` and the interrupt line count.
//! 3. **MDU Constants:** The fixed iteration count of the multiply/divide unit.
//! 4. **Harness Constants:** The `tohost` pass value and default location used by compliance programs.

/// Size of a standard (32-bit) RISC-V instruction in bytes.
pub const INSTRUCTION_SIZE: u32 = 4;

/// `addi x0, x0, 0`; memory is filled with this word on reset.
pub const NOP_INSTRUCTION: u32 = 0x0000_0013;

/// Bit 31 of `mcause`, set when the trap is an interrupt.
pub const CAUSE_INTERRUPT_BIT: u32 = 1 << 31;

/// Number of interrupt lines sampled into `mip`.
pub const INTERRUPT_LINES: u32 = 32;

/// Iterations performed by the multiply/divide unit for every operation.
pub const MDU_ITERATIONS: u32 = 32;

/// Value written to `tohost` by a passing compliance program.
pub const TOHOST_PASS: u32 = 1;

/// Offset of `tohost` from the memory base when the image does not name it.
pub const TOHOST_DEFAULT_OFFSET: u32 = 0x1000;
