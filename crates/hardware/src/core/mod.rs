//! Core processor implementation.
//!
//! This module contains the RV32IM execution core: architectural state, the
//! instruction control path, execution units, and the execution controller that
//! sequences them.

/// Architecture-specific components (CSRs, register file, trap unit).
pub mod arch;

/// Instruction control path (decoder, signals, controller states).
pub mod control;

/// CPU core and the multi-cycle execution controller.
pub mod cpu;

/// Execution units (ALU, MDU, exception detector).
pub mod units;

pub use self::cpu::Cpu;
