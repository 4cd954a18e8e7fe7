//! Architectural register file.
//!
//! This module provides the `RegisterFile` struct, the interface the execution controller
//! uses for the integer registers. It provides:
//! 1. **Storage:** The 32 general-purpose registers of RV32I.
//! 2. **Abstraction:** ABI-aware dumps for trace output.
//! 3. **Observability:** A snapshot of all registers for test harnesses.

use std::fmt;

use crate::core::arch::gpr::{GPR_COUNT, Gpr};
use crate::isa::abi;

/// Integer register file of the RV32 core.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    gpr: Gpr,
}

impl RegisterFile {
    /// Creates a register file with every register cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Register `x0` always returns 0.
    ///
    /// # Returns
    ///
    /// The 32-bit value stored in the register.
    pub fn read(&self, idx: usize) -> u32 {
        self.gpr.read(idx)
    }

    /// Writes a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Writes to `x0` are ignored.
    /// * `val` - The 32-bit value to write.
    pub fn write(&mut self, idx: usize, val: u32) {
        self.gpr.write(idx, val);
    }

    /// Returns a copy of all 32 registers, `x0` included.
    pub fn snapshot(&self) -> [u32; GPR_COUNT] {
        std::array::from_fn(|i| self.gpr.read(i))
    }

    /// Clears every register.
    pub fn reset(&mut self) {
        self.gpr = Gpr::default();
    }
}

impl fmt::Display for RegisterFile {
    /// Formats the registers four per line with their ABI names.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..GPR_COUNT).step_by(4) {
            for idx in row..row + 4 {
                write!(f, "{:>4}={:#010x} ", abi::name(idx), self.gpr.read(idx))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
