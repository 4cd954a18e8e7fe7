//! RISC-V architecture-specific components.
//!
//! This module contains the implementation of core RISC-V architectural elements.
//! It includes the following modules:
//! 1. **CSRs:** Control and Status Register definitions and access logic.
//! 2. **GPRs:** General-Purpose Register file implementation.
//! 3. **Traps:** Interrupt arbitration and trap-vector computation.

/// Control and Status Register (CSR) definitions and access logic.
pub mod csr;

/// General-Purpose Register file implementation.
pub mod gpr;

/// Interrupt arbitration and trap-vector computation.
pub mod trap;
