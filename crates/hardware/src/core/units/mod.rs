//! Execution units and functional components.
//!
//! This module contains the units the execution controller routes work to:
//! the single-cycle ALU, the iterative multiply/divide unit, and the
//! combinational exception detector.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Synchronous exception priority classifier.
pub mod exception;

/// Iterative multiply/divide unit.
pub mod mdu;
