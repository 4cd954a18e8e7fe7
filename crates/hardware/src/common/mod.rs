//! Common utilities and types used throughout the RV32IM core model.
//!
//! This module provides the building blocks shared by every component. It includes:
//! 1. **Constants:** Instruction size, reset fill word, trap and MDU constants.
//! 2. **Error Handling:** Architectural traps and host-side error types.
//! 3. **Register Management:** The integer register file.

/// Common constants used throughout the model.
pub mod constants;

/// Trap definitions and host error types.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use error::{ConfigError, LoadError, MduError, SimError, Trap};
pub use reg::RegisterFile;
