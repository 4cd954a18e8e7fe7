//! Instruction control path.
//!
//! This module contains everything between the raw instruction word and the
//! execution controller. It includes the following modules:
//! 1. **Signals:** Control-signal record and operation enums.
//! 2. **Decoder:** Pure decode from instruction word to control signals.
//! 3. **State:** The execution controller's state enum.

/// Pure instruction decoder.
pub mod decoder;

/// Control signals and operation types.
pub mod signals;

/// Execution controller states.
pub mod state;

pub use decoder::{Instruction, decode};
pub use state::ControllerState;
