//! Simulation harness and program loading.
//!
//! Provides image loaders and the simulator that runs a core against its memory.

/// Hex and ELF image loading.
pub mod loader;

/// The simulator and its run outcome.
pub mod simulator;

pub use loader::{ImageFormat, ImageInfo};
pub use simulator::{RunOutcome, Simulator};
