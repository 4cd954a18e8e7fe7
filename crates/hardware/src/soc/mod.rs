//! System-on-Chip (SoC) Components.
//!
//! This module organizes what sits around the core: the bus contract the core
//! drives and the RAM that answers it.

/// RAM with per-port wait-states and fault injection.
pub mod memory;

/// Bus request/response types and the `CoreBus` port trait.
pub mod traits;

pub use memory::Memory;
pub use traits::{BusRequest, BusResponse, CoreBus};
