//! # Unit Components
//!
//! Organizes the unit tests by component: shared types, the execution core,
//! the ISA decoder, the memory system and the simulator harness.
