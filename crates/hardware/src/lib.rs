//! Cycle-accurate RV32IM execution core model.
//!
//! This crate models a multi-cycle, machine-mode-only RISC-V core with the following:
//! 1. **Core:** Execution controller FSM, register file, CSR/trap unit and exception detector.
//! 2. **Units:** Single-cycle ALU and a 32-iteration multiply/divide unit.
//! 3. **ISA:** Field extraction and decoding for RV32I, RV32M, Zicsr, MRET and WFI.
//! 4. **SoC:** The two-port bus contract and a wait-state RAM implementing it.
//! 5. **Simulation:** Image loaders, configuration, statistics and a `tohost` harness.
//!
//! # Examples
//!
//! ```
//! use rv32im_core::{Config, Simulator};
//!
//! let mut sim = Simulator::new(&Config::default());
//! // addi x1, x0, 5 ; addi x2, x1, 7
//! sim.load_hex("00500093\n00708113\n").unwrap();
//! assert!(sim.run_until_retired(2, 100));
//! assert_eq!(sim.cpu.regs.read(2), 12);
//! ```

/// Common types and constants (registers, traps, host errors).
pub mod common;
/// Model configuration (defaults and hierarchical config structures).
pub mod config;
/// Execution core (controller, arch state, units).
pub mod core;
/// Instruction set (fields, opcodes, ABI names, trap causes).
pub mod isa;
/// Image loaders and the simulator harness.
pub mod sim;
/// Bus contract and memory.
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or parse from JSON.
pub use crate::config::Config;
/// The execution core.
pub use crate::core::Cpu;
/// Core plus memory with the `tohost` convention.
pub use crate::sim::Simulator;
/// Flat RAM implementing both bus ports.
pub use crate::soc::Memory;
