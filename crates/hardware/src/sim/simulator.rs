//! Simulator: owns the core and its memory side by side.
//!
//! The core borrows the bus for each tick, so neither needs to hold a reference
//! to the other. The simulator adds the compliance-test convention on top:
//! a store of 1 to `tohost` passes, any other non-zero value `v` fails test `v >> 1`.

use std::path::Path;

use tracing::{debug, info};

use crate::common::constants::{TOHOST_DEFAULT_OFFSET, TOHOST_PASS};
use crate::common::error::LoadError;
use crate::config::Config;
use crate::core::Cpu;
use crate::sim::loader::{self, ImageFormat, ImageInfo};
use crate::soc::{CoreBus, Memory};

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// `tohost` was written with the pass value.
    Pass,
    /// `tohost` was written with a failure code; carries the failing test number.
    Fail(u32),
    /// The cycle limit was reached first.
    Timeout,
}

impl RunOutcome {
    /// Interprets a `tohost` value.
    ///
    /// # Returns
    ///
    /// `None` while the value is zero (test still running).
    pub const fn from_tohost(value: u32) -> Option<Self> {
        match value {
            0 => None,
            TOHOST_PASS => Some(Self::Pass),
            v => Some(Self::Fail(v >> 1)),
        }
    }

    /// Process exit code for command-line front ends.
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Pass => 0,
            Self::Fail(_) => 1,
            Self::Timeout => 2,
        }
    }
}

/// Top-level simulator: core plus memory.
#[derive(Debug)]
pub struct Simulator<B: CoreBus = Memory> {
    /// The execution core.
    pub cpu: Cpu,
    /// Instruction and data ports.
    pub bus: B,
    tohost: Option<u32>,
    max_cycles: u64,
}

impl Simulator<Memory> {
    /// Creates a simulator with a RAM built from the configuration.
    ///
    /// `tohost` defaults to the memory base plus [`TOHOST_DEFAULT_OFFSET`].
    pub fn new(config: &Config) -> Self {
        let mut sim = Self::with_bus(config, Memory::from_config(&config.memory));
        sim.tohost = Some(config.memory.base.wrapping_add(TOHOST_DEFAULT_OFFSET));
        sim
    }

    /// Loads a program image and clears its `tohost` word.
    ///
    /// The ELF `tohost` symbol, when present, replaces the current `tohost` address.
    ///
    /// # Errors
    ///
    /// Propagates [`LoadError`] from the loader.
    pub fn load_image(&mut self, path: &Path, format: ImageFormat) -> Result<ImageInfo, LoadError> {
        let info = loader::load_image(&mut self.bus, path, format)?;
        if info.tohost.is_some() {
            self.tohost = info.tohost;
        }
        self.clear_tohost();
        Ok(info)
    }

    /// Loads a hex image from text and clears the `tohost` word.
    ///
    /// # Errors
    ///
    /// Propagates [`LoadError`] from the loader.
    pub fn load_hex(&mut self, text: &str) -> Result<ImageInfo, LoadError> {
        let info = loader::load_hex_str(&mut self.bus, text)?;
        self.clear_tohost();
        Ok(info)
    }

    /// Writes 0 to the `tohost` word so a stale value is not mistaken for a result.
    pub fn clear_tohost(&mut self) {
        if let Some(addr) = self.tohost {
            // A tohost outside memory is simply never observed.
            if self.bus.write_u32(addr, 0).is_err() {
                debug!(addr = format_args!("{addr:#010x}"), "tohost is not mapped");
            }
        }
    }
}

impl<B: CoreBus> Simulator<B> {
    /// Creates a simulator around an existing bus.
    pub fn with_bus(config: &Config, bus: B) -> Self {
        Self {
            cpu: Cpu::new(config),
            bus,
            tohost: None,
            max_cycles: config.general.max_cycles,
        }
    }

    /// Sets (or clears) the address polled for the test result.
    pub const fn set_tohost(&mut self, addr: Option<u32>) {
        self.tohost = addr;
    }

    /// Address polled for the test result.
    pub const fn tohost(&self) -> Option<u32> {
        self.tohost
    }

    /// Overrides the cycle limit of [`Simulator::run`].
    pub const fn set_max_cycles(&mut self, cycles: u64) {
        self.max_cycles = cycles;
    }

    /// Drives the core's interrupt lines.
    pub const fn set_interrupt_lines(&mut self, lines: u32) {
        self.cpu.set_interrupt_lines(lines);
    }

    /// Advances the simulator by one clock cycle.
    pub fn tick(&mut self) {
        self.cpu.tick(&mut self.bus);
    }

    /// Reads `tohost` and interprets it.
    pub fn poll_tohost(&self) -> Option<RunOutcome> {
        let addr = self.tohost?;
        RunOutcome::from_tohost(self.bus.peek_u32(addr)?)
    }

    /// Runs until `tohost` is written or the cycle limit is reached.
    pub fn run(&mut self) -> RunOutcome {
        let outcome = self.run_for(self.max_cycles).unwrap_or(RunOutcome::Timeout);
        info!(
            ?outcome,
            cycles = self.cpu.cycles(),
            retired = self.cpu.retired(),
            "run finished"
        );
        outcome
    }

    /// Runs at most `cycles` ticks.
    ///
    /// # Returns
    ///
    /// The outcome as soon as `tohost` is written, or `None` if it never was.
    pub fn run_for(&mut self, cycles: u64) -> Option<RunOutcome> {
        for _ in 0..cycles {
            self.tick();
            if let Some(outcome) = self.poll_tohost() {
                return Some(outcome);
            }
        }
        None
    }

    /// Ticks until `count` more instructions have retired.
    ///
    /// # Returns
    ///
    /// `true` if they retired within `max_cycles` ticks.
    pub fn run_until_retired(&mut self, count: u64, max_cycles: u64) -> bool {
        let target = self.cpu.retired().wrapping_add(count);
        for _ in 0..max_cycles {
            if self.cpu.retired() >= target {
                return true;
            }
            self.tick();
        }
        self.cpu.retired() >= target
    }
}
