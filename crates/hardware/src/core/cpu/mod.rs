//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, which holds the entire
//! architectural and micro-architectural state of the core. It coordinates the following:
//! 1. **State Management:** Registers, program counter, CSRs and the controller state.
//! 2. **Units:** The iterative MDU and the exception detector.
//! 3. **Latches:** Per-instruction scratch state carried between controller states.
//! 4. **Observability:** Statistics and inspection accessors for harnesses.
//!
//! The core does not own its memory; every `tick` borrows a [`CoreBus`](crate::soc::CoreBus).

/// CSR instruction path (validation at execute, read-modify-write at writeback).
pub mod csr;

/// The controller FSM, one state per clock.
pub mod execution;

/// Data-bus beats, byte lanes and load extension.
pub mod memory;

/// Trap entry and return.
pub mod trap;

use crate::common::RegisterFile;
use crate::common::error::Trap;
use crate::config::Config;
use crate::core::arch::csr::{CsrIdentity, Csrs};
use crate::core::control::{ControllerState, Instruction};
use crate::core::units::exception::ExceptionDetector;
use crate::core::units::mdu::Mdu;
use crate::stats::SimStats;

/// Scratch state of the instruction currently in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Latch {
    /// PC of the instruction.
    pub pc: u32,
    /// Fetched word (0 when the fetch failed).
    pub word: u32,
    /// The instruction bus answered with an error.
    pub fetch_error: bool,
    /// Decoded instruction.
    pub inst: Instruction,
    /// Value of `rs1` read at decode.
    pub rs1: u32,
    /// Value of `rs2` read at decode.
    pub rs2: u32,
    /// Value destined for `rd`.
    pub result: u32,
    /// PC after retirement.
    pub next_pc: u32,
    /// Effective address of a load or store.
    pub mem_addr: u32,
    /// Data bus beat in progress (split accesses take two).
    pub beat: u32,
    /// Bytes gathered so far by a load, least significant first.
    pub load_raw: u32,
    /// CSR source operand (`rs1` or zero-extended immediate).
    pub csr_operand: u32,
    /// The CSR instruction writes its CSR.
    pub csr_writes: bool,
}

/// Main CPU structure containing all core state.
///
/// The controller advances exactly one state per [`Cpu::tick`]. Architectural
/// state changes only in `Writeback` (retirement) and `Trap` (trap entry).
#[derive(Clone, Debug)]
pub struct Cpu {
    /// Integer registers.
    pub regs: RegisterFile,
    /// Program Counter.
    pub pc: u32,
    /// Control and Status Registers.
    pub csrs: Csrs,
    /// Controller state to be evaluated on the next tick.
    pub state: ControllerState,
    /// Iterative multiply/divide unit.
    pub mdu: Mdu,
    /// Synchronous exception classifier.
    pub detector: ExceptionDetector,
    /// Log every retired instruction.
    pub trace: bool,
    /// Performance statistics.
    pub stats: SimStats,

    pub(crate) latch: Latch,
    pub(crate) pending_trap: Option<(Trap, u32)>,
    pub(crate) wfi_waiting: bool,
    irq_lines: u32,
    reset_vector: u32,
    mtvec_reset: u32,
    identity: CsrIdentity,
}

impl Cpu {
    /// Creates a core in its reset state.
    ///
    /// # Arguments
    ///
    /// * `config` - Reset vector, trap vector, identity CSRs and misalignment policy.
    pub fn new(config: &Config) -> Self {
        let identity = CsrIdentity::from(config.identity);
        Self {
            regs: RegisterFile::new(),
            pc: config.core.reset_vector,
            csrs: Csrs::new(identity, config.core.mtvec_reset),
            state: ControllerState::Fetch,
            mdu: Mdu::new(),
            detector: ExceptionDetector::new(config.core.trap_misaligned),
            trace: config.general.trace_instructions,
            stats: SimStats::default(),
            latch: Latch::default(),
            pending_trap: None,
            wfi_waiting: false,
            irq_lines: 0,
            reset_vector: config.core.reset_vector,
            mtvec_reset: config.core.mtvec_reset,
            identity,
        }
    }

    /// Returns the core to its reset state.
    ///
    /// Registers and CSRs are cleared, the PC is set to the reset vector and any
    /// in-flight instruction, MDU operation or WFI sleep is abandoned. The interrupt
    /// lines keep their current level.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.pc = self.reset_vector;
        self.csrs = Csrs::new(self.identity, self.mtvec_reset);
        self.state = ControllerState::Fetch;
        self.mdu.reset();
        self.stats = SimStats::default();
        self.latch = Latch::default();
        self.pending_trap = None;
        self.wfi_waiting = false;
    }

    /// Drives the 32 interrupt lines; they are sampled into `mip` on every tick.
    pub const fn set_interrupt_lines(&mut self, lines: u32) {
        self.irq_lines = lines;
    }

    /// Current level of the interrupt lines.
    pub const fn interrupt_lines(&self) -> u32 {
        self.irq_lines
    }

    /// Reads a CSR as a CSR instruction would, without side effects.
    pub fn csr(&self, addr: u32) -> u32 {
        self.csrs.read(addr)
    }

    /// Controller state to be evaluated on the next tick.
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// `true` while the core sleeps after `WFI`.
    pub const fn is_sleeping(&self) -> bool {
        self.wfi_waiting
    }

    /// Instructions retired so far (`minstret`).
    pub const fn retired(&self) -> u64 {
        self.csrs.minstret
    }

    /// Cycles elapsed so far (`mcycle`).
    pub const fn cycles(&self) -> u64 {
        self.csrs.mcycle
    }
}
