//! Trap Handling Logic.
//!
//! This module implements trap entry and return for the controller. It performs the following:
//! 1. **Trap Dispatch:** Takes the trap selected at `FETCH`, `EXECUTE` or `MEM` on the
//!    following cycle and redirects the PC to the handler.
//! 2. **Context Saving:** Delegates `mepc`/`mcause`/`mtval` and interrupt-enable stacking
//!    to the trap unit.
//! 3. **Return Handling:** Implements `MRET`, resuming at `mepc` with no offset.

use tracing::debug;

use super::Cpu;
use crate::common::Trap;
use crate::core::arch::trap::TrapUnit;
use crate::core::control::ControllerState;

impl Cpu {
    /// Handles a trap (exception or interrupt).
    ///
    /// # Arguments
    ///
    /// * `cause` - The trap being taken.
    /// * `epc` - PC of the faulting instruction, or of the next instruction for interrupts.
    pub fn trap(&mut self, cause: Trap, epc: u32) {
        let handler = TrapUnit::enter(&mut self.csrs, &cause, epc);
        if cause.is_interrupt() {
            self.stats.interrupts_taken += 1;
        } else {
            self.stats.exceptions_taken += 1;
        }
        debug!(
            %cause,
            epc = format_args!("{epc:#010x}"),
            mcause = format_args!("{:#010x}", self.csrs.mcause),
            handler = format_args!("{handler:#010x}"),
            "trap entry"
        );
        self.wfi_waiting = false;
        self.pc = handler;
    }

    /// Executes `MRET`.
    ///
    /// # Returns
    ///
    /// The PC to resume at (`mepc`).
    pub(crate) fn do_mret(&mut self) -> u32 {
        let target = TrapUnit::ret(&mut self.csrs);
        debug!(
            target = format_args!("{target:#010x}"),
            mie = self.csrs.interrupts_enabled(),
            "trap return"
        );
        target
    }

    pub(super) fn trap_stage(&mut self) -> ControllerState {
        if let Some((cause, epc)) = self.pending_trap.take() {
            self.trap(cause, epc);
        }
        ControllerState::Fetch
    }
}
