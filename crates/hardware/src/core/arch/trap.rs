//! Trap unit: interrupt arbitration, trap vectors, trap entry and return.
//!
//! This module implements the CSR-side half of trap handling. It performs
//! the following:
//! 1. **Interrupt Arbitration:** Selects the highest-numbered pending and enabled interrupt.
//! 2. **Vector Computation:** Resolves direct and vectored `mtvec` modes.
//! 3. **Trap Entry:** Saves `mepc`/`mcause`/`mtval` and stacks the interrupt enable.
//! 4. **Trap Return:** Restores the interrupt enable for `MRET` and yields `mepc`.

use crate::common::constants::INTERRUPT_LINES;
use crate::common::error::Trap;
use crate::core::arch::csr::{self, Csrs};

/// Stateless trap logic operating on a `Csrs` file.
#[derive(Debug)]
pub struct TrapUnit;

impl TrapUnit {
    /// Returns the highest set bit of `mask`, the winning interrupt line.
    ///
    /// # Arguments
    ///
    /// * `mask` - Pending-and-enabled interrupt bits.
    ///
    /// # Returns
    ///
    /// The bit index, or `None` when `mask` is zero.
    pub const fn highest_pending(mask: u32) -> Option<u32> {
        if mask == 0 {
            None
        } else {
            Some(INTERRUPT_LINES - 1 - mask.leading_zeros())
        }
    }

    /// Interrupt lines that are both pending and enabled, ignoring `mstatus.MIE`.
    ///
    /// `WFI` wakes on this mask even when interrupts are globally disabled.
    pub const fn pending_and_enabled(csrs: &Csrs) -> u32 {
        csrs.mip & csrs.mie
    }

    /// Selects the interrupt to take, if any.
    ///
    /// # Arguments
    ///
    /// * `csrs` - The CSR file.
    ///
    /// # Returns
    ///
    /// `Some(Trap::Interrupt(line))` for the highest pending, enabled line while
    /// `mstatus.MIE` is set; otherwise `None`.
    pub const fn pending_interrupt(csrs: &Csrs) -> Option<Trap> {
        if !csrs.interrupts_enabled() {
            return None;
        }
        match Self::highest_pending(Self::pending_and_enabled(csrs)) {
            Some(line) => Some(Trap::Interrupt(line)),
            None => None,
        }
    }

    /// Computes the handler address for a trap.
    ///
    /// # Arguments
    ///
    /// * `mtvec` - Current `mtvec` value.
    /// * `trap` - The trap being taken.
    ///
    /// # Returns
    ///
    /// `base` in direct mode or for exceptions; `base + 4 * line` for interrupts
    /// in vectored mode.
    pub const fn vector(mtvec: u32, trap: &Trap) -> u32 {
        let base = mtvec & !csr::MTVEC_MODE_MASK;
        let vectored = mtvec & csr::MTVEC_MODE_MASK == csr::MTVEC_MODE_VECTORED;
        if vectored && trap.is_interrupt() {
            base.wrapping_add(4 * trap.code())
        } else {
            base
        }
    }

    /// Performs trap entry on the CSR file.
    ///
    /// # Arguments
    ///
    /// * `csrs` - The CSR file.
    /// * `trap` - The trap being taken.
    /// * `epc` - PC of the faulting instruction, or of the next instruction for interrupts.
    ///
    /// # Returns
    ///
    /// The handler address the PC must jump to.
    pub fn enter(csrs: &mut Csrs, trap: &Trap, epc: u32) -> u32 {
        csrs.write(csr::MEPC, epc);
        csrs.mcause = trap.cause();
        csrs.mtval = trap.tval();

        let mie = csrs.mstatus & csr::MSTATUS_MIE != 0;
        csrs.mstatus &= !(csr::MSTATUS_MIE | csr::MSTATUS_MPIE);
        if mie {
            csrs.mstatus |= csr::MSTATUS_MPIE;
        }

        Self::vector(csrs.mtvec, trap)
    }

    /// Performs trap return (`MRET`) on the CSR file.
    ///
    /// # Returns
    ///
    /// The saved `mepc`, unchanged; no offset is applied.
    pub const fn ret(csrs: &mut Csrs) -> u32 {
        let mpie = csrs.mstatus & csr::MSTATUS_MPIE != 0;
        csrs.mstatus &= !csr::MSTATUS_MIE;
        if mpie {
            csrs.mstatus |= csr::MSTATUS_MIE;
        }
        csrs.mstatus |= csr::MSTATUS_MPIE;
        csrs.mepc
    }
}
