//! Data Memory Access.
//!
//! This module implements the `MEM` state of the controller. It performs the following:
//! 1. **Lane Mapping:** Converts an address and width into word-aligned bus beats with
//!    byte-enable masks.
//! 2. **Store Data:** Replicates bytes and halfwords across lanes for aligned stores,
//!    shifts them into place for split accesses.
//! 3. **Load Extension:** Gathers the addressed lanes and sign- or zero-extends them.
//! 4. **Bus Errors:** Re-runs the exception detector with the data-error input.
//!
//! An access that crosses a word boundary (only possible when misaligned accesses do
//! not trap) is performed as two beats, low word first.

use super::Cpu;
use crate::core::control::ControllerState;
use crate::core::control::signals::MemWidth;
use crate::core::units::exception::{ExceptionInputs, MemAccess};
use crate::soc::traits::{BusRequest, CoreBus};

/// Number of bus beats needed for an access.
pub const fn beats(addr: u32, width: MemWidth) -> u32 {
    if (addr & 0b11) + width.bytes() > 4 { 2 } else { 1 }
}

/// Byte lanes covered by one beat of an access.
///
/// # Arguments
///
/// * `addr` - Effective address.
/// * `width` - Access width.
/// * `beat` - Beat index (0 or 1).
///
/// # Returns
///
/// `(word_address, sel, first_byte, lane_offset)`: the word address driven on the bus,
/// the byte-enable mask, the index of the first access byte carried by this beat,
/// and the lane that byte travels on.
pub const fn beat_lanes(addr: u32, width: MemWidth, beat: u32) -> (u32, u8, u32, u32) {
    let offset = addr & 0b11;
    let bytes = width.bytes();
    let first_beat = if 4 - offset < bytes { 4 - offset } else { bytes };
    if beat == 0 {
        let sel = ((1u32 << first_beat) - 1) << offset;
        (addr & !0b11, sel as u8, 0, offset)
    } else {
        let rest = bytes - first_beat;
        let sel = (1u32 << rest) - 1;
        ((addr & !0b11).wrapping_add(4), sel as u8, first_beat, 0)
    }
}

/// Write data driven for one beat of a store.
pub const fn store_data(addr: u32, width: MemWidth, beat: u32, value: u32) -> u32 {
    if width.is_aligned(addr) {
        return match width {
            MemWidth::Byte => (value & 0xFF).wrapping_mul(0x0101_0101),
            MemWidth::Half => (value & 0xFFFF).wrapping_mul(0x0001_0001),
            MemWidth::Word | MemWidth::Nop => value,
        };
    }
    let (_, _, first, lane) = beat_lanes(addr, width, beat);
    (value >> (8 * first)) << (8 * lane)
}

/// Sign- or zero-extends the low `width` bytes of `raw`.
pub const fn extend_load(raw: u32, width: MemWidth, signed: bool) -> u32 {
    match (width, signed) {
        (MemWidth::Byte, true) => raw as u8 as i8 as i32 as u32,
        (MemWidth::Byte, false) => raw & 0xFF,
        (MemWidth::Half, true) => raw as u16 as i16 as i32 as u32,
        (MemWidth::Half, false) => raw & 0xFFFF,
        (MemWidth::Word | MemWidth::Nop, _) => raw,
    }
}

impl Cpu {
    fn data_request(&self) -> BusRequest {
        let ctrl = self.latch.inst.ctrl;
        let addr = self.latch.mem_addr;
        let (word_addr, sel, _, _) = beat_lanes(addr, ctrl.width, self.latch.beat);
        BusRequest {
            addr: word_addr,
            write: ctrl.mem_write,
            sel,
            data: if ctrl.mem_write {
                store_data(addr, ctrl.width, self.latch.beat, self.latch.rs2)
            } else {
                0
            },
        }
    }

    pub(super) fn mem_stage<B: CoreBus + ?Sized>(&mut self, bus: &mut B) -> ControllerState {
        let ctrl = self.latch.inst.ctrl;
        let addr = self.latch.mem_addr;
        let req = self.data_request();

        let Some(resp) = bus.data(&req) else {
            self.stats.stalls_mem += 1;
            return ControllerState::Mem;
        };

        if resp.error {
            let inputs = ExceptionInputs {
                pc: self.latch.pc,
                inst: self.latch.inst.raw(),
                mem: Some(MemAccess {
                    addr,
                    width: ctrl.width,
                    is_store: ctrl.mem_write,
                }),
                data_error: true,
                ..ExceptionInputs::default()
            };
            if let Some(trap) = self.detector.detect(&inputs) {
                self.pending_trap = Some((trap, self.latch.pc));
                return ControllerState::Trap;
            }
        }

        if ctrl.mem_read {
            let (_, sel, first, lane) = beat_lanes(addr, ctrl.width, self.latch.beat);
            let lane_mask = (0..4u32)
                .filter(|&i| (sel >> i) & 1 != 0)
                .fold(0u32, |mask, i| mask | (0xFF << (8 * i)));
            self.latch.load_raw |= ((resp.data & lane_mask) >> (8 * lane)) << (8 * first);
        }

        if self.latch.beat + 1 < beats(addr, ctrl.width) {
            self.latch.beat += 1;
            return ControllerState::Mem;
        }

        if ctrl.mem_read {
            self.latch.result = extend_load(self.latch.load_raw, ctrl.width, ctrl.signed_load);
        }
        ControllerState::Writeback
    }
}
