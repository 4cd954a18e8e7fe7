//! Memory collaborator interface of the core.
//!
//! This module defines the request/response contract between the core and the
//! outside world. It provides:
//! 1. **Requests:** Word address, write strobe, 4-bit byte-enable mask and write data.
//! 2. **Responses:** Read data plus an error flag, or "not yet" while the access is pending.
//! 3. **Ports:** The `CoreBus` trait with separate instruction and data ports, one
//!    outstanding request per port.
//!
//! The core re-presents the same request every cycle until the port acknowledges it,
//! which is how wait-states (and therefore stall cycles) are modelled.

/// Byte-enable mask selecting all four lanes.
pub const SEL_WORD: u8 = 0b1111;

/// A bus request as driven by the core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BusRequest {
    /// Word-aligned byte address.
    pub addr: u32,
    /// `true` for writes.
    pub write: bool,
    /// Byte-enable mask; bit `n` selects bits `8n+7..8n` of `data`.
    pub sel: u8,
    /// Write data, already shifted into the enabled lanes.
    pub data: u32,
}

impl BusRequest {
    /// A full-word read, as issued by instruction fetch.
    pub const fn read_word(addr: u32) -> Self {
        Self {
            addr: addr & !0b11,
            write: false,
            sel: SEL_WORD,
            data: 0,
        }
    }
}

/// Acknowledgement of a bus request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BusResponse {
    /// Read data for all four lanes (ignored for writes).
    pub data: u32,
    /// The access failed (unmapped address, device error).
    pub error: bool,
}

impl BusResponse {
    /// A successful acknowledgement carrying `data`.
    pub const fn ok(data: u32) -> Self {
        Self { data, error: false }
    }

    /// An error acknowledgement.
    pub const fn err() -> Self {
        Self {
            data: 0,
            error: true,
        }
    }
}

/// Instruction and data ports of the core.
///
/// Implementations return `None` while a request is still in progress and
/// `Some(response)` on the cycle it completes. Each port has at most one
/// outstanding request; the core keeps presenting it until acknowledged.
pub trait CoreBus {
    /// Instruction port; always full-word reads.
    fn instruction(&mut self, req: &BusRequest) -> Option<BusResponse>;

    /// Data port; loads and stores.
    fn data(&mut self, req: &BusRequest) -> Option<BusResponse>;

    /// Side-effect-free word read for harnesses (e.g. polling `tohost`).
    ///
    /// Returns `None` where the implementation has no backing store.
    fn peek_u32(&self, _addr: u32) -> Option<u32> {
        None
    }

    /// Withdraws the instruction request in flight, if any. The next fetch starts
    /// its wait-states from zero even when it repeats the same address.
    fn cancel_instruction(&mut self) {}
}
