//! System memory.
//!
//! This module implements the RAM behind both core ports. It provides:
//! 1. **Storage:** A flat little-endian byte array mapped at a base address,
//!    filled with `NOP` at reset.
//! 2. **Controller:** Wait-state modeling per port (see [`controller`]).
//! 3. **Faults:** Unmapped addresses and injected fault regions answer with an error.
//! 4. **Loading:** Byte and word image loading for the harness and tests.

/// Port latency models and the acknowledge sequencer.
pub mod controller;

use std::ops::Range;

use crate::common::constants::NOP_INSTRUCTION;
use crate::common::error::LoadError;
use crate::config::MemoryConfig;
use crate::soc::traits::{BusRequest, BusResponse, CoreBus};

use self::controller::{MemoryController, Port, SimpleController};

/// RAM serving the instruction and data ports.
#[derive(Debug)]
pub struct Memory {
    base: u32,
    bytes: Vec<u8>,
    fetch_port: Port,
    data_port: Port,
    fault_regions: Vec<Range<u32>>,
}

impl Memory {
    /// Creates a zero-wait-state memory of `size` bytes at `base`.
    ///
    /// # Arguments
    ///
    /// * `base` - First mapped byte address.
    /// * `size` - Size in bytes.
    pub fn new(base: u32, size: usize) -> Self {
        let mut bytes = Vec::with_capacity(size);
        let fill = NOP_INSTRUCTION.to_le_bytes();
        bytes.extend((0..size).map(|i| fill[i % 4]));
        Self {
            base,
            bytes,
            fetch_port: Port::new(Box::new(SimpleController::new(0))),
            data_port: Port::new(Box::new(SimpleController::new(0))),
            fault_regions: Vec::new(),
        }
    }

    /// Creates a memory from its configuration section.
    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::new(config.base, config.size)
            .with_wait_states(config.fetch_wait_states, config.data_wait_states)
    }

    /// Sets fixed wait-states for each port.
    #[must_use]
    pub fn with_wait_states(self, fetch: u32, data: u32) -> Self {
        self.with_controllers(
            Box::new(SimpleController::new(fetch)),
            Box::new(SimpleController::new(data)),
        )
    }

    /// Replaces the latency models of both ports.
    #[must_use]
    pub fn with_controllers(
        mut self,
        fetch: Box<dyn MemoryController>,
        data: Box<dyn MemoryController>,
    ) -> Self {
        self.fetch_port = Port::new(fetch);
        self.data_port = Port::new(data);
        self
    }

    /// Drops requests in flight on both ports, e.g. after a core reset.
    pub const fn cancel_pending(&mut self) {
        self.fetch_port.cancel();
        self.data_port.cancel();
    }

    /// Makes every access inside `region` answer with a bus error.
    pub fn add_fault_region(&mut self, region: Range<u32>) {
        self.fault_regions.push(region);
    }

    /// First mapped address.
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// Mapped size in bytes.
    pub const fn size(&self) -> usize {
        self.bytes.len()
    }

    fn offset(&self, addr: u32, len: usize) -> Option<usize> {
        let offset = addr.checked_sub(self.base)? as usize;
        (offset.checked_add(len)? <= self.bytes.len()).then_some(offset)
    }

    /// Whether `len` bytes starting at `addr` are all mapped.
    pub fn contains(&self, addr: u32, len: usize) -> bool {
        self.offset(addr, len).is_some()
    }

    fn faults(&self, addr: u32) -> bool {
        self.fault_regions.iter().any(|r| r.contains(&addr))
    }

    /// Copies `data` into memory starting at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::OutOfRange`] if any byte falls outside the mapping;
    /// memory is left untouched in that case.
    pub fn load_bytes(&mut self, addr: u32, data: &[u8]) -> Result<(), LoadError> {
        let offset = self.offset(addr, data.len()).ok_or(LoadError::OutOfRange {
            addr,
            len: data.len(),
        })?;
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Stores consecutive little-endian words starting at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::OutOfRange`] if any word falls outside the mapping.
    pub fn load_words(&mut self, addr: u32, words: &[u32]) -> Result<(), LoadError> {
        let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        self.load_bytes(addr, &bytes)
    }

    /// Writes one word at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::OutOfRange`] if the word is not mapped.
    pub fn write_u32(&mut self, addr: u32, value: u32) -> Result<(), LoadError> {
        self.load_bytes(addr, &value.to_le_bytes())
    }

    /// Reads one little-endian word at `addr`, or `None` if unmapped.
    pub fn read_u32(&self, addr: u32) -> Option<u32> {
        let offset = self.offset(addr, 4)?;
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.bytes[offset..offset + 4]);
        Some(u32::from_le_bytes(word))
    }

    /// Reads one byte at `addr`, or `None` if unmapped.
    pub fn read_u8(&self, addr: u32) -> Option<u8> {
        self.offset(addr, 1).map(|o| self.bytes[o])
    }

    fn access(&mut self, req: &BusRequest) -> BusResponse {
        let addr = req.addr & !0b11;
        if self.faults(addr) {
            return BusResponse::err();
        }
        let Some(offset) = self.offset(addr, 4) else {
            return BusResponse::err();
        };
        if req.write {
            let data = req.data.to_le_bytes();
            for (lane, byte) in data.iter().enumerate() {
                if req.sel & (1 << lane) != 0 {
                    self.bytes[offset + lane] = *byte;
                }
            }
            BusResponse::ok(0)
        } else {
            self.read_u32(addr).map_or_else(BusResponse::err, BusResponse::ok)
        }
    }
}

impl CoreBus for Memory {
    fn instruction(&mut self, req: &BusRequest) -> Option<BusResponse> {
        if !self.fetch_port.present(req) {
            return None;
        }
        if req.write {
            return Some(BusResponse::err());
        }
        Some(self.access(req))
    }

    fn data(&mut self, req: &BusRequest) -> Option<BusResponse> {
        if !self.data_port.present(req) {
            return None;
        }
        Some(self.access(req))
    }

    fn peek_u32(&self, addr: u32) -> Option<u32> {
        self.read_u32(addr)
    }

    fn cancel_instruction(&mut self) {
        self.fetch_port.cancel();
    }
}
