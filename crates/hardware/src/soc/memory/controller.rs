//! Port latency modeling.
//!
//! This module provides:
//! 1. **MemoryController:** Reports how many wait-states an access costs.
//! 2. **SimpleController:** Fixed wait-states per access.
//! 3. **Port:** The acknowledge sequencer for one bus port; a request must be
//!    presented for `latency + 1` consecutive cycles before it is acknowledged.

use std::fmt;

use crate::soc::traits::BusRequest;

/// Trait for latency models that report the wait-states of an access.
pub trait MemoryController: fmt::Debug {
    /// Returns the number of wait-states for an access to `addr`.
    ///
    /// # Arguments
    ///
    /// * `addr` - Word address being accessed.
    ///
    /// # Returns
    ///
    /// Cycles the request is held without acknowledgement; 0 means single-cycle.
    fn access_latency(&mut self, addr: u32) -> u32;
}

/// Fixed-latency controller; every access takes the same number of wait-states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimpleController {
    latency: u32,
}

impl SimpleController {
    /// Creates a controller with `latency` wait-states per access.
    pub const fn new(latency: u32) -> Self {
        Self { latency }
    }
}

impl MemoryController for SimpleController {
    fn access_latency(&mut self, _addr: u32) -> u32 {
        self.latency
    }
}

/// Acknowledge sequencer for one port.
#[derive(Debug)]
pub struct Port {
    controller: Box<dyn MemoryController>,
    pending: Option<(BusRequest, u32)>,
}

impl Port {
    /// Creates a port driven by `controller`.
    pub fn new(controller: Box<dyn MemoryController>) -> Self {
        Self {
            controller,
            pending: None,
        }
    }

    /// Presents `req` for one cycle.
    ///
    /// # Returns
    ///
    /// `true` on the cycle the request is acknowledged. A different request
    /// replaces the one in flight and restarts its wait-states.
    pub fn present(&mut self, req: &BusRequest) -> bool {
        let remaining = match self.pending {
            Some((held, remaining)) if held == *req => remaining,
            _ => self.controller.access_latency(req.addr),
        };
        if remaining == 0 {
            self.pending = None;
            true
        } else {
            self.pending = Some((*req, remaining - 1));
            false
        }
    }

    /// Drops any request in flight.
    pub const fn cancel(&mut self) {
        self.pending = None;
    }
}
