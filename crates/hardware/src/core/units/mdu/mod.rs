//! Multiply/Divide Unit (MDU).
//!
//! This module implements the iterative RV32M execution unit. It performs the following:
//! 1. **Sequencing:** An `Idle → Mul → Idle` / `Idle → Div → Idle` state machine entered
//!    on a start pulse, with `busy` asserted throughout and a one-cycle `done` pulse.
//! 2. **Multiply:** 32 shift-and-add iterations producing the full 64-bit product.
//! 3. **Divide:** 32 restoring-division iterations producing quotient and remainder.
//! 4. **Edge Cases:** Division by zero and signed overflow follow the RISC-V M rules.
//!
//! Latency is fixed at [`MDU_ITERATIONS`] ticks for every operand pair, so the
//! worst-case interrupt latency of the core does not depend on data.

/// Restoring divider datapath.
pub mod divide;

/// Shift-and-add multiplier datapath.
pub mod multiply;

use tracing::trace;

use crate::common::constants::MDU_ITERATIONS;
use crate::common::error::MduError;
use crate::core::control::signals::MduOp;

use self::divide::Divider;
use self::multiply::Multiplier;

/// Visible state of the MDU sequencer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MduState {
    /// No operation in flight.
    #[default]
    Idle,
    /// Multiply iterations in progress.
    Mul,
    /// Divide iterations in progress.
    Div,
}

/// Raw output of a completed operation, before half/part selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MduResult {
    /// Full 64-bit product.
    Product(u64),
    /// Quotient and remainder.
    Division {
        /// Quotient with sign applied.
        quotient: u32,
        /// Remainder with sign applied.
        remainder: u32,
    },
}

impl MduResult {
    /// Selects the architectural result for an operation.
    ///
    /// # Arguments
    ///
    /// * `op` - The operation that produced this result.
    ///
    /// # Returns
    ///
    /// Low product half for `MUL`, high half for `MULH*`, quotient for `DIV*`,
    /// remainder for `REM*`.
    pub const fn select(self, op: MduOp) -> u32 {
        match (self, op) {
            (Self::Product(p), MduOp::Mul) => p as u32,
            (Self::Product(p), _) => (p >> 32) as u32,
            (Self::Division { remainder, .. }, MduOp::Rem | MduOp::Remu) => remainder,
            (Self::Division { quotient, .. }, _) => quotient,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Datapath {
    #[default]
    Idle,
    Mul(Multiplier),
    Div(Divider),
}

/// Iterative multiply/divide unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mdu {
    datapath: Datapath,
    op: Option<MduOp>,
    iteration: u32,
    done: bool,
    result: Option<MduResult>,
}

impl Mdu {
    /// Creates an idle unit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start pulse: captures the operands and begins iterating on the next tick.
    ///
    /// # Arguments
    ///
    /// * `op` - Operation to perform.
    /// * `a` - Value of `rs1`.
    /// * `b` - Value of `rs2`.
    ///
    /// # Errors
    ///
    /// Returns [`MduError::Busy`] if an operation is still in flight; the
    /// in-flight operation is left untouched.
    pub fn start(&mut self, op: MduOp, a: u32, b: u32) -> Result<(), MduError> {
        if self.is_busy() {
            return Err(MduError::Busy {
                remaining: self.remaining(),
            });
        }
        self.datapath = if op.is_multiply() {
            Datapath::Mul(Multiplier::new(op, a, b))
        } else {
            Datapath::Div(Divider::new(op, a, b))
        };
        self.op = Some(op);
        self.iteration = 0;
        self.done = false;
        self.result = None;
        trace!(?op, a, b, "MDU start");
        Ok(())
    }

    /// Advances the unit by one clock.
    ///
    /// # Returns
    ///
    /// `Some(value)` on the cycle the final iteration completes (the done pulse),
    /// carrying the architectural result selected for the operation; `None` otherwise.
    pub fn tick(&mut self) -> Option<u32> {
        self.done = false;
        match &mut self.datapath {
            Datapath::Idle => return None,
            Datapath::Mul(m) => m.step(),
            Datapath::Div(d) => d.step(),
        }
        self.iteration += 1;
        if self.iteration < MDU_ITERATIONS {
            return None;
        }

        let result = match self.datapath {
            Datapath::Mul(m) => MduResult::Product(m.product()),
            Datapath::Div(d) => {
                let (quotient, remainder) = d.result();
                MduResult::Division {
                    quotient,
                    remainder,
                }
            }
            Datapath::Idle => return None,
        };
        self.datapath = Datapath::Idle;
        self.done = true;
        self.result = Some(result);
        self.op.map(|op| result.select(op))
    }

    /// Returns the sequencer state.
    pub const fn state(&self) -> MduState {
        match self.datapath {
            Datapath::Idle => MduState::Idle,
            Datapath::Mul(_) => MduState::Mul,
            Datapath::Div(_) => MduState::Div,
        }
    }

    /// `busy`: an operation is in flight.
    pub const fn is_busy(&self) -> bool {
        !matches!(self.datapath, Datapath::Idle)
    }

    /// `done`: the previous tick completed an operation.
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Iterations left before the done pulse.
    pub const fn remaining(&self) -> u32 {
        if self.is_busy() {
            MDU_ITERATIONS - self.iteration
        } else {
            0
        }
    }

    /// Raw result of the most recently completed operation.
    pub const fn result(&self) -> Option<MduResult> {
        self.result
    }

    /// Abandons any in-flight operation and returns to idle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Runs one operation through the full iterative sequence.
    ///
    /// # Arguments
    ///
    /// * `op` - Operation to perform.
    /// * `a` - First operand.
    /// * `b` - Second operand.
    ///
    /// # Returns
    ///
    /// The architectural result, identical to what the core writes back.
    ///
    /// # Examples
    ///
    /// ```
    /// use rv32im_core::core::control::signals::MduOp;
    /// use rv32im_core::core::units::mdu::Mdu;
    ///
    /// assert_eq!(Mdu::evaluate(MduOp::Div, 7, 0), u32::MAX);
    /// assert_eq!(Mdu::evaluate(MduOp::Rem, 7, 0), 7);
    /// assert_eq!(Mdu::evaluate(MduOp::Mulh, -1_i32 as u32, -1_i32 as u32), 0);
    /// ```
    pub fn evaluate(op: MduOp, a: u32, b: u32) -> u32 {
        let mut mdu = Self::new();
        if mdu.start(op, a, b).is_err() {
            return 0;
        }
        loop {
            if let Some(value) = mdu.tick() {
                return value;
            }
        }
    }
}
