//! RV32 integer registers `x0`-`x31`.
//!
//! `x0` is not stored: it reads as zero and swallows writes. Indices past 31 behave
//! the same way, so a malformed index can never panic the model.

/// Number of architectural integer registers.
pub const GPR_COUNT: usize = 32;

/// General-purpose register storage for `x1`-`x31`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gpr {
    regs: [u32; GPR_COUNT - 1],
}

impl Gpr {
    /// All registers cleared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads register `idx`.
    pub fn read(&self, idx: usize) -> u32 {
        idx.checked_sub(1)
            .and_then(|slot| self.regs.get(slot))
            .copied()
            .unwrap_or(0)
    }

    /// Writes register `idx`; `x0` and out-of-range indices are ignored.
    pub fn write(&mut self, idx: usize, val: u32) {
        if let Some(slot) = idx.checked_sub(1).and_then(|slot| self.regs.get_mut(slot)) {
            *slot = val;
        }
    }
}
