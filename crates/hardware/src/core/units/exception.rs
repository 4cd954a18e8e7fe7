//! Exception Detector.
//!
//! Combinational priority classifier evaluated for every instruction before it
//! retires. It performs the following:
//! 1. **Collection:** Gathers fetch/data bus errors, decode status and the computed
//!    memory or control-flow address of the current instruction.
//! 2. **Prioritisation:** Reports only the highest-priority condition, in the order
//!    fetch bus error, illegal instruction, ECALL, EBREAK, misalignment, data bus error.
//!
//! Misaligned data accesses trap unless the check is disabled by configuration;
//! misaligned control-flow targets always trap so the PC stays word aligned.

use crate::common::error::Trap;
use crate::core::control::signals::MemWidth;

/// A load or store about to be (or being) performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemAccess {
    /// Effective address.
    pub addr: u32,
    /// Access width.
    pub width: MemWidth,
    /// `true` for stores.
    pub is_store: bool,
}

/// Everything the detector looks at for one instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExceptionInputs {
    /// PC of the instruction.
    pub pc: u32,
    /// Raw instruction word.
    pub inst: u32,
    /// The instruction bus answered the fetch with an error.
    pub fetch_error: bool,
    /// Decoder flagged the encoding, or a CSR access is not permitted.
    pub illegal: bool,
    /// Instruction is `ECALL`.
    pub ecall: bool,
    /// Instruction is `EBREAK`.
    pub ebreak: bool,
    /// Target of a taken branch or jump.
    pub jump_target: Option<u32>,
    /// Data access of a load or store.
    pub mem: Option<MemAccess>,
    /// The data bus answered the access with an error.
    pub data_error: bool,
}

/// Priority classifier for synchronous exceptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExceptionDetector {
    trap_misaligned: bool,
}

impl Default for ExceptionDetector {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ExceptionDetector {
    /// Creates a detector.
    ///
    /// # Arguments
    ///
    /// * `trap_misaligned` - Whether misaligned loads/stores raise an exception.
    pub const fn new(trap_misaligned: bool) -> Self {
        Self { trap_misaligned }
    }

    /// Returns whether misaligned data accesses are reported.
    pub const fn traps_misaligned(&self) -> bool {
        self.trap_misaligned
    }

    /// Classifies one instruction.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Status of the instruction being retired.
    ///
    /// # Returns
    ///
    /// The single highest-priority exception, or `None` if the instruction may retire.
    pub const fn detect(&self, inputs: &ExceptionInputs) -> Option<Trap> {
        if inputs.fetch_error {
            return Some(Trap::InstructionAccessFault(inputs.pc));
        }
        if inputs.illegal {
            return Some(Trap::IllegalInstruction(inputs.inst));
        }
        if inputs.ecall {
            return Some(Trap::EnvironmentCallFromMMode);
        }
        if inputs.ebreak {
            return Some(Trap::Breakpoint(inputs.pc));
        }
        if let Some(target) = inputs.jump_target {
            if target & 0b11 != 0 {
                return Some(Trap::InstructionAddressMisaligned(target));
            }
        }
        if let Some(access) = inputs.mem {
            if self.trap_misaligned && !access.width.is_aligned(access.addr) {
                return Some(if access.is_store {
                    Trap::StoreAddressMisaligned(access.addr)
                } else {
                    Trap::LoadAddressMisaligned(access.addr)
                });
            }
            if inputs.data_error {
                return Some(if access.is_store {
                    Trap::StoreAccessFault(access.addr)
                } else {
                    Trap::LoadAccessFault(access.addr)
                });
            }
        }
        None
    }
}
