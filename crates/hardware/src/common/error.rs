//! Trap and host error definitions.
//!
//! This module defines the two families of failure in the model. It provides:
//! 1. **Trap Representation:** Architectural exceptions and interrupts, routed through trap entry.
//! 2. **Host Errors:** Failures of the model's environment (loading, configuration, misuse of the MDU).
//! 3. **Error Handling:** `thiserror` derives so every kind integrates with `std::error::Error`.
//!
//! A `Trap` is never fatal to the model; host errors are returned to the caller.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::common::constants::CAUSE_INTERRUPT_BIT;
use crate::isa::privileged::cause::exception;

/// RISC-V trap types for a single-privilege (machine mode) RV32 core.
///
/// Synchronous variants carry the value recorded in `mtval`. Interrupts carry the
/// index of the interrupt line (the bit position in `mip`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Trap {
    /// Taken branch or jump to an address that is not word aligned.
    ///
    /// The associated value is the target address.
    #[error("InstructionAddressMisaligned({0:#x})")]
    InstructionAddressMisaligned(u32),

    /// The instruction bus answered a fetch with an error.
    ///
    /// The associated value is the fetch address.
    #[error("InstructionAccessFault({0:#x})")]
    InstructionAccessFault(u32),

    /// Encoding is not part of RV32IM/Zicsr or accesses a CSR illegally.
    ///
    /// The associated value is the instruction word.
    #[error("IllegalInstruction({0:#010x})")]
    IllegalInstruction(u32),

    /// `EBREAK` was executed.
    ///
    /// The associated value is the program counter.
    #[error("Breakpoint({0:#x})")]
    Breakpoint(u32),

    /// A load address is not naturally aligned to the access width.
    #[error("LoadAddressMisaligned({0:#x})")]
    LoadAddressMisaligned(u32),

    /// The data bus answered a load with an error.
    #[error("LoadAccessFault({0:#x})")]
    LoadAccessFault(u32),

    /// A store address is not naturally aligned to the access width.
    #[error("StoreAddressMisaligned({0:#x})")]
    StoreAddressMisaligned(u32),

    /// The data bus answered a store with an error.
    #[error("StoreAccessFault({0:#x})")]
    StoreAccessFault(u32),

    /// `ECALL` executed in machine mode.
    #[error("EnvironmentCallFromMMode")]
    EnvironmentCallFromMMode,

    /// Asynchronous interrupt on the given line index (0-31).
    #[error("Interrupt({0})")]
    Interrupt(u32),
}

impl Trap {
    /// Returns `true` for asynchronous traps.
    pub const fn is_interrupt(&self) -> bool {
        matches!(self, Self::Interrupt(_))
    }

    /// Returns the exception code or interrupt index, without the interrupt marker.
    pub const fn code(&self) -> u32 {
        match self {
            Self::InstructionAddressMisaligned(_) => exception::INSTRUCTION_ADDRESS_MISALIGNED,
            Self::InstructionAccessFault(_) => exception::INSTRUCTION_ACCESS_FAULT,
            Self::IllegalInstruction(_) => exception::ILLEGAL_INSTRUCTION,
            Self::Breakpoint(_) => exception::BREAKPOINT,
            Self::LoadAddressMisaligned(_) => exception::LOAD_ADDRESS_MISALIGNED,
            Self::LoadAccessFault(_) => exception::LOAD_ACCESS_FAULT,
            Self::StoreAddressMisaligned(_) => exception::STORE_ADDRESS_MISALIGNED,
            Self::StoreAccessFault(_) => exception::STORE_ACCESS_FAULT,
            Self::EnvironmentCallFromMMode => exception::ENVIRONMENT_CALL_FROM_M_MODE,
            Self::Interrupt(line) => *line,
        }
    }

    /// Returns the value written to `mcause`.
    ///
    /// # Returns
    ///
    /// The exception code, or the interrupt index with bit 31 set.
    pub const fn cause(&self) -> u32 {
        if self.is_interrupt() {
            CAUSE_INTERRUPT_BIT | self.code()
        } else {
            self.code()
        }
    }

    /// Returns the value written to `mtval`.
    pub const fn tval(&self) -> u32 {
        match self {
            Self::InstructionAddressMisaligned(v)
            | Self::InstructionAccessFault(v)
            | Self::IllegalInstruction(v)
            | Self::Breakpoint(v)
            | Self::LoadAddressMisaligned(v)
            | Self::LoadAccessFault(v)
            | Self::StoreAddressMisaligned(v)
            | Self::StoreAccessFault(v) => *v,
            Self::EnvironmentCallFromMMode | Self::Interrupt(_) => 0,
        }
    }
}

/// Misuse of the multiply/divide unit by its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MduError {
    /// A start pulse arrived while an operation was still in flight.
    #[error("MDU start while busy ({remaining} iterations remaining)")]
    Busy {
        /// Iterations left on the in-flight operation.
        remaining: u32,
    },
}

/// Failure to place a program image into memory.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The image file could not be read.
    #[error("could not read '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A hex image line is neither a word, an `@address` directive, nor a comment.
    #[error("line {line}: invalid hex token '{token}'")]
    BadHexToken {
        /// One-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },

    /// The ELF container could not be parsed.
    #[error("invalid ELF image: {0}")]
    Elf(#[from] object::read::Error),

    /// The image is not a 32-bit little-endian RISC-V ELF.
    #[error("unsupported ELF image: {0}")]
    UnsupportedElf(&'static str),

    /// Part of the image falls outside the target memory.
    #[error("image range {addr:#010x}+{len:#x} is outside memory")]
    OutOfRange {
        /// Start address of the segment.
        addr: u32,
        /// Length of the segment in bytes.
        len: usize,
    },
}

/// Failure to parse a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("could not read config '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The JSON document is malformed or has wrongly typed fields.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Umbrella error for front ends that load, configure and run the model.
#[derive(Debug, Error)]
pub enum SimError {
    /// Image loading failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Configuration parsing failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
