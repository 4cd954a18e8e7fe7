//! Configuration system for the RV32IM core model.
//!
//! This module defines the configuration structures used to parameterize the
//! core and its harness. It provides:
//! 1. **Defaults:** Baseline constants (reset vector, memory map, cycle limit).
//! 2. **Structures:** Hierarchical config for general, core, identity and memory settings.
//! 3. **Loading:** JSON parsing from a string or a file.
//!
//! Every field is optional in the JSON document; missing fields take the defaults below.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::ConfigError;
use crate::core::arch::csr::CsrIdentity;

/// Default configuration constants.
mod defaults {
    /// Base address of RAM and reset vector (2 GiB).
    pub const RAM_BASE: u32 = 0x8000_0000;

    /// Size of RAM (64 KiB).
    pub const RAM_SIZE: usize = 64 * 1024;

    /// Reset value of `mtvec` (direct mode, base 0).
    pub const MTVEC_RESET: u32 = 0;

    /// Cycle limit of a simulator run.
    pub const MAX_CYCLES: u64 = 10_000_000;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use rv32im_core::config::Config;
///
/// let json = r#"{
///     "general": { "max_cycles": 5000 },
///     "core": { "trap_misaligned": false },
///     "memory": { "size": 4096, "data_wait_states": 2 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.general.max_cycles, 5000);
/// assert!(!config.core.trap_misaligned);
/// assert_eq!(config.core.reset_vector, 0x8000_0000);
/// assert_eq!(config.memory.size, 4096);
/// assert_eq!(config.memory.fetch_wait_states, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// General simulation settings
    pub general: GeneralConfig,
    /// Core reset and trap behaviour
    pub core: CoreConfig,
    /// Identification CSR values
    pub identity: IdentityConfig,
    /// RAM configuration
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, wrongly typed or unknown fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if its content is invalid.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// General simulation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    /// Log every retired instruction at `debug` level.
    pub trace_instructions: bool,
    /// Cycle limit after which a run is reported as a timeout.
    pub max_cycles: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_instructions: false,
            max_cycles: defaults::MAX_CYCLES,
        }
    }
}

/// Core reset and trap behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// PC after reset.
    pub reset_vector: u32,
    /// `mtvec` after reset.
    pub mtvec_reset: u32,
    /// Raise misaligned load/store exceptions. When false, misaligned accesses
    /// are split into aligned bus beats.
    pub trap_misaligned: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            reset_vector: defaults::RAM_BASE,
            mtvec_reset: defaults::MTVEC_RESET,
            trap_misaligned: true,
        }
    }
}

/// Values of the read-only identification CSRs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    /// `mvendorid`
    pub mvendorid: u32,
    /// `marchid`
    pub marchid: u32,
    /// `mimpid`
    pub mimpid: u32,
    /// `mhartid`
    pub mhartid: u32,
}

impl From<IdentityConfig> for CsrIdentity {
    fn from(id: IdentityConfig) -> Self {
        Self {
            mvendorid: id.mvendorid,
            marchid: id.marchid,
            mimpid: id.mimpid,
            mhartid: id.mhartid,
        }
    }
}

/// RAM configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemoryConfig {
    /// First mapped address.
    pub base: u32,
    /// Size in bytes.
    pub size: usize,
    /// Wait-states of every instruction fetch.
    pub fetch_wait_states: u32,
    /// Wait-states of every data access.
    pub data_wait_states: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            base: defaults::RAM_BASE,
            size: defaults::RAM_SIZE,
            fetch_wait_states: 0,
            data_wait_states: 0,
        }
    }
}
