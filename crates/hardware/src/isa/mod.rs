//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains definitions for opcodes, function codes, and field decoding, organized
//! by RISC-V extension.
//!
//! # Extensions
//!
//! * `rv32i`: Base Integer Instruction Set (32-bit).
//! * `rv32m`: Standard Extension for Integer Multiplication and Division.
//! * `privileged`: Machine-mode system instructions and trap causes.

/// Application Binary Interface (ABI) register name mappings.
pub mod abi;

/// Field and immediate extraction for all RISC-V instruction formats.
pub mod decode;

/// Instruction encoding structures and bit extraction utilities.
pub mod instruction;

/// Privileged architecture definitions (traps, system instructions).
pub mod privileged;

/// Base integer instruction set (RV32I).
pub mod rv32i;

/// Integer multiply/divide extension (MUL, DIV, REM instructions).
pub mod rv32m;
