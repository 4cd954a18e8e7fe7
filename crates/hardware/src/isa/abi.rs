//! RISC-V Application Binary Interface (ABI) register names.
//!
//! Mnemonic table used when dumping register state.

const NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Returns the ABI name of register `idx`, or `"?"` for an out-of-range index.
pub fn name(idx: usize) -> &'static str {
    NAMES.get(idx).copied().unwrap_or("?")
}
