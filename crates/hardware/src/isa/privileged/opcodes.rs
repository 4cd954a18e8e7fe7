//! SYSTEM-opcode encodings.
//!
//! The four fixed-encoding instructions this core executes, and the `funct3`
//! values that select the Zicsr forms.

/// Major opcode shared by every SYSTEM instruction.
pub const OP_SYSTEM: u32 = 0b111_0011;

/// `ecall`
pub const ECALL: u32 = 0x0000_0073;
/// `ebreak`
pub const EBREAK: u32 = 0x0010_0073;
/// `mret`
pub const MRET: u32 = 0x3020_0073;
/// `wfi`
pub const WFI: u32 = 0x1050_0073;

/// `funct3` of the fixed encodings above.
pub const PRIV: u32 = 0b000;

/// `csrrw rd, csr, rs1`
pub const CSRRW: u32 = 0b001;
/// `csrrs rd, csr, rs1`
pub const CSRRS: u32 = 0b010;
/// `csrrc rd, csr, rs1`
pub const CSRRC: u32 = 0b011;
/// `csrrwi rd, csr, zimm`
pub const CSRRWI: u32 = 0b101;
/// `csrrsi rd, csr, zimm`
pub const CSRRSI: u32 = 0b110;
/// `csrrci rd, csr, zimm`
pub const CSRRCI: u32 = 0b111;
