//! Control signals and operation types.
//!
//! This module defines the signals the decoder hands to the execution controller. It performs:
//! 1. **Operation Classification:** Tags each instruction with the unit that executes it.
//! 2. **Operand Selection:** Defines sources for ALU inputs (registers, PC, or immediates).
//! 3. **Memory Control:** Specifies access widths and sign-extension requirements.
//! 4. **System Control:** Identifies CSR accesses, environment calls, MRET and WFI.

/// ALU operation types for RV32I integer instructions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AluOp {
    /// Integer addition (also address generation).
    #[default]
    Add,
    /// Integer subtraction.
    Sub,
    /// Shift left logical.
    Sll,
    /// Set less than (signed).
    Slt,
    /// Set less than unsigned.
    Sltu,
    /// Bitwise XOR.
    Xor,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
    /// Bitwise OR.
    Or,
    /// Bitwise AND.
    And,
}

/// Multiply/divide operations executed on the iterative MDU.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MduOp {
    /// Lower 32 bits of the product.
    Mul,
    /// Upper 32 bits of the signed × signed product.
    Mulh,
    /// Upper 32 bits of the signed × unsigned product.
    Mulhsu,
    /// Upper 32 bits of the unsigned × unsigned product.
    Mulhu,
    /// Signed quotient.
    Div,
    /// Unsigned quotient.
    Divu,
    /// Signed remainder.
    Rem,
    /// Unsigned remainder.
    Remu,
}

impl MduOp {
    /// Returns `true` for the four multiply variants.
    pub const fn is_multiply(self) -> bool {
        matches!(self, Self::Mul | Self::Mulh | Self::Mulhsu | Self::Mulhu)
    }
}

/// Branch comparison evaluated on the ALU.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BranchCond {
    /// Taken when `rs1 == rs2`.
    #[default]
    Eq,
    /// Taken when `rs1 != rs2`.
    Ne,
    /// Taken when `rs1 < rs2` (signed).
    Lt,
    /// Taken when `rs1 >= rs2` (signed).
    Ge,
    /// Taken when `rs1 < rs2` (unsigned).
    Ltu,
    /// Taken when `rs1 >= rs2` (unsigned).
    Geu,
}

/// Memory access width for load and store operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemWidth {
    /// No memory operation.
    #[default]
    Nop,
    /// 8-bit byte access.
    Byte,
    /// 16-bit half-word access.
    Half,
    /// 32-bit word access.
    Word,
}

impl MemWidth {
    /// Returns the access size in bytes (0 for `Nop`).
    pub const fn bytes(self) -> u32 {
        match self {
            Self::Nop => 0,
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
        }
    }

    /// Returns `true` when `addr` is naturally aligned for this width.
    pub const fn is_aligned(self, addr: u32) -> bool {
        match self {
            Self::Nop | Self::Byte => true,
            Self::Half => addr & 1 == 0,
            Self::Word => addr & 3 == 0,
        }
    }
}

/// Source for the ALU's first operand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpASrc {
    /// Value of `rs1`.
    #[default]
    Reg1,
    /// Address of the current instruction.
    Pc,
    /// Constant zero (LUI).
    Zero,
}

/// Source for the ALU's second operand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpBSrc {
    /// Sign-extended immediate.
    #[default]
    Imm,
    /// Value of `rs2`.
    Reg2,
}

/// CSR read-modify-write variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CsrOp {
    /// No CSR access.
    #[default]
    None,
    /// Write `rs1`.
    Rw,
    /// Set the bits of `rs1`.
    Rs,
    /// Clear the bits of `rs1`.
    Rc,
    /// Write the zero-extended 5-bit immediate.
    Rwi,
    /// Set the bits of the 5-bit immediate.
    Rsi,
    /// Clear the bits of the 5-bit immediate.
    Rci,
}

impl CsrOp {
    /// Returns `true` for the immediate-source forms.
    pub const fn is_immediate(self) -> bool {
        matches!(self, Self::Rwi | Self::Rsi | Self::Rci)
    }
}

/// Non-CSR system instructions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SystemOp {
    /// Not a privileged system instruction.
    #[default]
    None,
    /// `ECALL`.
    Ecall,
    /// `EBREAK`.
    Ebreak,
    /// `MRET`.
    Mret,
    /// `WFI`.
    Wfi,
}

/// Execution resource selected by the decoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecUnit {
    /// Single-cycle ALU; `AluOp::Add` for address generation and LUI/AUIPC.
    Alu(AluOp),
    /// Multi-cycle multiply/divide unit.
    Mdu(MduOp),
    /// CSR read-modify-write.
    Csr(CsrOp),
    /// ECALL, EBREAK, MRET or WFI.
    System(SystemOp),
    /// No computation (FENCE, FENCE.I, illegal encodings).
    #[default]
    None,
}

/// Control signals produced by the decoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlSignals {
    /// Execution resource and its operation.
    pub unit: ExecUnit,
    /// The instruction writes `rd` at write-back.
    pub reg_write: bool,
    /// The instruction reads memory.
    pub mem_read: bool,
    /// The instruction writes memory.
    pub mem_write: bool,
    /// Conditional branch; `branch_cond` selects the comparison.
    pub branch: bool,
    /// Unconditional jump (JAL, JALR).
    pub jump: bool,
    /// Branch comparison.
    pub branch_cond: BranchCond,
    /// Load/store width.
    pub width: MemWidth,
    /// Loads sign-extend the loaded value.
    pub signed_load: bool,
    /// ALU first operand source.
    pub a_src: OpASrc,
    /// ALU second operand source.
    pub b_src: OpBSrc,
    /// SYSTEM opcode (CSR access or privileged instruction).
    pub is_system: bool,
    /// Routed to the MDU.
    pub is_muldiv: bool,
    /// Encoding is not implemented.
    pub illegal: bool,
    /// CSR address for CSR instructions.
    pub csr_addr: u32,
}

impl ControlSignals {
    /// Signals for an encoding the core does not implement.
    pub fn illegal() -> Self {
        Self {
            illegal: true,
            ..Self::default()
        }
    }

    /// Returns the CSR operation, or `CsrOp::None`.
    pub const fn csr_op(&self) -> CsrOp {
        match self.unit {
            ExecUnit::Csr(op) => op,
            _ => CsrOp::None,
        }
    }

    /// Returns the system operation, or `SystemOp::None`.
    pub const fn system_op(&self) -> SystemOp {
        match self.unit {
            ExecUnit::System(op) => op,
            _ => SystemOp::None,
        }
    }

    /// Returns `true` for loads and stores.
    pub const fn is_memory(&self) -> bool {
        self.mem_read || self.mem_write
    }
}
