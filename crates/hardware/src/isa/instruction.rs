//! Instruction word layout.
//!
//! Field positions shared by all RV32 formats, accessors on raw words, and the
//! `Decoded` record produced by [`crate::isa::decode`].

/// Bit position and width of an instruction field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    /// Least significant bit.
    pub lsb: u32,
    /// Width in bits.
    pub width: u32,
}

impl Field {
    const fn new(lsb: u32, width: u32) -> Self {
        Self { lsb, width }
    }

    /// Extracts this field from `word`, right-aligned.
    #[inline(always)]
    pub const fn extract(self, word: u32) -> u32 {
        (word >> self.lsb) & ((1 << self.width) - 1)
    }
}

/// `opcode`, bits 6:0.
pub const OPCODE: Field = Field::new(0, 7);
/// `rd`, bits 11:7.
pub const RD: Field = Field::new(7, 5);
/// `funct3`, bits 14:12.
pub const FUNCT3: Field = Field::new(12, 3);
/// `rs1` (or `zimm`), bits 19:15.
pub const RS1: Field = Field::new(15, 5);
/// `rs2` (or `shamt`), bits 24:20.
pub const RS2: Field = Field::new(20, 5);
/// `funct7`, bits 31:25.
pub const FUNCT7: Field = Field::new(25, 7);
/// CSR address, bits 31:20.
pub const CSR: Field = Field::new(20, 12);

/// Field accessors on a raw instruction word.
pub trait InstructionBits {
    /// The major opcode.
    fn opcode(&self) -> u32;

    /// Destination register index.
    fn rd(&self) -> usize;

    /// First source register index; the 5-bit `zimm` of the immediate CSR forms.
    fn rs1(&self) -> usize;

    /// Second source register index; the shift amount of shift-immediates.
    fn rs2(&self) -> usize;

    /// Minor opcode selecting the operation within a major opcode.
    fn funct3(&self) -> u32;

    /// Upper function code (SUB/SRA select, M extension).
    fn funct7(&self) -> u32;

    /// CSR address of Zicsr instructions.
    fn csr(&self) -> u32;
}

impl InstructionBits for u32 {
    fn opcode(&self) -> u32 {
        OPCODE.extract(*self)
    }

    fn rd(&self) -> usize {
        RD.extract(*self) as usize
    }

    fn rs1(&self) -> usize {
        RS1.extract(*self) as usize
    }

    fn rs2(&self) -> usize {
        RS2.extract(*self) as usize
    }

    fn funct3(&self) -> u32 {
        FUNCT3.extract(*self)
    }

    fn funct7(&self) -> u32 {
        FUNCT7.extract(*self)
    }

    fn csr(&self) -> u32 {
        CSR.extract(*self)
    }
}

/// The six base instruction formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    /// Register-register (`funct7 | rs2 | rs1 | funct3 | rd | opcode`).
    #[default]
    R,
    /// Register-immediate, loads, JALR and SYSTEM.
    I,
    /// Stores.
    S,
    /// Conditional branches.
    B,
    /// LUI and AUIPC.
    U,
    /// JAL.
    J,
}

/// Fields of one instruction word, with the immediate already assembled for its format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Raw 32-bit instruction encoding.
    pub raw: u32,
    /// Extracted opcode field.
    pub opcode: u32,
    /// Instruction format implied by the opcode.
    pub format: Format,
    /// Destination register index.
    pub rd: usize,
    /// First source register index.
    pub rs1: usize,
    /// Second source register index.
    pub rs2: usize,
    /// Function code field 3.
    pub funct3: u32,
    /// Function code field 7.
    pub funct7: u32,
    /// Sign-extended immediate (zero for R-type).
    pub imm: i32,
}
