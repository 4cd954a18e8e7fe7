//! Field extraction for RV32 instruction words.
//!
//! Splits a word into a [`Decoded`] record: register indices, function codes, the
//! format implied by the opcode, and the immediate reassembled from its scattered
//! slices. Legality is judged later by the control decoder.

use crate::isa::instruction::{Decoded, Field, Format, InstructionBits};
use crate::isa::privileged::opcodes::OP_SYSTEM;
use crate::isa::rv32i::opcodes;

/// One slice of an immediate: where it sits in the word and where it lands in the value.
type Piece = (Field, u32);

const fn field(lsb: u32, width: u32) -> Field {
    Field { lsb, width }
}

/// `imm[11:0]` in bits 31:20.
const I_IMM: [Piece; 1] = [(field(20, 12), 0)];

/// `imm[11:5] | imm[4:0]`.
const S_IMM: [Piece; 2] = [(field(7, 5), 0), (field(25, 7), 5)];

/// `imm[12] | imm[10:5] | imm[4:1] | imm[11]`.
const B_IMM: [Piece; 4] = [
    (field(8, 4), 1),
    (field(25, 6), 5),
    (field(7, 1), 11),
    (field(31, 1), 12),
];

/// `imm[20] | imm[10:1] | imm[11] | imm[19:12]`.
const J_IMM: [Piece; 4] = [
    (field(21, 10), 1),
    (field(20, 1), 11),
    (field(12, 8), 12),
    (field(31, 1), 20),
];

/// U-type keeps bits 31:12 in place; the low 12 bits are zero.
const U_IMM_MASK: u32 = 0xFFFF_F000;

/// Selects the instruction format implied by an opcode.
///
/// Unknown opcodes map to `Format::R`, which carries no immediate.
pub const fn format_of(opcode: u32) -> Format {
    match opcode {
        opcodes::OP_IMM
        | opcodes::OP_LOAD
        | opcodes::OP_JALR
        | opcodes::OP_MISC_MEM
        | OP_SYSTEM => Format::I,
        opcodes::OP_STORE => Format::S,
        opcodes::OP_BRANCH => Format::B,
        opcodes::OP_LUI | opcodes::OP_AUIPC => Format::U,
        opcodes::OP_JAL => Format::J,
        _ => Format::R,
    }
}

/// Splits `inst` into its fields.
pub fn decode(inst: u32) -> Decoded {
    let opcode = inst.opcode();
    let format = format_of(opcode);

    let imm = match format {
        Format::R => 0,
        Format::I => assemble(inst, &I_IMM),
        Format::S => assemble(inst, &S_IMM),
        Format::B => assemble(inst, &B_IMM),
        Format::U => (inst & U_IMM_MASK) as i32,
        Format::J => assemble(inst, &J_IMM),
    };

    Decoded {
        raw: inst,
        opcode,
        format,
        rd: InstructionBits::rd(&inst),
        rs1: InstructionBits::rs1(&inst),
        rs2: InstructionBits::rs2(&inst),
        funct3: InstructionBits::funct3(&inst),
        funct7: InstructionBits::funct7(&inst),
        imm,
    }
}

/// Gathers `pieces` from `inst` and sign-extends from the highest landed bit.
const fn assemble<const N: usize>(inst: u32, pieces: &[Piece; N]) -> i32 {
    let mut value = 0;
    let mut top = 0;
    let mut i = 0;
    while i < N {
        let (f, at) = pieces[i];
        value |= f.extract(inst) << at;
        if at + f.width > top {
            top = at + f.width;
        }
        i += 1;
    }
    let shift = u32::BITS - top;
    ((value << shift) as i32) >> shift
}
