//! Instruction Decoder.
//!
//! This module turns a raw instruction word into everything the execution controller needs.
//! It performs the following:
//! 1. **Field Extraction:** Register indices and the format-specific immediate via `isa::decode`.
//! 2. **Control Generation:** ALU/MDU/CSR/system selection, operand sources and memory controls.
//! 3. **Legality:** Flags every encoding outside RV32IM + Zicsr + MRET/WFI/FENCE as illegal.
//!
//! Decoding is pure; the same word always yields the same `Instruction`.

use crate::core::control::signals::{
    AluOp, BranchCond, ControlSignals, CsrOp, ExecUnit, MduOp, MemWidth, OpASrc, OpBSrc, SystemOp,
};
use crate::isa::decode::decode as decode_fields;
use crate::isa::instruction::{Decoded, InstructionBits};
use crate::isa::privileged::opcodes as sys_ops;
use crate::isa::rv32i::{funct3 as i_funct3, funct7 as i_funct7, opcodes as i_opcodes};
use crate::isa::rv32m::{funct3 as m_funct3, opcodes as m_opcodes};

/// A decoded instruction: raw fields plus control signals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Instruction {
    /// Extracted fields and immediate.
    pub fields: Decoded,
    /// Control signals for the execution controller.
    pub ctrl: ControlSignals,
}

impl Instruction {
    /// Raw instruction word.
    pub const fn raw(&self) -> u32 {
        self.fields.raw
    }

    /// Immediate as an unsigned bit pattern, ready for wrapping adds.
    pub const fn imm(&self) -> u32 {
        self.fields.imm as u32
    }
}

/// Decodes an instruction word.
///
/// # Arguments
///
/// * `inst` - The 32-bit instruction encoding.
///
/// # Returns
///
/// The decoded instruction. Unsupported encodings have `ctrl.illegal` set and
/// no other control signal asserted.
pub fn decode(inst: u32) -> Instruction {
    let fields = decode_fields(inst);
    let ctrl = control_signals(&fields).unwrap_or_else(ControlSignals::illegal);
    Instruction { fields, ctrl }
}

/// Builds the control signals for a set of decoded fields.
///
/// Returns `None` for encodings the core does not implement.
fn control_signals(d: &Decoded) -> Option<ControlSignals> {
    let mut c = ControlSignals {
        unit: ExecUnit::Alu(AluOp::Add),
        a_src: OpASrc::Reg1,
        b_src: OpBSrc::Imm,
        ..ControlSignals::default()
    };

    match d.opcode {
        i_opcodes::OP_LUI => {
            c.reg_write = true;
            c.a_src = OpASrc::Zero;
        }
        i_opcodes::OP_AUIPC => {
            c.reg_write = true;
            c.a_src = OpASrc::Pc;
        }
        i_opcodes::OP_JAL => {
            c.reg_write = true;
            c.jump = true;
            c.a_src = OpASrc::Pc;
        }
        i_opcodes::OP_JALR => {
            if d.funct3 != i_funct3::JALR {
                return None;
            }
            c.reg_write = true;
            c.jump = true;
        }
        i_opcodes::OP_BRANCH => {
            c.branch = true;
            c.b_src = OpBSrc::Reg2;
            c.branch_cond = match d.funct3 {
                i_funct3::BEQ => BranchCond::Eq,
                i_funct3::BNE => BranchCond::Ne,
                i_funct3::BLT => BranchCond::Lt,
                i_funct3::BGE => BranchCond::Ge,
                i_funct3::BLTU => BranchCond::Ltu,
                i_funct3::BGEU => BranchCond::Geu,
                _ => return None,
            };
            c.unit = ExecUnit::Alu(branch_alu_op(c.branch_cond));
        }
        i_opcodes::OP_LOAD => {
            c.reg_write = true;
            c.mem_read = true;
            (c.width, c.signed_load) = match d.funct3 {
                i_funct3::LB => (MemWidth::Byte, true),
                i_funct3::LH => (MemWidth::Half, true),
                i_funct3::LW => (MemWidth::Word, true),
                i_funct3::LBU => (MemWidth::Byte, false),
                i_funct3::LHU => (MemWidth::Half, false),
                _ => return None,
            };
        }
        i_opcodes::OP_STORE => {
            c.mem_write = true;
            c.width = match d.funct3 {
                i_funct3::SB => MemWidth::Byte,
                i_funct3::SH => MemWidth::Half,
                i_funct3::SW => MemWidth::Word,
                _ => return None,
            };
        }
        i_opcodes::OP_IMM => {
            c.reg_write = true;
            c.unit = ExecUnit::Alu(match d.funct3 {
                i_funct3::ADD_SUB => AluOp::Add,
                i_funct3::SLT => AluOp::Slt,
                i_funct3::SLTU => AluOp::Sltu,
                i_funct3::XOR => AluOp::Xor,
                i_funct3::OR => AluOp::Or,
                i_funct3::AND => AluOp::And,
                i_funct3::SLL if d.funct7 == i_funct7::DEFAULT => AluOp::Sll,
                i_funct3::SRL_SRA if d.funct7 == i_funct7::DEFAULT => AluOp::Srl,
                i_funct3::SRL_SRA if d.funct7 == i_funct7::SRA => AluOp::Sra,
                _ => return None,
            });
        }
        i_opcodes::OP_REG => {
            c.reg_write = true;
            c.b_src = OpBSrc::Reg2;
            if d.funct7 == m_opcodes::M_EXTENSION {
                c.is_muldiv = true;
                c.unit = ExecUnit::Mdu(match d.funct3 {
                    m_funct3::MUL => MduOp::Mul,
                    m_funct3::MULH => MduOp::Mulh,
                    m_funct3::MULHSU => MduOp::Mulhsu,
                    m_funct3::MULHU => MduOp::Mulhu,
                    m_funct3::DIV => MduOp::Div,
                    m_funct3::DIVU => MduOp::Divu,
                    m_funct3::REM => MduOp::Rem,
                    m_funct3::REMU => MduOp::Remu,
                    _ => return None,
                });
            } else {
                c.unit = ExecUnit::Alu(match (d.funct3, d.funct7) {
                    (i_funct3::ADD_SUB, i_funct7::DEFAULT) => AluOp::Add,
                    (i_funct3::ADD_SUB, i_funct7::SUB) => AluOp::Sub,
                    (i_funct3::SLL, i_funct7::DEFAULT) => AluOp::Sll,
                    (i_funct3::SLT, i_funct7::DEFAULT) => AluOp::Slt,
                    (i_funct3::SLTU, i_funct7::DEFAULT) => AluOp::Sltu,
                    (i_funct3::XOR, i_funct7::DEFAULT) => AluOp::Xor,
                    (i_funct3::SRL_SRA, i_funct7::DEFAULT) => AluOp::Srl,
                    (i_funct3::SRL_SRA, i_funct7::SRA) => AluOp::Sra,
                    (i_funct3::OR, i_funct7::DEFAULT) => AluOp::Or,
                    (i_funct3::AND, i_funct7::DEFAULT) => AluOp::And,
                    _ => return None,
                });
            }
        }
        i_opcodes::OP_MISC_MEM => match d.funct3 {
            i_funct3::FENCE | i_funct3::FENCE_I => c.unit = ExecUnit::None,
            _ => return None,
        },
        sys_ops::OP_SYSTEM => {
            c.is_system = true;
            c.csr_addr = d.raw.csr();
            let op = match d.funct3 {
                sys_ops::PRIV => {
                    c.unit = ExecUnit::System(match d.raw {
                        sys_ops::ECALL => SystemOp::Ecall,
                        sys_ops::EBREAK => SystemOp::Ebreak,
                        sys_ops::MRET => SystemOp::Mret,
                        sys_ops::WFI => SystemOp::Wfi,
                        _ => return None,
                    });
                    c.csr_addr = 0;
                    return Some(c);
                }
                sys_ops::CSRRW => CsrOp::Rw,
                sys_ops::CSRRS => CsrOp::Rs,
                sys_ops::CSRRC => CsrOp::Rc,
                sys_ops::CSRRWI => CsrOp::Rwi,
                sys_ops::CSRRSI => CsrOp::Rsi,
                sys_ops::CSRRCI => CsrOp::Rci,
                _ => return None,
            };
            c.unit = ExecUnit::Csr(op);
            c.reg_write = true;
        }
        _ => return None,
    }

    Some(c)
}

/// ALU comparison used to evaluate a branch condition.
const fn branch_alu_op(cond: BranchCond) -> AluOp {
    match cond {
        BranchCond::Eq | BranchCond::Ne => AluOp::Sub,
        BranchCond::Lt | BranchCond::Ge => AluOp::Slt,
        BranchCond::Ltu | BranchCond::Geu => AluOp::Sltu,
    }
}
