//! CSR Instruction Path.
//!
//! This module implements the six Zicsr instructions for the controller. It performs the following:
//! 1. **Operand Selection:** `rs1` for the register forms, the zero-extended `rs1` field
//!    for the immediate forms.
//! 2. **Write Suppression:** `CSRRS`/`CSRRC` (and their immediate forms) with a zero
//!    source register or immediate read without writing.
//! 3. **Validation:** Unimplemented addresses and writes to read-only CSRs are flagged
//!    as illegal at `EXECUTE`, before any state changes.
//! 4. **Commit:** The atomic read-modify-write happens at `WRITEBACK`.

use super::Cpu;
use crate::core::arch::csr::Csrs;
use crate::core::control::signals::CsrOp;

impl Cpu {
    /// Latches the operand of a CSR instruction and checks that the access is legal.
    ///
    /// # Returns
    ///
    /// `false` when the instruction must raise illegal-instruction.
    pub(crate) fn csr_execute(&mut self, op: CsrOp) -> bool {
        let rs1_field = self.latch.inst.fields.rs1;
        self.latch.csr_operand = if op.is_immediate() {
            rs1_field as u32
        } else {
            self.latch.rs1
        };
        self.latch.csr_writes = matches!(op, CsrOp::Rw | CsrOp::Rwi) || rs1_field != 0;
        Csrs::check_access(self.latch.inst.ctrl.csr_addr, self.latch.csr_writes)
    }

    /// Performs the read-modify-write of a validated CSR instruction.
    ///
    /// # Returns
    ///
    /// The old CSR value, destined for `rd`.
    pub(crate) fn csr_writeback(&mut self, op: CsrOp) -> u32 {
        self.csrs.read_modify_write(
            self.latch.inst.ctrl.csr_addr,
            op,
            self.latch.csr_operand,
            self.latch.csr_writes,
        )
    }
}
