//! Main Execution Loop.
//!
//! This module implements the multi-cycle execution controller. It performs the following:
//! 1. **Clocking:** Advances `mcycle`, samples the interrupt lines into `mip` and
//!    evaluates exactly one controller state per tick.
//! 2. **Sequencing:** `FETCH → DECODE → EXECUTE → [MEM | MULDIV] → WRITEBACK`, with
//!    `TRAP` entered whenever a trap has been selected.
//! 3. **Interrupts:** Checked before every fetch; `WFI` sleeps at `FETCH` until a
//!    pending and enabled line appears.
//! 4. **Retirement:** Register and CSR writes, PC update and `minstret` happen together
//!    in `WRITEBACK`.

use tracing::{debug, trace, warn};

use super::Cpu;
use crate::common::constants::INSTRUCTION_SIZE;
use crate::core::arch::csr;
use crate::core::arch::trap::TrapUnit;
use crate::core::control::signals::{ExecUnit, OpASrc, OpBSrc, SystemOp};
use crate::core::control::{ControllerState, decode};
use crate::core::units::alu::Alu;
use crate::core::units::exception::{ExceptionInputs, MemAccess};
use crate::isa::abi;
use crate::isa::rv32i::opcodes::OP_JALR;
use crate::soc::traits::{BusRequest, CoreBus};

impl Cpu {
    /// Advances the core by one clock cycle.
    ///
    /// # Arguments
    ///
    /// * `bus` - Instruction and data ports. A request is presented at most once
    ///   per port per tick.
    pub fn tick<B: CoreBus + ?Sized>(&mut self, bus: &mut B) {
        self.csrs.tick_cycle();
        self.stats.cycles += 1;
        self.csrs.sample_interrupts(self.interrupt_lines());

        let next = match self.state {
            ControllerState::Fetch => self.fetch_stage(bus),
            ControllerState::Decode => self.decode_stage(),
            ControllerState::Execute => self.execute_stage(),
            ControllerState::Mem => self.mem_stage(bus),
            ControllerState::MulDiv => self.muldiv_stage(),
            ControllerState::Writeback => self.writeback_stage(),
            ControllerState::Trap => self.trap_stage(),
        };

        if next != self.state {
            trace!(
                from = %self.state,
                to = %next,
                pc = format_args!("{:#010x}", self.latch.pc),
                "controller"
            );
        }
        self.state = next;
    }

    fn fetch_stage<B: CoreBus + ?Sized>(&mut self, bus: &mut B) -> ControllerState {
        if self.wfi_waiting {
            let wake = TrapUnit::pending_and_enabled(&self.csrs);
            if wake == 0 {
                self.stats.wfi_cycles += 1;
                return ControllerState::Fetch;
            }
            self.wfi_waiting = false;
            debug!(
                pc = format_args!("{:#010x}", self.pc),
                lines = format_args!("{wake:#x}"),
                "WFI wake-up"
            );
        }

        if let Some(irq) = TrapUnit::pending_interrupt(&self.csrs) {
            bus.cancel_instruction();
            self.pending_trap = Some((irq, self.pc));
            return ControllerState::Trap;
        }

        match bus.instruction(&BusRequest::read_word(self.pc)) {
            None => {
                self.stats.stalls_fetch += 1;
                ControllerState::Fetch
            }
            Some(resp) => {
                self.latch = super::Latch {
                    pc: self.pc,
                    word: if resp.error { 0 } else { resp.data },
                    fetch_error: resp.error,
                    ..super::Latch::default()
                };
                ControllerState::Decode
            }
        }
    }

    fn decode_stage(&mut self) -> ControllerState {
        let inst = decode(self.latch.word);
        self.latch.inst = inst;
        self.latch.rs1 = self.regs.read(inst.fields.rs1);
        self.latch.rs2 = self.regs.read(inst.fields.rs2);
        ControllerState::Execute
    }

    fn execute_stage(&mut self) -> ControllerState {
        let inst = self.latch.inst;
        let ctrl = inst.ctrl;
        let pc = self.latch.pc;
        let (rs1, rs2) = (self.latch.rs1, self.latch.rs2);

        let a = match ctrl.a_src {
            OpASrc::Reg1 => rs1,
            OpASrc::Pc => pc,
            OpASrc::Zero => 0,
        };
        let b = match ctrl.b_src {
            OpBSrc::Imm => inst.imm(),
            OpBSrc::Reg2 => rs2,
        };
        let alu_out = match ctrl.unit {
            ExecUnit::Alu(op) => Alu::execute(op, a, b),
            _ => 0,
        };

        let link = pc.wrapping_add(INSTRUCTION_SIZE);
        let mut next_pc = link;
        let mut jump_target = None;
        let mut mem = None;
        let mut illegal = ctrl.illegal;

        if ctrl.jump {
            let target = if inst.fields.opcode == OP_JALR {
                alu_out & !1
            } else {
                alu_out
            };
            jump_target = Some(target);
            next_pc = target;
            self.latch.result = link;
        } else if ctrl.branch {
            if Alu::branch_taken(ctrl.branch_cond, rs1, rs2) {
                let target = pc.wrapping_add(inst.imm());
                jump_target = Some(target);
                next_pc = target;
            }
        } else if ctrl.is_memory() {
            mem = Some(MemAccess {
                addr: alu_out,
                width: ctrl.width,
                is_store: ctrl.mem_write,
            });
            self.latch.mem_addr = alu_out;
        } else if let ExecUnit::Csr(op) = ctrl.unit {
            illegal |= !self.csr_execute(op);
        } else {
            self.latch.result = alu_out;
        }
        self.latch.next_pc = next_pc;

        let inputs = ExceptionInputs {
            pc,
            inst: inst.raw(),
            fetch_error: self.latch.fetch_error,
            illegal,
            ecall: ctrl.system_op() == SystemOp::Ecall,
            ebreak: ctrl.system_op() == SystemOp::Ebreak,
            jump_target,
            mem,
            data_error: false,
        };
        if let Some(trap) = self.detector.detect(&inputs) {
            self.pending_trap = Some((trap, pc));
            return ControllerState::Trap;
        }

        if let ExecUnit::Mdu(op) = ctrl.unit {
            if let Err(e) = self.mdu.start(op, rs1, rs2) {
                warn!(%e, "MDU start ignored");
            }
            return ControllerState::MulDiv;
        }
        if ctrl.is_memory() {
            self.latch.beat = 0;
            self.latch.load_raw = 0;
            return ControllerState::Mem;
        }
        ControllerState::Writeback
    }

    fn muldiv_stage(&mut self) -> ControllerState {
        self.stats.mdu_busy_cycles += 1;
        match self.mdu.tick() {
            Some(value) => {
                self.latch.result = value;
                ControllerState::Writeback
            }
            None if self.mdu.is_busy() => ControllerState::MulDiv,
            // Nothing in flight: only reachable if the start pulse was refused.
            None => ControllerState::Writeback,
        }
    }

    fn writeback_stage(&mut self) -> ControllerState {
        let inst = self.latch.inst;
        let ctrl = inst.ctrl;
        let mut counts_retire = true;

        match ctrl.unit {
            ExecUnit::Csr(op) => {
                self.latch.result = self.csr_writeback(op);
                let addr = ctrl.csr_addr;
                if self.latch.csr_writes && (addr == csr::MINSTRET || addr == csr::MINSTRETH) {
                    counts_retire = false;
                }
            }
            ExecUnit::System(SystemOp::Mret) => {
                self.latch.next_pc = self.do_mret();
            }
            ExecUnit::System(SystemOp::Wfi) => {
                self.wfi_waiting = true;
                debug!(pc = format_args!("{:#010x}", self.latch.pc), "WFI sleep");
            }
            _ => {}
        }

        let rd = inst.fields.rd;
        if ctrl.reg_write {
            self.regs.write(rd, self.latch.result);
        }
        if counts_retire {
            self.csrs.retire();
        }
        self.stats.record_retire(&inst);

        if self.trace {
            debug!(
                pc = format_args!("{:#010x}", self.latch.pc),
                inst = format_args!("{:#010x}", inst.raw()),
                rd = abi::name(rd),
                value = format_args!("{:#010x}", self.latch.result),
                "retire"
            );
        }
        #[cfg(feature = "commit-log")]
        {
            if ctrl.reg_write && rd != 0 {
                tracing::info!(
                    pc = format_args!("{:#010x}", self.latch.pc),
                    inst = format_args!("{:#010x}", inst.raw()),
                    rd = abi::name(rd),
                    value = format_args!("{:#010x}", self.latch.result),
                    "commit"
                );
            } else {
                tracing::info!(
                    pc = format_args!("{:#010x}", self.latch.pc),
                    inst = format_args!("{:#010x}", inst.raw()),
                    "commit"
                );
            }
        }

        self.pc = self.latch.next_pc;
        ControllerState::Fetch
    }
}
