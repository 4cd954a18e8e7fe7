//! # Trap Handling Tests
//!
//! Synchronous exceptions taken by the controller: context saving, handler
//! dispatch, `MRET` resumption, and the guarantee that a trapping instruction
//! changes no architectural state besides the trap CSRs.

use pretty_assertions::assert_eq;
use rv32im_core::common::Trap;
use rv32im_core::core::arch::csr;
use rv32im_core::core::control::ControllerState;

use crate::common::builder::instruction::{InstructionBuilder, system};
use crate::common::harness::{TestContext, test_config};

const HANDLER: u32 = 0x1000;

fn ib() -> InstructionBuilder {
    InstructionBuilder::new()
}

/// Context with `mtvec = HANDLER` and a program at `pc`.
fn trap_ctx(pc: u32, program: &[u32], handler: &[u32]) -> TestContext {
    let mut config = test_config();
    config.core.mtvec_reset = HANDLER;
    TestContext::with_config(config)
        .load_program(pc, program)
        .with_code(HANDLER, handler)
}

fn run_to_handler(ctx: &mut TestContext) -> u64 {
    ctx.tick_until(100, |cpu| cpu.pc == HANDLER && cpu.state() == ControllerState::Fetch)
        .expect("trap was not taken")
}

/// ECALL at 0x100 enters the handler with cause 11; the handler's `MRET`
/// resumes at 0x100 itself (no +4).
#[test]
fn ecall_round_trip() {
    let handler = [ib().csrrs(5, csr::MEPC, 0).build(), system::MRET];
    let mut ctx = trap_ctx(0x100, &[system::ECALL], &handler);

    let cycles = run_to_handler(&mut ctx);
    assert_eq!(cycles, 4, "FETCH, DECODE, EXECUTE, TRAP");
    assert_eq!(ctx.cpu().csr(csr::MCAUSE), 0xB);
    assert_eq!(ctx.cpu().csr(csr::MEPC), 0x100);
    assert_eq!(ctx.cpu().csr(csr::MTVAL), 0);
    assert_eq!(ctx.cpu().retired(), 0, "ECALL does not retire");

    ctx.step(2);
    assert_eq!(ctx.get_reg(5), 0x100);
    assert_eq!(ctx.cpu().pc, 0x100);
    assert_eq!(ctx.cpu().stats.exceptions_taken, 1);
}

/// Handlers that skip the trapping instruction add 4 to `mepc` themselves.
#[test]
fn handler_can_skip_trapping_instruction() {
    let handler = [
        ib().csrrs(5, csr::MEPC, 0).build(),
        ib().addi(5, 5, 4).build(),
        ib().csrrw(0, csr::MEPC, 5).build(),
        system::MRET,
    ];
    let program = [system::ECALL, ib().addi(6, 0, 1).build()];
    let mut ctx = trap_ctx(0x100, &program, &handler);
    let _ = run_to_handler(&mut ctx);
    ctx.step(5);
    assert_eq!(ctx.get_reg(6), 1);
    assert_eq!(ctx.cpu().pc, 0x108);
}

#[test]
fn ebreak_records_pc_in_mtval() {
    let mut ctx = trap_ctx(0x200, &[system::EBREAK], &[]);
    let _ = run_to_handler(&mut ctx);
    assert_eq!(ctx.cpu().csr(csr::MCAUSE), 3);
    assert_eq!(ctx.cpu().csr(csr::MTVAL), 0x200);
    assert_eq!(ctx.cpu().csr(csr::MEPC), 0x200);
}

#[test]
fn illegal_instruction_records_word() {
    let mut ctx = trap_ctx(0x100, &[0xFFFF_FFFF], &[]);
    let _ = run_to_handler(&mut ctx);
    assert_eq!(ctx.cpu().csr(csr::MCAUSE), 2);
    assert_eq!(ctx.cpu().csr(csr::MTVAL), 0xFFFF_FFFF);
    assert_eq!(ctx.cpu().csr(csr::MEPC), 0x100);
}

/// A taken jump to a misaligned target traps without writing the link register.
#[test]
fn misaligned_jump_does_not_link() {
    let mut ctx = trap_ctx(0x100, &[ib().jal(1, 6).build()], &[]);
    ctx.set_reg(1, 0xAAAA);
    let _ = run_to_handler(&mut ctx);
    assert_eq!(ctx.cpu().csr(csr::MCAUSE), 0);
    assert_eq!(ctx.cpu().csr(csr::MTVAL), 0x106);
    assert_eq!(ctx.get_reg(1), 0xAAAA);
}

#[test]
fn misaligned_branch_target_traps_only_when_taken() {
    let program = [
        ib().bne(0, 0, 6).build(), // not taken: no trap
        ib().beq(0, 0, 6).build(), // taken: misaligned
    ];
    let mut ctx = trap_ctx(0x100, &program, &[]);
    let _ = run_to_handler(&mut ctx);
    assert_eq!(ctx.cpu().retired(), 1);
    assert_eq!(ctx.cpu().csr(csr::MEPC), 0x104);
    assert_eq!(ctx.cpu().csr(csr::MTVAL), 0x10A);
}

/// Trap entry stacks MIE into MPIE; `MRET` restores it.
#[test]
fn trap_entry_and_mret_stack_mie() {
    let mut ctx = trap_ctx(0x100, &[system::ECALL], &[system::MRET]);
    ctx.cpu_mut().csrs.mstatus = csr::MSTATUS_MIE;

    let _ = run_to_handler(&mut ctx);
    let mstatus = ctx.cpu().csr(csr::MSTATUS);
    assert_eq!(mstatus & csr::MSTATUS_MIE, 0);
    assert_ne!(mstatus & csr::MSTATUS_MPIE, 0);

    ctx.step(1);
    let mstatus = ctx.cpu().csr(csr::MSTATUS);
    assert_ne!(mstatus & csr::MSTATUS_MIE, 0);
    assert_ne!(mstatus & csr::MSTATUS_MPIE, 0);
}

#[test]
fn mret_counts_as_retired() {
    let mut ctx = trap_ctx(0x100, &[system::ECALL], &[system::MRET]);
    let _ = run_to_handler(&mut ctx);
    ctx.step(1);
    assert_eq!(ctx.cpu().retired(), 1);
    assert_eq!(ctx.cpu().stats.inst_system, 1);
}

// ═════════════════════════════════════════════════════════════════════════════
//  Direct trap entry
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn cpu_trap_sets_pc_and_csrs() {
    let mut ctx = trap_ctx(0, &[], &[]);
    ctx.cpu_mut().trap(Trap::StoreAccessFault(0x1234), 0x40);

    assert_eq!(ctx.cpu().pc, HANDLER);
    assert_eq!(ctx.cpu().csr(csr::MEPC), 0x40);
    assert_eq!(ctx.cpu().csr(csr::MCAUSE), 7);
    assert_eq!(ctx.cpu().csr(csr::MTVAL), 0x1234);
    assert_eq!(ctx.cpu().stats.exceptions_taken, 1);
}

#[test]
fn exceptions_never_set_interrupt_bit() {
    let traps = [
        Trap::InstructionAddressMisaligned(2),
        Trap::InstructionAccessFault(0),
        Trap::IllegalInstruction(0),
        Trap::Breakpoint(0),
        Trap::LoadAddressMisaligned(1),
        Trap::LoadAccessFault(0),
        Trap::StoreAddressMisaligned(1),
        Trap::StoreAccessFault(0),
        Trap::EnvironmentCallFromMMode,
    ];
    let mut ctx = trap_ctx(0, &[], &[]);
    for trap in traps {
        ctx.cpu_mut().trap(trap, 0);
        assert_eq!(ctx.cpu().csr(csr::MCAUSE) >> 31, 0, "{trap}");
    }
    assert_eq!(ctx.cpu().stats.exceptions_taken, 9);
}

#[test]
fn mtvec_can_be_set_from_software() {
    let program = [
        ib().lui(1, 0x2).build(),
        ib().csrrw(0, csr::MTVEC, 1).build(),
        system::ECALL,
    ];
    let mut ctx = trap_ctx(0, &program, &[]);
    assert!(ctx.tick_until(100, |cpu| cpu.pc == 0x2000).is_some());
    assert_eq!(ctx.cpu().csr(csr::MEPC), 8);
}
