//! # Multiply/Divide Execution Tests
//!
//! M-extension instructions on the core: results written back, the fixed
//! 36-cycle latency (3 + 32 MULDIV + 1), and operand capture at EXECUTE.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rv32im_core::core::control::ControllerState;

use crate::common::builder::instruction::InstructionBuilder;
use crate::common::harness::TestContext;

fn ib() -> InstructionBuilder {
    InstructionBuilder::new()
}

fn run_one(inst: u32, a: u32, b: u32) -> TestContext {
    let mut ctx = TestContext::new().load_program(0, &[inst]);
    ctx.set_reg(1, a);
    ctx.set_reg(2, b);
    ctx.step(1);
    ctx
}

#[rstest]
#[case(ib().mul(3, 1, 2).build(), 6, 7, 42)]
#[case(ib().mul(3, 1, 2).build(), 0xFFFF_FFFF, 2, 0xFFFF_FFFE)]
#[case(ib().mulh(3, 1, 2).build(), 0x8000_0000, 2, 0xFFFF_FFFF)]
#[case(ib().mulhu(3, 1, 2).build(), 0x8000_0000, 2, 1)]
#[case(ib().div(3, 1, 2).build(), -20_i32 as u32, 3, -6_i32 as u32)]
#[case(ib().divu(3, 1, 2).build(), 20, 3, 6)]
#[case(ib().rem(3, 1, 2).build(), -20_i32 as u32, 3, -2_i32 as u32)]
#[case(ib().div(3, 1, 2).build(), 123, 0, 0xFFFF_FFFF)]
#[case(ib().rem(3, 1, 2).build(), 123, 0, 123)]
#[case(ib().div(3, 1, 2).build(), 0x8000_0000, 0xFFFF_FFFF, 0x8000_0000)]
#[case(ib().rem(3, 1, 2).build(), 0x8000_0000, 0xFFFF_FFFF, 0)]
fn results(#[case] inst: u32, #[case] a: u32, #[case] b: u32, #[case] expected: u32) {
    let ctx = run_one(inst, a, b);
    assert_eq!(ctx.get_reg(3), expected);
}

#[test]
fn latency_is_fixed_at_36_cycles() {
    for (a, b) in [(0, 0), (u32::MAX, u32::MAX), (1, 0)] {
        let mut ctx = TestContext::new().load_program(0, &[ib().div(3, 1, 2).build()]);
        ctx.set_reg(1, a);
        ctx.set_reg(2, b);
        assert_eq!(ctx.cycles_to_retire(1), 36, "div {a:#x}/{b:#x}");
        assert_eq!(ctx.cpu().stats.mdu_busy_cycles, 32);
    }
}

#[test]
fn stays_in_muldiv_until_done() {
    let mut ctx = TestContext::new().load_program(0, &[ib().mul(3, 1, 2).build()]);
    ctx.tick(3);
    assert_eq!(ctx.cpu().state(), ControllerState::MulDiv);
    assert!(ctx.cpu().mdu.is_busy());

    ctx.tick(31);
    assert_eq!(ctx.cpu().state(), ControllerState::MulDiv);

    ctx.tick(1);
    assert_eq!(ctx.cpu().state(), ControllerState::Writeback);
    assert!(ctx.cpu().mdu.is_done());
    assert_eq!(ctx.cpu().retired(), 0);

    ctx.tick(1);
    assert_eq!(ctx.cpu().retired(), 1);
}

/// `rd == rs1`: the operand is captured at EXECUTE, the result lands at WRITEBACK.
#[test]
fn destination_may_alias_source() {
    let program = [ib().mul(1, 1, 1).build(), ib().mul(1, 1, 1).build()];
    let mut ctx = TestContext::new().load_program(0, &program);
    ctx.set_reg(1, 3);
    ctx.step(2);
    assert_eq!(ctx.get_reg(1), 81);
}

#[test]
fn back_to_back_operations_restart_the_unit() {
    let program = [ib().mul(3, 1, 2).build(), ib().divu(4, 3, 2).build(), ib().rem(5, 3, 1).build()];
    let mut ctx = TestContext::new().load_program(0, &program);
    ctx.set_reg(1, 10);
    ctx.set_reg(2, 4);
    assert_eq!(ctx.cycles_to_retire(3), 3 * 36);
    assert_eq!(ctx.get_reg(3), 40);
    assert_eq!(ctx.get_reg(4), 10);
    assert_eq!(ctx.get_reg(5), 0);
    assert_eq!(ctx.cpu().stats.inst_muldiv, 3);
}
