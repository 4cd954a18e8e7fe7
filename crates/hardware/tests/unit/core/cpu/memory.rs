//! # Data Memory Tests
//!
//! Byte lanes, sign extension, data wait-states, bus errors, and the two
//! misaligned-access policies (trap, or split into aligned beats).

use pretty_assertions::assert_eq;
use rstest::rstest;
use rv32im_core::core::arch::csr;
use rv32im_core::core::control::signals::MemWidth;
use rv32im_core::core::cpu::memory::{beat_lanes, beats, extend_load, store_data};

use crate::common::builder::instruction::InstructionBuilder;
use crate::common::harness::{TestContext, test_config};

const DATA: u32 = 0x800;
const HANDLER: u32 = 0x1000;

fn ib() -> InstructionBuilder {
    InstructionBuilder::new()
}

/// Context with `x1 = DATA`, the program at 0 and a NOP handler at `HANDLER`.
fn ctx_with(config: rv32im_core::config::Config, program: &[u32]) -> TestContext {
    let mut ctx = TestContext::with_config(config)
        .load_program(0, program)
        .with_code(HANDLER, &[ib().nop().build()]);
    ctx.cpu_mut().csrs.mtvec = HANDLER;
    ctx.set_reg(1, DATA);
    ctx
}

fn ctx(program: &[u32]) -> TestContext {
    ctx_with(test_config(), program)
}

// ═════════════════════════════════════════════════════════════════════════════
//  Lane helpers
// ═════════════════════════════════════════════════════════════════════════════

#[rstest]
#[case(0x800, MemWidth::Word, 1)]
#[case(0x803, MemWidth::Byte, 1)]
#[case(0x802, MemWidth::Half, 1)]
#[case(0x803, MemWidth::Half, 2)]
#[case(0x801, MemWidth::Word, 2)]
fn beat_count(#[case] addr: u32, #[case] width: MemWidth, #[case] n: u32) {
    assert_eq!(beats(addr, width), n);
}

#[test]
fn lanes_of_split_word() {
    assert_eq!(beat_lanes(0x802, MemWidth::Word, 0), (0x800, 0b1100, 0, 2));
    assert_eq!(beat_lanes(0x802, MemWidth::Word, 1), (0x804, 0b0011, 2, 0));
    assert_eq!(beat_lanes(0x803, MemWidth::Half, 0), (0x800, 0b1000, 0, 3));
    assert_eq!(beat_lanes(0x803, MemWidth::Half, 1), (0x804, 0b0001, 1, 0));
    assert_eq!(beat_lanes(0x801, MemWidth::Byte, 0), (0x800, 0b0010, 0, 1));
}

#[test]
fn aligned_store_data_is_replicated() {
    assert_eq!(store_data(0x801, MemWidth::Byte, 0, 0x1234_56AB), 0xABAB_ABAB);
    assert_eq!(store_data(0x802, MemWidth::Half, 0, 0x1234_BEEF), 0xBEEF_BEEF);
    assert_eq!(store_data(0x800, MemWidth::Word, 0, 0xCAFE_F00D), 0xCAFE_F00D);
}

#[test]
fn split_store_data_is_shifted() {
    assert_eq!(store_data(0x803, MemWidth::Word, 0, 0xAABB_CCDD), 0xDD00_0000);
    assert_eq!(store_data(0x803, MemWidth::Word, 1, 0xAABB_CCDD), 0x00AA_BBCC);
}

#[rstest]
#[case(0x80, MemWidth::Byte, true, 0xFFFF_FF80)]
#[case(0x80, MemWidth::Byte, false, 0x80)]
#[case(0x1234_8000, MemWidth::Half, true, 0xFFFF_8000)]
#[case(0x1234_8000, MemWidth::Half, false, 0x8000)]
#[case(0x7F, MemWidth::Byte, true, 0x7F)]
#[case(0x8000_0000, MemWidth::Word, true, 0x8000_0000)]
fn load_extension(#[case] raw: u32, #[case] width: MemWidth, #[case] signed: bool, #[case] out: u32) {
    assert_eq!(extend_load(raw, width, signed), out);
}

// ═════════════════════════════════════════════════════════════════════════════
//  Loads and stores on the core
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn word_store_then_load() {
    let mut ctx = ctx(&[ib().sw(1, 2, 4).build(), ib().lw(3, 1, 4).build()]);
    ctx.set_reg(2, 0xDEAD_BEEF);
    ctx.step(2);
    assert_eq!(ctx.read_word(DATA + 4), 0xDEAD_BEEF);
    assert_eq!(ctx.get_reg(3), 0xDEAD_BEEF);
}

#[test]
fn byte_loads_extend() {
    let program = [
        ib().lb(2, 1, 3).build(),
        ib().lbu(3, 1, 3).build(),
        ib().lh(4, 1, 2).build(),
        ib().lhu(5, 1, 2).build(),
        ib().lb(6, 1, 0).build(),
    ];
    let mut ctx = ctx(&program);
    ctx.write_word(DATA, 0x80F0_7F44);
    ctx.step(5);
    assert_eq!(ctx.get_reg(2), 0xFFFF_FF80);
    assert_eq!(ctx.get_reg(3), 0x80);
    assert_eq!(ctx.get_reg(4), 0xFFFF_80F0);
    assert_eq!(ctx.get_reg(5), 0x80F0);
    assert_eq!(ctx.get_reg(6), 0x44);
}

/// Sub-word stores only touch their own byte lanes.
#[test]
fn sub_word_stores_respect_lanes() {
    let program = [ib().sb(1, 2, 3).build(), ib().sh(1, 2, 4).build()];
    let mut ctx = ctx(&program);
    ctx.write_word(DATA, 0x1122_3344);
    ctx.write_word(DATA + 4, 0x5566_7788);
    ctx.set_reg(2, 0xFFFF_A0AA);
    ctx.step(2);
    assert_eq!(ctx.read_word(DATA), 0xAA22_3344);
    assert_eq!(ctx.read_word(DATA + 4), 0x5566_A0AA);
}

#[test]
fn data_wait_states_stall_in_mem() {
    let mut config = test_config();
    config.memory.data_wait_states = 2;
    let mut ctx = ctx_with(config, &[ib().lw(2, 1, 0).build(), ib().sw(1, 2, 4).build()]);
    ctx.write_word(DATA, 7);

    assert_eq!(ctx.cycles_to_retire(1), 5 + 2);
    assert_eq!(ctx.cycles_to_retire(1), 5 + 2);
    assert_eq!(ctx.cpu().stats.stalls_mem, 4);
    assert_eq!(ctx.read_word(DATA + 4), 7);
}

// ═════════════════════════════════════════════════════════════════════════════
//  Bus errors
// ═════════════════════════════════════════════════════════════════════════════

fn run_to_handler(ctx: &mut TestContext) {
    assert!(
        ctx.tick_until(50, |cpu| cpu.pc == HANDLER).is_some(),
        "trap was not taken"
    );
}

#[test]
fn load_bus_error_raises_access_fault() {
    let mut ctx = ctx(&[ib().lw(2, 1, 0x100).build()]);
    ctx.set_reg(2, 0x5555);
    ctx.sim.bus.add_fault_region(0x900..0x904);
    run_to_handler(&mut ctx);

    assert_eq!(ctx.cpu().csr(csr::MCAUSE), 5);
    assert_eq!(ctx.cpu().csr(csr::MTVAL), 0x900);
    assert_eq!(ctx.cpu().csr(csr::MEPC), 0);
    assert_eq!(ctx.get_reg(2), 0x5555, "destination untouched");
    assert_eq!(ctx.cpu().retired(), 0);
}

#[test]
fn store_to_unmapped_address_faults() {
    let mut ctx = ctx(&[ib().sw(3, 2, 0).build()]);
    ctx.set_reg(3, 0x2000_0000);
    run_to_handler(&mut ctx);
    assert_eq!(ctx.cpu().csr(csr::MCAUSE), 7);
    assert_eq!(ctx.cpu().csr(csr::MTVAL), 0x2000_0000);
}

#[test]
fn fetch_bus_error_raises_instruction_access_fault() {
    let mut ctx = ctx(&[]);
    ctx.sim.bus.add_fault_region(0x40..0x44);
    ctx.cpu_mut().pc = 0x40;
    run_to_handler(&mut ctx);
    assert_eq!(ctx.cpu().csr(csr::MCAUSE), 1);
    assert_eq!(ctx.cpu().csr(csr::MTVAL), 0x40);
    assert_eq!(ctx.cpu().csr(csr::MEPC), 0x40);
}

// ═════════════════════════════════════════════════════════════════════════════
//  Misaligned accesses
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn misaligned_load_traps_by_default() {
    let mut ctx = ctx(&[ib().lw(2, 1, 2).build()]);
    run_to_handler(&mut ctx);
    assert_eq!(ctx.cpu().csr(csr::MCAUSE), 4);
    assert_eq!(ctx.cpu().csr(csr::MTVAL), DATA + 2);
}

#[test]
fn misaligned_store_traps_before_touching_memory() {
    let mut ctx = ctx(&[ib().sh(1, 2, 1).build()]);
    ctx.set_reg(2, 0xFFFF);
    ctx.write_word(DATA, 0);
    run_to_handler(&mut ctx);
    assert_eq!(ctx.cpu().csr(csr::MCAUSE), 6);
    assert_eq!(ctx.cpu().csr(csr::MTVAL), DATA + 1);
    assert_eq!(ctx.read_word(DATA), 0);
}

fn split_config() -> rv32im_core::config::Config {
    let mut config = test_config();
    config.core.trap_misaligned = false;
    config
}

/// With trapping disabled, a word load across a boundary is assembled from two beats.
#[test]
fn split_load_across_words() {
    let mut ctx = ctx_with(split_config(), &[ib().lw(2, 1, 2).build()]);
    ctx.write_word(DATA, 0x4433_2211);
    ctx.write_word(DATA + 4, 0x8877_6655);
    assert_eq!(ctx.cycles_to_retire(1), 6);
    assert_eq!(ctx.get_reg(2), 0x6655_4433);
}

#[test]
fn split_signed_half_load() {
    let mut ctx = ctx_with(split_config(), &[ib().lh(2, 1, 3).build()]);
    ctx.write_word(DATA, 0xF000_0000);
    ctx.write_word(DATA + 4, 0x0000_0080);
    ctx.step(1);
    assert_eq!(ctx.get_reg(2), 0xFFFF_80F0);
}

#[test]
fn unaligned_load_within_word_is_single_beat() {
    let mut ctx = ctx_with(split_config(), &[ib().lh(2, 1, 1).build()]);
    ctx.write_word(DATA, 0x0012_3400);
    assert_eq!(ctx.cycles_to_retire(1), 5);
    assert_eq!(ctx.get_reg(2), 0x1234);
}

#[test]
fn split_store_across_words() {
    let mut ctx = ctx_with(split_config(), &[ib().sw(1, 2, 3).build()]);
    ctx.set_reg(2, 0xAABB_CCDD);
    ctx.write_word(DATA, 0x1111_1111);
    ctx.write_word(DATA + 4, 0x2222_2222);
    ctx.step(1);
    assert_eq!(ctx.read_word(DATA), 0xDD11_1111);
    assert_eq!(ctx.read_word(DATA + 4), 0x22AA_BBCC);
}

/// A split store whose second beat faults leaves the first beat written.
#[test]
fn split_store_second_beat_fault_is_partial() {
    let mut ctx = ctx_with(split_config(), &[ib().sw(1, 2, 3).build()]);
    ctx.set_reg(2, 0xAABB_CCDD);
    ctx.write_word(DATA, 0);
    ctx.sim.bus.add_fault_region(DATA + 4..DATA + 8);
    run_to_handler(&mut ctx);
    assert_eq!(ctx.cpu().csr(csr::MCAUSE), 7);
    assert_eq!(ctx.cpu().csr(csr::MTVAL), DATA + 3);
    assert_eq!(ctx.read_word(DATA), 0xDD00_0000);
}
