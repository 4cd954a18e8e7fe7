//! # Simulator Tests
//!
//! `tohost` result decoding, full runs to PASS/FAIL/TIMEOUT, and the bounded
//! run helpers used by harnesses.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rv32im_core::Simulator;
use rv32im_core::common::constants::TOHOST_DEFAULT_OFFSET;
use rv32im_core::sim::RunOutcome;

use crate::common::builder::instruction::InstructionBuilder;
use crate::common::harness::{TEST_BASE, test_config};

fn ib() -> InstructionBuilder {
    InstructionBuilder::new()
}

const TOHOST: u32 = TEST_BASE + TOHOST_DEFAULT_OFFSET;

/// Stores `value` to `tohost` and spins.
fn report(value: i32) -> Vec<u32> {
    vec![
        ib().lui(2, 1).build(),
        ib().addi(1, 0, value).build(),
        ib().sw(2, 1, 0).build(),
        ib().jal(0, 0).build(),
    ]
}

fn simulator(program: &[u32]) -> Simulator {
    let mut sim = Simulator::new(&test_config());
    sim.bus.load_words(TEST_BASE, program).expect("program fits");
    sim.clear_tohost();
    sim
}

#[rstest]
#[case(0, None)]
#[case(1, Some(RunOutcome::Pass))]
#[case(3, Some(RunOutcome::Fail(1)))]
#[case(0x2b, Some(RunOutcome::Fail(21)))]
#[case(2, Some(RunOutcome::Fail(1)))]
fn tohost_values(#[case] value: u32, #[case] expected: Option<RunOutcome>) {
    assert_eq!(RunOutcome::from_tohost(value), expected);
}

#[test]
fn exit_codes() {
    assert_eq!(RunOutcome::Pass.exit_code(), 0);
    assert_eq!(RunOutcome::Fail(7).exit_code(), 1);
    assert_eq!(RunOutcome::Timeout.exit_code(), 2);
}

#[test]
fn default_tohost_follows_memory_base() {
    let sim = Simulator::new(&test_config());
    assert_eq!(sim.tohost(), Some(TOHOST));

    let mut config = test_config();
    config.memory.base = 0x8000_0000;
    assert_eq!(Simulator::new(&config).tohost(), Some(0x8000_1000));
}

#[test]
fn run_reports_pass() {
    let mut sim = simulator(&report(1));
    assert_eq!(sim.run(), RunOutcome::Pass);
    assert_eq!(sim.cpu.retired(), 2, "the store completes before it retires");
}

#[test]
fn run_reports_failing_test_number() {
    let mut sim = simulator(&report((5 << 1) | 1));
    assert_eq!(sim.run(), RunOutcome::Fail(5));
}

#[test]
fn run_times_out_at_cycle_limit() {
    let mut sim = simulator(&[ib().jal(0, 0).build()]);
    sim.set_max_cycles(100);
    assert_eq!(sim.run(), RunOutcome::Timeout);
    assert_eq!(sim.cpu.cycles(), 100);
    assert_eq!(sim.cpu.retired(), 25);
}

#[test]
fn without_tohost_a_run_never_passes() {
    let mut sim = simulator(&report(1));
    sim.set_tohost(None);
    sim.set_max_cycles(200);
    assert_eq!(sim.run(), RunOutcome::Timeout);
    assert_eq!(sim.bus.read_u32(TOHOST), Some(1));
}

#[test]
fn load_hex_clears_stale_tohost() {
    let mut sim = Simulator::new(&test_config());
    let info = sim.load_hex("00000013\n@400\n00000005\n").expect("valid image");
    assert_eq!(info.bytes_loaded, 8);
    assert_eq!(sim.bus.read_u32(TOHOST), Some(0));
    assert_eq!(sim.poll_tohost(), None);
}

#[test]
fn moved_tohost_is_polled() {
    let mut sim = simulator(&report(1));
    sim.set_tohost(Some(TOHOST + 4));
    sim.clear_tohost();
    assert_eq!(sim.run_for(500), None);

    sim.set_tohost(Some(TOHOST));
    assert_eq!(sim.poll_tohost(), Some(RunOutcome::Pass));
}

#[test]
fn unmapped_tohost_is_ignored() {
    let mut sim = simulator(&report(1));
    sim.set_tohost(Some(0xF000_0000));
    sim.clear_tohost();
    assert_eq!(sim.poll_tohost(), None);
}

#[test]
fn run_for_stops_when_tohost_is_written() {
    let mut sim = simulator(&report(1));
    assert_eq!(sim.run_for(5), None);
    assert_eq!(sim.run_for(100), Some(RunOutcome::Pass));
    assert!(sim.cpu.cycles() < 105);
}

#[test]
fn run_until_retired_counts_from_now() {
    let mut sim = simulator(&report(1));
    assert!(sim.run_until_retired(2, 100));
    assert_eq!(sim.cpu.retired(), 2);
    assert_eq!(sim.cpu.cycles(), 8);

    // The store needs five cycles.
    assert!(!sim.run_until_retired(1, 3));
    assert!(sim.run_until_retired(1, 10));
    assert_eq!(sim.cpu.cycles(), 13);
}

#[test]
fn interrupt_lines_reach_the_core() {
    let mut sim = simulator(&[ib().jal(0, 0).build()]);
    sim.set_interrupt_lines(1 << 11);
    sim.tick();
    assert_eq!(sim.cpu.interrupt_lines(), 1 << 11);
}
