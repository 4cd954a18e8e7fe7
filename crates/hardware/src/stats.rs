//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics of the core. It provides:
//! 1. **Cycle and CPI:** Total cycles, retired instructions, and derived metrics.
//! 2. **Instruction mix:** Counts by category (ALU, mul/div, load, store, branch, system).
//! 3. **Stalls:** MDU busy cycles, bus wait cycles and WFI sleep cycles.
//! 4. **Traps:** Exceptions and interrupts taken.

use std::time::Instant;

use crate::core::control::Instruction;

/// Simulation statistics tracking the execution of one core.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total clock cycles elapsed.
    pub cycles: u64,
    /// Number of instructions retired.
    pub instructions_retired: u64,

    /// Count of integer ALU (register and immediate) instructions retired.
    pub inst_alu: u64,
    /// Count of multiply/divide instructions retired.
    pub inst_muldiv: u64,
    /// Count of load instructions retired.
    pub inst_load: u64,
    /// Count of store instructions retired.
    pub inst_store: u64,
    /// Count of branch and jump instructions retired.
    pub inst_branch: u64,
    /// Count of system (CSR, MRET, WFI, fences) instructions retired.
    pub inst_system: u64,

    /// Cycles spent in the MULDIV state waiting for the MDU.
    pub mdu_busy_cycles: u64,
    /// Cycles an instruction fetch was held without acknowledgement.
    pub stalls_fetch: u64,
    /// Cycles a data access was held without acknowledgement.
    pub stalls_mem: u64,
    /// Cycles spent asleep after `WFI`.
    pub wfi_cycles: u64,

    /// Number of synchronous exceptions taken.
    pub exceptions_taken: u64,
    /// Number of interrupts taken.
    pub interrupts_taken: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            inst_alu: 0,
            inst_muldiv: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            inst_system: 0,
            mdu_busy_cycles: 0,
            stalls_fetch: 0,
            stalls_mem: 0,
            wfi_cycles: 0,
            exceptions_taken: 0,
            interrupts_taken: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"core"`, `"instruction_mix"`, `"traps"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "core", "instruction_mix", "traps"];

impl SimStats {
    /// Counts one retired instruction in its mix category.
    pub const fn record_retire(&mut self, inst: &Instruction) {
        self.instructions_retired += 1;
        let ctrl = &inst.ctrl;
        if ctrl.is_muldiv {
            self.inst_muldiv += 1;
        } else if ctrl.mem_read {
            self.inst_load += 1;
        } else if ctrl.mem_write {
            self.inst_store += 1;
        } else if ctrl.branch || ctrl.jump {
            self.inst_branch += 1;
        } else if ctrl.is_system || !ctrl.reg_write {
            self.inst_system += 1;
        } else {
            self.inst_alu += 1;
        }
    }

    /// Total traps taken (exceptions and interrupts).
    pub const fn traps_taken(&self) -> u64 {
        self.exceptions_taken + self.interrupts_taken
    }

    /// Cycles per retired instruction, or 0 before the first retirement.
    pub fn cpi(&self) -> f64 {
        if self.instructions_retired == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions_retired as f64
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// # Arguments
    ///
    /// * `sections` - Slice of section names to print, or empty for all.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.cycles.max(1) as f64;
        let instr = self.instructions_retired.max(1) as f64;
        let pct = |n: u64, total: f64| (n as f64 / total) * 100.0;

        if want("summary") {
            let khz = if seconds > 0.0 {
                (self.cycles as f64 / seconds) / 1000.0
            } else {
                0.0
            };
            println!("\n==========================================================");
            println!("RV32IM CORE SIMULATION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_cycles               {}", self.cycles);
            println!("sim_freq                 {khz:.2} kHz");
            println!("sim_insts                {}", self.instructions_retired);
            println!("sim_cpi                  {:.4}", self.cpi());
            println!("----------------------------------------------------------");
        }
        if want("core") {
            println!("CORE BREAKDOWN");
            println!(
                "  cycles.muldiv          {} ({:.2}%)",
                self.mdu_busy_cycles,
                pct(self.mdu_busy_cycles, cyc)
            );
            println!(
                "  stalls.fetch           {} ({:.2}%)",
                self.stalls_fetch,
                pct(self.stalls_fetch, cyc)
            );
            println!(
                "  stalls.memory          {} ({:.2}%)",
                self.stalls_mem,
                pct(self.stalls_mem, cyc)
            );
            println!(
                "  cycles.wfi             {} ({:.2}%)",
                self.wfi_cycles,
                pct(self.wfi_cycles, cyc)
            );
            println!("----------------------------------------------------------");
        }
        if want("instruction_mix") {
            println!("INSTRUCTION MIX");
            for (name, count) in [
                ("op.alu", self.inst_alu),
                ("op.muldiv", self.inst_muldiv),
                ("op.load", self.inst_load),
                ("op.store", self.inst_store),
                ("op.branch", self.inst_branch),
                ("op.system", self.inst_system),
            ] {
                println!("  {name:<22} {count} ({:.2}%)", pct(count, instr));
            }
            println!("----------------------------------------------------------");
        }
        if want("traps") {
            println!("TRAPS");
            println!("  traps.exceptions       {}", self.exceptions_taken);
            println!("  traps.interrupts       {}", self.interrupts_taken);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
