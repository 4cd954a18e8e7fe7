use rv32im_core::Simulator;
use rv32im_core::config::Config;
use rv32im_core::core::Cpu;

/// Base of the test memory; also the reset vector.
pub const TEST_BASE: u32 = 0;

/// Size of the test memory.
pub const TEST_MEM_SIZE: usize = 64 * 1024;

/// Cycle budget for a single instruction in `step`.
const STEP_BUDGET: u64 = 1_000;

/// Configuration used by the harness: 64 KiB of zero-wait-state RAM at address 0.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.core.reset_vector = TEST_BASE;
    config.memory.base = TEST_BASE;
    config.memory.size = TEST_MEM_SIZE;
    config
}

pub struct TestContext {
    pub sim: Simulator,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let mut sim = Simulator::new(&config);
        // Tests drive the core cycle by cycle and never report through tohost.
        sim.set_tohost(None);
        Self { sim }
    }

    /// Convenience accessor for the CPU.
    pub fn cpu(&self) -> &Cpu {
        &self.sim.cpu
    }

    /// Mutable convenience accessor for the CPU.
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.sim.cpu
    }

    /// Load a sequence of 32-bit instructions into memory at `addr` and set the PC.
    pub fn load_program(mut self, addr: u32, instructions: &[u32]) -> Self {
        self.sim
            .bus
            .load_words(addr, instructions)
            .expect("program fits in test memory");
        self.sim.cpu.pc = addr;
        self
    }

    /// Place instructions at `addr` without touching the PC (e.g. a trap handler).
    pub fn with_code(mut self, addr: u32, instructions: &[u32]) -> Self {
        self.sim
            .bus
            .load_words(addr, instructions)
            .expect("code fits in test memory");
        self
    }

    /// Set a general-purpose register value.
    pub fn set_reg(&mut self, reg: usize, val: u32) {
        self.sim.cpu.regs.write(reg, val);
    }

    /// Read a general-purpose register value.
    pub fn get_reg(&self, reg: usize) -> u32 {
        self.sim.cpu.regs.read(reg)
    }

    pub fn write_word(&mut self, addr: u32, val: u32) {
        self.sim
            .bus
            .write_u32(addr, val)
            .expect("address is mapped");
    }

    pub fn read_word(&self, addr: u32) -> u32 {
        self.sim.bus.read_u32(addr).expect("address is mapped")
    }

    pub fn read_byte(&self, addr: u32) -> u8 {
        self.sim.bus.read_u8(addr).expect("address is mapped")
    }

    /// Advance exactly `cycles` clock cycles.
    pub fn tick(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.sim.tick();
        }
    }

    /// Run until `count` more instructions retire; panics if they never do.
    pub fn step(&mut self, count: u64) {
        assert!(
            self.sim.run_until_retired(count, count * STEP_BUDGET),
            "{count} instruction(s) did not retire (pc {:#x}, state {})",
            self.sim.cpu.pc,
            self.sim.cpu.state()
        );
    }

    /// Tick until `pred` holds; returns the number of cycles taken.
    pub fn tick_until(&mut self, max_cycles: u64, pred: impl Fn(&Cpu) -> bool) -> Option<u64> {
        for n in 0..max_cycles {
            if pred(&self.sim.cpu) {
                return Some(n);
            }
            self.sim.tick();
        }
        pred(&self.sim.cpu).then_some(max_cycles)
    }

    /// Cycles needed to retire the next `count` instructions.
    pub fn cycles_to_retire(&mut self, count: u64) -> u64 {
        let start = self.sim.cpu.cycles();
        self.step(count);
        self.sim.cpu.cycles() - start
    }
}
