//! Control and Status Register (CSR) definitions and operations.
//!
//! This module implements the machine-mode CSR subsystem of the RV32 core. It provides:
//! 1. **Address Definitions:** Constants for every CSR the core implements.
//! 2. **Field Masks:** Bitmasks for `mstatus`, `mtvec`, `mip`/`mie` and `misa`.
//! 3. **Register Storage:** The `Csrs` struct holding architectural state, including
//!    the 64-bit cycle and retired-instruction counters.
//! 4. **Access Logic:** Side-effect-free reads, WARL-masked writes, legality checks
//!    and the read-modify-write operation used by the six Zicsr instructions.

use tracing::warn;

use crate::core::control::signals::CsrOp;
use crate::isa::privileged::cause::interrupt;

/// Machine vendor ID CSR address (read-only).
pub const MVENDORID: u32 = 0xF11;

/// Machine architecture ID CSR address (read-only).
pub const MARCHID: u32 = 0xF12;

/// Machine implementation ID CSR address (read-only).
pub const MIMPID: u32 = 0xF13;

/// Machine hardware thread ID CSR address (read-only).
pub const MHARTID: u32 = 0xF14;

/// Machine status register CSR address.
pub const MSTATUS: u32 = 0x300;

/// Machine ISA register CSR address.
pub const MISA: u32 = 0x301;

/// Machine interrupt enable register CSR address.
pub const MIE: u32 = 0x304;

/// Machine trap vector base address register CSR address.
pub const MTVEC: u32 = 0x305;

/// Machine scratch register CSR address.
pub const MSCRATCH: u32 = 0x340;

/// Machine exception program counter CSR address.
pub const MEPC: u32 = 0x341;

/// Machine cause register CSR address.
pub const MCAUSE: u32 = 0x342;

/// Machine trap value register CSR address.
pub const MTVAL: u32 = 0x343;

/// Machine interrupt pending register CSR address.
pub const MIP: u32 = 0x344;

/// Machine cycle counter, low half.
pub const MCYCLE: u32 = 0xB00;

/// Machine instructions-retired counter, low half.
pub const MINSTRET: u32 = 0xB02;

/// Machine cycle counter, high half.
pub const MCYCLEH: u32 = 0xB80;

/// Machine instructions-retired counter, high half.
pub const MINSTRETH: u32 = 0xB82;

/// Cycle counter shadow (read-only).
pub const CYCLE: u32 = 0xC00;

/// Instructions-retired counter shadow (read-only).
pub const INSTRET: u32 = 0xC02;

/// Cycle counter shadow, high half (read-only).
pub const CYCLEH: u32 = 0xC80;

/// Instructions-retired counter shadow, high half (read-only).
pub const INSTRETH: u32 = 0xC82;

/// Machine interrupt enable bit in `mstatus`.
pub const MSTATUS_MIE: u32 = 1 << 3;

/// Previous machine interrupt enable bit in `mstatus`.
pub const MSTATUS_MPIE: u32 = 1 << 7;

/// Previous privilege field in `mstatus`; hardwired to machine mode.
pub const MSTATUS_MPP: u32 = 3 << 11;

/// Bits of `mstatus` that software can change.
pub const MSTATUS_WRITABLE: u32 = MSTATUS_MIE | MSTATUS_MPIE;

/// Machine software interrupt pending/enable bit.
pub const MIP_MSIP: u32 = 1 << interrupt::MACHINE_SOFTWARE;

/// Machine timer interrupt pending/enable bit.
pub const MIP_MTIP: u32 = 1 << interrupt::MACHINE_TIMER;

/// Machine external interrupt pending/enable bit.
pub const MIP_MEIP: u32 = 1 << interrupt::MACHINE_EXTERNAL;

/// Mode field of `mtvec`.
pub const MTVEC_MODE_MASK: u32 = 0b11;

/// Direct trap-vector mode.
pub const MTVEC_MODE_DIRECT: u32 = 0;

/// Vectored trap-vector mode.
pub const MTVEC_MODE_VECTORED: u32 = 1;

/// `misa` MXL field for a 32-bit hart.
pub const MISA_XLEN_32: u32 = 1 << 30;

/// `misa` bit for the base integer ISA.
pub const MISA_EXT_I: u32 = 1 << 8;

/// `misa` bit for the multiply/divide extension.
pub const MISA_EXT_M: u32 = 1 << 12;

/// `misa` value reported by the core (RV32IM).
pub const MISA_RV32IM: u32 = MISA_XLEN_32 | MISA_EXT_I | MISA_EXT_M;

/// Returns `true` when the address lies in the standard read-only CSR space (bits 11:10 = 0b11).
pub const fn is_read_only(addr: u32) -> bool {
    (addr >> 10) & 0b11 == 0b11
}

/// Returns `true` for every CSR address the core implements.
pub const fn is_implemented(addr: u32) -> bool {
    matches!(
        addr,
        MVENDORID
            | MARCHID
            | MIMPID
            | MHARTID
            | MSTATUS
            | MISA
            | MIE
            | MTVEC
            | MSCRATCH
            | MEPC
            | MCAUSE
            | MTVAL
            | MIP
            | MCYCLE
            | MINSTRET
            | MCYCLEH
            | MINSTRETH
            | CYCLE
            | INSTRET
            | CYCLEH
            | INSTRETH
    )
}

/// Computes the new value of a CSR read-modify-write.
///
/// # Arguments
///
/// * `op` - The CSR operation.
/// * `old` - Current CSR value.
/// * `operand` - `rs1` value, or the zero-extended 5-bit immediate.
///
/// # Returns
///
/// The value to write back; `old` when `op` is `CsrOp::None`.
pub const fn apply(op: CsrOp, old: u32, operand: u32) -> u32 {
    match op {
        CsrOp::None => old,
        CsrOp::Rw | CsrOp::Rwi => operand,
        CsrOp::Rs | CsrOp::Rsi => old | operand,
        CsrOp::Rc | CsrOp::Rci => old & !operand,
    }
}

/// Identification values reported by the read-only ID CSRs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CsrIdentity {
    /// `mvendorid` value.
    pub mvendorid: u32,
    /// `marchid` value.
    pub marchid: u32,
    /// `mimpid` value.
    pub mimpid: u32,
    /// `mhartid` value.
    pub mhartid: u32,
}

/// Control and Status Register file.
///
/// Fields hold the architectural values; `read`/`write` apply the address decoding
/// and WARL rules. `mip` mirrors the interrupt lines and is refreshed every cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Csrs {
    /// Machine status register (only MIE and MPIE are stored).
    pub mstatus: u32,
    /// Machine interrupt enable.
    pub mie: u32,
    /// Machine interrupt pending (mirror of the interrupt lines).
    pub mip: u32,
    /// Machine trap vector base address and mode.
    pub mtvec: u32,
    /// Machine scratch register.
    pub mscratch: u32,
    /// Machine exception program counter.
    pub mepc: u32,
    /// Machine trap cause.
    pub mcause: u32,
    /// Machine trap value.
    pub mtval: u32,
    /// Machine cycle counter.
    pub mcycle: u64,
    /// Machine instructions-retired counter.
    pub minstret: u64,
    /// Read-only identification values.
    pub identity: CsrIdentity,
}

impl Csrs {
    /// Creates a CSR file with the given identification values and reset trap vector.
    pub fn new(identity: CsrIdentity, mtvec: u32) -> Self {
        let mut csrs = Self {
            identity,
            ..Self::default()
        };
        csrs.write(MTVEC, mtvec);
        csrs
    }

    /// Reads a CSR value by its address without side effects.
    ///
    /// # Arguments
    ///
    /// * `addr` - The 12-bit CSR address.
    ///
    /// # Returns
    ///
    /// The 32-bit value of the CSR, or 0 if the address is not implemented.
    pub fn read(&self, addr: u32) -> u32 {
        match addr {
            MSTATUS => (self.mstatus & MSTATUS_WRITABLE) | MSTATUS_MPP,
            MISA => MISA_RV32IM,
            MIE => self.mie,
            MTVEC => self.mtvec,
            MSCRATCH => self.mscratch,
            MEPC => self.mepc,
            MCAUSE => self.mcause,
            MTVAL => self.mtval,
            MIP => self.mip,
            MCYCLE | CYCLE => self.mcycle as u32,
            MCYCLEH | CYCLEH => (self.mcycle >> 32) as u32,
            MINSTRET | INSTRET => self.minstret as u32,
            MINSTRETH | INSTRETH => (self.minstret >> 32) as u32,
            MVENDORID => self.identity.mvendorid,
            MARCHID => self.identity.marchid,
            MIMPID => self.identity.mimpid,
            MHARTID => self.identity.mhartid,
            _ => 0,
        }
    }

    /// Writes a CSR by its address, applying the per-register WARL rules.
    ///
    /// Writes to read-only or unimplemented addresses and to `misa` are ignored;
    /// legality is the caller's concern (see [`Csrs::check_access`]).
    ///
    /// # Arguments
    ///
    /// * `addr` - The 12-bit CSR address.
    /// * `val` - The 32-bit value to write.
    pub fn write(&mut self, addr: u32, val: u32) {
        match addr {
            MSTATUS => self.mstatus = val & MSTATUS_WRITABLE,
            MIE => self.mie = val,
            MTVEC => {
                // Modes other than direct/vectored are reserved; keep bit 0 only.
                self.mtvec = (val & !MTVEC_MODE_MASK) | (val & MTVEC_MODE_VECTORED);
            }
            MSCRATCH => self.mscratch = val,
            MEPC => self.mepc = val & !0b11,
            MCAUSE => self.mcause = val,
            MTVAL => self.mtval = val,
            MIP => warn!(value = val, "write to mip ignored; it mirrors the interrupt lines"),
            MCYCLE => self.mcycle = (self.mcycle & 0xFFFF_FFFF_0000_0000) | u64::from(val),
            MCYCLEH => self.mcycle = (self.mcycle & 0xFFFF_FFFF) | (u64::from(val) << 32),
            MINSTRET => self.minstret = (self.minstret & 0xFFFF_FFFF_0000_0000) | u64::from(val),
            MINSTRETH => self.minstret = (self.minstret & 0xFFFF_FFFF) | (u64::from(val) << 32),
            _ => {}
        }
    }

    /// Checks whether a CSR instruction may access `addr`.
    ///
    /// # Arguments
    ///
    /// * `addr` - The 12-bit CSR address.
    /// * `writes` - Whether the instruction would write the CSR.
    ///
    /// # Returns
    ///
    /// `true` when the access is legal; `false` means illegal-instruction.
    pub const fn check_access(addr: u32, writes: bool) -> bool {
        is_implemented(addr) && !(writes && is_read_only(addr))
    }

    /// Performs an atomic CSR read-modify-write.
    ///
    /// # Arguments
    ///
    /// * `addr` - The 12-bit CSR address.
    /// * `op` - The CSR operation.
    /// * `operand` - `rs1` value or zero-extended immediate.
    /// * `writes` - Whether the instruction writes (false for set/clear with a zero source).
    ///
    /// # Returns
    ///
    /// The CSR value before the write, destined for `rd`.
    pub fn read_modify_write(&mut self, addr: u32, op: CsrOp, operand: u32, writes: bool) -> u32 {
        let old = self.read(addr);
        if writes {
            self.write(addr, apply(op, old, operand));
        }
        old
    }

    /// Returns `true` when the global interrupt enable is set.
    pub const fn interrupts_enabled(&self) -> bool {
        self.mstatus & MSTATUS_MIE != 0
    }

    /// Mirrors the interrupt lines into `mip`.
    pub const fn sample_interrupts(&mut self, lines: u32) {
        self.mip = lines;
    }

    /// Advances the cycle counter by one.
    pub const fn tick_cycle(&mut self) {
        self.mcycle = self.mcycle.wrapping_add(1);
    }

    /// Advances the instructions-retired counter by one.
    pub const fn retire(&mut self) {
        self.minstret = self.minstret.wrapping_add(1);
    }
}
