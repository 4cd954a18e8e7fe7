//! Execution controller states.

use std::fmt;

/// State of the multi-cycle execution controller.
///
/// The normal sequence is `Fetch → Decode → Execute → [Mem | MulDiv] → Writeback`.
/// `Trap` is entered whenever a trap has been selected and performs trap entry
/// on the following cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ControllerState {
    /// Check for interrupts, then present the PC on the instruction bus until acknowledged.
    #[default]
    Fetch,
    /// Decode the fetched word and read source registers.
    Decode,
    /// Compute on the ALU, start the MDU, evaluate branches and CSR operands.
    Execute,
    /// Present the load/store on the data bus until acknowledged.
    Mem,
    /// Wait for the MDU done pulse.
    MulDiv,
    /// Commit register/CSR writes, update the PC and retire.
    Writeback,
    /// Perform trap entry for the pending trap.
    Trap,
}

impl ControllerState {
    /// Short uppercase mnemonic used in trace output.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Fetch => "FETCH",
            Self::Decode => "DECODE",
            Self::Execute => "EXECUTE",
            Self::Mem => "MEM",
            Self::MulDiv => "MULDIV",
            Self::Writeback => "WRITEBACK",
            Self::Trap => "TRAP",
        }
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
