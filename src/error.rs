use thiserror::Error;

/// Why a single instruction could not be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("unknown opcode")]
    UnknownOpcode,
    #[error("call stack overflow")]
    StackOverflow,
    #[error("call stack underflow")]
    StackUnderflow,
    #[error("address {0:#05X} is out of range")]
    AddressOutOfRange(usize),
}

impl Fault {
    /// Only unknown opcodes can be skipped; everything else halts the machine.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Fault::UnknownOpcode)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("program is {size} bytes but only {max} bytes fit in memory")]
    ProgramLoad { size: usize, max: usize },

    #[error("cannot fetch an instruction at {pc:#05X}")]
    Fetch { pc: u16 },

    #[error("{fault} (opcode {opcode:#06X} at {pc:#05X})")]
    Cycle { pc: u16, opcode: u16, fault: Fault },
}

impl Error {
    pub fn is_fatal(&self) -> bool {
        match self {
            Error::ProgramLoad { .. } | Error::Fetch { .. } => true,
            Error::Cycle { fault, .. } => fault.is_fatal(),
        }
    }
}
