//! Errors that can occur during program execution.

use cvm_bytecode::{DecodeError, Opcode};

use crate::stack::StackError;

/// Why an instruction failed.
///
/// Each fault maps to a reason number; see [`RuntimeError::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    #[error("stack underflow")]
    Underflow,
    #[error("stack overflow")]
    Overflow,
    /// Index (or indirect jump slot) resolves below the bottom of the stack.
    #[error("index below zero")]
    BelowZero,
    #[error("index out of range")]
    OutOfRange,
    /// `store` source index resolves below zero.
    #[error("source index below zero")]
    SourceBelowZero,
    #[error("source index out of range")]
    SourceOutOfRange,
    #[error("jump target out of bounds")]
    TargetOutOfBounds,
    #[error("negative allocation count")]
    NegativeCount,
    #[error("insufficient stack capacity")]
    InsufficientCapacity,
    #[error("division by zero")]
    DivisionByZero,
    #[error("return address out of bounds")]
    BadReturnAddress,
    #[error("undefined opcode 0x{0:02X}")]
    UndefinedOpcode(u8),
    #[error("truncated instruction")]
    Truncated,
    #[error("execution fuel exhausted")]
    FuelExhausted,
}

impl Fault {
    /// Reason number, the low byte of the composite code.
    pub fn reason(self) -> u8 {
        match self {
            Self::Underflow | Self::Overflow => 1,
            Self::BelowZero | Self::NegativeCount => 2,
            Self::OutOfRange | Self::TargetOutOfBounds | Self::InsufficientCapacity => 3,
            Self::SourceBelowZero => 4,
            Self::SourceOutOfRange => 5,
            Self::DivisionByZero => 6,
            Self::BadReturnAddress => 7,
            Self::FuelExhausted => 0xFD,
            Self::Truncated => 0xFE,
            Self::UndefinedOpcode(_) => 0xFF,
        }
    }

    /// Re-tag an index fault as belonging to the `store` source operand.
    pub(crate) fn for_source(self) -> Self {
        match self {
            Self::BelowZero => Self::SourceBelowZero,
            Self::OutOfRange => Self::SourceOutOfRange,
            other => other,
        }
    }
}

impl From<StackError> for Fault {
    fn from(err: StackError) -> Self {
        match err {
            StackError::Overflow { .. } => Self::Overflow,
            StackError::Underflow => Self::Underflow,
            StackError::OutOfRange { .. } => Self::OutOfRange,
        }
    }
}

impl From<DecodeError> for Fault {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::UndefinedOpcode { byte, .. } => Self::UndefinedOpcode(byte),
            DecodeError::Truncated { .. } | DecodeError::EndOfProgram(_) => Self::Truncated,
        }
    }
}

/// A failed run.
///
/// `stack` holds whatever was on the value stack when the failing
/// instruction was reached, drained top first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} at offset {offset}: {fault}", subject(.opcode))]
pub struct RuntimeError {
    /// Failing instruction; `None` for decode failures and fuel exhaustion.
    pub opcode: Option<Opcode>,
    pub fault: Fault,
    /// Byte offset of the failing instruction.
    pub offset: usize,
    pub stack: Vec<i32>,
}

impl RuntimeError {
    /// Composite status code: `(opcode << 8) | reason`.
    pub fn code(&self) -> u16 {
        let opcode = self.opcode.map_or(0, Opcode::as_u8);
        (u16::from(opcode) << 8) | u16::from(self.fault.reason())
    }
}

fn subject(opcode: &Option<Opcode>) -> String {
    match opcode {
        Some(op) => format!("`{op}`"),
        None => "instruction".to_string(),
    }
}
