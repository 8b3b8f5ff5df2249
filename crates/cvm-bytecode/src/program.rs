//! Bounded bytecode buffer.
//!
//! A [`Program`] is a flat instruction stream with no header: its length is
//! the only framing. Loading rejects streams larger than the code memory.

use std::ops::Deref;

use crate::instruction::{DecodeError, Instruction};
use crate::opcode::InstructionSet;

/// Default code memory size in bytes.
pub const CODE_MEMORY: usize = 4096;

/// Program load error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("program too large: {size} bytes (code memory holds {limit})")]
    TooLarge { size: usize, limit: usize },
}

/// An immutable, size-checked instruction stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    bytes: Vec<u8>,
}

impl Deref for Program {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.bytes
    }
}

impl Program {
    /// Load a program into the default code memory.
    pub fn load(bytes: &[u8]) -> Result<Self, LoadError> {
        Self::load_with_limit(bytes, CODE_MEMORY)
    }

    /// Load a program into a code memory of `limit` bytes.
    pub fn load_with_limit(bytes: &[u8], limit: usize) -> Result<Self, LoadError> {
        Self::from_vec(bytes.to_vec(), limit)
    }

    /// Take ownership of `bytes`, checking them against `limit`.
    pub fn from_vec(bytes: Vec<u8>, limit: usize) -> Result<Self, LoadError> {
        if bytes.len() > limit {
            return Err(LoadError::TooLarge {
                size: bytes.len(),
                limit,
            });
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Decode the instruction at `offset`.
    #[inline]
    pub fn decode_at(&self, offset: usize, set: InstructionSet) -> Result<Instruction, DecodeError> {
        Instruction::decode(&self.bytes, offset, set)
    }

    /// Iterate over instructions in layout order.
    ///
    /// The iterator yields the first decode error and then stops.
    pub fn instructions(&self, set: InstructionSet) -> Instructions<'_> {
        Instructions {
            code: &self.bytes,
            offset: 0,
            set,
            failed: false,
        }
    }
}

impl From<Program> for Vec<u8> {
    fn from(program: Program) -> Self {
        program.bytes
    }
}

/// Sequential decoder over a program, yielding `(offset, instruction)`.
#[derive(Clone, Debug)]
pub struct Instructions<'a> {
    code: &'a [u8],
    offset: usize,
    set: InstructionSet,
    failed: bool,
}

impl Iterator for Instructions<'_> {
    type Item = Result<(usize, Instruction), DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.code.len() {
            return None;
        }

        let offset = self.offset;
        match Instruction::decode(self.code, offset, self.set) {
            Ok(instr) => {
                self.offset += instr.size();
                Some(Ok((offset, instr)))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
