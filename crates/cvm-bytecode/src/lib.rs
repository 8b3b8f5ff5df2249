//! Bytecode format for the cvm stack machine.
//!
//! This crate contains:
//! - The opcode catalog (mnemonics, byte codes, encoded widths)
//! - Big-endian immediate encoding
//! - Instruction decoding/encoding and the bounded [`Program`] buffer
//! - A human-readable disassembler

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod codec;
pub mod dump;
pub mod instruction;
pub mod opcode;
pub mod program;

#[cfg(test)]
mod codec_tests;
#[cfg(test)]
mod dump_tests;

// Re-export commonly used items at crate root
pub use codec::{IMMEDIATE_SIZE, decode_i32, encode_i32, read_i32};
pub use dump::dump;
pub use instruction::{BinaryOp, Comparison, DecodeError, Instruction, Operand, StoreOperands};
pub use opcode::{InstructionSet, LABEL_MNEMONIC, Mnemonic, OpEntry, Opcode, lookup_mnemonic};
pub use program::{CODE_MEMORY, Instructions, LoadError, Program};
