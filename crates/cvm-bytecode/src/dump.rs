//! Human-readable program listing.
//!
//! One line per instruction: zero-padded byte offset, then the instruction
//! in assembly syntax. Label names are gone after assembly, so jump targets
//! print as raw offsets.

use std::fmt::Write as _;

use crate::instruction::DecodeError;
use crate::opcode::InstructionSet;
use crate::program::Program;

/// Width of the offset column.
fn offset_width(len: usize) -> usize {
    len.max(1).to_string().len().max(4)
}

/// Generate a listing of `program`.
///
/// Decoding stops at the first undecodable byte, which is listed as
/// `<undefined 0xNN>` or `<truncated mnemonic>`.
pub fn dump(program: &Program, set: InstructionSet) -> String {
    let mut out = String::new();
    let width = offset_width(program.len());

    for item in program.instructions(set) {
        match item {
            Ok((offset, instr)) => {
                writeln!(out, "{offset:0width$}  {instr}").expect("String write never fails");
            }
            Err(DecodeError::UndefinedOpcode { offset, byte }) => {
                writeln!(out, "{offset:0width$}  <undefined 0x{byte:02X}>")
                    .expect("String write never fails");
            }
            Err(DecodeError::Truncated { offset, opcode }) => {
                writeln!(out, "{offset:0width$}  <truncated {opcode}>")
                    .expect("String write never fails");
            }
            Err(DecodeError::EndOfProgram(_)) => {}
        }
    }

    out
}
