use crate::dump::dump;
use crate::opcode::InstructionSet;
use crate::program::Program;

#[test]
fn dump_arithmetic() {
    let program = Program::load(&[0x0A, 0, 0, 0, 2, 0x0A, 0, 0, 0, 3, 0x0C, 0x0B, 0x1E]).unwrap();
    insta::assert_snapshot!(dump(&program, InstructionSet::Main), @r"
    0000  push 2
    0005  push 3
    0010  add
    0011  pop
    0012  hlt
    ");
}

#[test]
fn dump_immediate_forms() {
    let program = Program::load(&[
        0x2B, 0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF, // store $0 $-1
        0x2C, 0xFF, 0xFF, 0xFF, 0xFE, // load $-2
        0x21, 0, 0, 0, 0, // jmp 0
        0xD1,
    ])
    .unwrap();
    insta::assert_snapshot!(dump(&program, InstructionSet::Main), @r"
    0000  store $0 $-1
    0009  load $-2
    0014  jmp 0
    0019  jmp
    ");
}

#[test]
fn dump_stops_at_undefined() {
    let program = Program::load(&[0x0B, 0xA0, 0x0B]).unwrap();
    insta::assert_snapshot!(dump(&program, InstructionSet::Main), @r"
    0000  pop
    0001  <undefined 0xA0>
    ");
}

#[test]
fn dump_truncated() {
    let program = Program::load(&[0x0A, 0, 0]).unwrap();
    insta::assert_snapshot!(dump(&program, InstructionSet::Extended), @"0000  <truncated push>");
}
