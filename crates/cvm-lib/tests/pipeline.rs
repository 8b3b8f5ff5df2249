//! End-to-end tests: source in, execution result out.

use cvm_lib::{
    Assembler, DiagnosticKind, Error, Fault, InstructionSet, LoadError, Opcode, PrintTracer, Vm,
    compile, dump, run,
};
use indoc::indoc;

#[test]
fn compile_then_run() {
    let program = compile("push 2\npush 3\nadd\npop").unwrap();
    let result = run(&program, &[]).unwrap();

    assert_eq!(result.last_popped, Some(5));
    assert!(result.values.is_empty());
}

#[test]
fn repeated_runs_agree() {
    let program = compile(indoc! {"
        push 1
        label again
        push 2
        mul
        load $-1
        push 64
        jl again
    "})
    .unwrap();

    let first = run(&program, &[]).unwrap();
    for _ in 0..3 {
        assert_eq!(run(&program, &[]).unwrap(), first);
    }
    assert_eq!(first.values, vec![64]);
}

#[test]
fn forward_and_backward_labels_resolve_alike() {
    let forward = compile("jmp end\nlabel end\nhlt").unwrap();
    let backward = compile("jmp over\nlabel end\nhlt\nlabel over\njmp end").unwrap();

    assert_eq!(&forward[..5], &[0x21, 0, 0, 0, 5]);
    assert_eq!(&backward[6..], &[0x21, 0, 0, 0, 5]);
}

#[test]
fn arguments_feed_the_program() {
    let program = compile("sub\npop").unwrap();
    assert_eq!(run(&program, &[10, 4]).unwrap().last_popped, Some(6));
}

#[test]
fn compile_error_lists_every_problem() {
    let err = compile(indoc! {"
        push
        frob 1
        label 42
    "})
    .unwrap_err();

    let Error::Compile(err) = err else {
        panic!("expected a compile error, got {err:?}");
    };
    assert_eq!(
        err.diagnostics().kinds(),
        vec![
            DiagnosticKind::MissingArgument,
            DiagnosticKind::UnknownInstruction,
            DiagnosticKind::InvalidLabel,
        ]
    );
    assert_eq!(err.to_string(), "assembly failed with 3 error(s)");
}

#[test]
fn oversized_bytecode_fails_to_load() {
    let bytes = vec![0x1E; 4097];
    assert_eq!(
        run(&bytes, &[]),
        Err(Error::Load(LoadError::TooLarge {
            size: 4097,
            limit: 4096
        }))
    );
}

#[test]
fn runtime_error_carries_code() {
    let program = compile("push 1\npop\npop").unwrap();
    let err = run(&program, &[]).unwrap_err();

    assert_eq!(err.runtime_code(), Some(0x0B01));
    assert_eq!(err.to_string(), "`pop` at offset 6: stack underflow");

    let Error::Runtime(err) = err else {
        panic!("expected a runtime error");
    };
    assert_eq!(err.opcode, Some(Opcode::Pop));
    assert_eq!(err.fault, Fault::Underflow);
}

#[test]
fn main_set_end_to_end() {
    let assembler = Assembler::new(InstructionSet::Main);
    let err = assembler.assemble("push 2\npush 3\nmul").unwrap_err();
    assert_eq!(
        err.diagnostics().kinds(),
        vec![DiagnosticKind::UnknownInstruction]
    );

    let program = assembler.assemble("push 2\npush 3\nadd\npop").unwrap();
    let vm = Vm::builder().instruction_set(InstructionSet::Main).build();
    assert_eq!(vm.run(&program, &[]).unwrap().last_popped, Some(5));
}

#[test]
fn configured_vm_with_fuel() {
    let program = compile("label spin\njmp spin").unwrap();
    let vm = Vm::builder().exec_fuel(100).build();

    let err = vm.run(&program, &[]).unwrap_err();
    assert_eq!(err.fault, Fault::FuelExhausted);
    assert_eq!(err.code(), 0x00FD);
}

#[test]
fn disassembly_of_compiled_program() {
    let program = compile(indoc! {"
        push 10       ; counter
        label loop
        push 1
        sub
        load $-1
        push 0
        jg loop
        hlt
    "})
    .unwrap();

    insta::assert_snapshot!(dump(&program, InstructionSet::Extended), @r"
    0000  push 10
    0005  push 1
    0010  sub
    0011  load $-1
    0016  push 0
    0021  jg 5
    0026  hlt
    ");
}

#[test]
fn trace_of_compiled_program() {
    let program = compile("push 1\njmp end\npush 2\nlabel end\nhlt").unwrap();
    let mut tracer = PrintTracer::new();
    let result = Vm::default().run_with(&program, &[], &mut tracer).unwrap();

    assert_eq!(result.values, vec![1]);
    insta::assert_snapshot!(tracer.render(), @r"
    0000  push 1          [0]
    0005  jmp 15          [1]
          -> 0015
    0015  hlt             [1]
          halt
    ");
}
