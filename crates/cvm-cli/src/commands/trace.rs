//! Trace program execution for debugging.

use std::path::PathBuf;

use cvm_lib::PrintTracer;

use super::program_loader::{exit_with, load_program};
use super::run::{MachineArgs, format_execution, format_failure};

pub struct TraceArgs {
    pub program_path: PathBuf,
    pub args: Vec<i32>,
    pub machine: MachineArgs,
    pub color: bool,
}

pub fn run(args: TraceArgs) {
    let vm = args.machine.build_vm();
    let program =
        load_program(&args.program_path, &vm, args.color).unwrap_or_else(|e| exit_with(e));

    let mut tracer = PrintTracer::new();
    let result = vm.run_with(&program, &args.args, &mut tracer);
    tracer.print();
    println!("---");

    match result {
        Ok(execution) => println!("{}", format_execution(&execution)),
        Err(e) => {
            eprintln!("{}", format_failure(&e));
            std::process::exit(2);
        }
    }
}
