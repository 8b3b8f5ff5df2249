use std::path::PathBuf;

use cvm_lib::{InstructionSet, Vm, dump};

use super::program_loader::{exit_with, load_program};

pub struct DumpArgs {
    pub program_path: PathBuf,
    pub set: InstructionSet,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let vm = Vm::builder().instruction_set(args.set).build();
    let program =
        load_program(&args.program_path, &vm, args.color).unwrap_or_else(|e| exit_with(e));

    println!("{}", dump(&program, args.set));
}
