use std::path::PathBuf;

use cvm_lib::InstructionSet;

use super::program_loader::{assemble_file, exit_with};

pub struct CheckArgs {
    pub source_path: PathBuf,
    pub set: InstructionSet,
    pub color: bool,
}

pub fn run(args: CheckArgs) {
    if let Err(e) = assemble_file(&args.source_path, args.set, args.color) {
        exit_with(e);
    }

    // Silent on success (like cargo check)
}
