use std::path::PathBuf;

use cvm_lib::InstructionSet;

use super::program_loader::{InputError, assemble_file, exit_with};

/// Output path when `-o` is not given.
pub const DEFAULT_OUTPUT: &str = "main.vme";

pub struct BuildArgs {
    pub source_path: PathBuf,
    pub output: PathBuf,
    pub set: InstructionSet,
    pub color: bool,
}

pub fn run(args: BuildArgs) {
    let program =
        assemble_file(&args.source_path, args.set, args.color).unwrap_or_else(|e| exit_with(e));

    if let Err(source) = std::fs::write(&args.output, program.as_bytes()) {
        exit_with(InputError::Write {
            path: args.output,
            source,
        });
    }
}
