//! Reading sources and programs from disk.

use std::path::{Path, PathBuf};

use cvm_lib::{Assembler, CompileError, InstructionSet, LoadError, Program, Vm};

/// Extension of assembled bytecode files.
pub const BYTECODE_EXTENSION: &str = "vme";

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8", path.display())]
    NotUtf8 { path: PathBuf },

    /// Assembly failed; `rendered` holds the annotated diagnostics.
    #[error("{rendered}")]
    Compile {
        rendered: String,
        source: CompileError,
    },

    #[error("cannot load {}: {source}", path.display())]
    Load { path: PathBuf, source: LoadError },
}

/// Whether `path` names assembled bytecode rather than source.
pub fn is_bytecode(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == BYTECODE_EXTENSION)
}

pub fn read_source(path: &Path) -> Result<String, InputError> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).map_err(|_| InputError::NotUtf8 {
        path: path.to_path_buf(),
    })
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, InputError> {
    std::fs::read(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Assemble the source file at `path`, rendering diagnostics on failure.
pub fn assemble_file(path: &Path, set: InstructionSet, color: bool) -> Result<Program, InputError> {
    let source = read_source(path)?;
    Assembler::new(set)
        .assemble(&source)
        .map_err(|err| compile_error(err, &source, path, color))
}

fn compile_error(err: CompileError, source: &str, path: &Path, color: bool) -> InputError {
    let name = path.display().to_string();
    let rendered = err
        .diagnostics()
        .printer()
        .source(source)
        .path(&name)
        .colored(color)
        .render();
    InputError::Compile {
        rendered,
        source: err,
    }
}

/// Load the program at `path` for `vm`: bytecode is read as is, anything
/// else is assembled with the VM's instruction set.
pub fn load_program(path: &Path, vm: &Vm, color: bool) -> Result<Program, InputError> {
    if !is_bytecode(path) {
        return assemble_file(path, vm.instruction_set(), color);
    }

    let bytes = read_bytes(path)?;
    vm.load(&bytes).map_err(|source| InputError::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// Print `err` to stderr and exit with status 1.
pub fn exit_with(err: InputError) -> ! {
    match err {
        InputError::Compile { rendered, .. } => eprintln!("{rendered}"),
        other => eprintln!("error: {other}"),
    }
    std::process::exit(1);
}
