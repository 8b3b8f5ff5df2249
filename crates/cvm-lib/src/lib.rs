//! cvm: a tiny stack-machine assembler and virtual machine.
//!
//! # Example
//!
//! ```
//! let program = cvm_lib::compile("push 2\npush 3\nadd\npop").unwrap();
//! let result = cvm_lib::run(&program, &[]).unwrap();
//! assert_eq!(result.last_popped, Some(5));
//! ```
//!
//! For configured compiles and runs use [`Assembler`] and [`Vm::builder`].

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub use cvm_bytecode::{
    CODE_MEMORY, Instruction, InstructionSet, LoadError, Opcode, Program, dump,
};
pub use cvm_compiler::{Assembler, CompileError, Diagnostic, DiagnosticKind, Diagnostics};
pub use cvm_vm::{
    Execution, Fault, FuelLimits, NoopTracer, PrintTracer, RuntimeError, STACK_CAPACITY, Tracer,
    Vm, VmBuilder,
};

/// Errors from compiling, loading or running a program.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// Composite status code of a runtime failure.
    pub fn runtime_code(&self) -> Option<u16> {
        match self {
            Self::Runtime(err) => Some(err.code()),
            _ => None,
        }
    }
}

/// Result type for cvm operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Assemble `source` with the extended instruction set and default code memory.
pub fn compile(source: &str) -> Result<Program> {
    Ok(cvm_compiler::assemble(source)?)
}

/// Load `bytecode` and run it on a default VM with `args` pre-loaded, bottom first.
pub fn run(bytecode: &[u8], args: &[i32]) -> Result<Execution> {
    let vm = Vm::default();
    let program = vm.load(bytecode)?;
    Ok(vm.run(&program, args)?)
}
