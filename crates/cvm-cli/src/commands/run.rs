//! Run a program and report the residual stack.

use std::path::PathBuf;

use cvm_lib::{Execution, InstructionSet, RuntimeError, Vm};

use super::program_loader::{exit_with, load_program};

/// Machine configuration shared by `run` and `trace`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MachineArgs {
    pub set: InstructionSet,
    pub stack_capacity: usize,
    pub fuel: Option<u32>,
}

impl MachineArgs {
    pub fn build_vm(&self) -> Vm {
        let builder = Vm::builder()
            .instruction_set(self.set)
            .stack_capacity(self.stack_capacity);
        match self.fuel {
            Some(fuel) => builder.exec_fuel(fuel).build(),
            None => builder.build(),
        }
    }
}

pub struct RunArgs {
    pub program_path: PathBuf,
    pub args: Vec<i32>,
    pub machine: MachineArgs,
    pub color: bool,
}

pub fn run(args: RunArgs) {
    let vm = args.machine.build_vm();
    let program =
        load_program(&args.program_path, &vm, args.color).unwrap_or_else(|e| exit_with(e));

    match vm.run(&program, &args.args) {
        Ok(execution) => println!("{}", format_execution(&execution)),
        Err(e) => {
            eprintln!("{}", format_failure(&e));
            std::process::exit(2);
        }
    }
}

/// Render a successful run: residual stack (top first), last popped value, step count.
pub fn format_execution(execution: &Execution) -> String {
    let mut out = format!("stack: {}", format_values(&execution.values));
    if let Some(value) = execution.last_popped {
        out.push_str(&format!("\npopped: {value}"));
    }
    out.push_str(&format!("\nsteps: {}", execution.steps));
    out
}

/// Render a failed run with its composite code and the drained stack.
pub fn format_failure(err: &RuntimeError) -> String {
    format!(
        "runtime error: {err} (code 0x{:04X})\nstack: {}",
        err.code(),
        format_values(&err.stack)
    )
}

fn format_values(values: &[i32]) -> String {
    if values.is_empty() {
        return "(empty)".to_string();
    }
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
