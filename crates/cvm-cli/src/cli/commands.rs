//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("cvm")
        .about("Assemble and run programs for a tiny stack machine")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(build_command())
        .subcommand(check_command())
        .subcommand(run_command())
        .subcommand(dump_command())
        .subcommand(trace_command())
}

/// Machine flags shared by `run` and `trace`.
fn with_machine_args(cmd: Command) -> Command {
    cmd.arg(main_set_arg())
        .arg(stack_arg())
        .arg(fuel_arg())
        .arg(color_arg())
}

/// Assemble a source file into bytecode.
pub fn build_command() -> Command {
    Command::new("build")
        .about("Assemble a source file into bytecode")
        .after_help(
            r#"EXAMPLES:
  cvm build main.vms                 # writes main.vme
  cvm build main.vms -o out.vme
  cvm build main.vms --main-set      # reject extended instructions"#,
        )
        .arg(source_path_arg())
        .arg(output_arg())
        .arg(main_set_arg())
        .arg(color_arg())
}

/// Validate a source file without writing anything.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Validate a source file")
        .after_help(
            r#"EXAMPLES:
  cvm check main.vms
  cvm check main.vms --main-set"#,
        )
        .arg(source_path_arg())
        .arg(main_set_arg())
        .arg(color_arg())
}

/// Run a program and print the residual stack.
pub fn run_command() -> Command {
    let cmd = Command::new("run")
        .about("Run a program and print the residual stack")
        .after_help(
            r#"EXAMPLES:
  cvm run main.vme                   # run bytecode
  cvm run main.vms 2 3               # assemble, then run with 2 and 3 on the stack
  cvm run main.vme --fuel 10000      # bound the number of executed instructions"#,
        )
        .arg(program_path_arg())
        .arg(stack_args_arg());

    with_machine_args(cmd)
}

/// Show a disassembly listing.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Show the disassembly of a program")
        .after_help(
            r#"EXAMPLES:
  cvm dump main.vms
  cvm dump main.vme"#,
        )
        .arg(program_path_arg())
        .arg(main_set_arg())
        .arg(color_arg())
}

/// Run a program, printing every executed instruction.
pub fn trace_command() -> Command {
    let cmd = Command::new("trace")
        .about("Trace program execution for debugging")
        .after_help(
            r#"EXAMPLES:
  cvm trace main.vms
  cvm trace main.vme 5 --fuel 200"#,
        )
        .arg(program_path_arg())
        .arg(stack_args_arg());

    with_machine_args(cmd)
}
