//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands,
//! so `run` and `trace` share one definition of the machine flags.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Assembly source file (positional).
pub fn source_path_arg() -> Arg {
    Arg::new("source_path")
        .value_name("SOURCE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Assembly source file")
}

/// Program to load (positional): bytecode for `.vme`, assembly otherwise.
pub fn program_path_arg() -> Arg {
    Arg::new("program_path")
        .value_name("PROGRAM")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Program file (.vme bytecode, anything else is assembled first)")
}

/// Integers pre-loaded onto the stack (trailing positionals).
pub fn stack_args_arg() -> Arg {
    Arg::new("args")
        .value_name("ARGS")
        .num_args(0..)
        .allow_negative_numbers(true)
        .value_parser(value_parser!(i32))
        .help("Integers pushed onto the stack before the run, bottom first")
}

/// Bytecode output path (-o/--output).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Bytecode output file [default: main.vme]")
}

/// Restrict to the main instruction set (--main-set).
pub fn main_set_arg() -> Arg {
    Arg::new("main_set")
        .long("main-set")
        .action(ArgAction::SetTrue)
        .help("Reject extended instructions (mul, div, allc, ...)")
}

/// Value stack capacity (--stack).
pub fn stack_arg() -> Arg {
    Arg::new("stack")
        .long("stack")
        .value_name("N")
        .default_value("1024")
        .value_parser(value_parser!(usize))
        .help("Value stack capacity")
}

/// Execution fuel limit (--fuel).
pub fn fuel_arg() -> Arg {
    Arg::new("fuel")
        .long("fuel")
        .value_name("N")
        .value_parser(value_parser!(u32))
        .help("Execution fuel limit (unlimited if not specified)")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}
