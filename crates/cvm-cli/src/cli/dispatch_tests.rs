//! Tests for CLI dispatch logic.
//!
//! These tests verify:
//! 1. Params extraction: correct fields are extracted from ArgMatches
//! 2. Defaults: output path, stack capacity, unlimited fuel
//! 3. Trailing stack arguments, including negative numbers

use std::path::PathBuf;

use cvm_lib::InstructionSet;

use super::*;
use crate::cli::commands::{
    build_command, check_command, dump_command, run_command, trace_command,
};
use crate::commands::build::BuildArgs;
use crate::commands::run::{MachineArgs, RunArgs};
use crate::commands::trace::TraceArgs;

#[test]
fn build_defaults_output() {
    let m = build_command()
        .try_get_matches_from(["build", "main.vms"])
        .unwrap();
    let args: BuildArgs = BuildParams::from_matches(&m).into();

    assert_eq!(args.source_path, PathBuf::from("main.vms"));
    assert_eq!(args.output, PathBuf::from("main.vme"));
    assert_eq!(args.set, InstructionSet::Extended);
}

#[test]
fn build_with_output_and_main_set() {
    let m = build_command()
        .try_get_matches_from(["build", "main.vms", "-o", "out.vme", "--main-set"])
        .unwrap();
    let args: BuildArgs = BuildParams::from_matches(&m).into();

    assert_eq!(args.output, PathBuf::from("out.vme"));
    assert_eq!(args.set, InstructionSet::Main);
}

#[test]
fn build_requires_source() {
    let result = build_command().try_get_matches_from(["build"]);
    assert!(result.is_err());
}

#[test]
fn check_extracts_source() {
    let m = check_command()
        .try_get_matches_from(["check", "prog.vms", "--color", "never"])
        .unwrap();
    let params = CheckParams::from_matches(&m);

    assert_eq!(params.source_path, PathBuf::from("prog.vms"));
    assert_eq!(params.color, ColorChoice::Never);
    assert!(!params.main_set);
}

#[test]
fn run_defaults() {
    let m = run_command()
        .try_get_matches_from(["run", "main.vme"])
        .unwrap();
    let args: RunArgs = RunParams::from_matches(&m).into();

    assert_eq!(args.program_path, PathBuf::from("main.vme"));
    assert!(args.args.is_empty());
    assert_eq!(
        args.machine,
        MachineArgs {
            set: InstructionSet::Extended,
            stack_capacity: 1024,
            fuel: None,
        }
    );
}

#[test]
fn run_collects_stack_arguments() {
    let m = run_command()
        .try_get_matches_from(["run", "main.vme", "2", "-3", "--fuel", "500", "--stack", "16"])
        .unwrap();
    let args: RunArgs = RunParams::from_matches(&m).into();

    assert_eq!(args.args, vec![2, -3]);
    assert_eq!(args.machine.fuel, Some(500));
    assert_eq!(args.machine.stack_capacity, 16);
}

#[test]
fn run_rejects_non_integer_arguments() {
    let result = run_command().try_get_matches_from(["run", "main.vme", "two"]);
    assert!(result.is_err());
}

#[test]
fn trace_accepts_run_flags() {
    let m = trace_command()
        .try_get_matches_from(["trace", "main.vms", "7", "--main-set", "--fuel", "10"])
        .unwrap();
    let args: TraceArgs = TraceParams::from_matches(&m).into();

    assert_eq!(args.program_path, PathBuf::from("main.vms"));
    assert_eq!(args.args, vec![7]);
    assert_eq!(args.machine.set, InstructionSet::Main);
    assert_eq!(args.machine.fuel, Some(10));
}

#[test]
fn dump_extracts_program() {
    let m = dump_command()
        .try_get_matches_from(["dump", "main.vme", "--main-set"])
        .unwrap();
    let params = DumpParams::from_matches(&m);

    assert_eq!(params.program_path, PathBuf::from("main.vme"));
    assert!(params.main_set);
}

#[test]
fn dump_rejects_machine_flags() {
    let result = dump_command().try_get_matches_from(["dump", "main.vme", "--fuel", "5"]);
    assert!(result.is_err());
}

#[test]
fn cli_requires_subcommand() {
    let result = build_cli().try_get_matches_from(["cvm"]);
    assert!(result.is_err());
}
