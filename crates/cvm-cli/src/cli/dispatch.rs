//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! This module contains:
//! - `*Params` structs populated from clap matches
//! - `from_matches()` extractors
//! - `Into<*Args>` impls to bridge dispatch → command handlers

use std::path::PathBuf;

use clap::ArgMatches;
use cvm_lib::{InstructionSet, STACK_CAPACITY};

use super::ColorChoice;
use crate::commands::build::{BuildArgs, DEFAULT_OUTPUT};
use crate::commands::check::CheckArgs;
use crate::commands::dump::DumpArgs;
use crate::commands::run::{MachineArgs, RunArgs};
use crate::commands::trace::TraceArgs;

pub struct BuildParams {
    pub source_path: PathBuf,
    pub output: Option<PathBuf>,
    pub main_set: bool,
    pub color: ColorChoice,
}

impl BuildParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: required_path(m, "source_path"),
            output: m.get_one::<PathBuf>("output").cloned(),
            main_set: m.get_flag("main_set"),
            color: parse_color(m),
        }
    }
}

impl From<BuildParams> for BuildArgs {
    fn from(p: BuildParams) -> Self {
        Self {
            source_path: p.source_path,
            output: p.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            set: instruction_set(p.main_set),
            color: p.color.should_colorize(),
        }
    }
}

pub struct CheckParams {
    pub source_path: PathBuf,
    pub main_set: bool,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            source_path: required_path(m, "source_path"),
            main_set: m.get_flag("main_set"),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            source_path: p.source_path,
            set: instruction_set(p.main_set),
            color: p.color.should_colorize(),
        }
    }
}

pub struct DumpParams {
    pub program_path: PathBuf,
    pub main_set: bool,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            program_path: required_path(m, "program_path"),
            main_set: m.get_flag("main_set"),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            program_path: p.program_path,
            set: instruction_set(p.main_set),
            color: p.color.should_colorize(),
        }
    }
}

pub struct RunParams {
    pub program_path: PathBuf,
    pub args: Vec<i32>,
    pub main_set: bool,
    pub stack: usize,
    pub fuel: Option<u32>,
    pub color: ColorChoice,
}

impl RunParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            program_path: required_path(m, "program_path"),
            args: stack_args(m),
            main_set: m.get_flag("main_set"),
            stack: m.get_one::<usize>("stack").copied().unwrap_or(STACK_CAPACITY),
            fuel: m.get_one::<u32>("fuel").copied(),
            color: parse_color(m),
        }
    }

    fn machine(&self) -> MachineArgs {
        MachineArgs {
            set: instruction_set(self.main_set),
            stack_capacity: self.stack,
            fuel: self.fuel,
        }
    }
}

impl From<RunParams> for RunArgs {
    fn from(p: RunParams) -> Self {
        Self {
            machine: p.machine(),
            program_path: p.program_path,
            args: p.args,
            color: p.color.should_colorize(),
        }
    }
}

/// Same flags as `run`.
pub struct TraceParams(pub RunParams);

impl TraceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self(RunParams::from_matches(m))
    }
}

impl From<TraceParams> for TraceArgs {
    fn from(TraceParams(p): TraceParams) -> Self {
        Self {
            machine: p.machine(),
            program_path: p.program_path,
            args: p.args,
            color: p.color.should_colorize(),
        }
    }
}

/// Positionals marked `required(true)`; clap rejects the command line without them.
fn required_path(m: &ArgMatches, id: &str) -> PathBuf {
    m.get_one::<PathBuf>(id)
        .cloned()
        .unwrap_or_default()
}

fn stack_args(m: &ArgMatches) -> Vec<i32> {
    m.get_many::<i32>("args")
        .map(|values| values.copied().collect())
        .unwrap_or_default()
}

fn instruction_set(main_set: bool) -> InstructionSet {
    if main_set {
        InstructionSet::Main
    } else {
        InstructionSet::Extended
    }
}

/// Parse --color flag into ColorChoice.
fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
