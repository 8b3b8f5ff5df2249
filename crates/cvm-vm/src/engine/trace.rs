//! Tracing infrastructure for debugging VM execution.
//!
//! The tracer is a zero-cost abstraction: `NoopTracer` methods are
//! `#[inline(always)]` empty functions, so a plain [`Vm::run`](super::Vm::run)
//! carries no tracing overhead. `PrintTracer` collects one line per executed
//! instruction plus sub-lines for control transfers and faults.

use cvm_bytecode::Instruction;

use super::error::RuntimeError;

/// Tracer trait for VM execution instrumentation.
///
/// Each method is called at a specific point during execution:
/// - `trace_instruction` - after decoding, before executing
/// - `trace_jump` - when a jump or a taken branch moves the instruction pointer
/// - `trace_call` - when `call` transfers control
/// - `trace_return` - when `ret` transfers control
/// - `trace_halt` - when `hlt` stops the run
/// - `trace_fault` - when an instruction fails
pub trait Tracer {
    /// Called before executing an instruction. `depth` is the stack size.
    fn trace_instruction(&mut self, offset: usize, instr: &Instruction, depth: usize);

    fn trace_jump(&mut self, target: usize);

    fn trace_call(&mut self, target: usize, return_to: usize);

    fn trace_return(&mut self, target: usize);

    fn trace_halt(&mut self);

    fn trace_fault(&mut self, error: &RuntimeError);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_instruction(&mut self, _offset: usize, _instr: &Instruction, _depth: usize) {}

    #[inline(always)]
    fn trace_jump(&mut self, _target: usize) {}

    #[inline(always)]
    fn trace_call(&mut self, _target: usize, _return_to: usize) {}

    #[inline(always)]
    fn trace_return(&mut self, _target: usize) {}

    #[inline(always)]
    fn trace_halt(&mut self) {}

    #[inline(always)]
    fn trace_fault(&mut self, _error: &RuntimeError) {}
}

/// Width of the instruction column.
const INSTR_COL: usize = 16;

/// Tracer that collects execution trace for debugging.
#[derive(Debug, Default)]
pub struct PrintTracer {
    lines: Vec<String>,
}

impl PrintTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines joined with newlines.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    pub fn print(&self) {
        for line in &self.lines {
            println!("{}", line);
        }
    }

    fn sub_line(&mut self, content: String) {
        self.lines.push(format!("      {content}"));
    }
}

impl Tracer for PrintTracer {
    fn trace_instruction(&mut self, offset: usize, instr: &Instruction, depth: usize) {
        let instr = instr.to_string();
        self.lines
            .push(format!("{offset:04}  {instr:<INSTR_COL$}[{depth}]"));
    }

    fn trace_jump(&mut self, target: usize) {
        self.sub_line(format!("-> {target:04}"));
    }

    fn trace_call(&mut self, target: usize, return_to: usize) {
        self.sub_line(format!("call {target:04}, return to {return_to:04}"));
    }

    fn trace_return(&mut self, target: usize) {
        self.sub_line(format!("ret -> {target:04}"));
    }

    fn trace_halt(&mut self) {
        self.sub_line("halt".to_string());
    }

    fn trace_fault(&mut self, error: &RuntimeError) {
        self.sub_line(format!("fault: {error} (code 0x{:04X})", error.code()));
    }
}
