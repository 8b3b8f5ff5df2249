//! Runtime VM for executing cvm bytecode.
//!
//! This crate provides the bounded value stack and the fetch-decode-execute
//! engine that runs a [`Program`](cvm_bytecode::Program) against it.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod engine;
pub mod stack;


// Re-export commonly used items at crate root
pub use engine::{
    Execution, Fault, FuelLimits, NoopTracer, PrintTracer, RuntimeError, Tracer, Vm, VmBuilder,
};
pub use stack::{STACK_CAPACITY, StackError, ValueStack};
