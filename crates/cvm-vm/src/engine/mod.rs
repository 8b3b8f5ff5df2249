//! Runtime engine for executing assembled cvm programs.
//!
//! The VM runs bytecode against a bounded value stack, producing either the
//! residual stack or a [`RuntimeError`] with a composite status code.

mod error;
mod trace;
mod vm;


pub use error::{Fault, RuntimeError};
pub use trace::{NoopTracer, PrintTracer, Tracer};
pub use vm::{Execution, FuelLimits, Vm, VmBuilder};
