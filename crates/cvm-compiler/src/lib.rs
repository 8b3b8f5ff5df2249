//! Assembler for the cvm stack machine.
//!
//! This crate provides the compilation pipeline from mnemonic source to
//! bytecode:
//! - `lexer` - line-oriented tokenizer (comments stripped)
//! - `symbol_table` - label name to offset map
//! - `assembler` - two-pass layout and emission
//! - `diagnostics` - error collection and rendering

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod assembler;
pub mod diagnostics;
pub mod lexer;
pub mod symbol_table;

#[cfg(test)]
mod lexer_tests;
#[cfg(test)]
mod symbol_table_tests;

pub use assembler::Assembler;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, DiagnosticsPrinter};
pub use symbol_table::SymbolTable;

/// Assembly failed; carries every error found by the failing pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("assembly failed with {} error(s)", .0.len())]
pub struct CompileError(pub Diagnostics);

impl CompileError {
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.0
    }
}

/// Result type for assembly.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Assemble `source` with the default configuration.
pub fn assemble(source: &str) -> Result<cvm_bytecode::Program> {
    Assembler::default().assemble(source)
}
