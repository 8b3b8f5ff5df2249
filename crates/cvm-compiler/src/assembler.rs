//! Two-pass assembler.
//!
//! Pass 1 (layout) resolves mnemonics, checks argument counts and binds every
//! label to the byte offset of the next instruction. Pass 2 (emission)
//! resolves arguments against the finished symbol table and writes opcode
//! bytes plus big-endian immediates. Errors are accumulated per pass; any
//! error aborts compilation with no output.

use cvm_bytecode::{
    CODE_MEMORY, InstructionSet, LABEL_MNEMONIC, LoadError, Mnemonic, Opcode, Program,
    encode_i32, lookup_mnemonic,
};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::lexer::{Line, Token, lex};
use crate::symbol_table::SymbolTable;
use crate::{CompileError, Result};

/// Assembler configuration.
#[derive(Clone, Copy, Debug)]
pub struct Assembler {
    set: InstructionSet,
    code_memory: usize,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(InstructionSet::default())
    }
}

/// An instruction placed by the layout pass.
struct Placed<'l, 's> {
    line: &'l Line<'s>,
    opcode: Opcode,
    offset: usize,
}

impl Assembler {
    pub fn new(set: InstructionSet) -> Self {
        Self {
            set,
            code_memory: CODE_MEMORY,
        }
    }

    /// Set the code memory size. Values above `i32::MAX` are clamped so every
    /// label offset fits in an immediate.
    pub fn code_memory(mut self, bytes: usize) -> Self {
        self.code_memory = bytes.min(i32::MAX as usize);
        self
    }

    /// Assemble `source` into a program.
    pub fn assemble(&self, source: &str) -> Result<Program> {
        let lines = lex(source);
        let mut symbols = SymbolTable::new();

        let (placed, size) = self.layout(&lines, &mut symbols)?;
        let code = self.emit(&placed, size, &symbols)?;

        Program::from_vec(code, self.code_memory).map_err(|err| too_large(&placed, err))
    }

    fn layout<'l, 's>(
        &self,
        lines: &'l [Line<'s>],
        symbols: &mut SymbolTable,
    ) -> Result<(Vec<Placed<'l, 's>>, usize)> {
        let mut diagnostics = Diagnostics::new();
        let mut placed = Vec::new();
        let mut offset = 0usize;

        for line in lines {
            let mnemonic = &line.mnemonic;
            match lookup_mnemonic(mnemonic.text, self.set) {
                None => {
                    let mut report = diagnostics
                        .report(
                            DiagnosticKind::UnknownInstruction,
                            line.number,
                            mnemonic.span.clone(),
                        )
                        .message(mnemonic.text);
                    if lookup_mnemonic(mnemonic.text, InstructionSet::Extended).is_some() {
                        report = report.hint("only available in the extended instruction set");
                    }
                    report.emit();
                }
                Some(Mnemonic::Label) => {
                    declare_label(lines, line, offset, symbols, &mut diagnostics);
                }
                Some(Mnemonic::Op(entry)) => {
                    let opcode = entry.select(line.args.len());
                    if check_arity(line, opcode, &mut diagnostics) {
                        placed.push(Placed {
                            line,
                            opcode,
                            offset,
                        });
                    }
                    offset += opcode.size();
                }
            }
        }

        if !diagnostics.is_empty() {
            return Err(CompileError(diagnostics));
        }
        Ok((placed, offset))
    }

    fn emit(
        &self,
        placed: &[Placed<'_, '_>],
        size: usize,
        symbols: &SymbolTable,
    ) -> Result<Vec<u8>> {
        let mut diagnostics = Diagnostics::new();
        let mut code = Vec::with_capacity(size);

        for p in placed {
            debug_assert_eq!(code.len(), p.offset);
            code.push(p.opcode.as_u8());
            for arg in &p.line.args {
                match resolve(arg, symbols) {
                    Some(value) => code.extend_from_slice(&encode_i32(value)),
                    None => {
                        diagnostics
                            .report(
                                DiagnosticKind::InvalidArgument,
                                p.line.number,
                                arg.span.clone(),
                            )
                            .message(arg.text)
                            .emit();
                        // Placeholder keeps later instructions at their layout offsets.
                        code.extend_from_slice(&encode_i32(0));
                    }
                }
            }
        }

        if !diagnostics.is_empty() {
            return Err(CompileError(diagnostics));
        }
        Ok(code)
    }
}

fn declare_label(
    lines: &[Line<'_>],
    line: &Line<'_>,
    offset: usize,
    symbols: &mut SymbolTable,
    diagnostics: &mut Diagnostics,
) {
    let Some((name, extra)) = line.args.split_first() else {
        diagnostics
            .report(
                DiagnosticKind::InvalidLabel,
                line.number,
                line.mnemonic.span.clone(),
            )
            .message(format!("`{LABEL_MNEMONIC}` needs a name"))
            .emit();
        return;
    };

    if let Some(first) = extra.first() {
        diagnostics
            .report(
                DiagnosticKind::UnexpectedArgument,
                line.number,
                first.span.clone(),
            )
            .message(format!("`{LABEL_MNEMONIC}` takes exactly one name"))
            .emit();
    }

    if parse_integer(name.text).is_some() || name.text.bytes().all(|b| b.is_ascii_digit()) {
        diagnostics
            .report(DiagnosticKind::InvalidLabel, line.number, name.span.clone())
            .message(format!("`{}` is numeric", name.text))
            .emit();
        return;
    }

    if symbols.insert(name.text, offset) {
        let mut report = diagnostics
            .report(DiagnosticKind::DuplicateLabel, line.number, name.span.clone())
            .message(name.text);
        if let Some(first) = first_declaration(lines, name.text) {
            report = report.related_to("first defined here", first.span.clone());
        }
        report.emit();
    }
}

/// Name token of the earliest `label` line declaring `name`.
fn first_declaration<'l, 's>(lines: &'l [Line<'s>], name: &str) -> Option<&'l Token<'s>> {
    lines
        .iter()
        .filter(|l| l.mnemonic.text.eq_ignore_ascii_case(LABEL_MNEMONIC))
        .filter_map(|l| l.args.first())
        .find(|arg| arg.text == name)
}

/// Anchor a load failure at the first instruction that crosses the limit.
fn too_large(placed: &[Placed<'_, '_>], err: LoadError) -> CompileError {
    let LoadError::TooLarge { size, limit } = err;
    let mut diagnostics = Diagnostics::new();
    let first_over = placed
        .iter()
        .find(|p| p.offset + p.opcode.size() > limit)
        .or(placed.last());
    if let Some(p) = first_over {
        diagnostics
            .report(DiagnosticKind::ProgramTooLarge, p.line.number, p.line.span())
            .message(format!("{size} bytes exceed {limit} bytes of code memory"))
            .emit();
    }
    CompileError(diagnostics)
}

/// Check the argument count of `line` against `opcode`. Returns `true` when it matches.
fn check_arity(line: &Line<'_>, opcode: Opcode, diagnostics: &mut Diagnostics) -> bool {
    let expected = opcode.immediates();
    let found = line.args.len();
    let name = opcode.mnemonic();

    if found < expected {
        diagnostics
            .report(DiagnosticKind::MissingArgument, line.number, line.span())
            .message(format!("`{name}` takes {}, found {found}", arguments(expected)))
            .emit();
        return false;
    }

    if let Some(extra) = line.args.get(expected) {
        diagnostics
            .report(DiagnosticKind::UnexpectedArgument, line.number, extra.span.clone())
            .message(format!("`{name}` takes {}", arguments(expected)))
            .emit();
        return false;
    }

    true
}

fn arguments(n: usize) -> String {
    match n {
        0 => "no arguments".to_string(),
        1 => "1 argument".to_string(),
        n => format!("{n} arguments"),
    }
}

/// Resolve an argument: a declared label yields its offset, anything else
/// must be an integer literal.
fn resolve(arg: &Token<'_>, symbols: &SymbolTable) -> Option<i32> {
    match symbols.lookup(arg.text) {
        Some(offset) => i32::try_from(offset).ok(),
        None => parse_integer(arg.text),
    }
}

/// Parse a signed decimal literal, with an optional leading `$`.
pub fn parse_integer(text: &str) -> Option<i32> {
    let digits = text.strip_prefix('$').unwrap_or(text);
    digits.parse().ok()
}
