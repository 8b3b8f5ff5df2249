//! Line-oriented lexer for assembly source.
//!
//! Produces span-based words grouped by source line. Comments run from `;`
//! to the end of the line and are dropped here, so the assembler only sees
//! mnemonics and arguments.

use std::ops::Range;

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\x0C\x0B]+")]
enum TokenKind {
    #[token("\n")]
    Newline,

    #[regex(r";[^\n]*", allow_greedy = true)]
    Comment,

    #[regex(r"[^\s;]+", allow_greedy = true)]
    Word,
}

/// One whitespace-delimited word with its byte span in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'s> {
    pub text: &'s str,
    pub span: Range<usize>,
}

/// A non-empty source line: mnemonic followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'s> {
    /// 1-based line number.
    pub number: usize,
    pub mnemonic: Token<'s>,
    pub args: Vec<Token<'s>>,
}

impl Line<'_> {
    /// Span from the mnemonic to the last argument.
    pub fn span(&self) -> Range<usize> {
        let end = self.args.last().map_or(self.mnemonic.span.end, |t| t.span.end);
        self.mnemonic.span.start..end
    }
}

/// Split `source` into lines of words. Blank and comment-only lines are skipped.
pub fn lex(source: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    let mut number = 1;
    let mut words: Vec<Token<'_>> = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(TokenKind::Word) => words.push(Token {
                text: lexer.slice(),
                span: lexer.span(),
            }),
            Ok(TokenKind::Newline) => {
                flush(&mut lines, number, &mut words);
                number += 1;
            }
            // Non-ASCII whitespace is the only thing no rule matches.
            Ok(TokenKind::Comment) | Err(()) => {}
        }
    }
    flush(&mut lines, number, &mut words);

    lines
}

fn flush<'s>(lines: &mut Vec<Line<'s>>, number: usize, words: &mut Vec<Token<'s>>) {
    let mut iter = std::mem::take(words).into_iter();
    if let Some(mnemonic) = iter.next() {
        lines.push(Line {
            number,
            mnemonic,
            args: iter.collect(),
        });
    }
}
