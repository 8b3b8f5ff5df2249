use indoc::indoc;

use crate::lexer::{Line, Token, lex};

fn words<'s>(line: &Line<'s>) -> Vec<&'s str> {
    std::iter::once(line.mnemonic.text)
        .chain(line.args.iter().map(|t| t.text))
        .collect()
}

#[test]
fn lines_and_spans() {
    let lines = lex("push 2\n  add");
    assert_eq!(lines.len(), 2);

    assert_eq!(lines[0].number, 1);
    assert_eq!(
        lines[0].mnemonic,
        Token {
            text: "push",
            span: 0..4
        }
    );
    assert_eq!(lines[0].args[0].span, 5..6);
    assert_eq!(lines[0].span(), 0..6);

    assert_eq!(lines[1].number, 2);
    assert_eq!(lines[1].mnemonic.span, 9..12);
    assert!(lines[1].args.is_empty());
}

#[test]
fn comments_and_blank_lines_are_skipped() {
    let input = indoc! {"
        ; header
        PUSH $-1 ; trailing

        label end
    "};

    let lines = lex(input);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].number, 2);
    assert_eq!(words(&lines[0]), ["PUSH", "$-1"]);
    assert_eq!(lines[1].number, 4);
    assert_eq!(words(&lines[1]), ["label", "end"]);
}

#[test]
fn comment_without_space() {
    let lines = lex("push 1;note");
    assert_eq!(words(&lines[0]), ["push", "1"]);
}

#[test]
fn crlf_and_tabs() {
    let lines = lex("pop\r\n\tstore\t$0 $1\r\n");
    assert_eq!(lines.len(), 2);
    assert_eq!(words(&lines[0]), ["pop"]);
    assert_eq!(words(&lines[1]), ["store", "$0", "$1"]);
    assert_eq!(lines[1].number, 2);
}

#[test]
fn empty_source() {
    assert!(lex("").is_empty());
    assert!(lex("\n\n; only a comment\n").is_empty());
}
