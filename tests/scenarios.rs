//! End-to-end reproductions of the canonical token sequences: bare
//! subprocess, subprocess macro, format string, path prefix, and
//! indentation tracking across an indented block.

use shx_scanner::{Scanner, StrLexer, TokenKind, ValidSymbols, TOKEN_KIND_COUNT};

fn flags_with(kinds: &[TokenKind]) -> Vec<bool> {
    let mut flags = vec![false; TOKEN_KIND_COUNT];
    for &kind in kinds {
        flags[kind.index()] = true;
    }
    flags
}

#[test]
fn bare_subprocess_line_emits_zero_width_subprocess_start() {
    let mut scanner = Scanner::new();
    let mut lexer = StrLexer::new("ls -la\n");
    let flags = flags_with(&[TokenKind::SubprocessStart, TokenKind::Newline]);
    assert!(scanner.scan(&mut lexer, ValidSymbols::new(&flags)));
    assert_eq!(lexer.result(), Some(TokenKind::SubprocessStart));
    assert_eq!(lexer.marked_end(), 0);
}

#[test]
fn python_assignment_line_never_triggers_subprocess_start() {
    let mut scanner = Scanner::new();
    let mut lexer = StrLexer::new("x = 1\n");
    let flags = flags_with(&[TokenKind::SubprocessStart]);
    assert!(!scanner.scan(&mut lexer, ValidSymbols::new(&flags)));

    let mut newline_lexer = StrLexer::new("\n");
    let newline_flags = flags_with(&[TokenKind::Newline]);
    assert!(scanner.scan(&mut newline_lexer, ValidSymbols::new(&newline_flags)));
    assert_eq!(newline_lexer.result(), Some(TokenKind::Newline));
}

#[test]
fn subprocess_macro_then_quoted_argument() {
    let mut scanner = Scanner::new();
    let input = "echo! \"hi\"\n";

    let mut macro_lexer = StrLexer::new(input);
    let macro_flags = flags_with(&[TokenKind::SubprocessMacroStart]);
    assert!(scanner.scan(&mut macro_lexer, ValidSymbols::new(&macro_flags)));
    assert_eq!(macro_lexer.result(), Some(TokenKind::SubprocessMacroStart));
    assert_eq!(macro_lexer.marked_text(0), "echo! ");

    let mut start_lexer = StrLexer::new(&input[6..]);
    let start_flags = flags_with(&[TokenKind::StringStart]);
    assert!(scanner.scan(&mut start_lexer, ValidSymbols::new(&start_flags)));
    assert_eq!(start_lexer.result(), Some(TokenKind::StringStart));
    assert_eq!(start_lexer.marked_text(0), "\"");

    let mut content_lexer = StrLexer::new(&input[7..]);
    let content_flags = flags_with(&[TokenKind::StringContent]);
    assert!(scanner.scan(&mut content_lexer, ValidSymbols::new(&content_flags)));
    assert_eq!(content_lexer.result(), Some(TokenKind::StringContent));
    assert_eq!(content_lexer.marked_text(0), "hi");

    let mut end_lexer = StrLexer::new(&input[9..]);
    assert!(scanner.scan(&mut end_lexer, ValidSymbols::new(&content_flags)));
    assert_eq!(end_lexer.result(), Some(TokenKind::StringEnd));
    assert_eq!(end_lexer.marked_text(0), "\"");

    let mut newline_lexer = StrLexer::new(&input[10..]);
    let newline_flags = flags_with(&[TokenKind::Newline]);
    assert!(scanner.scan(&mut newline_lexer, ValidSymbols::new(&newline_flags)));
    assert_eq!(newline_lexer.result(), Some(TokenKind::Newline));
}

#[test]
fn format_string_content_stops_at_each_interpolation_brace() {
    let mut scanner = Scanner::new();
    let input = "f\"a{b}c\"\n";

    let mut start_lexer = StrLexer::new(input);
    let start_flags = flags_with(&[TokenKind::StringStart]);
    assert!(scanner.scan(&mut start_lexer, ValidSymbols::new(&start_flags)));
    assert_eq!(start_lexer.result(), Some(TokenKind::StringStart));
    assert_eq!(start_lexer.marked_end(), 2);

    let content_flags = flags_with(&[TokenKind::StringContent]);

    let mut first_content = StrLexer::new(&input[2..]);
    assert!(scanner.scan(&mut first_content, ValidSymbols::new(&content_flags)));
    assert_eq!(first_content.result(), Some(TokenKind::StringContent));
    assert_eq!(first_content.marked_text(0), "a");

    // `{b}` is consumed by the grammar's interpolation rule, not the scanner.
    let mut second_content = StrLexer::new(&input[6..]);
    assert!(scanner.scan(&mut second_content, ValidSymbols::new(&content_flags)));
    assert_eq!(second_content.result(), Some(TokenKind::StringContent));
    assert_eq!(second_content.marked_text(0), "c");

    let mut end_lexer = StrLexer::new(&input[7..]);
    assert!(scanner.scan(&mut end_lexer, ValidSymbols::new(&content_flags)));
    assert_eq!(end_lexer.result(), Some(TokenKind::StringEnd));
}

#[test]
fn path_prefix_then_plain_string() {
    let mut scanner = Scanner::new();
    let input = "p\"/tmp/x\"\n";

    let mut prefix_lexer = StrLexer::new(input);
    let prefix_flags = flags_with(&[TokenKind::PathPrefix]);
    assert!(scanner.scan(&mut prefix_lexer, ValidSymbols::new(&prefix_flags)));
    assert_eq!(prefix_lexer.result(), Some(TokenKind::PathPrefix));
    assert_eq!(prefix_lexer.marked_end(), 1);

    let mut start_lexer = StrLexer::new(&input[1..]);
    let start_flags = flags_with(&[TokenKind::StringStart]);
    assert!(scanner.scan(&mut start_lexer, ValidSymbols::new(&start_flags)));
    assert_eq!(start_lexer.result(), Some(TokenKind::StringStart));
    assert_eq!(start_lexer.marked_end(), 1);

    let mut content_lexer = StrLexer::new(&input[2..]);
    let content_flags = flags_with(&[TokenKind::StringContent]);
    assert!(scanner.scan(&mut content_lexer, ValidSymbols::new(&content_flags)));
    assert_eq!(content_lexer.result(), Some(TokenKind::StringContent));
    assert_eq!(content_lexer.marked_text(0), "/tmp/x");

    let mut end_lexer = StrLexer::new(&input[8..]);
    assert!(scanner.scan(&mut end_lexer, ValidSymbols::new(&content_flags)));
    assert_eq!(end_lexer.result(), Some(TokenKind::StringEnd));
}

#[test]
fn indented_block_pushes_and_pops_indentation() {
    let mut scanner = Scanner::new();
    let layout_flags = flags_with(&[TokenKind::Newline, TokenKind::Indent, TokenKind::Dedent]);

    // Positioned right after "if x:"; the whitespace run includes the
    // newline and line 2's leading spaces, decided as one INDENT.
    let mut indent_lexer = StrLexer::new("\n    y\n    z\n");
    assert!(scanner.scan(&mut indent_lexer, ValidSymbols::new(&layout_flags)));
    assert_eq!(indent_lexer.result(), Some(TokenKind::Indent));
    assert_eq!(scanner.state().current_indent(), 4);

    // Positioned right after "y"; line 3 has the same width, so this run
    // resolves to NEWLINE.
    let mut newline_lexer = StrLexer::new("\n    z\n");
    assert!(scanner.scan(&mut newline_lexer, ValidSymbols::new(&layout_flags)));
    assert_eq!(newline_lexer.result(), Some(TokenKind::Newline));
    assert_eq!(scanner.state().current_indent(), 4);

    // Positioned right after "z", at end of input: dedent back to 0.
    let mut dedent_lexer = StrLexer::new("\n");
    assert!(scanner.scan(&mut dedent_lexer, ValidSymbols::new(&layout_flags)));
    assert_eq!(dedent_lexer.result(), Some(TokenKind::Dedent));
    assert_eq!(scanner.state().current_indent(), 0);
}
