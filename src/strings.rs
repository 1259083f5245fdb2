//! String-literal lexing: brace escapes, content runs, opening, and the
//! bare path-prefix token (§4.1 step 1, §4.2, §4.2.1).

use crate::delimiter::Delimiter;
use crate::keywords::is_string_prefix_letter;
use crate::lexer_iface::{advance, Lexer};
use crate::state::ScannerState;
use crate::token::{TokenKind, ValidSymbols};

/// §4.1 step 1: `{{` / `}}` inside a format string collapse to a single
/// literal brace, emitted as `ESCAPE_INTERPOLATION`. A lone brace is left
/// untouched for the grammar to treat as an interpolation opener/closer.
pub fn scan_escape_interpolation(
    state: &ScannerState,
    lexer: &mut impl Lexer,
    valid: ValidSymbols,
) -> bool {
    if !valid.is_valid(TokenKind::EscapeInterpolation) {
        return false;
    }
    let Some(top) = state.top_delimiter() else { return false };
    if !top.is_format() {
        return false;
    }
    let c = lexer.lookahead();
    if c != '{' && c != '}' {
        return false;
    }

    lexer.mark_end();
    advance(lexer);
    if lexer.lookahead() == c {
        advance(lexer);
        lexer.mark_end();
        lexer.set_result(TokenKind::EscapeInterpolation);
        return true;
    }
    false
}

/// §4.2 "Content scan": consumes one run of string body text (or a single
/// escape/close-quote/brace decision) and reports what, if anything, to
/// emit.
pub fn scan_string_content(
    state: &mut ScannerState,
    lexer: &mut impl Lexer,
    valid: ValidSymbols,
) -> bool {
    if !valid.is_valid(TokenKind::StringContent) {
        return false;
    }
    let Some(delimiter) = state.top_delimiter() else { return false };

    let end_char = delimiter.end_character();
    let mut has_content = false;

    loop {
        let c = lexer.lookahead();
        if c == '\0' && lexer.eof() {
            break;
        }

        if delimiter.is_format() && (c == '{' || c == '}') {
            lexer.mark_end();
            lexer.set_result(TokenKind::StringContent);
            return has_content;
        }

        if c == '\\' {
            if delimiter.is_raw() {
                advance(lexer);
                if lexer.lookahead() == end_char || lexer.lookahead() == '\\' {
                    advance(lexer);
                }
                if lexer.lookahead() == '\r' {
                    advance(lexer);
                    if lexer.lookahead() == '\n' {
                        advance(lexer);
                    }
                } else if lexer.lookahead() == '\n' {
                    advance(lexer);
                }
                has_content = true;
                continue;
            }
            if delimiter.is_bytes() {
                lexer.mark_end();
                advance(lexer);
                if matches!(lexer.lookahead(), 'N' | 'u' | 'U') {
                    // \N{...}, \uXXXX, \UXXXXXXXX are not escapes in bytes
                    // strings; keep consuming as plain content.
                    advance(lexer);
                    has_content = true;
                    continue;
                }
                lexer.set_result(TokenKind::StringContent);
                return has_content;
            }
            lexer.mark_end();
            lexer.set_result(TokenKind::StringContent);
            return has_content;
        } else if c == end_char {
            if delimiter.is_triple() {
                lexer.mark_end();
                advance(lexer);
                if lexer.lookahead() == end_char {
                    advance(lexer);
                    if lexer.lookahead() == end_char {
                        if has_content {
                            lexer.set_result(TokenKind::StringContent);
                        } else {
                            advance(lexer);
                            lexer.mark_end();
                            state.pop_delimiter();
                            lexer.set_result(TokenKind::StringEnd);
                            state.set_inside_f_string(false);
                        }
                        return true;
                    }
                    lexer.mark_end();
                    lexer.set_result(TokenKind::StringContent);
                    return true;
                }
                lexer.mark_end();
                lexer.set_result(TokenKind::StringContent);
                return true;
            }
            if has_content {
                lexer.set_result(TokenKind::StringContent);
            } else {
                advance(lexer);
                state.pop_delimiter();
                lexer.set_result(TokenKind::StringEnd);
                state.set_inside_f_string(false);
            }
            lexer.mark_end();
            return true;
        } else if c == '\n' && has_content && !delimiter.is_triple() {
            return false;
        }

        advance(lexer);
        has_content = true;
    }

    false
}

/// §4.2.1: `p`/`P` optionally followed by `f`/`F`/`r`/`R`, immediately
/// followed by a quote. Consumes just the letters.
pub fn scan_path_prefix(lexer: &mut impl Lexer, valid: ValidSymbols) -> bool {
    if !valid.is_valid(TokenKind::PathPrefix) {
        return false;
    }
    if !matches!(lexer.lookahead(), 'p' | 'P') {
        return false;
    }
    advance(lexer);
    if matches!(lexer.lookahead(), '\'' | '"') {
        lexer.mark_end();
        lexer.set_result(TokenKind::PathPrefix);
        return true;
    }
    if matches!(lexer.lookahead(), 'f' | 'F' | 'r' | 'R') {
        advance(lexer);
        if matches!(lexer.lookahead(), '\'' | '"') {
            lexer.mark_end();
            lexer.set_result(TokenKind::PathPrefix);
            return true;
        }
    }
    false
}

/// §4.2 "Opening": given the quote character is already confirmed to be
/// under the cursor, consume it (and two more if triple) and push the
/// delimiter. `delimiter` carries any prefix flags already gathered by the
/// caller (subprocess-line string detection may have done this).
fn open_quote(state: &mut ScannerState, lexer: &mut impl Lexer, mut delimiter: Delimiter) -> bool {
    let quote = lexer.lookahead();
    if quote != '\'' && quote != '"' {
        return false;
    }
    delimiter.set_end_character(quote);
    advance(lexer);
    lexer.mark_end();
    if lexer.lookahead() == quote {
        advance(lexer);
        if lexer.lookahead() == quote {
            advance(lexer);
            lexer.mark_end();
            delimiter.set_triple();
        }
    }

    state.push_delimiter(delimiter);
    state.set_inside_f_string(delimiter.is_format());
    lexer.set_result(TokenKind::StringStart);
    true
}

/// Finish a string/path-prefix already classified by the subprocess-line
/// detector (§4.3's `STRING`/`PATH_PREFIX` results): the prefix letters
/// were consumed there, and the cursor now sits on the opening quote.
pub fn open_quote_with_prefix(
    state: &mut ScannerState,
    lexer: &mut impl Lexer,
    delimiter: Delimiter,
) -> bool {
    open_quote(state, lexer, delimiter)
}

/// §4.2 "Prefix parsing" + "Opening", the general `STRING_START` stage.
pub fn scan_string_start(
    state: &mut ScannerState,
    lexer: &mut impl Lexer,
    valid: ValidSymbols,
) -> bool {
    if !valid.is_valid(TokenKind::StringStart) {
        return false;
    }

    let mut delimiter = Delimiter::empty();
    let mut consumed_prefix = false;

    loop {
        match lexer.lookahead() {
            'f' | 'F' => delimiter.set_format(),
            'r' | 'R' => delimiter.set_raw(),
            'b' | 'B' => delimiter.set_bytes(),
            'u' | 'U' => {} // sets no flag
            _ => break,
        }
        consumed_prefix = true;
        advance(lexer);
    }

    if lexer.lookahead() == '`' {
        // Unprefixed and prefixed backticks alike belong to grammar-level
        // glob syntax, never to the scanner.
        return false;
    }

    if open_quote(state, lexer, delimiter) {
        return true;
    }

    // Prefix letters consumed but no quote followed: abort without state
    // change, letting the parser retry this span as an identifier.
    let _ = consumed_prefix;
    false
}
