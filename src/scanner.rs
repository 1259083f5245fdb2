//! The top-level dispatcher: one `scan` call runs every stage in priority
//! order and stops at the first one that emits a token (§4.1, §4.5).

use crate::delimiter::Delimiter;
use crate::error::ScanError;
use crate::lexer_iface::Lexer;
use crate::state::{ScannerState, SERIALIZATION_BUFFER_SIZE};
use crate::subprocess::{self, Detection};
use crate::token::{TokenKind, ValidSymbols};
use crate::{layout, operators, strings};

/// Owns the persistent state across calls and runs the scan dispatch.
#[derive(Debug, Clone)]
pub struct Scanner {
    state: ScannerState,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self { state: ScannerState::new() }
    }

    pub fn state(&self) -> &ScannerState {
        &self.state
    }

    /// Runs one `scan` call. `false` means "no token here"; the host
    /// retries from the unchanged pre-call position on its next attempt.
    pub fn scan(&mut self, lexer: &mut impl Lexer, valid: ValidSymbols) -> bool {
        if strings::scan_escape_interpolation(&self.state, lexer, valid) {
            return true;
        }

        if strings::scan_string_content(&mut self.state, lexer, valid) {
            return true;
        }

        let layout_outcome = layout::scan(&mut self.state, lexer, valid);
        if layout_outcome.emitted {
            return true;
        }

        if operators::scan(lexer, valid) {
            return true;
        }

        self.scan_line_start(lexer, valid, layout_outcome.comment_seen)
    }

    /// §4.1 steps 6-8: bare-subprocess / macro / path-prefix / string-start
    /// detection, gated on the layout context the earlier stages leave
    /// behind (not inside brackets, not mid error-recovery, no pending
    /// same-line comment, not sitting on a quote already, and — per
    /// `comment_seen` — no comment-only line consumed earlier in this same
    /// call's layout pass).
    fn scan_line_start(&mut self, lexer: &mut impl Lexer, valid: ValidSymbols, comment_seen: bool) -> bool {
        let within_brackets = valid.within_brackets();
        let error_recovery_mode = valid.error_recovery_mode();
        let looks_like_string = matches!(lexer.lookahead(), '"' | '\'');

        let check_subprocess = valid.any_subprocess_start()
            && !within_brackets
            && !error_recovery_mode
            && !comment_seen
            && lexer.lookahead() != '#'
            && !looks_like_string;

        if check_subprocess {
            match subprocess::detect(lexer) {
                Detection::BlockMacro if valid.is_valid(TokenKind::BlockMacroStart) => {
                    lexer.mark_end();
                    lexer.set_result(TokenKind::BlockMacroStart);
                    return true;
                }
                Detection::SubprocessMacro if valid.is_valid(TokenKind::SubprocessMacroStart) => {
                    lexer.mark_end();
                    lexer.set_result(TokenKind::SubprocessMacroStart);
                    return true;
                }
                Detection::Subprocess if valid.is_valid(TokenKind::SubprocessStart) => {
                    // Deliberately no `mark_end` here: the committed token
                    // boundary stays wherever layout's scan last left it,
                    // emitting a zero-width token at the line's start.
                    lexer.set_result(TokenKind::SubprocessStart);
                    return true;
                }
                Detection::PathPrefix if valid.is_valid(TokenKind::PathPrefix) => {
                    lexer.mark_end();
                    lexer.set_result(TokenKind::PathPrefix);
                    return true;
                }
                Detection::String(delimiter) if valid.is_valid(TokenKind::StringStart) => {
                    if strings::open_quote_with_prefix(&mut self.state, lexer, delimiter) {
                        return true;
                    }
                }
                _ => {}
            }
        }

        if !comment_seen
            && valid.is_valid(TokenKind::PathPrefix)
            && strings::scan_path_prefix(lexer, valid)
        {
            return true;
        }

        if !comment_seen
            && valid.is_valid(TokenKind::StringStart)
            && strings::scan_string_start(&mut self.state, lexer, valid)
        {
            return true;
        }

        false
    }

    pub fn serialize(&self, buffer: &mut [u8; SERIALIZATION_BUFFER_SIZE]) -> usize {
        self.state.serialize(buffer)
    }

    pub fn deserialize(&mut self, buffer: &[u8]) -> Result<(), ScanError> {
        self.state = ScannerState::deserialize(buffer)?;
        Ok(())
    }
}
