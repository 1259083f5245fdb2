//! The line-oriented bare-subprocess detector (§4.3).
//!
//! This mutates the lexer's cursor as it reads ahead — it is "peek-only"
//! in the sense that matters to the host: nothing is *committed* unless
//! the caller subsequently calls `mark_end`. If this returns [`Detection::None`]
//! (or a variant the caller doesn't act on), the caller simply doesn't
//! call `mark_end`, and the whole `scan` invocation fails, which the host
//! treats as "position unchanged" regardless of how far the lookahead
//! cursor wandered while classifying the line.

use crate::delimiter::Delimiter;
use crate::keywords::{is_identifier_char, is_identifier_start, is_inline_whitespace, is_python_keyword, is_shell_command};
use crate::lexer_iface::{advance, Lexer};

const MAX_IDENT_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    None,
    Subprocess,
    /// Carries the `identifier! ` span already consumed.
    SubprocessMacro,
    BlockMacro,
    /// String with a prefix already consumed; cursor sits on the quote.
    String(Delimiter),
    /// Path prefix already consumed; cursor sits on the quote.
    PathPrefix,
}

struct LineScanFlags {
    has_flag: bool,
    has_pipe: bool,
    has_redirect: bool,
    has_assignment: bool,
    has_call_parens: bool,
    has_subscript: bool,
    has_attribute: bool,
    has_comparison: bool,
    has_env_arg: bool,
    has_macro_call: bool,
    has_subprocess_macro: bool,
}

impl LineScanFlags {
    fn new(seen_shell_signal: bool) -> (Self, bool) {
        (
            Self {
                has_flag: false,
                has_pipe: false,
                has_redirect: false,
                has_assignment: false,
                has_call_parens: false,
                has_subscript: false,
                has_attribute: false,
                has_comparison: false,
                has_env_arg: false,
                has_macro_call: false,
                has_subprocess_macro: false,
            },
            seen_shell_signal,
        )
    }

    fn decide(&self, first_ident_is_shell_command: bool) -> Detection {
        if self.has_assignment
            || self.has_comparison
            || self.has_call_parens
            || self.has_subscript
            || self.has_attribute
            || self.has_macro_call
        {
            return Detection::None;
        }
        if self.has_flag || self.has_pipe || self.has_redirect || self.has_env_arg || self.has_subprocess_macro {
            return Detection::Subprocess;
        }
        if first_ident_is_shell_command {
            return Detection::Subprocess;
        }
        Detection::None
    }
}

/// §4.3 end to end: opening probes, first-identifier analysis, then the
/// rest-of-line scan.
pub fn detect(lexer: &mut impl Lexer) -> Detection {
    while is_inline_whitespace(lexer.lookahead()) {
        advance(lexer);
    }

    // --- Opening probes ---
    match lexer.lookahead() {
        '/' => return Detection::Subprocess,
        '.' => {
            advance(lexer);
            if lexer.lookahead() == '/' {
                return Detection::Subprocess;
            }
            // Could be a float literal like `.5`; fall through to the
            // general scan below with `.` already consumed.
        }
        '~' => {
            advance(lexer);
            if lexer.lookahead() == '/' {
                return Detection::Subprocess;
            }
        }
        '$' => {
            advance(lexer);
            if matches!(lexer.lookahead(), '(' | '[') {
                return Detection::None;
            }
        }
        '!' => {
            advance(lexer);
            if matches!(lexer.lookahead(), '(' | '[') {
                return Detection::None;
            }
        }
        '[' => return Detection::None,
        '@' => return detect_at_modifier(lexer),
        _ => {}
    }

    // --- First-identifier analysis ---
    let mut ident = String::new();
    if lexer.lookahead() == '$' {
        advance(lexer);
    }
    if is_identifier_start(lexer.lookahead()) {
        while is_identifier_char(lexer.lookahead()) && ident.len() < MAX_IDENT_LEN {
            ident.push(lexer.lookahead());
            advance(lexer);
        }

        if let Some(delimiter) = string_prefix_delimiter(&ident) {
            if matches!(lexer.lookahead(), '"' | '\'') {
                return Detection::String(delimiter);
            }
        }

        if is_path_prefix_ident(&ident) && matches!(lexer.lookahead(), '"' | '\'') {
            return Detection::PathPrefix;
        }

        if lexer.lookahead() == '?' {
            advance(lexer);
            if lexer.lookahead() == '?' {
                advance(lexer);
            }
            while is_inline_whitespace(lexer.lookahead()) {
                advance(lexer);
            }
            if lexer.lookahead() == '\n' || lexer.eof() {
                return Detection::None;
            }
        }

        if is_python_keyword(&ident) && !(ident == "with" && lexer.lookahead() == '!') {
            return Detection::None;
        }

        if lexer.lookahead() == '!' {
            advance(lexer);
            if is_inline_whitespace(lexer.lookahead()) {
                if ident == "with" {
                    return Detection::BlockMacro;
                }
                while is_inline_whitespace(lexer.lookahead()) {
                    advance(lexer);
                }
                return Detection::SubprocessMacro;
            }
        }
    } else if lexer.lookahead() == ',' {
        while lexer.lookahead() == ',' {
            advance(lexer);
        }
        while is_inline_whitespace(lexer.lookahead()) {
            advance(lexer);
        }
        if lexer.lookahead() == '\n' || lexer.eof() {
            return Detection::Subprocess;
        }
    }

    // --- Rest-of-line scan ---
    let is_known_command = !ident.is_empty() && is_shell_command(&ident);
    scan_rest_of_line(lexer, is_known_command, !ident.is_empty())
}

fn detect_at_modifier(lexer: &mut impl Lexer) -> Detection {
    advance(lexer); // consume '@'
    if !is_identifier_start(lexer.lookahead()) {
        return Detection::None;
    }
    while is_identifier_char(lexer.lookahead()) {
        advance(lexer);
    }
    if lexer.lookahead() == '.' || lexer.lookahead() == '(' {
        return Detection::None; // decorator
    }
    if is_inline_whitespace(lexer.lookahead()) {
        while is_inline_whitespace(lexer.lookahead()) {
            advance(lexer);
        }
        if matches!(lexer.lookahead(), '/' | '.' | '~' | '-') {
            return Detection::Subprocess;
        }
        if is_identifier_start(lexer.lookahead()) {
            let mut cmd = String::new();
            while is_identifier_char(lexer.lookahead()) && cmd.len() < MAX_IDENT_LEN {
                cmd.push(lexer.lookahead());
                advance(lexer);
            }
            if is_shell_command(&cmd) {
                return Detection::Subprocess;
            }
        }
    }
    Detection::None
}

fn string_prefix_delimiter(ident: &str) -> Option<Delimiter> {
    if ident.is_empty() || ident.len() > 3 {
        return None;
    }
    if !ident.chars().all(crate::keywords::is_string_prefix_letter) {
        return None;
    }
    let mut delimiter = Delimiter::empty();
    for c in ident.chars() {
        match c {
            'f' | 'F' => delimiter.set_format(),
            'r' | 'R' => delimiter.set_raw(),
            'b' | 'B' => delimiter.set_bytes(),
            _ => {}
        }
    }
    Some(delimiter)
}

fn is_path_prefix_ident(ident: &str) -> bool {
    let bytes = ident.as_bytes();
    matches!(bytes, [b'p' | b'P']) || matches!(bytes, [b'p' | b'P', b'f' | b'F' | b'r' | b'R'])
}

fn scan_rest_of_line(lexer: &mut impl Lexer, is_known_command: bool, has_leading_identifier: bool) -> Detection {
    let (mut flags, mut seen_shell_signal) = LineScanFlags::new(is_known_command);

    let mut in_string = false;
    let mut string_char = '\0';
    // Any identifier at all primes word-boundary-sensitive checks
    // (call-parens, subscript, attribute) below — not just a known one.
    let mut prev_was_ident_no_space = has_leading_identifier;
    let mut prev_was_space = false;
    let mut prev_was_flag = false;
    let mut python_eval_depth: i32 = 0;

    while lexer.lookahead() != '\0' && lexer.lookahead() != '\n' {
        let c = lexer.lookahead();

        if !in_string && (c == '"' || c == '\'') {
            in_string = true;
            string_char = c;
            advance(lexer);
            prev_was_ident_no_space = false;
            continue;
        }
        if in_string {
            if c == '\\' {
                advance(lexer);
                if lexer.lookahead() != '\0' {
                    advance(lexer);
                }
                continue;
            }
            if c == string_char {
                in_string = false;
            }
            advance(lexer);
            continue;
        }

        if c == '-' {
            advance(lexer);
            if lexer.lookahead() == '-' {
                advance(lexer);
                if is_identifier_start(lexer.lookahead()) {
                    flags.has_flag = true;
                    seen_shell_signal = true;
                    prev_was_flag = true;
                }
            } else if is_identifier_start(lexer.lookahead()) {
                flags.has_flag = true;
                seen_shell_signal = true;
                prev_was_flag = true;
            }
            prev_was_ident_no_space = false;
            continue;
        }

        if c == '|' {
            advance(lexer);
            if lexer.lookahead() == '|' {
                flags.has_pipe = true;
                seen_shell_signal = true;
                advance(lexer);
            } else if lexer.lookahead() != '=' {
                flags.has_pipe = true;
                seen_shell_signal = true;
            }
            prev_was_ident_no_space = false;
            continue;
        }

        if c == '&' {
            advance(lexer);
            if lexer.lookahead() == '&' {
                flags.has_pipe = true;
                seen_shell_signal = true;
                advance(lexer);
            } else {
                while is_inline_whitespace(lexer.lookahead()) {
                    advance(lexer);
                }
                if lexer.lookahead() == '\n' || lexer.eof() {
                    flags.has_pipe = true;
                    seen_shell_signal = true;
                }
            }
            prev_was_ident_no_space = false;
            continue;
        }

        if c == '>' {
            advance(lexer);
            if lexer.lookahead() == '=' {
                flags.has_comparison = true;
            } else {
                flags.has_redirect = true;
                seen_shell_signal = true;
            }
            prev_was_ident_no_space = false;
            continue;
        }
        if c == '<' {
            advance(lexer);
            if lexer.lookahead() == '=' {
                flags.has_comparison = true;
            } else if lexer.lookahead() != '<' {
                flags.has_redirect = true;
                seen_shell_signal = true;
            }
            prev_was_ident_no_space = false;
            continue;
        }

        if c == '=' {
            advance(lexer);
            if lexer.lookahead() == '=' && python_eval_depth == 0 {
                flags.has_comparison = true;
                advance(lexer);
                prev_was_flag = false;
            } else if prev_was_flag {
                // `--key=value=extra` leaves `prev_was_flag` set across
                // multiple `=` — replicated intentionally (open question).
            } else if python_eval_depth == 0 {
                flags.has_assignment = true;
                prev_was_flag = false;
            }
            prev_was_ident_no_space = false;
            continue;
        }

        if c == '!' {
            advance(lexer);
            if lexer.lookahead() == '=' && python_eval_depth == 0 {
                flags.has_comparison = true;
            } else if prev_was_ident_no_space && lexer.lookahead() == '(' {
                flags.has_macro_call = true;
            } else if prev_was_ident_no_space && is_inline_whitespace(lexer.lookahead()) {
                flags.has_subprocess_macro = true;
            }
            prev_was_ident_no_space = false;
            continue;
        }

        if c == ':' {
            advance(lexer);
            if lexer.lookahead() == '=' && python_eval_depth == 0 {
                flags.has_comparison = true;
            }
            prev_was_ident_no_space = false;
            continue;
        }

        if c == '(' && python_eval_depth > 0 {
            python_eval_depth += 1;
            advance(lexer);
            prev_was_ident_no_space = false;
            continue;
        }
        if c == ')' && python_eval_depth > 0 {
            python_eval_depth -= 1;
            advance(lexer);
            prev_was_ident_no_space = false;
            continue;
        }

        if c == '(' && prev_was_ident_no_space && !seen_shell_signal {
            flags.has_call_parens = true;
            prev_was_ident_no_space = false;
            advance(lexer);
            continue;
        }
        if c == '[' && prev_was_ident_no_space && !seen_shell_signal {
            flags.has_subscript = true;
            prev_was_ident_no_space = false;
            advance(lexer);
            continue;
        }
        if c == '.' && prev_was_ident_no_space && !seen_shell_signal {
            flags.has_attribute = true;
            prev_was_ident_no_space = false;
            advance(lexer);
            continue;
        }

        if is_identifier_start(c) {
            while is_identifier_char(lexer.lookahead()) {
                advance(lexer);
            }
            prev_was_ident_no_space = true;
            continue;
        }

        if c == '$' && prev_was_space {
            advance(lexer);
            if is_identifier_start(lexer.lookahead()) {
                flags.has_env_arg = true;
                seen_shell_signal = true;
            } else if matches!(lexer.lookahead(), '(' | '[') {
                flags.has_env_arg = true;
                seen_shell_signal = true;
            }
            prev_was_ident_no_space = false;
            prev_was_space = false;
            continue;
        }

        if c == '@' && prev_was_space {
            advance(lexer);
            if lexer.lookahead() == '$' {
                advance(lexer);
                if lexer.lookahead() == '(' {
                    flags.has_env_arg = true;
                    seen_shell_signal = true;
                }
            } else if lexer.lookahead() == '(' {
                advance(lexer);
                python_eval_depth = 1;
                flags.has_env_arg = true;
                seen_shell_signal = true;
            }
            prev_was_ident_no_space = false;
            prev_was_space = false;
            continue;
        }

        if is_inline_whitespace(c) {
            advance(lexer);
            prev_was_ident_no_space = false;
            prev_was_space = true;
            prev_was_flag = false;
            continue;
        }

        prev_was_ident_no_space = false;
        prev_was_space = false;
        advance(lexer);
    }

    flags.decide(is_known_command)
}
