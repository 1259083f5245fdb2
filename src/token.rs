//! The token kinds the scanner can emit, plus the valid-symbols view the
//! host passes in on every `scan` call.

/// One of the external token kinds declared in the grammar's `externals`
/// array. Discriminants must stay in this order: tree-sitter indexes
/// `valid_symbols` by the position a token was declared in `grammar.js`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TokenKind {
    Newline = 0,
    Indent,
    Dedent,
    StringStart,
    StringContent,
    EscapeInterpolation,
    StringEnd,
    Comment,
    CloseParen,
    CloseBracket,
    CloseBrace,
    Except,
    SubprocessStart,
    LogicalAnd,
    LogicalOr,
    BackgroundAmp,
    KeywordAnd,
    KeywordOr,
    SubprocessMacroStart,
    BlockMacroStart,
    PathPrefix,
}

/// Number of token kinds; also the minimum length of a `valid_symbols`
/// slice the host is expected to pass.
pub const TOKEN_KIND_COUNT: usize = 21;

impl TokenKind {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A read-only view over the host's `valid_symbols` array.
///
/// `CLOSE_PAREN`, `CLOSE_BRACKET`, `CLOSE_BRACE`, `EXCEPT`, and `COMMENT`
/// are never emitted by this scanner; they exist in `TokenKind` purely so
/// the dispatcher can inspect the host's context (§4.1 "within brackets",
/// "error recovery mode").
#[derive(Debug, Clone, Copy)]
pub struct ValidSymbols<'a>(&'a [bool]);

impl<'a> ValidSymbols<'a> {
    pub fn new(flags: &'a [bool]) -> Self {
        debug_assert!(flags.len() >= TOKEN_KIND_COUNT);
        Self(flags)
    }

    #[inline]
    pub fn is_valid(&self, kind: TokenKind) -> bool {
        self.0.get(kind.index()).copied().unwrap_or(false)
    }

    /// §4.1: the host accepts `STRING_CONTENT` and `INDENT` simultaneously
    /// only when ordinary layout rules have broken down.
    pub fn error_recovery_mode(&self) -> bool {
        self.is_valid(TokenKind::StringContent) && self.is_valid(TokenKind::Indent)
    }

    /// §4.1 step 6/7: true when the parser is currently inside `()`/`[]`/`{}`.
    pub fn within_brackets(&self) -> bool {
        self.is_valid(TokenKind::CloseBrace)
            || self.is_valid(TokenKind::CloseParen)
            || self.is_valid(TokenKind::CloseBracket)
    }

    pub fn any_subprocess_start(&self) -> bool {
        self.is_valid(TokenKind::SubprocessStart)
            || self.is_valid(TokenKind::SubprocessMacroStart)
            || self.is_valid(TokenKind::BlockMacroStart)
    }

    pub fn any_operator(&self) -> bool {
        self.is_valid(TokenKind::LogicalAnd)
            || self.is_valid(TokenKind::LogicalOr)
            || self.is_valid(TokenKind::BackgroundAmp)
            || self.is_valid(TokenKind::KeywordAnd)
            || self.is_valid(TokenKind::KeywordOr)
    }
}
