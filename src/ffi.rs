//! The `extern "C"` boundary tree-sitter's runtime links against. Nothing
//! in here is exercised by `cargo test` — it's covered by grammar-level
//! corpus tests in the generated parser, not by this crate's test suite.

use std::os::raw::{c_char, c_void};
use std::slice;

use tracing::trace;

use crate::lexer_iface::Lexer;
use crate::scanner::Scanner;
use crate::state::SERIALIZATION_BUFFER_SIZE;
use crate::token::{TokenKind, ValidSymbols, TOKEN_KIND_COUNT};

/// Mirrors the subset of tree-sitter's `TSLexer` this scanner calls. Field
/// order and types must match `tree_sitter/parser.h` bit for bit; this is
/// an FFI layout, not a Rust API to be refactored freely.
#[repr(C)]
pub struct TSLexer {
    pub lookahead: i32,
    pub result_symbol: u16,
    pub advance: unsafe extern "C" fn(*mut TSLexer, bool),
    pub mark_end: unsafe extern "C" fn(*mut TSLexer),
    pub get_column: unsafe extern "C" fn(*mut TSLexer) -> u32,
    pub is_at_included_range_start: unsafe extern "C" fn(*const TSLexer) -> bool,
    pub eof: unsafe extern "C" fn(*const TSLexer) -> bool,
}

/// Adapts a raw `*mut TSLexer` to the [`Lexer`] trait this crate's scanning
/// logic is written against.
struct TsLexerRef {
    raw: *mut TSLexer,
}

impl Lexer for TsLexerRef {
    fn lookahead(&self) -> char {
        let code_point = unsafe { (*self.raw).lookahead };
        char::from_u32(code_point as u32).unwrap_or('\0')
    }

    fn advance(&mut self, skip: bool) {
        unsafe {
            let advance_fn = (*self.raw).advance;
            advance_fn(self.raw, skip);
        }
    }

    fn mark_end(&mut self) {
        unsafe {
            let mark_end_fn = (*self.raw).mark_end;
            mark_end_fn(self.raw);
        }
    }

    fn eof(&self) -> bool {
        unsafe {
            let eof_fn = (*self.raw).eof;
            eof_fn(self.raw)
        }
    }

    fn set_result(&mut self, kind: TokenKind) {
        unsafe {
            (*self.raw).result_symbol = kind.index() as u16;
        }
    }
}

/// # Safety
/// Called by the tree-sitter runtime exactly once per parse, never
/// concurrently with any other scanner function on the same payload.
#[no_mangle]
pub unsafe extern "C" fn tree_sitter_shx_external_scanner_create() -> *mut c_void {
    let scanner = Box::new(Scanner::new());
    trace!("scanner created");
    Box::into_raw(scanner) as *mut c_void
}

/// # Safety
/// `payload` must be a pointer previously returned by `_create` and not
/// already destroyed.
#[no_mangle]
pub unsafe extern "C" fn tree_sitter_shx_external_scanner_destroy(payload: *mut c_void) {
    if payload.is_null() {
        return;
    }
    drop(Box::from_raw(payload as *mut Scanner));
}

/// # Safety
/// `payload` must be a live scanner; `lexer` must be a valid `TSLexer*` for
/// the duration of the call; `valid_symbols` must point to at least
/// [`TOKEN_KIND_COUNT`] bytes.
#[no_mangle]
pub unsafe extern "C" fn tree_sitter_shx_external_scanner_scan(
    payload: *mut c_void,
    lexer: *mut TSLexer,
    valid_symbols: *const bool,
) -> bool {
    let scanner = &mut *(payload as *mut Scanner);
    let mut lexer_ref = TsLexerRef { raw: lexer };
    let flags = slice::from_raw_parts(valid_symbols, TOKEN_KIND_COUNT);
    let result = scanner.scan(&mut lexer_ref, ValidSymbols::new(flags));
    trace!(result, "scan call finished");
    result
}

/// # Safety
/// `payload` must be a live scanner; `buffer` must have room for
/// [`SERIALIZATION_BUFFER_SIZE`] bytes.
#[no_mangle]
pub unsafe extern "C" fn tree_sitter_shx_external_scanner_serialize(
    payload: *mut c_void,
    buffer: *mut c_char,
) -> u32 {
    let scanner = &*(payload as *mut Scanner);
    let mut scratch = [0u8; SERIALIZATION_BUFFER_SIZE];
    let len = scanner.serialize(&mut scratch);
    let out = slice::from_raw_parts_mut(buffer as *mut u8, len);
    out.copy_from_slice(&scratch[..len]);
    len as u32
}

/// # Safety
/// `payload` must be a live scanner; `buffer` must point to at least
/// `length` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn tree_sitter_shx_external_scanner_deserialize(
    payload: *mut c_void,
    buffer: *const c_char,
    length: u32,
) {
    let scanner = &mut *(payload as *mut Scanner);
    let bytes = if length == 0 {
        &[][..]
    } else {
        slice::from_raw_parts(buffer as *const u8, length as usize)
    };
    if let Err(err) = scanner.deserialize(bytes) {
        // A malformed buffer can only come from a misbehaving host; fall
        // back to a fresh state rather than propagating a panic across
        // the FFI boundary.
        tracing::warn!(%err, "deserialize failed, resetting scanner state");
        *scanner = Scanner::new();
    }
}
