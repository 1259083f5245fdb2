//! External scanner for the shx tree-sitter grammar: the hand-written
//! half of the lexer that tree-sitter's generated DFA can't express on
//! its own — significant whitespace, string-literal bodies, and the
//! line-level heuristics that decide whether a bare line is a subprocess
//! command or a Python expression.

mod delimiter;
mod error;
mod ffi;
mod keywords;
mod layout;
mod lexer_iface;
mod operators;
mod scanner;
mod state;
mod strings;
mod subprocess;
mod token;

pub use error::ScanError;
pub use lexer_iface::{Lexer, StrLexer};
pub use scanner::Scanner;
pub use state::{ScannerState, SERIALIZATION_BUFFER_SIZE};
pub use token::{TokenKind, ValidSymbols, TOKEN_KIND_COUNT};

pub use ffi::{
    tree_sitter_shx_external_scanner_create, tree_sitter_shx_external_scanner_deserialize,
    tree_sitter_shx_external_scanner_destroy, tree_sitter_shx_external_scanner_scan,
    tree_sitter_shx_external_scanner_serialize,
};
