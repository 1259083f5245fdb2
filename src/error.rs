//! Errors surfaced by the scanner's non-`scan` operations.
//!
//! Scanning itself is infallible by design (§4.5 of the design notes: a
//! `scan` call either emits a token or doesn't, never an error). The only
//! place a malformed input can legitimately be rejected is deserializing a
//! state buffer handed back by a misbehaving host.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("serialization buffer too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("delimiter count {count} exceeds remaining buffer length {remaining}")]
    DelimiterCountExceedsBuffer { count: usize, remaining: usize },
}
