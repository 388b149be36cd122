//! Error types for binary and USO encoding and decoding.
//!
//! Every fallible operation in this crate returns [`Result`], whose error side
//! is the single [`Error`] enum below.
//!
//! ## Error Categories
//!
//! - **Stream rejection**: [`Error::CorruptStream`], [`Error::FutureVersion`] and
//!   [`Error::TypeMismatch`] are raised while reading the binary header, before
//!   any value is constructed
//! - **Registry lookups**: [`Error::UnknownType`] for wire identifiers that name no variant
//! - **Text syntax**: [`Error::MalformedText`] with line, column and byte offset
//! - **Container typing**: [`Error::ElementMismatch`] when a list is given a value of
//!   the wrong variant
//! - **I/O**: errors from the underlying stream, propagated unchanged
//!
//! Reading a map entry through a typed accessor never produces an error: a
//! missing key or a value of another variant yields the caller's default.
//!
//! ## Examples
//!
//! ```rust
//! use ubo::{from_slice, Error};
//!
//! let result = from_slice(&[0, 0, 0, 0, 0, 3, 13], None);
//! assert!(matches!(result, Err(Error::CorruptStream { found: 0 })));
//! ```

use std::io;
use thiserror::Error;

use crate::registry::DataType;

/// Represents all possible errors that can occur while encoding or decoding.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the underlying reader or writer
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The binary magic number did not match
    #[error("corrupt stream: invalid header 0x{found:08X} (expected 0xFF804269)")]
    CorruptStream { found: u32 },

    /// The stream was written by a newer version of the format
    #[error("stream format version {found} is newer than the supported version {supported}")]
    FutureVersion { found: u16, supported: u16 },

    /// The root type of the stream is not the one the caller asked for
    #[error("type mismatch: expected {expected} (id {}), found id {found}", .expected.id())]
    TypeMismatch { expected: DataType, found: u8 },

    /// A wire identifier that no variant is registered under
    #[error("unknown type id {0}")]
    UnknownType(u8),

    /// USO syntax error with position information
    #[error("malformed text at line {line}, column {col} (offset {position}): {msg}")]
    MalformedText {
        line: usize,
        col: usize,
        position: usize,
        msg: String,
    },

    /// A list was given an element of a different variant than it holds
    #[error("list holds {expected} elements, cannot store a {found}")]
    ElementMismatch { expected: DataType, found: DataType },

    /// Structurally invalid binary payload or unencodable value
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Creates a USO syntax error at the given location.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ubo::Error;
    ///
    /// let err = Error::malformed(1, 5, 4, "unterminated string");
    /// assert!(err.to_string().contains("column 5"));
    /// ```
    pub fn malformed(line: usize, col: usize, position: usize, msg: &str) -> Self {
        Error::MalformedText {
            line,
            col,
            position,
            msg: msg.to_string(),
        }
    }

    /// Creates an invalid data error with a display message.
    pub fn invalid_data<T: std::fmt::Display>(msg: T) -> Self {
        Error::InvalidData(msg.to_string())
    }

    /// Returns `true` if this error was raised while validating the binary header.
    #[must_use]
    pub fn is_header_error(&self) -> bool {
        matches!(
            self,
            Error::CorruptStream { .. } | Error::FutureVersion { .. } | Error::TypeMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
