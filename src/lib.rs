//! # ubo
//!
//! A self-describing, versioned data format for typed value trees, with a
//! compact binary encoding and a human-readable text encoding (USO).
//!
//! ## What is in a value?
//!
//! A [`DataValue`] is one of a closed set of variants: integers of four fixed
//! widths plus arbitrary precision, floats, decimals, UTF-16 chars, booleans,
//! strings, typed primitive arrays, bit sets, UUIDs, and the two containers,
//! [`DataMap`] (string keys) and [`DataList`] (one element type per list).
//! Both encodings keep the exact variant of every node, so decoding always
//! gives back an equal tree.
//!
//! ## Key Features
//!
//! - **Binary codec**: big-endian, one-byte type ids, header with magic number
//!   and format version, validated before any payload is read
//! - **Compression**: the same stream wrapped in gzip
//! - **USO text**: literal suffixes (`5s`, `5L`, `1.5f`, ...) preserve the
//!   variant; parse errors report line and column
//! - **Typed access**: `put_*`/`get_*` accessors with defaults on maps, type
//!   witnesses for decoding straight into a Rust type
//! - **Visitor**: per-variant callbacks with category fallbacks
//!
//! ## Quick Start
//!
//! ```rust
//! use ubo::{from_slice, from_text, to_bytes, to_text, DataMap, DataType, DataValue};
//!
//! let mut map = DataMap::new();
//! map.put_string("name", "abc");
//! map.put_short("count", 5);
//! let value = DataValue::from(map);
//!
//! // Text
//! let text = to_text(&value);
//! assert_eq!(text, r#"{"name": "abc", "count": 5s}"#);
//! assert_eq!(from_text(&text).unwrap(), value);
//!
//! // Binary, checking the root type on the way back
//! let bytes = to_bytes(&value).unwrap();
//! assert_eq!(from_slice(&bytes, Some(DataType::Map)).unwrap(), value);
//! ```
//!
//! ### Building values with the data! macro
//!
//! ```rust
//! use ubo::{data, to_text};
//!
//! let value = data!({ "id": 7i64, "tags": ["a", "b"] });
//! assert_eq!(to_text(&value), r#"{"id": 7L, "tags": ["a", "b"]}"#);
//! ```
//!
//! ## Logging
//!
//! The codecs emit `tracing` events at `debug` and `trace` level (headers
//! accepted, streams written, files read). No subscriber is installed by the
//! library.
//!
//! ## Format Reference
//!
//! See the [`format`] module for the byte layout and the text grammar.

pub mod binary;
pub mod bitset;
pub mod compress;
pub mod de;
pub mod decimal;
pub mod error;
pub mod format;
pub mod list;
pub mod macros;
pub mod map;
pub mod options;
pub mod registry;
pub mod ser;
pub mod value;
pub mod visitor;

pub use bitset::BitSet;
pub use de::Parser;
pub use decimal::BigDecimal;
pub use error::{Error, Result};
pub use list::{DataList, ElementMut};
pub use map::DataMap;
pub use options::{BinaryOptions, TextOptions};
pub use registry::DataType;
pub use ser::Writer;
pub use value::{DataValue, TypeWitness};
pub use visitor::{visit, Visitor};

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use tracing::debug;

/// Encodes `value` as a binary stream into `writer`.
///
/// # Examples
///
/// ```rust
/// use ubo::{to_writer, DataMap, DataValue};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &DataValue::from(DataMap::new())).unwrap();
/// assert_eq!(
///     buffer,
///     [0xFF, 0x80, 0x42, 0x69, 0x00, 0x03, 0x0D, 0x00, 0x00, 0x00, 0x00]
/// );
/// ```
///
/// # Errors
///
/// Returns an error if writing fails, or if a map key or container is too
/// large for the format.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W: io::Write>(mut writer: W, value: &DataValue) -> Result<()> {
    binary::write(&mut writer, value)
}

/// Encodes `value` as a binary stream in memory.
///
/// Nesting depth is not checked here. Trees deeper than
/// [`options::DEFAULT_MAX_DEPTH`] containers only read back through
/// [`from_reader_with_options`] with a raised [`BinaryOptions::max_depth`].
///
/// # Errors
///
/// Returns an error if a map key or container is too large for the format.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_bytes(value: &DataValue) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(64);
    binary::write(&mut bytes, value)?;
    debug!(root = %value.data_type(), bytes = bytes.len(), "encoded value");
    Ok(bytes)
}

/// Decodes a binary stream from `reader`.
///
/// With `Some(expected)`, the root type id is checked against `expected`
/// before the payload is read.
///
/// # Errors
///
/// - [`Error::CorruptStream`] if the stream does not start with the magic number
/// - [`Error::FutureVersion`] if it was written by a newer format version
/// - [`Error::TypeMismatch`] if the root is not of the expected type
/// - [`Error::UnknownType`], [`Error::InvalidData`] or [`Error::Io`] for a
///   damaged payload
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R: io::Read>(reader: R, expected: Option<DataType>) -> Result<DataValue> {
    from_reader_with_options(reader, expected, &BinaryOptions::default())
}

/// Decodes a binary stream from `reader` with custom limits.
///
/// # Errors
///
/// As [`from_reader`], plus [`Error::InvalidData`] when nesting exceeds
/// [`BinaryOptions::max_depth`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_with_options<R: io::Read>(
    mut reader: R,
    expected: Option<DataType>,
    options: &BinaryOptions,
) -> Result<DataValue> {
    binary::read(&mut reader, expected, options)
}

/// Decodes a binary stream held in memory.
///
/// # Examples
///
/// ```rust
/// use ubo::{from_slice, to_bytes, DataType, DataValue, Error};
///
/// let bytes = to_bytes(&DataValue::Int(7)).unwrap();
/// assert_eq!(from_slice(&bytes, None).unwrap(), DataValue::Int(7));
///
/// let err = from_slice(&bytes, Some(DataType::Map)).unwrap_err();
/// assert!(matches!(err, Error::TypeMismatch { expected: DataType::Map, found: 3 }));
/// ```
///
/// # Errors
///
/// See [`from_reader`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(bytes: &[u8], expected: Option<DataType>) -> Result<DataValue> {
    from_reader(bytes, expected)
}

/// Decodes a binary stream whose root must be the variant witnessed by `T`,
/// and unwraps it.
///
/// # Errors
///
/// See [`from_reader`]; a root of another type is [`Error::TypeMismatch`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_as<T: TypeWitness, R: io::Read>(reader: R) -> Result<T> {
    let value = from_reader(reader, Some(T::DATA_TYPE))?;
    unwrap_witness(value)
}

/// Decodes a binary stream held in memory into the witness type `T`.
///
/// # Errors
///
/// See [`from_reader_as`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_as<T: TypeWitness>(bytes: &[u8]) -> Result<T> {
    from_reader_as(bytes)
}

fn unwrap_witness<T: TypeWitness>(value: DataValue) -> Result<T> {
    let found = value.data_type();
    T::from_value(value).ok_or_else(|| {
        Error::invalid_data(format!("decoded {} where {} was expected", found, T::DATA_TYPE))
    })
}

/// Writes `value` to a binary file at `path`.
///
/// The stream is encoded completely before the file is created, so an encode
/// error leaves the filesystem untouched.
///
/// # Errors
///
/// Returns an error if encoding or any file operation fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_file<P: AsRef<Path>>(path: P, value: &DataValue) -> Result<()> {
    let bytes = to_bytes(value)?;
    fs::write(path.as_ref(), &bytes)?;
    debug!(path = %path.as_ref().display(), bytes = bytes.len(), "wrote binary file");
    Ok(())
}

/// Reads a binary file written by [`write_file`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not decode; see
/// [`from_reader`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_file<P: AsRef<Path>>(path: P, expected: Option<DataType>) -> Result<DataValue> {
    debug!(path = %path.as_ref().display(), "reading binary file");
    let file = File::open(path.as_ref())?;
    from_reader(BufReader::new(file), expected)
}

/// Encodes `value` as a gzip-compressed binary stream into `writer`.
///
/// # Errors
///
/// Returns an error if encoding, compression or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_compressed<W: io::Write>(writer: W, value: &DataValue) -> Result<()> {
    to_writer_compressed_with_options(writer, value, &BinaryOptions::default())
}

/// Encodes a gzip-compressed stream using [`BinaryOptions::compression_level`].
///
/// # Errors
///
/// Returns an error if encoding, compression or writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_compressed_with_options<W: io::Write>(
    writer: W,
    value: &DataValue,
    options: &BinaryOptions,
) -> Result<()> {
    compress::write(writer, value, options)
}

/// Encodes `value` as a gzip-compressed binary stream in memory.
///
/// # Examples
///
/// ```rust
/// use ubo::{from_slice_compressed, to_bytes_compressed, DataValue};
///
/// let value = DataValue::from("x".repeat(1000));
/// let bytes = to_bytes_compressed(&value).unwrap();
/// assert!(bytes.len() < 100);
/// assert_eq!(from_slice_compressed(&bytes, None).unwrap(), value);
/// ```
///
/// # Errors
///
/// Returns an error if encoding or compression fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_bytes_compressed(value: &DataValue) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    compress::write(&mut bytes, value, &BinaryOptions::default())?;
    Ok(bytes)
}

/// Decodes a gzip-compressed binary stream from `reader`.
///
/// # Errors
///
/// See [`from_reader`]; input that is not gzip is reported as [`Error::Io`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_compressed<R: io::Read>(
    reader: R,
    expected: Option<DataType>,
) -> Result<DataValue> {
    compress::read(reader, expected, &BinaryOptions::default())
}

/// Decodes a gzip-compressed binary stream held in memory.
///
/// # Errors
///
/// See [`from_reader_compressed`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_compressed(bytes: &[u8], expected: Option<DataType>) -> Result<DataValue> {
    from_reader_compressed(bytes, expected)
}

/// Writes `value` to a gzip-compressed file at `path`.
///
/// As with [`write_file`], nothing is created if encoding fails.
///
/// # Errors
///
/// Returns an error if encoding, compression or any file operation fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_file_compressed<P: AsRef<Path>>(path: P, value: &DataValue) -> Result<()> {
    let bytes = to_bytes_compressed(value)?;
    fs::write(path.as_ref(), &bytes)?;
    debug!(path = %path.as_ref().display(), bytes = bytes.len(), "wrote compressed file");
    Ok(())
}

/// Reads a gzip-compressed file written by [`write_file_compressed`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not decode.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn read_file_compressed<P: AsRef<Path>>(
    path: P,
    expected: Option<DataType>,
) -> Result<DataValue> {
    debug!(path = %path.as_ref().display(), "reading compressed file");
    let file = File::open(path.as_ref())?;
    from_reader_compressed(BufReader::new(file), expected)
}

/// Renders `value` as compact, single-line USO text.
///
/// As with [`to_bytes`], trees nested deeper than
/// [`options::DEFAULT_MAX_DEPTH`] need [`TextOptions::with_max_depth`] to be
/// parsed back.
///
/// # Examples
///
/// ```rust
/// use ubo::{to_text, DataValue};
///
/// assert_eq!(to_text(&DataValue::Long(5)), "5L");
/// assert_eq!(to_text(&DataValue::ByteArray(vec![1, 2])), "[B; 1b, 2b]");
/// ```
#[must_use]
pub fn to_text(value: &DataValue) -> String {
    ser::write_value(value, &TextOptions::default())
}

/// Renders `value` as USO text with one map entry or list element per line.
///
/// # Examples
///
/// ```rust
/// use ubo::{data, to_text_pretty};
///
/// assert_eq!(to_text_pretty(&data!({ "x": 1 })), "{\n  \"x\": 1\n}");
/// ```
#[must_use]
pub fn to_text_pretty(value: &DataValue) -> String {
    ser::write_value(value, &TextOptions::pretty())
}

/// Renders `value` as USO text with custom options.
#[must_use]
pub fn to_text_with_options(value: &DataValue, options: &TextOptions) -> String {
    ser::write_value(value, options)
}

/// Parses a USO document.
///
/// The whole input must be one value, optionally surrounded by whitespace.
///
/// # Examples
///
/// ```rust
/// use ubo::{from_text, DataValue, Error};
///
/// assert_eq!(from_text("5s").unwrap(), DataValue::Short(5));
///
/// let err = from_text("{\"a\": 5x}").unwrap_err();
/// assert!(matches!(err, Error::MalformedText { line: 1, col: 7, .. }));
/// ```
///
/// # Errors
///
/// Returns [`Error::MalformedText`] with the line and column of the first
/// problem.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_text(s: &str) -> Result<DataValue> {
    from_text_with_options(s, &TextOptions::default())
}

/// Parses a USO document with custom options.
///
/// # Errors
///
/// Returns [`Error::MalformedText`] with the line and column of the first
/// problem.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_text_with_options(s: &str, options: &TextOptions) -> Result<DataValue> {
    de::parse(s, options)
}
