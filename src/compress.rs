//! Gzip-wrapped binary streams.
//!
//! A compressed archive is exactly the output of [`binary::write`] passed
//! through a gzip encoder, so `gunzip` on an archive yields a plain binary
//! stream. Decoding applies the same header checks as the uncompressed path.

use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use std::io::{Read, Write};
use tracing::debug;

use crate::{binary, BinaryOptions, DataType, DataValue, Result};

/// Writes `value` as a gzip-compressed binary stream and finishes the gzip
/// trailer.
pub fn write<W: Write>(writer: W, value: &DataValue, options: &BinaryOptions) -> Result<()> {
    let mut encoder = GzEncoder::new(writer, Compression::new(options.compression_level));
    binary::write(&mut encoder, value)?;
    let mut writer = encoder.finish()?;
    writer.flush()?;
    debug!(
        root = %value.data_type(),
        level = options.compression_level,
        "wrote compressed stream"
    );
    Ok(())
}

/// Reads a gzip-compressed binary stream.
pub fn read<R: Read>(
    reader: R,
    expected: Option<DataType>,
    options: &BinaryOptions,
) -> Result<DataValue> {
    let mut decoder = GzDecoder::new(reader);
    binary::read(&mut decoder, expected, options)
}
