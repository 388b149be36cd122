//! Binary encoding.
//!
//! A stream is a fixed header followed by the root value's payload:
//!
//! ```text
//! offset 0  : u32  magic = 0xFF804269
//! offset 4  : u16  format version (currently 3)
//! offset 6  : u8   root type id
//! offset 7..: payload
//! ```
//!
//! All integers are big-endian. Payloads never carry their own type id; the
//! id is written by whoever holds the value (the header for the root, the map
//! entry for map values, once per list for list elements), and decoding
//! dispatches on it through the [registry](crate::registry).
//!
//! The header is validated completely before any payload byte is read: a bad
//! magic, a newer version or an unexpected root type is reported without
//! constructing anything.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use num_bigint::BigInt;
use std::io::{self, Read, Write};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::registry::{self, DataType};
use crate::{BigDecimal, BinaryOptions, BitSet, DataList, DataMap, DataValue, Error, Result};

/// Magic number opening every stream.
pub const MAGIC: u32 = 0xFF80_4269;

/// Newest format version this implementation reads and the one it writes.
pub const VERSION: u16 = 3;

/// Upper bound on capacity reserved from a length prefix before the data is
/// actually read.
const MAX_PREALLOC: usize = 4096;

/// The validated stream header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub version: u16,
    pub root_type: DataType,
}

/// Writes `value` as a complete stream: header, root type id and payload.
///
/// The writer is flushed before returning.
pub fn write<W: Write + ?Sized>(writer: &mut W, value: &DataValue) -> Result<()> {
    writer.write_u32::<BigEndian>(MAGIC)?;
    writer.write_u16::<BigEndian>(VERSION)?;
    writer.write_u8(value.data_type().id())?;
    write_payload(writer, value)?;
    writer.flush()?;
    trace!(root = %value.data_type(), "wrote binary stream");
    Ok(())
}

/// Reads and validates the header.
///
/// # Errors
///
/// - [`Error::CorruptStream`] if the magic number does not match
/// - [`Error::FutureVersion`] if the version is newer than [`VERSION`]
/// - [`Error::TypeMismatch`] if `expected` is given and differs from the root id
/// - [`Error::UnknownType`] if no expectation is given and the root id is unknown
pub fn read_header<R: Read + ?Sized>(reader: &mut R, expected: Option<DataType>) -> Result<Header> {
    let magic = reader.read_u32::<BigEndian>()?;
    if magic != MAGIC {
        return Err(Error::CorruptStream { found: magic });
    }

    let version = reader.read_u16::<BigEndian>()?;
    if version > VERSION {
        return Err(Error::FutureVersion {
            found: version,
            supported: VERSION,
        });
    }

    let id = reader.read_u8()?;
    if let Some(expected) = expected {
        if expected.id() != id {
            return Err(Error::TypeMismatch { expected, found: id });
        }
    }
    let root_type = DataType::from_id(id)?;

    debug!(version, root = %root_type, "accepted binary header");
    Ok(Header { version, root_type })
}

/// Reads a complete stream, optionally checking the root type first.
pub fn read<R: Read>(
    reader: &mut R,
    expected: Option<DataType>,
    options: &BinaryOptions,
) -> Result<DataValue> {
    let header = read_header(reader, expected)?;
    let mut decoder = Decoder {
        reader,
        depth: 0,
        max_depth: options.max_depth,
    };
    registry::decode(header.root_type.id(), &mut decoder)
}

fn write_len<W: Write + ?Sized>(w: &mut W, len: usize) -> Result<()> {
    let len = u32::try_from(len)
        .map_err(|_| Error::invalid_data(format!("length {} exceeds u32::MAX", len)))?;
    w.write_u32::<BigEndian>(len)?;
    Ok(())
}

fn write_big_int<W: Write + ?Sized>(w: &mut W, value: &BigInt) -> Result<()> {
    let bytes = value.to_signed_bytes_be();
    write_len(w, bytes.len())?;
    w.write_all(&bytes)?;
    Ok(())
}

/// Writes the payload of `value`, without its type id.
pub fn write_payload<W: Write + ?Sized>(w: &mut W, value: &DataValue) -> Result<()> {
    match value {
        DataValue::Byte(v) => w.write_i8(*v)?,
        DataValue::Short(v) => w.write_i16::<BigEndian>(*v)?,
        DataValue::Int(v) => w.write_i32::<BigEndian>(*v)?,
        DataValue::Long(v) => w.write_i64::<BigEndian>(*v)?,
        DataValue::BigInt(v) => write_big_int(w, v)?,
        DataValue::Float(v) => w.write_f32::<BigEndian>(*v)?,
        DataValue::Double(v) => w.write_f64::<BigEndian>(*v)?,
        DataValue::BigDecimal(v) => {
            w.write_i32::<BigEndian>(v.scale())?;
            write_big_int(w, v.unscaled())?;
        }
        DataValue::Char(v) => w.write_u16::<BigEndian>(*v)?,
        DataValue::Boolean(v) => w.write_u8(u8::from(*v))?,
        DataValue::String(s) => {
            write_len(w, s.len())?;
            w.write_all(s.as_bytes())?;
        }
        DataValue::List(list) => {
            write_len(w, list.len())?;
            w.write_u8(list.element_type().id())?;
            for element in list {
                write_payload(w, element)?;
            }
        }
        DataValue::Map(map) => {
            write_len(w, map.len())?;
            for (key, child) in map {
                let key_len = u16::try_from(key.len()).map_err(|_| {
                    Error::invalid_data(format!("map key of {} bytes exceeds u16::MAX", key.len()))
                })?;
                w.write_u16::<BigEndian>(key_len)?;
                w.write_all(key.as_bytes())?;
                w.write_u8(child.data_type().id())?;
                write_payload(w, child)?;
            }
        }
        DataValue::ByteArray(items) => {
            write_len(w, items.len())?;
            let bytes: Vec<u8> = items.iter().map(|b| *b as u8).collect();
            w.write_all(&bytes)?;
        }
        DataValue::ShortArray(items) => {
            write_len(w, items.len())?;
            for item in items {
                w.write_i16::<BigEndian>(*item)?;
            }
        }
        DataValue::IntArray(items) => {
            write_len(w, items.len())?;
            for item in items {
                w.write_i32::<BigEndian>(*item)?;
            }
        }
        DataValue::LongArray(items) => {
            write_len(w, items.len())?;
            for item in items {
                w.write_i64::<BigEndian>(*item)?;
            }
        }
        DataValue::FloatArray(items) => {
            write_len(w, items.len())?;
            for item in items {
                w.write_f32::<BigEndian>(*item)?;
            }
        }
        DataValue::DoubleArray(items) => {
            write_len(w, items.len())?;
            for item in items {
                w.write_f64::<BigEndian>(*item)?;
            }
        }
        DataValue::CharArray(items) => {
            write_len(w, items.len())?;
            for item in items {
                w.write_u16::<BigEndian>(*item)?;
            }
        }
        DataValue::BitSet(bits) => {
            let bytes = bits.as_bytes();
            write_len(w, bytes.len())?;
            w.write_all(bytes)?;
        }
        DataValue::Uuid(uuid) => {
            let (high, low) = uuid.as_u64_pair();
            w.write_u64::<BigEndian>(high)?;
            w.write_u64::<BigEndian>(low)?;
        }
    }
    Ok(())
}

/// Payload reader handed to the registered decode routines.
pub(crate) struct Decoder<'r> {
    reader: &'r mut dyn Read,
    depth: usize,
    max_depth: usize,
}

impl<'r> Decoder<'r> {
    #[cfg(test)]
    pub(crate) fn new(reader: &'r mut dyn Read, max_depth: usize) -> Self {
        Decoder {
            reader,
            depth: 0,
            max_depth,
        }
    }

    fn read_len(&mut self) -> Result<usize> {
        Ok(self.reader.read_u32::<BigEndian>()? as usize)
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
        let read = (&mut *self.reader).take(len as u64).read_to_end(&mut buf)?;
        if read != len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("expected {} bytes, stream ended after {}", len, read),
            )
            .into());
        }
        Ok(buf)
    }

    fn read_utf8(&mut self, len: usize) -> Result<String> {
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes).map_err(|e| Error::invalid_data(format!("invalid UTF-8: {}", e)))
    }

    fn read_big_int(&mut self) -> Result<BigInt> {
        let len = self.read_len()?;
        let bytes = self.read_bytes(len)?;
        Ok(BigInt::from_signed_bytes_be(&bytes))
    }

    fn read_array<T>(&mut self, read: fn(&mut dyn Read) -> io::Result<T>) -> Result<Vec<T>> {
        let len = self.read_len()?;
        let mut items = Vec::with_capacity(len.min(MAX_PREALLOC));
        for _ in 0..len {
            items.push(read(&mut *self.reader)?);
        }
        Ok(items)
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(Error::invalid_data(format!(
                "nesting deeper than {} containers",
                self.max_depth
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

pub(crate) fn read_byte(d: &mut Decoder<'_>) -> Result<DataValue> {
    Ok(DataValue::Byte(d.reader.read_i8()?))
}

pub(crate) fn read_short(d: &mut Decoder<'_>) -> Result<DataValue> {
    Ok(DataValue::Short(d.reader.read_i16::<BigEndian>()?))
}

pub(crate) fn read_int(d: &mut Decoder<'_>) -> Result<DataValue> {
    Ok(DataValue::Int(d.reader.read_i32::<BigEndian>()?))
}

pub(crate) fn read_long(d: &mut Decoder<'_>) -> Result<DataValue> {
    Ok(DataValue::Long(d.reader.read_i64::<BigEndian>()?))
}

pub(crate) fn read_big_int(d: &mut Decoder<'_>) -> Result<DataValue> {
    Ok(DataValue::BigInt(d.read_big_int()?))
}

pub(crate) fn read_float(d: &mut Decoder<'_>) -> Result<DataValue> {
    Ok(DataValue::Float(d.reader.read_f32::<BigEndian>()?))
}

pub(crate) fn read_double(d: &mut Decoder<'_>) -> Result<DataValue> {
    Ok(DataValue::Double(d.reader.read_f64::<BigEndian>()?))
}

pub(crate) fn read_big_decimal(d: &mut Decoder<'_>) -> Result<DataValue> {
    let scale = d.reader.read_i32::<BigEndian>()?;
    let unscaled = d.read_big_int()?;
    Ok(DataValue::BigDecimal(BigDecimal::new(unscaled, scale)))
}

pub(crate) fn read_char(d: &mut Decoder<'_>) -> Result<DataValue> {
    Ok(DataValue::Char(d.reader.read_u16::<BigEndian>()?))
}

pub(crate) fn read_boolean(d: &mut Decoder<'_>) -> Result<DataValue> {
    // any nonzero byte reads as true
    Ok(DataValue::Boolean(d.reader.read_u8()? != 0))
}

pub(crate) fn read_string(d: &mut Decoder<'_>) -> Result<DataValue> {
    let len = d.read_len()?;
    Ok(DataValue::String(d.read_utf8(len)?))
}

pub(crate) fn read_list(d: &mut Decoder<'_>) -> Result<DataValue> {
    d.enter()?;
    let len = d.read_len()?;
    let element = registry::lookup(d.reader.read_u8()?)?;
    let mut list = DataList::with_capacity(element.data_type, len.min(MAX_PREALLOC));
    for _ in 0..len {
        list.push((element.decode)(d)?)?;
    }
    d.leave();
    Ok(DataValue::List(list))
}

pub(crate) fn read_map(d: &mut Decoder<'_>) -> Result<DataValue> {
    d.enter()?;
    let len = d.read_len()?;
    let mut map = DataMap::with_capacity(len.min(MAX_PREALLOC));
    for _ in 0..len {
        let key_len = d.reader.read_u16::<BigEndian>()? as usize;
        let key = d.read_utf8(key_len)?;
        let id = d.reader.read_u8()?;
        let value = registry::decode(id, d)?;
        map.put(key, value);
    }
    d.leave();
    Ok(DataValue::Map(map))
}

pub(crate) fn read_byte_array(d: &mut Decoder<'_>) -> Result<DataValue> {
    let len = d.read_len()?;
    let bytes = d.read_bytes(len)?;
    Ok(DataValue::ByteArray(bytes.into_iter().map(|b| b as i8).collect()))
}

pub(crate) fn read_short_array(d: &mut Decoder<'_>) -> Result<DataValue> {
    Ok(DataValue::ShortArray(d.read_array(|r| r.read_i16::<BigEndian>())?))
}

pub(crate) fn read_int_array(d: &mut Decoder<'_>) -> Result<DataValue> {
    Ok(DataValue::IntArray(d.read_array(|r| r.read_i32::<BigEndian>())?))
}

pub(crate) fn read_long_array(d: &mut Decoder<'_>) -> Result<DataValue> {
    Ok(DataValue::LongArray(d.read_array(|r| r.read_i64::<BigEndian>())?))
}

pub(crate) fn read_float_array(d: &mut Decoder<'_>) -> Result<DataValue> {
    Ok(DataValue::FloatArray(d.read_array(|r| r.read_f32::<BigEndian>())?))
}

pub(crate) fn read_double_array(d: &mut Decoder<'_>) -> Result<DataValue> {
    Ok(DataValue::DoubleArray(d.read_array(|r| r.read_f64::<BigEndian>())?))
}

pub(crate) fn read_char_array(d: &mut Decoder<'_>) -> Result<DataValue> {
    Ok(DataValue::CharArray(d.read_array(|r| r.read_u16::<BigEndian>())?))
}

pub(crate) fn read_bit_set(d: &mut Decoder<'_>) -> Result<DataValue> {
    let len = d.read_len()?;
    Ok(DataValue::BitSet(BitSet::from_bytes(d.read_bytes(len)?)))
}

pub(crate) fn read_uuid(d: &mut Decoder<'_>) -> Result<DataValue> {
    let high = d.reader.read_u64::<BigEndian>()?;
    let low = d.reader.read_u64::<BigEndian>()?;
    Ok(DataValue::Uuid(Uuid::from_u64_pair(high, low)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn payload(value: &DataValue) -> Vec<u8> {
        let mut buf = Vec::new();
        write_payload(&mut buf, value).unwrap();
        buf
    }

    fn decode(id: DataType, bytes: &[u8]) -> Result<DataValue> {
        let mut cursor = Cursor::new(bytes);
        let mut decoder = Decoder::new(&mut cursor, 8);
        registry::decode(id.id(), &mut decoder)
    }

    #[test]
    fn test_empty_map_stream_layout() {
        let mut buf = Vec::new();
        write(&mut buf, &DataValue::Map(DataMap::new())).unwrap();
        assert_eq!(
            buf,
            vec![0xFF, 0x80, 0x42, 0x69, 0x00, 0x03, 0x0D, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_scalar_payloads_are_big_endian() {
        assert_eq!(payload(&DataValue::Short(0x0102)), vec![0x01, 0x02]);
        assert_eq!(payload(&DataValue::Int(1)), vec![0, 0, 0, 1]);
        assert_eq!(payload(&DataValue::Char(0x41)), vec![0x00, 0x41]);
        assert_eq!(payload(&DataValue::Boolean(true)), vec![1]);
        assert_eq!(
            payload(&DataValue::from("hi")),
            vec![0, 0, 0, 2, b'h', b'i']
        );
    }

    #[test]
    fn test_list_writes_one_element_id() {
        let list = DataList::infer(vec![DataValue::Byte(1), DataValue::Byte(2)]).unwrap();
        assert_eq!(
            payload(&DataValue::List(list)),
            vec![0, 0, 0, 2, DataType::Byte.id(), 1, 2]
        );
    }

    #[test]
    fn test_map_entry_layout() {
        let mut map = DataMap::new();
        map.put_byte("k", 7);
        assert_eq!(
            payload(&DataValue::Map(map)),
            vec![0, 0, 0, 1, 0, 1, b'k', DataType::Byte.id(), 7]
        );
    }

    #[test]
    fn test_big_numbers_round_trip() {
        let big = DataValue::BigInt(BigInt::from(-1234567890123456789i64) * 1000);
        assert_eq!(decode(DataType::BigInt, &payload(&big)).unwrap(), big);

        let dec = DataValue::BigDecimal("-0.0050".parse().unwrap());
        assert_eq!(decode(DataType::BigDecimal, &payload(&dec)).unwrap(), dec);
    }

    #[test]
    fn test_truncated_payload_is_io_error() {
        let err = decode(DataType::String, &[0, 0, 0, 5, b'a']).unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_huge_length_prefix_does_not_preallocate() {
        let err = decode(DataType::LongArray, &[0xFF, 0xFF, 0xFF, 0xFF]).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let err = decode(DataType::String, &[0, 0, 0, 1, 0xFF]).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_unknown_child_id_is_rejected() {
        let err = decode(DataType::Map, &[0, 0, 0, 1, 0, 1, b'k', 0x7F]).unwrap_err();
        assert!(matches!(err, Error::UnknownType(0x7F)));
    }

    #[test]
    fn test_depth_limit() {
        let mut value = DataValue::Map(DataMap::new());
        for _ in 0..10 {
            let mut outer = DataMap::new();
            outer.put("inner", value);
            value = DataValue::Map(outer);
        }
        let err = decode(DataType::Map, &payload(&value)).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_oversized_key_fails_to_encode() {
        let mut map = DataMap::new();
        map.put_int("k".repeat(70_000), 1);
        let mut buf = Vec::new();
        assert!(matches!(
            write_payload(&mut buf, &DataValue::Map(map)),
            Err(Error::InvalidData(_))
        ));
    }
}
