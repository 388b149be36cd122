//! The type registry: one wire identifier per [`DataValue`] variant.
//!
//! [`DataType`] names every variant of the value model. Its discriminant is the
//! one-byte identifier written before each tagged payload in the binary format,
//! and [`REGISTRY`] pairs each identifier with the routine that decodes its
//! payload. Both directions go through this module:
//!
//! - encoding writes [`DataValue::data_type`]`().id()`
//! - decoding looks the byte up with [`lookup`] and calls the registered routine
//!
//! Identifiers are permanent. New variants may only be appended with fresh ids.
//!
//! ```rust
//! use ubo::DataType;
//!
//! assert_eq!(DataType::Map.id(), 0x0D);
//! assert_eq!(DataType::from_id(0x0D).unwrap(), DataType::Map);
//! assert!(DataType::from_id(0xEE).is_err());
//! ```

use std::fmt;

use crate::binary::{self, Decoder};
use crate::{DataValue, Error, Result};

/// The kind of a [`DataValue`], without its payload.
///
/// Used as the type witness for decoding, as the element type of a
/// [`DataList`](crate::DataList), and as the wire identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DataType {
    Byte = 0x01,
    Short = 0x02,
    Int = 0x03,
    Long = 0x04,
    BigInt = 0x05,
    Float = 0x06,
    Double = 0x07,
    BigDecimal = 0x08,
    Char = 0x09,
    Boolean = 0x0A,
    String = 0x0B,
    List = 0x0C,
    Map = 0x0D,
    ByteArray = 0x0E,
    ShortArray = 0x0F,
    IntArray = 0x10,
    LongArray = 0x11,
    FloatArray = 0x12,
    DoubleArray = 0x13,
    CharArray = 0x14,
    BitSet = 0x15,
    Uuid = 0x16,
}

/// Signature of a payload decoder. The type id has already been consumed.
pub(crate) type DecodeFn = fn(&mut Decoder<'_>) -> Result<DataValue>;

/// One row of the registry.
pub struct Registration {
    pub data_type: DataType,
    pub name: &'static str,
    pub(crate) decode: DecodeFn,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("data_type", &self.data_type)
            .field("name", &self.name)
            .finish()
    }
}

macro_rules! register {
    ($ty:ident, $name:literal, $decode:path) => {
        Registration {
            data_type: DataType::$ty,
            name: $name,
            decode: $decode,
        }
    };
}

/// Every registered variant, indexed by `id - 1`.
pub static REGISTRY: [Registration; 22] = [
    register!(Byte, "byte", binary::read_byte),
    register!(Short, "short", binary::read_short),
    register!(Int, "int", binary::read_int),
    register!(Long, "long", binary::read_long),
    register!(BigInt, "bigint", binary::read_big_int),
    register!(Float, "float", binary::read_float),
    register!(Double, "double", binary::read_double),
    register!(BigDecimal, "bigdec", binary::read_big_decimal),
    register!(Char, "char", binary::read_char),
    register!(Boolean, "boolean", binary::read_boolean),
    register!(String, "string", binary::read_string),
    register!(List, "list", binary::read_list),
    register!(Map, "map", binary::read_map),
    register!(ByteArray, "byte_array", binary::read_byte_array),
    register!(ShortArray, "short_array", binary::read_short_array),
    register!(IntArray, "int_array", binary::read_int_array),
    register!(LongArray, "long_array", binary::read_long_array),
    register!(FloatArray, "float_array", binary::read_float_array),
    register!(DoubleArray, "double_array", binary::read_double_array),
    register!(CharArray, "char_array", binary::read_char_array),
    register!(BitSet, "bitset", binary::read_bit_set),
    register!(Uuid, "uuid", binary::read_uuid),
];

/// Finds the registration for a wire identifier.
///
/// # Errors
///
/// Returns [`Error::UnknownType`] if no variant is registered under `id`.
pub fn lookup(id: u8) -> Result<&'static Registration> {
    id.checked_sub(1)
        .and_then(|index| REGISTRY.get(index as usize))
        .ok_or(Error::UnknownType(id))
}

/// Decodes the payload registered under `id` from `decoder`.
pub(crate) fn decode(id: u8, decoder: &mut Decoder<'_>) -> Result<DataValue> {
    let registration = lookup(id)?;
    (registration.decode)(decoder)
}

impl DataType {
    /// All variants in identifier order.
    pub const ALL: [DataType; 22] = [
        DataType::Byte,
        DataType::Short,
        DataType::Int,
        DataType::Long,
        DataType::BigInt,
        DataType::Float,
        DataType::Double,
        DataType::BigDecimal,
        DataType::Char,
        DataType::Boolean,
        DataType::String,
        DataType::List,
        DataType::Map,
        DataType::ByteArray,
        DataType::ShortArray,
        DataType::IntArray,
        DataType::LongArray,
        DataType::FloatArray,
        DataType::DoubleArray,
        DataType::CharArray,
        DataType::BitSet,
        DataType::Uuid,
    ];

    /// Returns the wire identifier.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Resolves a wire identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownType`] for identifiers outside the registry.
    pub fn from_id(id: u8) -> Result<Self> {
        lookup(id).map(|registration| registration.data_type)
    }

    /// Returns the lowercase name used in USO list headers and messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        REGISTRY[(self.id() - 1) as usize].name
    }

    /// Resolves a name produced by [`DataType::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        REGISTRY
            .iter()
            .find(|registration| registration.name == name)
            .map(|registration| registration.data_type)
    }

    /// Returns `true` for the fixed-width numeric and char array variants.
    #[inline]
    #[must_use]
    pub const fn is_array(self) -> bool {
        matches!(
            self,
            DataType::ByteArray
                | DataType::ShortArray
                | DataType::IntArray
                | DataType::LongArray
                | DataType::FloatArray
                | DataType::DoubleArray
                | DataType::CharArray
        )
    }

    /// Returns `true` for lists and maps.
    #[inline]
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, DataType::List | DataType::Map)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for DataType {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self> {
        DataType::from_id(id)
    }
}
