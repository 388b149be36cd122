//! The value model.
//!
//! This module provides [`DataValue`], the closed tagged union every document
//! is built from. Each variant owns its payload outright; containers own their
//! children, so [`Clone`] is always a deep copy.
//!
//! ## Core Types
//!
//! - [`DataValue`]: scalars, fixed-width arrays, bit sets, UUIDs, lists and maps
//! - [`TypeWitness`]: Rust types that stand for one variant, used for typed decoding
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use ubo::{DataMap, DataValue};
//!
//! let byte = DataValue::from(1i8);
//! let short = DataValue::from(1i16);
//! let text = DataValue::from("hello");
//!
//! // Same number, different variants.
//! assert_ne!(byte, short);
//! assert_eq!(text.as_str(), Some("hello"));
//!
//! let mut map = DataMap::new();
//! map.put("text", text);
//! let root = DataValue::from(map);
//! assert!(root.is_map());
//! ```
//!
//! ### Deep Copies
//!
//! ```rust
//! use ubo::{DataMap, DataValue};
//!
//! let mut inner = DataMap::new();
//! inner.put_int("x", 1);
//! let mut outer = DataMap::new();
//! outer.put_map("inner", inner);
//!
//! let mut copy = outer.clone();
//! copy.get_map_mut("inner").unwrap().put_int("x", 2);
//!
//! assert_eq!(outer.get_map("inner").unwrap().get_int("x", 0), 1);
//! ```

use num_bigint::BigInt;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::{BigDecimal, BitSet, DataList, DataMap, DataType, Error};

/// A dynamically-typed value of the format.
///
/// Equality is structural: containers compare their children, maps ignore
/// entry order, and floating-point payloads compare by bit pattern, so a value
/// holding `NaN` is equal to itself after a round trip.
///
/// # Examples
///
/// ```rust
/// use ubo::{DataType, DataValue};
///
/// let value = DataValue::Short(5);
/// assert_eq!(value.data_type(), DataType::Short);
/// assert_eq!(value.as_short(), Some(5));
/// assert_eq!(value.as_int(), None);
/// assert_eq!(value.to_string(), "5s");
/// ```
#[derive(Clone, Debug)]
pub enum DataValue {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    BigInt(BigInt),
    Float(f32),
    Double(f64),
    BigDecimal(BigDecimal),
    /// A single UTF-16 code unit.
    Char(u16),
    Boolean(bool),
    String(String),
    List(DataList),
    Map(DataMap),
    ByteArray(Vec<i8>),
    ShortArray(Vec<i16>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    FloatArray(Vec<f32>),
    DoubleArray(Vec<f64>),
    CharArray(Vec<u16>),
    BitSet(BitSet),
    Uuid(Uuid),
}

impl DataValue {
    /// Returns the variant's [`DataType`], whose id is its wire identifier.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            DataValue::Byte(_) => DataType::Byte,
            DataValue::Short(_) => DataType::Short,
            DataValue::Int(_) => DataType::Int,
            DataValue::Long(_) => DataType::Long,
            DataValue::BigInt(_) => DataType::BigInt,
            DataValue::Float(_) => DataType::Float,
            DataValue::Double(_) => DataType::Double,
            DataValue::BigDecimal(_) => DataType::BigDecimal,
            DataValue::Char(_) => DataType::Char,
            DataValue::Boolean(_) => DataType::Boolean,
            DataValue::String(_) => DataType::String,
            DataValue::List(_) => DataType::List,
            DataValue::Map(_) => DataType::Map,
            DataValue::ByteArray(_) => DataType::ByteArray,
            DataValue::ShortArray(_) => DataType::ShortArray,
            DataValue::IntArray(_) => DataType::IntArray,
            DataValue::LongArray(_) => DataType::LongArray,
            DataValue::FloatArray(_) => DataType::FloatArray,
            DataValue::DoubleArray(_) => DataType::DoubleArray,
            DataValue::CharArray(_) => DataType::CharArray,
            DataValue::BitSet(_) => DataType::BitSet,
            DataValue::Uuid(_) => DataType::Uuid,
        }
    }

    /// Returns `true` if the value is a map.
    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, DataValue::Map(_))
    }

    /// Returns `true` if the value is a list.
    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, DataValue::List(_))
    }

    /// Returns `true` if the value is a string.
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, DataValue::String(_))
    }

    /// Returns `true` for any integral scalar, including big integers.
    #[inline]
    #[must_use]
    pub const fn is_integral(&self) -> bool {
        matches!(
            self,
            DataValue::Byte(_)
                | DataValue::Short(_)
                | DataValue::Int(_)
                | DataValue::Long(_)
                | DataValue::BigInt(_)
        )
    }

    /// Returns `true` for any floating scalar, including big decimals.
    #[inline]
    #[must_use]
    pub const fn is_floating(&self) -> bool {
        matches!(
            self,
            DataValue::Float(_) | DataValue::Double(_) | DataValue::BigDecimal(_)
        )
    }

    #[inline]
    #[must_use]
    pub fn as_byte(&self) -> Option<i8> {
        match self {
            DataValue::Byte(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_short(&self) -> Option<i16> {
        match self {
            DataValue::Short(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            DataValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_long(&self) -> Option<i64> {
        match self {
            DataValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_big_int(&self) -> Option<&BigInt> {
        match self {
            DataValue::BigInt(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_float(&self) -> Option<f32> {
        match self {
            DataValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            DataValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_big_decimal(&self) -> Option<&BigDecimal> {
        match self {
            DataValue::BigDecimal(v) => Some(v),
            _ => None,
        }
    }

    /// If the value is a char, returns its UTF-16 code unit.
    #[inline]
    #[must_use]
    pub fn as_char(&self) -> Option<u16> {
        match self {
            DataValue::Char(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// If the value is a string, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&DataList> {
        match self {
            DataValue::List(list) => Some(list),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list_mut(&mut self) -> Option<&mut DataList> {
        match self {
            DataValue::List(list) => Some(list),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&DataMap> {
        match self {
            DataValue::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map_mut(&mut self) -> Option<&mut DataMap> {
        match self {
            DataValue::Map(map) => Some(map),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bit_set(&self) -> Option<&BitSet> {
        match self {
            DataValue::BitSet(bits) => Some(bits),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            DataValue::Uuid(uuid) => Some(*uuid),
            _ => None,
        }
    }
}

fn f32_slices_eq(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

fn f64_slices_eq(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

impl PartialEq for DataValue {
    fn eq(&self, other: &Self) -> bool {
        use DataValue as V;

        match (self, other) {
            (V::Byte(a), V::Byte(b)) => a == b,
            (V::Short(a), V::Short(b)) => a == b,
            (V::Int(a), V::Int(b)) => a == b,
            (V::Long(a), V::Long(b)) => a == b,
            (V::BigInt(a), V::BigInt(b)) => a == b,
            (V::Float(a), V::Float(b)) => a.to_bits() == b.to_bits(),
            (V::Double(a), V::Double(b)) => a.to_bits() == b.to_bits(),
            (V::BigDecimal(a), V::BigDecimal(b)) => a == b,
            (V::Char(a), V::Char(b)) => a == b,
            (V::Boolean(a), V::Boolean(b)) => a == b,
            (V::String(a), V::String(b)) => a == b,
            (V::List(a), V::List(b)) => a == b,
            (V::Map(a), V::Map(b)) => a == b,
            (V::ByteArray(a), V::ByteArray(b)) => a == b,
            (V::ShortArray(a), V::ShortArray(b)) => a == b,
            (V::IntArray(a), V::IntArray(b)) => a == b,
            (V::LongArray(a), V::LongArray(b)) => a == b,
            (V::FloatArray(a), V::FloatArray(b)) => f32_slices_eq(a, b),
            (V::DoubleArray(a), V::DoubleArray(b)) => f64_slices_eq(a, b),
            (V::CharArray(a), V::CharArray(b)) => a == b,
            (V::BitSet(a), V::BitSet(b)) => a == b,
            (V::Uuid(a), V::Uuid(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for DataValue {
    /// Formats the value as compact USO text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::to_text(self))
    }
}

impl FromStr for DataValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::from_text(s)
    }
}

impl Serialize for DataValue {
    /// Maps the value onto the serde data model.
    ///
    /// Variant identity is not preserved: arbitrary-precision numbers and UUIDs
    /// become strings, bit sets become the sequence of set indices, and chars
    /// that are not valid scalar values are emitted as their code unit.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DataValue::Byte(v) => serializer.serialize_i8(*v),
            DataValue::Short(v) => serializer.serialize_i16(*v),
            DataValue::Int(v) => serializer.serialize_i32(*v),
            DataValue::Long(v) => serializer.serialize_i64(*v),
            DataValue::BigInt(v) => serializer.serialize_str(&v.to_string()),
            DataValue::Float(v) => serializer.serialize_f32(*v),
            DataValue::Double(v) => serializer.serialize_f64(*v),
            DataValue::BigDecimal(v) => serializer.serialize_str(&v.to_string()),
            DataValue::Char(v) => match char::from_u32(u32::from(*v)) {
                Some(c) => serializer.serialize_char(c),
                None => serializer.serialize_u16(*v),
            },
            DataValue::Boolean(v) => serializer.serialize_bool(*v),
            DataValue::String(v) => serializer.serialize_str(v),
            DataValue::List(list) => list.serialize(serializer),
            DataValue::Map(map) => map.serialize(serializer),
            DataValue::ByteArray(v) => v.serialize(serializer),
            DataValue::ShortArray(v) => v.serialize(serializer),
            DataValue::IntArray(v) => v.serialize(serializer),
            DataValue::LongArray(v) => v.serialize(serializer),
            DataValue::FloatArray(v) => v.serialize(serializer),
            DataValue::DoubleArray(v) => v.serialize(serializer),
            DataValue::CharArray(v) => v.serialize(serializer),
            DataValue::BitSet(bits) => serializer.collect_seq(bits.ones()),
            DataValue::Uuid(uuid) => serializer.serialize_str(&uuid.hyphenated().to_string()),
        }
    }
}

impl Serialize for DataList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

impl Serialize for DataMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A Rust type standing for exactly one [`DataValue`] variant.
///
/// Passing a witness to [`from_slice_as`](crate::from_slice_as) checks the root
/// type id in the stream header before anything is decoded, then unwraps the
/// decoded root into the witness type.
///
/// # Examples
///
/// ```rust
/// use ubo::{from_slice_as, to_bytes, DataMap, DataValue, Error};
///
/// let bytes = to_bytes(&DataValue::from(DataMap::new())).unwrap();
///
/// let map: DataMap = from_slice_as(&bytes).unwrap();
/// assert!(map.is_empty());
///
/// let err = from_slice_as::<String>(&bytes).unwrap_err();
/// assert!(matches!(err, Error::TypeMismatch { .. }));
/// ```
pub trait TypeWitness: Sized {
    /// The variant this type stands for.
    const DATA_TYPE: DataType;

    /// Unwraps a value of the witnessed variant.
    fn from_value(value: DataValue) -> Option<Self>;
}

macro_rules! value_conversions {
    ($($variant:ident($ty:ty);)*) => {
        $(
            impl From<$ty> for DataValue {
                fn from(value: $ty) -> Self {
                    DataValue::$variant(value)
                }
            }

            impl TypeWitness for $ty {
                const DATA_TYPE: DataType = DataType::$variant;

                fn from_value(value: DataValue) -> Option<Self> {
                    match value {
                        DataValue::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

value_conversions! {
    Byte(i8);
    Short(i16);
    Int(i32);
    Long(i64);
    BigInt(BigInt);
    Float(f32);
    Double(f64);
    BigDecimal(BigDecimal);
    Char(u16);
    Boolean(bool);
    String(String);
    List(DataList);
    Map(DataMap);
    ByteArray(Vec<i8>);
    ShortArray(Vec<i16>);
    IntArray(Vec<i32>);
    LongArray(Vec<i64>);
    FloatArray(Vec<f32>);
    DoubleArray(Vec<f64>);
    CharArray(Vec<u16>);
    BitSet(BitSet);
    Uuid(Uuid);
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<char> for DataValue {
    /// Stores a char as one UTF-16 code unit.
    ///
    /// Characters outside the Basic Multilingual Plane need two code units and
    /// keep only the first (high surrogate); use a string for those.
    fn from(value: char) -> Self {
        let mut units = [0u16; 2];
        DataValue::Char(value.encode_utf16(&mut units)[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_with_same_number_differ() {
        assert_ne!(DataValue::Byte(5), DataValue::Short(5));
        assert_ne!(DataValue::Int(5), DataValue::Long(5));
        assert_ne!(DataValue::Float(1.0), DataValue::Double(1.0));
        assert_eq!(DataValue::from(5i16), DataValue::Short(5));
    }

    #[test]
    fn test_float_equality_is_bitwise() {
        assert_eq!(DataValue::Double(f64::NAN), DataValue::Double(f64::NAN));
        assert_ne!(DataValue::Double(0.0), DataValue::Double(-0.0));
        assert_eq!(
            DataValue::FloatArray(vec![f32::NAN, 1.0]),
            DataValue::FloatArray(vec![f32::NAN, 1.0])
        );
        assert_ne!(
            DataValue::DoubleArray(vec![1.0]),
            DataValue::DoubleArray(vec![1.0, 2.0])
        );
    }

    #[test]
    fn test_accessors() {
        let value = DataValue::from("hello");
        assert!(value.is_string());
        assert_eq!(value.as_str(), Some("hello"));
        assert_eq!(value.as_int(), None);

        assert!(DataValue::Long(1).is_integral());
        assert!(DataValue::BigDecimal(BigDecimal::from(1)).is_floating());
        assert_eq!(DataValue::from('a').as_char(), Some(u16::from(b'a')));
    }

    #[test]
    fn test_clone_is_deep() {
        let mut inner = DataMap::new();
        inner.put_int("x", 1);
        let mut list = DataList::new(DataType::Map);
        list.push(inner).unwrap();
        let original = DataValue::from(list);

        let mut copy = original.clone();
        copy.as_list_mut()
            .unwrap()
            .get_mut(0)
            .unwrap()
            .as_map_mut()
            .unwrap()
            .put_int("x", 2);

        let first = original.as_list().unwrap().get(0).unwrap();
        assert_eq!(first.as_map().unwrap().get_int("x", 0), 1);
        assert_ne!(original, copy);
    }

    #[test]
    fn test_serialize_to_json() {
        let mut map = DataMap::new();
        map.put_short("count", 5);
        map.put_big_int("big", BigInt::from(12));
        map.put_bit_set("bits", BitSet::from_iter([1, 4]));

        let json = serde_json::to_value(&DataValue::from(map)).unwrap();
        assert_eq!(json["count"], 5);
        assert_eq!(json["big"], "12");
        assert_eq!(json["bits"], serde_json::json!([1, 4]));
    }

    #[test]
    fn test_witness_unwraps_only_its_variant() {
        assert_eq!(i16::from_value(DataValue::Short(3)), Some(3));
        assert_eq!(i16::from_value(DataValue::Int(3)), None);
        assert_eq!(<DataMap as TypeWitness>::DATA_TYPE, DataType::Map);
    }
}
