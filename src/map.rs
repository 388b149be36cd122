//! String-keyed maps of values.
//!
//! This module provides [`DataMap`], a wrapper around [`IndexMap`] keyed by
//! UTF-8 strings. Keys are unique and inserting an existing key overwrites its
//! value.
//!
//! ## Ordering
//!
//! Key order carries no meaning: two maps with the same entries are equal
//! whatever order they were built in. `IndexMap` is still used so that the USO
//! writer and the binary encoder emit entries in insertion order, which keeps
//! output deterministic for a given construction sequence.
//!
//! ## Typed accessors
//!
//! Every variant has a `put_<kind>` / `get_<kind>` pair. Getters take a default
//! that is returned when the key is absent *or* holds another variant; a wrong
//! variant is never an error at this level.
//!
//! ```rust
//! use ubo::DataMap;
//!
//! let mut map = DataMap::new();
//! map.put_string("k", "not a number");
//!
//! assert_eq!(map.get_int("k", 7), 7);
//! assert_eq!(map.get_str("k", ""), "not a number");
//! ```

use indexmap::IndexMap;
use num_bigint::BigInt;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{BigDecimal, BitSet, DataList, DataType, DataValue};

/// A map of unique string keys to values.
///
/// # Examples
///
/// ```rust
/// use ubo::{DataMap, DataValue};
///
/// let mut map = DataMap::new();
/// map.put("name", DataValue::from("abc"));
/// map.put_short("count", 5);
///
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get_short("count", 0), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataMap(IndexMap<String, DataValue>);

macro_rules! copy_accessors {
    ($($variant:ident: $ty:ty => $put:ident, $get:ident;)*) => {
        $(
            #[doc = concat!("Stores a `", stringify!($ty), "` as a [`DataValue::", stringify!($variant), "`].")]
            pub fn $put(&mut self, key: impl Into<String>, value: $ty) {
                self.put(key, DataValue::$variant(value));
            }

            #[doc = concat!("Returns the [`DataValue::", stringify!($variant), "`] under `key`, or `default`.")]
            #[must_use]
            pub fn $get(&self, key: &str, default: $ty) -> $ty {
                match self.0.get(key) {
                    Some(DataValue::$variant(value)) => *value,
                    _ => default,
                }
            }
        )*
    };
}

macro_rules! ref_accessors {
    ($($variant:ident: $owned:ty, $borrowed:ty => $put:ident, $get:ident;)*) => {
        $(
            #[doc = concat!("Stores a [`DataValue::", stringify!($variant), "`].")]
            pub fn $put(&mut self, key: impl Into<String>, value: impl Into<$owned>) {
                self.put(key, DataValue::$variant(value.into()));
            }

            #[doc = concat!("Returns the [`DataValue::", stringify!($variant), "`] under `key`, or `default`.")]
            #[must_use]
            pub fn $get<'a>(&'a self, key: &str, default: &'a $borrowed) -> &'a $borrowed {
                match self.0.get(key) {
                    Some(DataValue::$variant(value)) => value,
                    _ => default,
                }
            }
        )*
    };
}

impl DataMap {
    /// Creates an empty `DataMap`.
    #[must_use]
    pub fn new() -> Self {
        DataMap(IndexMap::new())
    }

    /// Creates an empty `DataMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        DataMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a value, returning the one previously stored under `key`.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Option<DataValue> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut DataValue> {
        self.0.get_mut(key)
    }

    /// Removes and returns the value under `key`.
    pub fn remove(&mut self, key: &str) -> Option<DataValue> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns `true` if `key` holds a value of the given variant.
    #[must_use]
    pub fn contains_type(&self, key: &str, data_type: DataType) -> bool {
        self.0
            .get(key)
            .is_some_and(|value| value.data_type() == data_type)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, DataValue> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, DataValue> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, DataValue> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, DataValue> {
        self.0.iter_mut()
    }

    copy_accessors! {
        Byte: i8 => put_byte, get_byte;
        Short: i16 => put_short, get_short;
        Int: i32 => put_int, get_int;
        Long: i64 => put_long, get_long;
        Float: f32 => put_float, get_float;
        Double: f64 => put_double, get_double;
        Char: u16 => put_char, get_char;
        Boolean: bool => put_bool, get_bool;
        Uuid: Uuid => put_uuid, get_uuid;
    }

    ref_accessors! {
        BigInt: BigInt, BigInt => put_big_int, get_big_int;
        BigDecimal: BigDecimal, BigDecimal => put_big_decimal, get_big_decimal;
        String: String, str => put_string, get_str;
        ByteArray: Vec<i8>, [i8] => put_byte_array, get_byte_array;
        ShortArray: Vec<i16>, [i16] => put_short_array, get_short_array;
        IntArray: Vec<i32>, [i32] => put_int_array, get_int_array;
        LongArray: Vec<i64>, [i64] => put_long_array, get_long_array;
        FloatArray: Vec<f32>, [f32] => put_float_array, get_float_array;
        DoubleArray: Vec<f64>, [f64] => put_double_array, get_double_array;
        CharArray: Vec<u16>, [u16] => put_char_array, get_char_array;
        BitSet: BitSet, BitSet => put_bit_set, get_bit_set;
    }

    /// Stores a nested map.
    pub fn put_map(&mut self, key: impl Into<String>, value: DataMap) {
        self.put(key, DataValue::Map(value));
    }

    /// Returns the nested map under `key`, if that is what it holds.
    #[must_use]
    pub fn get_map(&self, key: &str) -> Option<&DataMap> {
        self.0.get(key).and_then(DataValue::as_map)
    }

    pub fn get_map_mut(&mut self, key: &str) -> Option<&mut DataMap> {
        self.0.get_mut(key).and_then(DataValue::as_map_mut)
    }

    /// Stores a list.
    pub fn put_list(&mut self, key: impl Into<String>, value: DataList) {
        self.put(key, DataValue::List(value));
    }

    /// Returns the list under `key` if it holds elements of `element_type`.
    ///
    /// A list of any other element type is treated like a missing key.
    #[must_use]
    pub fn get_list(&self, key: &str, element_type: DataType) -> Option<&DataList> {
        self.0
            .get(key)
            .and_then(DataValue::as_list)
            .filter(|list| list.element_type() == element_type)
    }

    pub fn get_list_mut(&mut self, key: &str, element_type: DataType) -> Option<&mut DataList> {
        self.0
            .get_mut(key)
            .and_then(DataValue::as_list_mut)
            .filter(|list| list.element_type() == element_type)
    }
}

impl From<HashMap<String, DataValue>> for DataMap {
    fn from(map: HashMap<String, DataValue>) -> Self {
        DataMap(map.into_iter().collect())
    }
}

impl From<DataMap> for HashMap<String, DataValue> {
    fn from(map: DataMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for DataMap {
    type Item = (String, DataValue);
    type IntoIter = indexmap::map::IntoIter<String, DataValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DataMap {
    type Item = (&'a String, &'a DataValue);
    type IntoIter = indexmap::map::Iter<'a, String, DataValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, DataValue)> for DataMap {
    fn from_iter<T: IntoIterator<Item = (String, DataValue)>>(iter: T) -> Self {
        DataMap(IndexMap::from_iter(iter))
    }
}
