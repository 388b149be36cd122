//! Traversal hook over value trees.
//!
//! [`Visitor`] has one method per variant. Each of them defaults to a method
//! for the variant's category, and every category method defaults to the one
//! required method, [`Visitor::visit_value`]. Implementors override only the
//! granularity they need:
//!
//! ```text
//! visit_byte, visit_short, visit_int, visit_long, visit_big_int -> visit_integral -> visit_scalar
//! visit_float, visit_double, visit_big_decimal                  -> visit_floating -> visit_scalar
//! visit_char, visit_boolean, visit_string, visit_uuid            -> visit_scalar
//! visit_*_array, visit_bit_set                                   -> visit_array
//! visit_list, visit_map                                          -> visit_container
//! visit_scalar, visit_array, visit_container                     -> visit_value
//! ```
//!
//! Visitors are not recursive by themselves. A visitor that wants to walk a
//! tree calls [`DataValue::accept`] on the children from its container method.
//!
//! ```rust
//! use ubo::{data, DataValue, Visitor};
//!
//! #[derive(Default)]
//! struct CountIntegral(usize);
//!
//! impl Visitor for CountIntegral {
//!     type Output = ();
//!
//!     fn visit_value(&mut self, _: &DataValue) {}
//!
//!     fn visit_integral(&mut self, _: &DataValue) {
//!         self.0 += 1;
//!     }
//!
//!     fn visit_map(&mut self, value: &DataValue) {
//!         for child in value.as_map().into_iter().flat_map(|map| map.values()) {
//!             child.accept(self);
//!         }
//!     }
//! }
//!
//! let value = data!({ "a": 1, "b": 2i64, "c": "text", "d": { "e": 3i8 } });
//! let mut counter = CountIntegral::default();
//! value.accept(&mut counter);
//! assert_eq!(counter.0, 3);
//! ```

use crate::DataValue;

macro_rules! forward {
    ($($method:ident => $target:ident;)*) => {
        $(
            #[inline]
            fn $method(&mut self, value: &DataValue) -> Self::Output {
                self.$target(value)
            }
        )*
    };
}

/// Per-variant callbacks with category fallbacks.
pub trait Visitor {
    type Output;

    /// Called for any value whose variant and category methods are not overridden.
    fn visit_value(&mut self, value: &DataValue) -> Self::Output;

    forward! {
        visit_scalar => visit_value;
        visit_array => visit_value;
        visit_container => visit_value;

        visit_integral => visit_scalar;
        visit_floating => visit_scalar;

        visit_byte => visit_integral;
        visit_short => visit_integral;
        visit_int => visit_integral;
        visit_long => visit_integral;
        visit_big_int => visit_integral;

        visit_float => visit_floating;
        visit_double => visit_floating;
        visit_big_decimal => visit_floating;

        visit_char => visit_scalar;
        visit_boolean => visit_scalar;
        visit_string => visit_scalar;
        visit_uuid => visit_scalar;

        visit_byte_array => visit_array;
        visit_short_array => visit_array;
        visit_int_array => visit_array;
        visit_long_array => visit_array;
        visit_float_array => visit_array;
        visit_double_array => visit_array;
        visit_char_array => visit_array;
        visit_bit_set => visit_array;

        visit_list => visit_container;
        visit_map => visit_container;
    }
}

impl DataValue {
    /// Dispatches to the visitor method for this value's variant.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            DataValue::Byte(_) => visitor.visit_byte(self),
            DataValue::Short(_) => visitor.visit_short(self),
            DataValue::Int(_) => visitor.visit_int(self),
            DataValue::Long(_) => visitor.visit_long(self),
            DataValue::BigInt(_) => visitor.visit_big_int(self),
            DataValue::Float(_) => visitor.visit_float(self),
            DataValue::Double(_) => visitor.visit_double(self),
            DataValue::BigDecimal(_) => visitor.visit_big_decimal(self),
            DataValue::Char(_) => visitor.visit_char(self),
            DataValue::Boolean(_) => visitor.visit_boolean(self),
            DataValue::String(_) => visitor.visit_string(self),
            DataValue::List(_) => visitor.visit_list(self),
            DataValue::Map(_) => visitor.visit_map(self),
            DataValue::ByteArray(_) => visitor.visit_byte_array(self),
            DataValue::ShortArray(_) => visitor.visit_short_array(self),
            DataValue::IntArray(_) => visitor.visit_int_array(self),
            DataValue::LongArray(_) => visitor.visit_long_array(self),
            DataValue::FloatArray(_) => visitor.visit_float_array(self),
            DataValue::DoubleArray(_) => visitor.visit_double_array(self),
            DataValue::CharArray(_) => visitor.visit_char_array(self),
            DataValue::BitSet(_) => visitor.visit_bit_set(self),
            DataValue::Uuid(_) => visitor.visit_uuid(self),
        }
    }
}

/// Applies `visitor` to `value`. Same as [`DataValue::accept`].
pub fn visit<V: Visitor + ?Sized>(value: &DataValue, visitor: &mut V) -> V::Output {
    value.accept(visitor)
}
