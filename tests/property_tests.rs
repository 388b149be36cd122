//! Property-based tests for the round-trip guarantees of both encodings.
//!
//! Values are generated as arbitrary trees of every variant, so these tests
//! cover combinations (nesting, escaping, extreme numbers) that the example
//! based tests only sample.

use num_bigint::BigInt;
use proptest::prelude::*;
use ubo::{
    from_slice, from_slice_compressed, from_text, to_bytes, to_bytes_compressed, to_text,
    to_text_pretty, BigDecimal, BitSet, DataList, DataType, DataValue, Error,
};
use uuid::Uuid;

fn non_nan_f32() -> impl Strategy<Value = f32> {
    prop::num::f32::NORMAL | prop::num::f32::SUBNORMAL | prop::num::f32::ZERO | prop::num::f32::INFINITE
}

fn non_nan_f64() -> impl Strategy<Value = f64> {
    prop::num::f64::NORMAL | prop::num::f64::SUBNORMAL | prop::num::f64::ZERO | prop::num::f64::INFINITE
}

fn arb_scalar() -> impl Strategy<Value = DataValue> {
    prop_oneof![
        any::<i8>().prop_map(DataValue::Byte),
        any::<i16>().prop_map(DataValue::Short),
        any::<i32>().prop_map(DataValue::Int),
        any::<i64>().prop_map(DataValue::Long),
        any::<i128>().prop_map(|n| DataValue::BigInt(BigInt::from(n))),
        non_nan_f32().prop_map(DataValue::Float),
        non_nan_f64().prop_map(DataValue::Double),
        (any::<i64>(), -40i32..40)
            .prop_map(|(n, scale)| DataValue::BigDecimal(BigDecimal::new(BigInt::from(n), scale))),
        any::<u16>().prop_map(DataValue::Char),
        any::<bool>().prop_map(DataValue::Boolean),
    ]
}

fn arb_array() -> impl Strategy<Value = DataValue> {
    prop_oneof![
        prop::collection::vec(any::<i8>(), 0..8).prop_map(DataValue::ByteArray),
        prop::collection::vec(any::<i16>(), 0..8).prop_map(DataValue::ShortArray),
        prop::collection::vec(any::<i32>(), 0..8).prop_map(DataValue::IntArray),
        prop::collection::vec(any::<i64>(), 0..8).prop_map(DataValue::LongArray),
        prop::collection::vec(non_nan_f32(), 0..8).prop_map(DataValue::FloatArray),
        prop::collection::vec(non_nan_f64(), 0..8).prop_map(DataValue::DoubleArray),
        prop::collection::vec(any::<u16>(), 0..8).prop_map(DataValue::CharArray),
        prop::collection::vec(0usize..300, 0..8)
            .prop_map(|indices| DataValue::BitSet(BitSet::from_iter(indices))),
    ]
}

fn arb_leaf() -> impl Strategy<Value = DataValue> {
    prop_oneof![
        arb_scalar(),
        arb_array(),
        any::<String>().prop_map(DataValue::String),
        any::<u128>().prop_map(|n| DataValue::Uuid(Uuid::from_u128(n))),
        prop::sample::select(DataType::ALL.to_vec())
            .prop_map(|ty| DataValue::List(DataList::new(ty))),
    ]
}

/// Keeps the elements sharing the first element's variant.
fn homogeneous_list(values: Vec<DataValue>) -> DataValue {
    let element_type = values[0].data_type();
    let same: Vec<DataValue> = values
        .into_iter()
        .filter(|value| value.data_type() == element_type)
        .collect();
    DataValue::List(DataList::with_values(element_type, same).unwrap())
}

fn arb_value() -> impl Strategy<Value = DataValue> {
    arb_leaf().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(("\\PC{0,8}", inner.clone()), 0..6)
                .prop_map(|entries| DataValue::Map(entries.into_iter().collect())),
            prop::collection::vec(inner, 1..6).prop_map(homogeneous_list),
        ]
    })
}

proptest! {
    #[test]
    fn prop_binary_round_trip(value in arb_value()) {
        let bytes = to_bytes(&value).unwrap();
        prop_assert_eq!(from_slice(&bytes, Some(value.data_type())).unwrap(), value);
    }

    #[test]
    fn prop_compressed_round_trip(value in arb_value()) {
        let bytes = to_bytes_compressed(&value).unwrap();
        prop_assert_eq!(from_slice_compressed(&bytes, None).unwrap(), value);
    }

    #[test]
    fn prop_text_round_trip(value in arb_value()) {
        let text = to_text(&value);
        prop_assert_eq!(from_text(&text).unwrap(), value);
    }

    #[test]
    fn prop_pretty_text_round_trip(value in arb_value()) {
        let text = to_text_pretty(&value);
        prop_assert_eq!(from_text(&text).unwrap(), value);
    }

    #[test]
    fn prop_compact_text_is_one_line(value in arb_value()) {
        prop_assert!(!to_text(&value).contains('\n'));
    }

    #[test]
    fn prop_wrong_witness_is_rejected(value in arb_value(), other in prop::sample::select(DataType::ALL.to_vec())) {
        prop_assume!(other != value.data_type());
        let bytes = to_bytes(&value).unwrap();
        let is_type_mismatch = matches!(
            from_slice(&bytes, Some(other)),
            Err(Error::TypeMismatch { .. })
        );
        prop_assert!(is_type_mismatch);
    }

    #[test]
    fn prop_clone_is_equal_and_encodes_identically(value in arb_value()) {
        let copy = value.clone();
        prop_assert_eq!(&copy, &value);
        prop_assert_eq!(to_bytes(&copy).unwrap(), to_bytes(&value).unwrap());
    }

    #[test]
    fn prop_garbage_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let _ = from_slice(&bytes, None);
        let mut framed = vec![0xFF, 0x80, 0x42, 0x69, 0x00, 0x03];
        framed.extend_from_slice(&bytes);
        let _ = from_slice(&framed, None);
    }

    #[test]
    fn prop_text_garbage_never_panics(text in "\\PC{0,40}") {
        let _ = from_text(&text);
    }
}
