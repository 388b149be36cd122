//! Conformance tests for the USO text grammar.
//!
//! Organised to follow the format reference: scalars, escapes, containers,
//! layout, then error reporting.

use num_bigint::BigInt;
use ubo::{
    from_text, from_text_with_options, to_text, to_text_pretty, to_text_with_options, BigDecimal,
    BitSet, DataList, DataMap, DataType, DataValue, Error, Parser, TextOptions,
};

fn round_trip(value: DataValue) {
    let text = to_text(&value);
    assert_eq!(from_text(&text).unwrap(), value, "text was {}", text);
}

fn error_location(input: &str) -> (usize, usize) {
    match from_text(input) {
        Err(Error::MalformedText { line, col, .. }) => (line, col),
        other => panic!("expected MalformedText for {:?}, got {:?}", input, other),
    }
}

// Scalars

#[test]
fn test_numeric_variants_are_distinct() {
    let values: Vec<DataValue> = ["5b", "5s", "5", "5L", "5bi", "5.0f", "5.0d", "5bd"]
        .iter()
        .map(|text| from_text(text).unwrap())
        .collect();
    let types: Vec<DataType> = values.iter().map(DataValue::data_type).collect();
    assert_eq!(
        types,
        vec![
            DataType::Byte,
            DataType::Short,
            DataType::Int,
            DataType::Long,
            DataType::BigInt,
            DataType::Float,
            DataType::Double,
            DataType::BigDecimal,
        ]
    );
}

#[test]
fn test_integer_extremes() {
    round_trip(DataValue::Byte(i8::MIN));
    round_trip(DataValue::Short(i16::MAX));
    round_trip(DataValue::Int(i32::MIN));
    round_trip(DataValue::Long(i64::MIN));
    assert!(from_text("128b").is_err());
    assert!(from_text("2147483648").is_err());
    assert_eq!(from_text("2147483648L").unwrap(), DataValue::Long(2_147_483_648));
}

#[test]
fn test_floats_keep_their_bits() {
    for v in [0.1f32, -0.0, f32::MAX, f32::MIN_POSITIVE, 1e-45, f32::NAN] {
        round_trip(DataValue::Float(v));
    }
    for v in [0.1f64, 1.0 / 3.0, f64::EPSILON, f64::INFINITY, f64::NEG_INFINITY] {
        round_trip(DataValue::Double(v));
    }
}

#[test]
fn test_big_decimal_keeps_scale() {
    let value = from_text("1.50bd").unwrap();
    assert_eq!(to_text(&value), "1.50bd");
    assert_ne!(value, from_text("1.5bd").unwrap());
    assert_eq!(to_text(&from_text("12e3bd").unwrap()), "12e3bd");
    assert_eq!(to_text(&from_text("-0.001bd").unwrap()), "-0.001bd");
}

#[test]
fn test_big_decimal_extreme_scales_stay_short() {
    let tiny = from_text("1e-200000000bd").unwrap();
    assert_eq!(to_text(&tiny), "1e-200000000bd");

    for value in [
        BigDecimal::new(BigInt::from(1), i32::MAX),
        BigDecimal::new(BigInt::from(-5), 1_000_000),
    ] {
        let value = DataValue::BigDecimal(value);
        let text = to_text(&value);
        assert!(text.len() < 24, "{}", text);
        assert_eq!(from_text(&text).unwrap(), value);
    }
}

#[test]
fn test_uuid_literal() {
    let text = "<123e4567-e89b-12d3-a456-426614174000>";
    let value = from_text(text).unwrap();
    assert_eq!(value.data_type(), DataType::Uuid);
    assert_eq!(to_text(&value), text);
    assert!(from_text("<not-a-uuid>").is_err());
}

// Escapes

#[test]
fn test_string_escapes_round_trip() {
    for s in [
        "",
        "plain",
        "quote \" inside",
        "back\\slash",
        "line\nbreak\r\ttab",
        "bell \u{7}",
        "😀 outside the BMP",
    ] {
        round_trip(DataValue::from(s));
    }
    assert_eq!(
        from_text(r#""\uD83D\uDE00""#).unwrap(),
        DataValue::from("😀")
    );
}

#[test]
fn test_char_literals() {
    for unit in [0x41u16, 0x27, 0x5C, 0x0A, 0x00, 0xD800, 0xDFFF, 0xFFFF] {
        round_trip(DataValue::Char(unit));
    }
    assert!(from_text("'😀'").is_err());
}

// Containers

#[test]
fn test_every_array_kind() {
    round_trip(DataValue::ByteArray(vec![-1, 0, 1]));
    round_trip(DataValue::ShortArray(vec![i16::MIN]));
    round_trip(DataValue::IntArray(vec![]));
    round_trip(DataValue::LongArray(vec![1, 2, 3]));
    round_trip(DataValue::FloatArray(vec![f32::NAN, 1.5]));
    round_trip(DataValue::DoubleArray(vec![-0.0]));
    round_trip(DataValue::CharArray(vec![0x61, 0xD800]));
    round_trip(DataValue::BitSet(BitSet::from_iter([1, 64, 65])));
    round_trip(DataValue::BitSet(BitSet::new()));
}

#[test]
fn test_bitset_index_is_bounded() {
    assert!(matches!(
        from_text("[X; 2000000000]"),
        Err(Error::MalformedText { line: 1, col: 5, .. })
    ));
    assert!(from_text("[X; 1048575]").is_ok());

    let options = TextOptions::new().with_max_bitset_index(u32::MAX as usize);
    assert!(from_text_with_options("[X; 3000000]", &options).is_ok());
}

#[test]
fn test_array_and_list_are_different() {
    let array = from_text("[I; 1, 2]").unwrap();
    let list = from_text("[1, 2]").unwrap();
    assert_eq!(array.data_type(), DataType::IntArray);
    assert_eq!(list.data_type(), DataType::List);
    assert_ne!(array, list);
}

#[test]
fn test_empty_lists_keep_element_type() {
    for ty in DataType::ALL {
        let value = DataValue::List(DataList::new(ty));
        let text = to_text(&value);
        assert_eq!(text, format!("[{};]", ty.name()));
        assert_eq!(from_text(&text).unwrap(), value);
    }
}

#[test]
fn test_nested_lists() {
    let mut inner = DataList::new(DataType::Short);
    inner.push(1i16).unwrap();
    let mut outer = DataList::new(DataType::List);
    outer.push(inner).unwrap();
    outer.push(DataList::new(DataType::Long)).unwrap();

    let value = DataValue::List(outer);
    assert_eq!(to_text(&value), "[[1s], [long;]]");
    round_trip(value);
}

#[test]
fn test_map_keys_are_escaped() {
    let mut map = DataMap::new();
    map.put_int("key \"with\" quotes", 1);
    map.put_int("", 2);
    round_trip(DataValue::Map(map));
}

#[test]
fn test_duplicate_keys_keep_last() {
    let value = from_text(r#"{"a": 1, "a": 2}"#).unwrap();
    assert_eq!(value.as_map().unwrap().get_int("a", 0), 2);
    assert_eq!(value.as_map().unwrap().len(), 1);
}

// Layout

#[test]
fn test_whitespace_between_tokens() {
    let value = from_text(" {\n\t\"a\" :\r\n [ 1s ,2s ] , \"b\":{ } }\n").unwrap();
    let map = value.as_map().unwrap();
    assert_eq!(map.get_list("a", DataType::Short).unwrap().len(), 2);
    assert!(map.get_map("b").unwrap().is_empty());
}

#[test]
fn test_pretty_output_parses_back() {
    let mut map = DataMap::new();
    map.put_string("name", "abc");
    let mut list = DataList::new(DataType::Map);
    list.push(map.clone()).unwrap();
    map.put_list("children", list);
    map.put_int_array("ids", vec![1, 2]);
    let value = DataValue::Map(map);

    let pretty = to_text_pretty(&value);
    assert_eq!(
        pretty,
        "{\n  \"name\": \"abc\",\n  \"children\": [\n    {\n      \"name\": \"abc\"\n    }\n  ],\n  \"ids\": [I; 1, 2]\n}"
    );
    assert_eq!(from_text(&pretty).unwrap(), value);

    let wide = to_text_with_options(&value, &TextOptions::pretty().with_indent(4));
    assert!(wide.contains("\n    \"name\""));
}

#[test]
fn test_first_line_only_mode() {
    let options = TextOptions::new().with_first_line_only(true);
    assert_eq!(
        from_text_with_options("[1, 2]\nignored", &options).unwrap(),
        from_text("[1, 2]").unwrap()
    );
    assert!(from_text("[1, 2]\nignored").is_err());

    let pretty = to_text_pretty(&from_text(r#"{"a": 1}"#).unwrap());
    assert!(from_text_with_options(&pretty, &options).is_err());
}

#[test]
fn test_parser_reports_stop_position() {
    let mut parser = Parser::new("{\"a\": 1}   [B;]");
    parser.parse_value().unwrap();
    assert_eq!(parser.position(), 8);
    assert_eq!(parser.parse_value().unwrap(), DataValue::ByteArray(vec![]));
    parser.end().unwrap();
}

#[test]
fn test_from_str_and_display() {
    let value: DataValue = "[L; 1L]".parse().unwrap();
    assert_eq!(value.to_string(), "[L; 1L]");
    assert!("[L; 1]".parse::<DataValue>().is_err());
}

// Errors

#[test]
fn test_error_locations() {
    assert_eq!(error_location("5x"), (1, 1));
    assert_eq!(error_location("[1, 2"), (1, 6));
    assert_eq!(error_location("{\"a\" 1}"), (1, 6));
    assert_eq!(error_location("{\n  \"a\": \"open\n}"), (2, 8));
    assert_eq!(error_location("[1s,\n 1]"), (2, 2));
    assert_eq!(error_location("1 1"), (1, 3));
}

#[test]
fn test_rejected_inputs() {
    for input in [
        "",
        "   ",
        "[]",
        "[1, ]",
        "{,}",
        "{a: 1}",
        "{\"a\": 1,}",
        "[Q; 1]",
        "[bogus;]",
        "1.5",
        "5bb",
        "nan",
        "'",
        "\"\\x\"",
        "<>",
        "]",
    ] {
        assert!(
            matches!(from_text(input), Err(Error::MalformedText { .. })),
            "{:?} should be rejected",
            input
        );
    }
}

#[test]
fn test_nesting_limit() {
    let deep = format!("{}{}", "[".repeat(40), "]".repeat(40));
    let options = TextOptions::new().with_max_depth(16);
    assert!(matches!(
        from_text_with_options(&deep, &options),
        Err(Error::MalformedText { .. })
    ));
}
