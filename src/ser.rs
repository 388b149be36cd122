//! USO text output.
//!
//! This module provides [`Writer`], a [`Visitor`] that renders a value tree as
//! USO text. Every scalar carries a literal suffix naming its variant, so the
//! text parses back to exactly the same tree:
//!
//! | Variant | Literal | Variant | Literal |
//! |---|---|---|---|
//! | byte | `5b` | float | `1.5f` |
//! | short | `5s` | double | `1.5d` |
//! | int | `5` | bigdec | `1.50bd` |
//! | long | `5L` | char | `'a'` |
//! | bigint | `5bi` | uuid | `<...>` |
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use ubo::{to_text, to_text_pretty, DataMap, DataValue};
//!
//! let mut map = DataMap::new();
//! map.put_string("name", "abc");
//! map.put_short("count", 5);
//! let value = DataValue::from(map);
//!
//! assert_eq!(to_text(&value), r#"{"name": "abc", "count": 5s}"#);
//! assert_eq!(
//!     to_text_pretty(&value),
//!     "{\n  \"name\": \"abc\",\n  \"count\": 5s\n}"
//! );
//! ```
//!
//! ## Direct Writer Usage
//!
//! ```rust
//! use ubo::{DataValue, TextOptions, Writer};
//!
//! let mut writer = Writer::new(&TextOptions::new());
//! DataValue::LongArray(vec![1, -2]).accept(&mut writer);
//! assert_eq!(writer.into_inner(), "[L; 1L, -2L]");
//! ```

use std::fmt::Write as _;

use crate::{DataValue, TextOptions, Visitor};

/// Renders values as USO text.
///
/// Created via [`Writer::new`]; values are appended by passing the writer to
/// [`DataValue::accept`], and the text is taken out with [`Writer::into_inner`].
pub struct Writer {
    output: String,
    pretty: bool,
    indent: usize,
    level: usize,
}

impl Writer {
    pub fn new(options: &TextOptions) -> Self {
        Writer {
            output: String::with_capacity(128),
            pretty: options.pretty,
            indent: options.indent,
            level: 0,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    fn write_newline(&mut self) {
        if self.pretty {
            self.output.push('\n');
            for _ in 0..self.level * self.indent {
                self.output.push(' ');
            }
        }
    }

    fn write_separator(&mut self) {
        if self.pretty {
            self.output.push(',');
            self.write_newline();
        } else {
            self.output.push_str(", ");
        }
    }

    /// Writes `items` between `open` and `close`, one per line in pretty mode.
    fn write_block<I, F>(&mut self, open: char, close: char, items: I, mut write_item: F)
    where
        I: ExactSizeIterator,
        F: FnMut(&mut Self, I::Item),
    {
        self.output.push(open);
        if items.len() > 0 {
            self.level += 1;
            self.write_newline();
            for (i, item) in items.enumerate() {
                if i > 0 {
                    self.write_separator();
                }
                write_item(self, item);
            }
            self.level -= 1;
            self.write_newline();
        }
        self.output.push(close);
    }

    /// Writes `[T; a, b]`. Arrays stay on one line in every mode.
    fn write_array<T: Copy>(&mut self, tag: char, items: &[T], write_item: fn(&mut String, T)) {
        self.output.push('[');
        self.output.push(tag);
        self.output.push(';');
        for (i, item) in items.iter().enumerate() {
            self.output.push_str(if i == 0 { " " } else { ", " });
            write_item(&mut self.output, *item);
        }
        self.output.push(']');
    }

    fn write_string(&mut self, s: &str) {
        self.output.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                c if c.is_control() => {
                    let _ = write!(self.output, "\\u{:04X}", c as u32);
                }
                c => self.output.push(c),
            }
        }
        self.output.push('"');
    }
}

fn write_byte(out: &mut String, v: i8) {
    let _ = write!(out, "{}b", v);
}

fn write_short(out: &mut String, v: i16) {
    let _ = write!(out, "{}s", v);
}

fn write_int(out: &mut String, v: i32) {
    let _ = write!(out, "{}", v);
}

fn write_long(out: &mut String, v: i64) {
    let _ = write!(out, "{}L", v);
}

// `{:?}` is the shortest text that reads back to the same bits and already
// spells the non-finite values as NaN, inf and -inf.
fn write_float(out: &mut String, v: f32) {
    let _ = write!(out, "{:?}f", v);
}

fn write_double(out: &mut String, v: f64) {
    let _ = write!(out, "{:?}d", v);
}

fn write_char(out: &mut String, unit: u16) {
    out.push('\'');
    match char::from_u32(u32::from(unit)) {
        Some('\'') => out.push_str("\\'"),
        Some('\\') => out.push_str("\\\\"),
        Some('\n') => out.push_str("\\n"),
        Some('\r') => out.push_str("\\r"),
        Some('\t') => out.push_str("\\t"),
        Some(c) if !c.is_control() => out.push(c),
        // controls and unpaired surrogates
        _ => {
            let _ = write!(out, "\\u{:04X}", unit);
        }
    }
    out.push('\'');
}

fn write_index(out: &mut String, index: usize) {
    let _ = write!(out, "{}", index);
}

impl Visitor for Writer {
    type Output = ();

    /// Char, boolean, string and uuid land here; the overridden categories
    /// are re-dispatched.
    fn visit_value(&mut self, value: &DataValue) {
        match value {
            DataValue::Char(unit) => write_char(&mut self.output, *unit),
            DataValue::Boolean(b) => self.output.push_str(if *b { "true" } else { "false" }),
            DataValue::String(s) => self.write_string(s),
            DataValue::Uuid(uuid) => {
                let _ = write!(self.output, "<{}>", uuid.hyphenated());
            }
            other => other.accept(self),
        }
    }

    fn visit_integral(&mut self, value: &DataValue) {
        match value {
            DataValue::Byte(v) => write_byte(&mut self.output, *v),
            DataValue::Short(v) => write_short(&mut self.output, *v),
            DataValue::Int(v) => write_int(&mut self.output, *v),
            DataValue::Long(v) => write_long(&mut self.output, *v),
            DataValue::BigInt(v) => {
                let _ = write!(self.output, "{}bi", v);
            }
            other => self.visit_value(other),
        }
    }

    fn visit_floating(&mut self, value: &DataValue) {
        match value {
            DataValue::Float(v) => write_float(&mut self.output, *v),
            DataValue::Double(v) => write_double(&mut self.output, *v),
            DataValue::BigDecimal(v) => {
                let _ = write!(self.output, "{}bd", v);
            }
            other => self.visit_value(other),
        }
    }

    fn visit_array(&mut self, value: &DataValue) {
        match value {
            DataValue::ByteArray(items) => self.write_array('B', items, write_byte),
            DataValue::ShortArray(items) => self.write_array('S', items, write_short),
            DataValue::IntArray(items) => self.write_array('I', items, write_int),
            DataValue::LongArray(items) => self.write_array('L', items, write_long),
            DataValue::FloatArray(items) => self.write_array('F', items, write_float),
            DataValue::DoubleArray(items) => self.write_array('D', items, write_double),
            DataValue::CharArray(items) => self.write_array('C', items, write_char),
            DataValue::BitSet(bits) => {
                let indices: Vec<usize> = bits.ones().collect();
                self.write_array('X', &indices, write_index);
            }
            other => self.visit_value(other),
        }
    }

    fn visit_container(&mut self, value: &DataValue) {
        match value {
            DataValue::Map(map) => self.write_block('{', '}', map.iter(), |w, (key, child)| {
                w.write_string(key);
                w.output.push_str(": ");
                child.accept(w);
            }),
            // an empty list keeps its element type as a header
            DataValue::List(list) if list.is_empty() => {
                let _ = write!(self.output, "[{};]", list.element_type());
            }
            DataValue::List(list) => {
                self.write_block('[', ']', list.iter(), |w, child| child.accept(w))
            }
            other => self.visit_value(other),
        }
    }
}

/// Renders `value` with `options`.
pub(crate) fn write_value(value: &DataValue, options: &TextOptions) -> String {
    let mut writer = Writer::new(options);
    value.accept(&mut writer);
    writer.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BigDecimal, BitSet, DataList, DataMap, DataType};
    use num_bigint::BigInt;
    use uuid::Uuid;

    fn text(value: DataValue) -> String {
        write_value(&value, &TextOptions::new())
    }

    #[test]
    fn test_scalar_suffixes() {
        assert_eq!(text(DataValue::Byte(-5)), "-5b");
        assert_eq!(text(DataValue::Short(5)), "5s");
        assert_eq!(text(DataValue::Int(5)), "5");
        assert_eq!(text(DataValue::Long(5)), "5L");
        assert_eq!(text(DataValue::BigInt(BigInt::from(5))), "5bi");
        assert_eq!(text(DataValue::Float(1.5)), "1.5f");
        assert_eq!(text(DataValue::Double(2.0)), "2.0d");
        assert_eq!(
            text(DataValue::BigDecimal("1.50".parse::<BigDecimal>().unwrap())),
            "1.50bd"
        );
        assert_eq!(text(DataValue::Boolean(false)), "false");
    }

    #[test]
    fn test_non_finite_floats() {
        assert_eq!(text(DataValue::Float(f32::NAN)), "NaNf");
        assert_eq!(text(DataValue::Double(f64::INFINITY)), "infd");
        assert_eq!(text(DataValue::Double(f64::NEG_INFINITY)), "-infd");
    }

    #[test]
    fn test_string_and_char_escapes() {
        assert_eq!(text(DataValue::from("a\"b\\c\n")), r#""a\"b\\c\n""#);
        assert_eq!(text(DataValue::from("\u{1}")), r#""\u0001""#);
        assert_eq!(text(DataValue::from("héllo")), "\"héllo\"");
        assert_eq!(text(DataValue::Char(u16::from(b'\''))), r"'\''");
        assert_eq!(text(DataValue::Char(0xD800)), r"'\uD800'");
        assert_eq!(text(DataValue::Char(0x41)), "'A'");
    }

    #[test]
    fn test_arrays_and_bitset() {
        assert_eq!(text(DataValue::ByteArray(vec![1, 2])), "[B; 1b, 2b]");
        assert_eq!(text(DataValue::IntArray(vec![])), "[I;]");
        assert_eq!(text(DataValue::CharArray(vec![0x61, 0x62])), "[C; 'a', 'b']");
        assert_eq!(
            text(DataValue::BitSet(BitSet::from_iter([0, 3, 9]))),
            "[X; 0, 3, 9]"
        );
    }

    #[test]
    fn test_lists() {
        let list = DataList::infer(vec![DataValue::Short(1), DataValue::Short(2)]).unwrap();
        assert_eq!(text(DataValue::List(list)), "[1s, 2s]");
        assert_eq!(text(DataValue::List(DataList::new(DataType::Short))), "[short;]");
    }

    #[test]
    fn test_uuid() {
        let uuid = Uuid::from_u128(0x123e4567_e89b_12d3_a456_426614174000);
        assert_eq!(
            text(DataValue::Uuid(uuid)),
            "<123e4567-e89b-12d3-a456-426614174000>"
        );
    }

    #[test]
    fn test_pretty_nesting() {
        let mut inner = DataMap::new();
        inner.put_int("x", 1);
        let mut outer = DataMap::new();
        outer.put_map("inner", inner);
        outer.put_map("empty", DataMap::new());

        let text = write_value(&DataValue::Map(outer), &TextOptions::pretty());
        assert_eq!(
            text,
            "{\n  \"inner\": {\n    \"x\": 1\n  },\n  \"empty\": {}\n}"
        );
    }
}
