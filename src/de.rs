//! USO text parsing.
//!
//! This module provides [`Parser`], a recursive-descent parser that turns USO
//! text back into a [`DataValue`] tree.
//!
//! ## Overview
//!
//! - **Single pass**: no backtracking beyond a one-word look-ahead at the start
//!   of `[` brackets (array tag or list header versus first element)
//! - **Exact typing**: the literal suffix decides the variant, so `5`, `5s` and
//!   `5L` parse to three different values
//! - **Error reporting**: every error is [`Error::MalformedText`] carrying the
//!   line, column and byte offset of the offending token
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use ubo::{from_text, DataValue};
//!
//! let value = from_text(r#"{"name": "abc", "count": 5s}"#).unwrap();
//! let map = value.as_map().unwrap();
//! assert_eq!(map.get_str("name", ""), "abc");
//! assert_eq!(map.get("count"), Some(&DataValue::Short(5)));
//! ```
//!
//! ## Parsing several values
//!
//! [`Parser::parse_value`] reads exactly one value and leaves the cursor after
//! it, so a caller can parse a sequence of values or locate where a document
//! ends:
//!
//! ```rust
//! use ubo::{DataValue, Parser};
//!
//! let mut parser = Parser::new("1 2L");
//! assert_eq!(parser.parse_value().unwrap(), DataValue::Int(1));
//! assert_eq!(parser.position(), 1);
//! assert_eq!(parser.parse_value().unwrap(), DataValue::Long(2));
//! ```

use std::str::FromStr;

use num_bigint::BigInt;
use tracing::trace;
use uuid::Uuid;

use crate::{
    BigDecimal, BitSet, DataList, DataMap, DataType, DataValue, Error, Result, TextOptions,
    TypeWitness,
};

/// A saved cursor, used to report errors at the start of a token and to
/// rewind after a look-ahead.
#[derive(Clone, Copy, Debug)]
struct Mark {
    position: usize,
    line: usize,
    column: usize,
}

/// The USO parser.
///
/// Parses USO text into [`DataValue`] trees. Created via [`Parser::new`] or
/// [`Parser::with_options`].
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    depth: usize,
    max_depth: usize,
    max_bitset_index: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser::with_options(input, &TextOptions::default())
    }

    /// Creates a parser honouring `first_line_only` and the nesting and
    /// bitset limits.
    pub fn with_options(input: &'a str, options: &TextOptions) -> Self {
        let input = if options.first_line_only {
            input.lines().next().unwrap_or("")
        } else {
            input
        };
        Parser {
            input,
            position: 0,
            line: 1,
            column: 1,
            depth: 0,
            max_depth: options.max_depth,
            max_bitset_index: options.max_bitset_index,
        }
    }

    /// Byte offset of the cursor.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// 1-based line of the cursor.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the cursor, counted in characters.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Parses one value, skipping leading whitespace.
    ///
    /// The cursor is left immediately after the value.
    pub fn parse_value(&mut self) -> Result<DataValue> {
        self.skip_whitespace();
        match self.peek_char() {
            None => Err(self.error("unexpected end of input")),
            Some('{') => self.parse_map(),
            Some('[') => self.parse_bracket(),
            Some('"') => Ok(DataValue::String(self.parse_string()?)),
            Some('\'') => Ok(DataValue::Char(self.parse_char()?)),
            Some('<') => self.parse_uuid(),
            Some(ch) if is_token_char(ch) => self.parse_token(),
            Some(ch) => Err(self.error(&format!("unexpected character '{}'", ch))),
        }
    }

    /// Checks that only whitespace remains.
    pub fn end(&mut self) -> Result<()> {
        self.skip_whitespace();
        match self.peek_char() {
            None => Ok(()),
            Some(_) => Err(self.error("trailing characters after value")),
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.next_char();
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn reset(&mut self, mark: Mark) {
        self.position = mark.position;
        self.line = mark.line;
        self.column = mark.column;
    }

    fn error(&self, msg: &str) -> Error {
        self.error_at(self.mark(), msg)
    }

    fn error_at(&self, mark: Mark, msg: &str) -> Error {
        Error::malformed(mark.line, mark.column, mark.position, msg)
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        let mark = self.mark();
        match self.next_char() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(self.error_at(mark, &format!("expected '{}', found '{}'", expected, ch))),
            None => Err(self.error_at(mark, &format!("expected '{}', found end of input", expected))),
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.error(&format!(
                "nesting deeper than {} containers",
                self.max_depth
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Reads a run of characters accepted by `accept`.
    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> &'a str {
        let input = self.input;
        let start = self.position;
        while self.peek_char().is_some_and(&accept) {
            self.next_char();
        }
        &input[start..self.position]
    }

    fn read_hex4(&mut self) -> Result<u16> {
        let mark = self.mark();
        let hex = self.take_while(|ch| ch.is_ascii_hexdigit());
        if hex.len() < 4 {
            return Err(self.error_at(mark, "invalid unicode escape (expected 4 hex digits)"));
        }
        // take_while may have consumed more than four digits
        self.reset(mark);
        for _ in 0..4 {
            self.next_char();
        }
        u16::from_str_radix(&hex[..4], 16)
            .map_err(|_| self.error_at(mark, "invalid hex in unicode escape"))
    }

    /// Reads one escape sequence after the backslash, as a UTF-16 code unit.
    fn parse_escape(&mut self) -> Result<u16> {
        let mark = self.mark();
        match self.next_char() {
            Some('"') => Ok(u16::from(b'"')),
            Some('\'') => Ok(u16::from(b'\'')),
            Some('\\') => Ok(u16::from(b'\\')),
            Some('n') => Ok(u16::from(b'\n')),
            Some('r') => Ok(u16::from(b'\r')),
            Some('t') => Ok(u16::from(b'\t')),
            Some('u') => self.read_hex4(),
            Some(other) => Err(self.error_at(mark, &format!("unknown escape '\\{}'", other))),
            None => Err(self.error_at(mark, "unexpected end of input in escape")),
        }
    }

    fn parse_string(&mut self) -> Result<String> {
        let start = self.mark();
        self.expect('"')?;
        let mut result = String::new();

        while let Some(ch) = self.next_char() {
            match ch {
                '"' => return Ok(result),
                '\\' => {
                    let mark = self.mark();
                    let unit = self.parse_escape()?;
                    let decoded = if (0xD800..0xDC00).contains(&unit) {
                        // a high surrogate must be followed by an escaped low one
                        let low = match (self.next_char(), self.next_char()) {
                            (Some('\\'), Some('u')) => self.read_hex4()?,
                            _ => return Err(self.error_at(mark, "unpaired surrogate in string")),
                        };
                        char::decode_utf16([unit, low]).next().and_then(|r| r.ok())
                    } else {
                        char::from_u32(u32::from(unit))
                    };
                    let decoded =
                        decoded.ok_or_else(|| self.error_at(mark, "unpaired surrogate in string"))?;
                    result.push(decoded);
                }
                other => result.push(other),
            }
        }
        Err(self.error_at(start, "unterminated string"))
    }

    fn parse_char(&mut self) -> Result<u16> {
        let start = self.mark();
        self.expect('\'')?;
        let unit = match self.next_char() {
            Some('\\') => self.parse_escape()?,
            Some('\'') => return Err(self.error_at(start, "empty char literal")),
            Some(ch) => {
                let mut units = [0u16; 2];
                let encoded = ch.encode_utf16(&mut units);
                if encoded.len() != 1 {
                    return Err(self.error_at(start, "char literal needs two UTF-16 code units"));
                }
                encoded[0]
            }
            None => return Err(self.error_at(start, "unterminated char literal")),
        };
        match self.next_char() {
            Some('\'') => Ok(unit),
            _ => Err(self.error_at(start, "unterminated char literal")),
        }
    }

    fn parse_uuid(&mut self) -> Result<DataValue> {
        let start = self.mark();
        self.expect('<')?;
        let text = self.take_while(|ch| ch != '>');
        if self.next_char() != Some('>') {
            return Err(self.error_at(start, "unterminated uuid"));
        }
        Uuid::parse_str(text)
            .map(DataValue::Uuid)
            .map_err(|e| self.error_at(start, &format!("invalid uuid: {}", e)))
    }

    /// Parses a keyword or number token: `true`, `false`, or a numeric
    /// literal followed by its suffix.
    fn parse_token(&mut self) -> Result<DataValue> {
        let start = self.mark();
        let token = self.take_while(is_token_char);
        match token {
            "true" => return Ok(DataValue::Boolean(true)),
            "false" => return Ok(DataValue::Boolean(false)),
            _ => {}
        }
        let literal = split_literal(token)
            .ok_or_else(|| self.error_at(start, &format!("unexpected token '{}'", token)))?;
        literal
            .into_value()
            .map_err(|msg| self.error_at(start, &format!("{} in '{}'", msg, token)))
    }

    fn parse_map(&mut self) -> Result<DataValue> {
        self.enter()?;
        self.expect('{')?;
        let mut map = DataMap::new();

        self.skip_whitespace();
        if self.peek_char() == Some('}') {
            self.next_char();
            self.leave();
            return Ok(DataValue::Map(map));
        }

        loop {
            self.skip_whitespace();
            if self.peek_char() != Some('"') {
                return Err(self.error("expected a quoted map key"));
            }
            let key = self.parse_string()?;
            self.skip_whitespace();
            self.expect(':')?;
            let value = self.parse_value()?;
            map.put(key, value);

            self.skip_whitespace();
            let mark = self.mark();
            match self.next_char() {
                Some(',') => continue,
                Some('}') => break,
                Some(ch) => {
                    return Err(self.error_at(mark, &format!("expected ',' or '}}', found '{}'", ch)))
                }
                None => return Err(self.error_at(mark, "unterminated map")),
            }
        }

        self.leave();
        Ok(DataValue::Map(map))
    }

    /// Parses `[`: an array (`[B; ...]`), a list with a header (`[short; ...]`)
    /// or a list typed by its first element.
    fn parse_bracket(&mut self) -> Result<DataValue> {
        self.enter()?;
        self.expect('[')?;
        self.skip_whitespace();

        let header_mark = self.mark();
        let mut header = None;
        if self.peek_char().is_some_and(|ch| ch.is_ascii_alphabetic()) {
            let word = self.take_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
            self.skip_whitespace();
            if self.peek_char() == Some(';') {
                self.next_char();
                header = Some(word);
            } else {
                self.reset(header_mark);
            }
        }

        let elements = self.parse_elements()?;
        let value = match header {
            Some(tag) if is_array_tag(tag) => self.build_array(tag, elements)?,
            Some(name) => {
                let element_type = DataType::from_name(name).ok_or_else(|| {
                    self.error_at(header_mark, &format!("unknown list header '{}'", name))
                })?;
                self.build_list(element_type, elements)?
            }
            None => match elements.first().map(|(_, first)| first.data_type()) {
                Some(element_type) => self.build_list(element_type, elements)?,
                None => {
                    return Err(self.error_at(
                        header_mark,
                        "empty list needs an element type header such as [int;]",
                    ))
                }
            },
        };

        self.leave();
        Ok(value)
    }

    /// Parses comma separated values up to and including the closing `]`.
    fn parse_elements(&mut self) -> Result<Vec<(Mark, DataValue)>> {
        let mut elements = Vec::new();
        self.skip_whitespace();
        if self.peek_char() == Some(']') {
            self.next_char();
            return Ok(elements);
        }

        loop {
            self.skip_whitespace();
            let mark = self.mark();
            elements.push((mark, self.parse_value()?));
            self.skip_whitespace();
            let mark = self.mark();
            match self.next_char() {
                Some(',') => continue,
                Some(']') => return Ok(elements),
                Some(ch) => {
                    return Err(self.error_at(mark, &format!("expected ',' or ']', found '{}'", ch)))
                }
                None => return Err(self.error_at(mark, "unterminated list")),
            }
        }
    }

    fn build_list(&self, element_type: DataType, elements: Vec<(Mark, DataValue)>) -> Result<DataValue> {
        let mut list = DataList::with_capacity(element_type, elements.len());
        for (mark, value) in elements {
            let found = value.data_type();
            list.push(value).map_err(|_| {
                self.error_at(
                    mark,
                    &format!("{} element in a list of {}", found, element_type),
                )
            })?;
        }
        Ok(DataValue::List(list))
    }

    fn build_array(&self, tag: &str, elements: Vec<(Mark, DataValue)>) -> Result<DataValue> {
        Ok(match tag {
            "B" => DataValue::ByteArray(self.collect_as(elements)?),
            "S" => DataValue::ShortArray(self.collect_as(elements)?),
            "I" => DataValue::IntArray(self.collect_as(elements)?),
            "L" => DataValue::LongArray(self.collect_as(elements)?),
            "F" => DataValue::FloatArray(self.collect_as(elements)?),
            "D" => DataValue::DoubleArray(self.collect_as(elements)?),
            "C" => DataValue::CharArray(self.collect_as(elements)?),
            _ => {
                let mut bits = BitSet::new();
                for (mark, value) in elements {
                    let index = match value {
                        DataValue::Int(index) => usize::try_from(index).ok(),
                        _ => None,
                    };
                    let index = index
                        .ok_or_else(|| self.error_at(mark, "bitset index must be a non-negative int"))?;
                    if index > self.max_bitset_index {
                        return Err(self.error_at(
                            mark,
                            &format!("bitset index {} exceeds {}", index, self.max_bitset_index),
                        ));
                    }
                    bits.set(index);
                }
                DataValue::BitSet(bits)
            }
        })
    }

    fn collect_as<T: TypeWitness>(&self, elements: Vec<(Mark, DataValue)>) -> Result<Vec<T>> {
        elements
            .into_iter()
            .map(|(mark, value)| {
                let found = value.data_type();
                T::from_value(value).ok_or_else(|| {
                    self.error_at(
                        mark,
                        &format!("{} element in an array of {}", found, T::DATA_TYPE),
                    )
                })
            })
            .collect()
    }
}

fn is_token_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '+' | '.')
}

fn is_array_tag(word: &str) -> bool {
    matches!(word, "B" | "S" | "I" | "L" | "F" | "D" | "C" | "X")
}

/// A numeric token split into sign, digits and suffix.
struct Literal<'t> {
    negative: bool,
    body: &'t str,
    suffix: &'t str,
}

/// Splits `-1.5e3bd` into `(true, "1.5e3", "bd")`. `NaN` and `inf` bodies are
/// recognised so that `inff` and `-infd` split correctly.
fn split_literal(token: &str) -> Option<Literal<'_>> {
    let (negative, unsigned) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };

    for special in ["NaN", "inf"] {
        if let Some(suffix) = unsigned.strip_prefix(special) {
            return Some(Literal {
                negative,
                body: special,
                suffix,
            });
        }
    }

    let bytes = unsigned.as_bytes();
    let mut end = 0;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }
    if end == 0 {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            while exp < bytes.len() && bytes[exp].is_ascii_digit() {
                exp += 1;
            }
            end = exp;
        }
    }

    Some(Literal {
        negative,
        body: &unsigned[..end],
        suffix: &unsigned[end..],
    })
}

impl Literal<'_> {
    fn signed(&self) -> String {
        if self.negative {
            format!("-{}", self.body)
        } else {
            self.body.to_string()
        }
    }

    fn integer<T: FromStr>(&self, kind: &str) -> std::result::Result<T, String> {
        if !self.body.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("expected an integer literal for {}", kind));
        }
        self.signed()
            .parse()
            .map_err(|_| format!("literal out of range for {}", kind))
    }

    fn floating<T: FromStr>(&self, kind: &str) -> std::result::Result<T, String> {
        self.signed()
            .parse()
            .map_err(|_| format!("invalid {} literal", kind))
    }

    /// Converts the literal according to its suffix.
    fn into_value(self) -> std::result::Result<DataValue, String> {
        let special = matches!(self.body, "NaN" | "inf");
        if special && !matches!(self.suffix, "f" | "d") {
            return Err("non-finite literal needs an 'f' or 'd' suffix".to_string());
        }
        let value = match self.suffix {
            "" => DataValue::Int(self.integer("int")?),
            "b" => DataValue::Byte(self.integer("byte")?),
            "s" => DataValue::Short(self.integer("short")?),
            "L" => DataValue::Long(self.integer("long")?),
            "bi" => DataValue::BigInt(self.integer::<BigInt>("bigint")?),
            "f" => DataValue::Float(self.floating("float")?),
            "d" => DataValue::Double(self.floating("double")?),
            "bd" => DataValue::BigDecimal(
                BigDecimal::from_str(&self.signed()).map_err(|_| "invalid bigdec literal".to_string())?,
            ),
            other => return Err(format!("unknown literal suffix '{}'", other)),
        };
        trace!(?value, "parsed literal");
        Ok(value)
    }
}

/// Parses a complete document: one value and nothing but whitespace after it.
pub(crate) fn parse(input: &str, options: &TextOptions) -> Result<DataValue> {
    let mut parser = Parser::with_options(input, options);
    let value = parser.parse_value()?;
    parser.end()?;
    Ok(value)
}
