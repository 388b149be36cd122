//! Format Reference
//!
//! This module documents both encodings as implemented by this library.
//!
//! # Overview
//!
//! Every document is a single root [`DataValue`](crate::DataValue). The binary
//! encoding is compact and self-describing through one-byte type ids; the USO
//! text encoding carries the same information through literal syntax. Both
//! round-trip every value exactly, including the variant of every number.
//!
//! # Type Identifiers
//!
//! | Id | Name | Id | Name |
//! |---|---|---|---|
//! | `0x01` | byte | `0x0C` | list |
//! | `0x02` | short | `0x0D` | map |
//! | `0x03` | int | `0x0E` | byte_array |
//! | `0x04` | long | `0x0F` | short_array |
//! | `0x05` | bigint | `0x10` | int_array |
//! | `0x06` | float | `0x11` | long_array |
//! | `0x07` | double | `0x12` | float_array |
//! | `0x08` | bigdec | `0x13` | double_array |
//! | `0x09` | char | `0x14` | char_array |
//! | `0x0A` | boolean | `0x15` | bitset |
//! | `0x0B` | string | `0x16` | uuid |
//!
//! Identifiers are permanent; `0x00` and everything above `0x16` are unknown.
//!
//! # Binary Encoding
//!
//! ## Header
//!
//! ```text
//! FF 80 42 69   magic
//! 00 03         version
//! 0D            root type id
//! ...           root payload
//! ```
//!
//! Readers reject a wrong magic number, any version above 3, and (when the
//! caller names one) a root id other than the expected type. All three checks
//! happen before the payload is touched.
//!
//! ## Payloads
//!
//! Integers are big-endian. Lengths and counts are `u32` except map keys.
//!
//! | Variant | Payload |
//! |---|---|
//! | byte, short, int, long | 1, 2, 4, 8 bytes, two's complement |
//! | float, double | IEEE-754 bit pattern, 4 or 8 bytes |
//! | bigint | length, then the minimal two's complement big-endian bytes |
//! | bigdec | `i32` scale, then the unscaled value as a bigint |
//! | char | one UTF-16 code unit, 2 bytes |
//! | boolean | 1 byte, zero is false |
//! | string | byte length, then UTF-8 |
//! | arrays | element count, then the elements at their fixed width |
//! | bitset | byte length, then little-endian bit bytes (bit `i` in byte `i / 8`) |
//! | uuid | most significant 8 bytes, then least significant 8 bytes |
//! | list | count, element type id, then the bare element payloads |
//! | map | count, then per entry a `u16` key length, the UTF-8 key, the value type id and payload |
//!
//! An empty map is therefore the 11 bytes
//! `FF 80 42 69 00 03 0D 00 00 00 00`.
//!
//! ## Compression
//!
//! Compressed archives are a binary stream inside a plain gzip member. No
//! extra framing is added.
//!
//! # USO Text Encoding
//!
//! ## Scalars
//!
//! ```text
//! 5b  5s  5  5L  5bi            byte short int long bigint
//! 1.5f  1.5d  1.50bd  12e3bd    float double bigdec
//! NaNf  infd  -infd             non-finite floats
//! 'a'  '\n'  '\uD800'           char (one UTF-16 code unit)
//! true  false                   boolean
//! "text"                        string
//! <123e4567-e89b-12d3-a456-426614174000>   uuid
//! ```
//!
//! The suffixes above are the complete list. Integer suffixes require an
//! integer body and a value in range; `1.5` alone (no suffix) is an error
//! because unsuffixed numbers are ints.
//!
//! ## Escapes
//!
//! Strings and chars accept `\"`, `\'`, `\\`, `\n`, `\r`, `\t` and `\uXXXX`.
//! In strings a `\u` high surrogate must be followed by a `\u` low surrogate.
//! Any other escape is an error.
//!
//! ## Containers
//!
//! ```text
//! {"name": "abc", "count": 5s}   map
//! [1s, 2s]                       list, element type taken from the first element
//! [short;]                       empty list with its element type header
//! [int; 1, 2]                    list with an explicit header
//! [B; 1b, 2b]                    byte array (tags B S I L F D C)
//! [X; 0, 3, 9]                   bitset, as the indices of the set bits
//! ```
//!
//! Map keys are always quoted strings. List elements must all share one
//! variant.
//!
//! ## Whitespace and Layout
//!
//! Whitespace, including line breaks, is allowed between tokens. A document is
//! exactly one value; anything but whitespace after it is an error. The
//! compact writer uses `", "` and `": "` separators on a single line; pretty
//! output places every map entry and list element on its own line. Arrays are
//! always written on one line.
//!
//! # Limits
//!
//! - Map keys are at most 65535 bytes of UTF-8
//! - Strings, arrays and containers hold at most `u32::MAX` bytes or elements
//! - Decoders stop at a configurable nesting depth (512 by default). Encoders
//!   do not check depth, so a deeper tree needs a raised `max_depth` to be
//!   read back
//! - The text parser rejects bitset indices above 1048575 by default
//!   (`TextOptions::max_bitset_index`)
//! - A bigdec whose adjusted exponent is below -6 is written in exponent form,
//!   e.g. `1e-7bd`, so huge scales never expand into long runs of zeros

// This module contains only documentation; no implementation code
