//! A growable set of bit indices.
//!
//! Bits are stored little-endian: bit `i` lives in byte `i / 8` under mask
//! `1 << (i % 8)`. Trailing zero bytes are always trimmed, so two sets are equal
//! exactly when they contain the same indices, and the backing bytes are the
//! canonical payload written to the binary stream.

use std::fmt;

/// A set of non-negative bit indices backed by bytes.
///
/// # Examples
///
/// ```rust
/// use ubo::BitSet;
///
/// let mut bits = BitSet::new();
/// bits.set(3);
/// bits.set(9);
/// assert!(bits.get(3));
/// assert!(!bits.get(4));
/// assert_eq!(bits.len(), 10);
/// assert_eq!(bits.as_bytes(), &[0b0000_1000, 0b0000_0010]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitSet {
    bytes: Vec<u8>,
}

impl BitSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        BitSet { bytes: Vec::new() }
    }

    /// Creates a set from little-endian backing bytes.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let mut set = BitSet {
            bytes: bytes.into(),
        };
        set.trim();
        set
    }

    /// Returns the canonical backing bytes (no trailing zero byte).
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns whether bit `index` is set.
    #[must_use]
    pub fn get(&self, index: usize) -> bool {
        self.bytes
            .get(index / 8)
            .is_some_and(|byte| byte & (1 << (index % 8)) != 0)
    }

    /// Sets bit `index`, growing the backing storage as needed.
    pub fn set(&mut self, index: usize) {
        let byte = index / 8;
        if byte >= self.bytes.len() {
            self.bytes.resize(byte + 1, 0);
        }
        self.bytes[byte] |= 1 << (index % 8);
    }

    /// Clears bit `index`.
    pub fn clear(&mut self, index: usize) {
        if let Some(byte) = self.bytes.get_mut(index / 8) {
            *byte &= !(1 << (index % 8));
            self.trim();
        }
    }

    /// Returns the index of the highest set bit plus one, or zero when empty.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.bytes.last() {
            Some(last) => (self.bytes.len() - 1) * 8 + (8 - last.leading_zeros() as usize),
            None => 0,
        }
    }

    /// Returns `true` if no bit is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Iterates over the set indices in ascending order.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bytes.iter().enumerate().flat_map(|(i, byte)| {
            (0..8)
                .filter(move |bit| byte & (1 << bit) != 0)
                .map(move |bit| i * 8 + bit)
        })
    }

    fn trim(&mut self) {
        while self.bytes.last() == Some(&0) {
            self.bytes.pop();
        }
    }
}

impl FromIterator<usize> for BitSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut set = BitSet::new();
        for index in iter {
            set.set(index);
        }
        set
    }
}

impl fmt::Display for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, index) in self.ones().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_zero_bytes_do_not_affect_equality() {
        let a = BitSet::from_bytes(vec![0b101, 0, 0]);
        let b = BitSet::from_bytes(vec![0b101]);
        assert_eq!(a, b);
        assert_eq!(a.as_bytes(), &[0b101]);
    }

    #[test]
    fn test_clear_shrinks() {
        let mut bits: BitSet = [1, 17].into_iter().collect();
        assert_eq!(bits.len(), 18);
        bits.clear(17);
        assert_eq!(bits.len(), 2);
        assert_eq!(bits.as_bytes().len(), 1);
        bits.clear(1);
        assert!(bits.is_empty());
        bits.clear(400);
        assert!(bits.is_empty());
    }

    #[test]
    fn test_ones_and_count() {
        let bits: BitSet = [0, 7, 8, 63].into_iter().collect();
        assert_eq!(bits.ones().collect::<Vec<_>>(), vec![0, 7, 8, 63]);
        assert_eq!(bits.count_ones(), 4);
        assert_eq!(bits.to_string(), "{0, 7, 8, 63}");
    }
}
