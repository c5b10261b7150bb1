//! String hashing strategies used by `ChainMap` to pick a bucket.

/// Selects how a key's bytes are folded into a raw hash.
///
/// The strategy is fixed for the lifetime of a map; it is part of
/// [`ChainMapConfig`](crate::ChainMapConfig).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum StringHash {
    /// Sum of the byte values.
    Sum,
    /// Each byte value multiplied by its 1-based position, then summed.
    #[default]
    PositionWeighted,
}

impl StringHash {
    /// Raw hash of `key`. Arithmetic wraps, so long keys may produce a
    /// negative result; [`bucket_index`] accounts for that.
    ///
    /// Each UTF-8 byte counts as its unsigned value (0..=255), so a
    /// non-ASCII key hashes the same on every platform regardless of the
    /// signedness of a C `char`.
    pub fn hash(self, key: &str) -> i64 {
        match self {
            StringHash::Sum => key
                .bytes()
                .fold(0i64, |acc, b| acc.wrapping_add(i64::from(b))),
            StringHash::PositionWeighted => {
                key.bytes().enumerate().fold(0i64, |acc, (i, b)| {
                    let weight = (i as i64).wrapping_add(1);
                    acc.wrapping_add(weight.wrapping_mul(i64::from(b)))
                })
            }
        }
    }
}

/// Maps a raw hash into `[0, table_size)`.
///
/// The remainder of a negative hash is negative; it is brought into range by
/// adding `table_size` once. `table_size` must be non-zero.
#[inline]
pub fn bucket_index(hash: i64, table_size: usize) -> usize {
    debug_assert!(table_size > 0);
    // Table sizes beyond i64::MAX cannot be allocated.
    let n = table_size as i64;
    let mut rem = hash % n;
    if rem < 0 {
        rem += n;
    }
    rem as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_adds_byte_values() {
        assert_eq!(StringHash::Sum.hash(""), 0);
        assert_eq!(StringHash::Sum.hash("a"), 97);
        assert_eq!(StringHash::Sum.hash("ab"), 97 + 98);
        // Anagrams collide under the plain sum.
        assert_eq!(StringHash::Sum.hash("ab"), StringHash::Sum.hash("ba"));
    }

    #[test]
    fn position_weighted_uses_one_based_positions() {
        assert_eq!(StringHash::PositionWeighted.hash(""), 0);
        assert_eq!(StringHash::PositionWeighted.hash("a"), 97);
        assert_eq!(StringHash::PositionWeighted.hash("ab"), 97 + 2 * 98);
        assert_eq!(StringHash::PositionWeighted.hash("ba"), 98 + 2 * 97);
        assert_ne!(
            StringHash::PositionWeighted.hash("ab"),
            StringHash::PositionWeighted.hash("ba")
        );
    }

    /// Invariant: non-ASCII bytes contribute their unsigned value.
    #[test]
    fn non_ascii_bytes_are_unsigned() {
        // "é" is 0xC3 0xA9 in UTF-8.
        assert_eq!(StringHash::Sum.hash("é"), 0xC3 + 0xA9);
        assert_eq!(StringHash::PositionWeighted.hash("é"), 0xC3 + 2 * 0xA9);
        assert!(StringHash::Sum.hash("ééé") > 0);
    }

    #[test]
    fn bucket_index_stays_in_range() {
        assert_eq!(bucket_index(0, 4), 0);
        assert_eq!(bucket_index(9, 4), 1);
        assert_eq!(bucket_index(-1, 4), 3);
        assert_eq!(bucket_index(-8, 4), 0);
        assert!(bucket_index(i64::MIN, 7) < 7);
        assert!(bucket_index(i64::MAX, 7) < 7);
        assert_eq!(bucket_index(12345, 1), 0);
    }

    #[test]
    fn default_strategy_is_position_weighted() {
        assert_eq!(StringHash::default(), StringHash::PositionWeighted);
    }
}
