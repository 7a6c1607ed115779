use crate::data::err::LookupError;

/// Represents a mapping between bytes and dense indices, such as the rows of a
/// [`SubstitutionMatrix`]. Unlike a lossy catch-all mapping, bytes outside the
/// alphabet map to [`SymbolIndex::UNMAPPED`] and are reported as a
/// [`LookupError`] when a sequence is encoded.
///
/// [`SubstitutionMatrix`]: crate::data::matrices::SubstitutionMatrix
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct SymbolIndex {
    pub(crate) index_map: [u8; 256],
    pub(crate) symbols:   Vec<u8>,
}

impl SymbolIndex {
    /// The index stored for bytes that are not part of the alphabet.
    pub const UNMAPPED: u8 = u8::MAX;

    /// The largest alphabet that can be indexed, since [`UNMAPPED`] is
    /// reserved.
    ///
    /// [`UNMAPPED`]: SymbolIndex::UNMAPPED
    pub const MAX_SYMBOLS: usize = u8::MAX as usize;

    /// Creates a new [`SymbolIndex`] where `symbols[i]` maps to `i`.
    ///
    /// Returns `None` if `symbols` has duplicates or more than
    /// [`MAX_SYMBOLS`] entries.
    ///
    /// [`MAX_SYMBOLS`]: SymbolIndex::MAX_SYMBOLS
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn new(symbols: &[u8]) -> Option<Self> {
        if symbols.len() > Self::MAX_SYMBOLS {
            return None;
        }

        let mut out = SymbolIndex {
            index_map: [Self::UNMAPPED; 256],
            symbols:   symbols.to_vec(),
        };

        for (i, &symbol) in symbols.iter().enumerate() {
            if out.index_map[symbol as usize] != Self::UNMAPPED {
                return None;
            }
            // Truncation will not occur because the alphabet is at most
            // MAX_SYMBOLS long
            out.index_map[symbol as usize] = i as u8;
        }

        Some(out)
    }

    /// Creates a new [`SymbolIndex`] that also maps the other case of every
    /// ASCII letter in `symbols`, unless that byte is itself a symbol.
    #[must_use]
    pub fn new_ignoring_case(symbols: &[u8]) -> Option<Self> {
        let mut out = Self::new(symbols)?;
        for &symbol in symbols {
            let index = out.index_map[symbol as usize];
            for other in [symbol.to_ascii_lowercase(), symbol.to_ascii_uppercase()] {
                if out.index_map[other as usize] == Self::UNMAPPED {
                    out.index_map[other as usize] = index;
                }
            }
        }
        Some(out)
    }

    /// The number of symbols in the alphabet.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The alphabet, in index order.
    #[inline]
    #[must_use]
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Convert a byte into an index, if it is part of the alphabet.
    #[inline]
    #[must_use]
    pub fn to_index(&self, b: u8) -> Option<usize> {
        match self.index_map[b as usize] {
            Self::UNMAPPED => None,
            i => Some(i as usize),
        }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, b: u8) -> bool {
        self.index_map[b as usize] != Self::UNMAPPED
    }

    /// Encodes a sequence into alphabet indices.
    ///
    /// ## Errors
    ///
    /// The first byte that is not in the alphabet is returned as a
    /// [`LookupError`].
    pub fn encode(&self, seq: &[u8]) -> Result<Vec<u8>, LookupError> {
        seq.iter()
            .map(|&b| match self.index_map[b as usize] {
                Self::UNMAPPED => Err(LookupError::new(b)),
                i => Ok(i),
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encode_and_reject() {
        let index = SymbolIndex::new(b"ACGT").unwrap();
        assert_eq!(index.encode(b"GATTACA").unwrap(), vec![2, 0, 3, 3, 0, 1, 0]);
        assert_eq!(index.encode(b"GANTACA"), Err(LookupError::new(b'N')));
        assert_eq!(index.to_index(b'a'), None);
    }

    #[test]
    fn ignoring_case() {
        let index = SymbolIndex::new_ignoring_case(b"AC*").unwrap();
        assert_eq!(index.to_index(b'a'), Some(0));
        assert_eq!(index.to_index(b'c'), Some(1));
        assert_eq!(index.to_index(b'*'), Some(2));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn case_sensitive_symbols_are_kept() {
        let index = SymbolIndex::new_ignoring_case(b"Aa").unwrap();
        assert_eq!(index.to_index(b'A'), Some(0));
        assert_eq!(index.to_index(b'a'), Some(1));
    }

    #[test]
    fn duplicates_and_oversize() {
        assert!(SymbolIndex::new(b"ACA").is_none());

        let too_many: Vec<u8> = (0..=u8::MAX).collect();
        assert!(SymbolIndex::new(&too_many).is_none());
        assert!(SymbolIndex::new(&too_many[..255]).is_some());
    }
}
