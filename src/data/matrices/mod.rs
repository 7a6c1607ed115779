//! ## Substitution Matrices
//!
//! A [`SubstitutionMatrix`] maps an ordered pair of symbols to a real-valued
//! score. It is built once, validated, and then only ever read, so a single
//! matrix can be shared by every kernel invocation of a batch (and by several
//! metrics through an [`Arc`]).
//!
//! *setriq* ships the NCBI BLOSUM45, BLOSUM62, and BLOSUM80 tables (see
//! [`MatrixName`]). These cover the 20 standard amino acids, the ambiguous
//! codes `B`, `Z`, and `X`, and the stop codon `*`, and they resolve lowercase
//! residues to the same rows as uppercase ones.
//!
//! Custom matrices can be supplied as a row table with a symbol index
//! ([`SubstitutionMatrix::from_rows`]) or as a nested map
//! ([`SubstitutionMatrix::from_mapping`]). Custom alphabets are case-sensitive.
//! Every matrix must be square, finite, and symmetric, since the pairwise
//! distances built on top of it must not depend on argument order.
//!
//! ## Module Citations
//!
//! 1. Henikoff, S., & Henikoff, J. G. (1992). "Amino acid substitution matrices
//!    from protein blocks". Proceedings of the National Academy of Sciences of
//!    the United States of America, 89(22), 10915–10919. doi:
//!    <https://doi.org/10.1073/pnas.89.22.10915>

use crate::data::{
    err::{ConfigurationError, LookupError},
    mappings::SymbolIndex,
};
use std::{collections::BTreeMap, fmt::Display, str::FromStr, sync::Arc};

mod blosum;

use blosum::{AA_SYMBOLS, BLOSUM45, BLOSUM62, BLOSUM80};

/// The substitution matrices bundled with *setriq*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(try_from = "String", into = "String")
)]
pub enum MatrixName {
    Blosum45,
    #[default]
    Blosum62,
    Blosum80,
}

impl MatrixName {
    pub const ALL: [MatrixName; 3] = [MatrixName::Blosum45, MatrixName::Blosum62, MatrixName::Blosum80];

    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MatrixName::Blosum45 => "BLOSUM45",
            MatrixName::Blosum62 => "BLOSUM62",
            MatrixName::Blosum80 => "BLOSUM80",
        }
    }

    const fn table(self) -> &'static [[i8; 24]; 24] {
        match self {
            MatrixName::Blosum45 => &BLOSUM45,
            MatrixName::Blosum62 => &BLOSUM62,
            MatrixName::Blosum80 => &BLOSUM80,
        }
    }
}

impl Display for MatrixName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatrixName {
    type Err = ConfigurationError;

    /// Parses a matrix name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MatrixName::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigurationError::UnknownMatrix(s.to_string()))
    }
}

impl TryFrom<String> for MatrixName {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MatrixName> for String {
    fn from(value: MatrixName) -> Self {
        value.as_str().to_string()
    }
}

/// A square, symmetric table of substitution scores over an alphabet of at
/// most [`SymbolIndex::MAX_SYMBOLS`] ASCII symbols.
///
/// Scores are looked up either by symbol with [`score`] or, for sequences
/// already passed through [`encode`], by index with [`score_at`].
///
/// [`score`]: SubstitutionMatrix::score
/// [`encode`]: SubstitutionMatrix::encode
/// [`score_at`]: SubstitutionMatrix::score_at
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionMatrix {
    name:   String,
    index:  SymbolIndex,
    scores: Vec<f64>,
}

impl SubstitutionMatrix {
    /// Builds one of the bundled matrices.
    #[must_use]
    pub fn named(name: MatrixName) -> Self {
        let Some(index) = SymbolIndex::new_ignoring_case(AA_SYMBOLS) else {
            unreachable!("the BLOSUM alphabet has unique symbols");
        };

        let scores = name
            .table()
            .iter()
            .flat_map(|row| row.iter().map(|&s| f64::from(s)))
            .collect();

        SubstitutionMatrix {
            name: name.as_str().to_string(),
            index,
            scores,
        }
    }

    /// Builds a custom matrix from a symbol index and a table of rows, where
    /// `rows[index[a]][index[b]]` is the score of substituting `a` with `b`.
    ///
    /// ## Errors
    ///
    /// Returns a [`ConfigurationError`] if the alphabet is empty, too large,
    /// or contains non-ASCII symbols, if the index skips a position, if the
    /// table is not square, or if any score is non-finite or asymmetric.
    #[allow(clippy::float_cmp)]
    pub fn from_rows(
        name: impl Into<String>, index: &BTreeMap<char, usize>, rows: &[Vec<f64>],
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        let dim = index.len();

        if dim == 0 {
            return Err(ConfigurationError::EmptyMatrix { name });
        }
        if dim > SymbolIndex::MAX_SYMBOLS {
            return Err(ConfigurationError::TooManySymbols {
                name,
                found: dim,
                max: SymbolIndex::MAX_SYMBOLS,
            });
        }

        let mut slots: Vec<Option<u8>> = vec![None; dim];
        for (&symbol, &position) in index {
            let Ok(byte) = u8::try_from(symbol) else {
                return Err(ConfigurationError::NonAsciiSymbol { name, symbol });
            };
            if !byte.is_ascii() {
                return Err(ConfigurationError::NonAsciiSymbol { name, symbol });
            }
            if let Some(slot) = slots.get_mut(position)
                && slot.is_none()
            {
                *slot = Some(byte);
            }
        }

        // With unique keys, any collision or out-of-range position leaves a
        // hole in the index
        let symbols = match slots.iter().position(Option::is_none) {
            Some(position) => return Err(ConfigurationError::MissingIndexPosition { name, position, dim }),
            None => slots.into_iter().flatten().collect::<Vec<u8>>(),
        };

        if rows.len() != dim {
            return Err(ConfigurationError::RowCount {
                name,
                found: rows.len(),
                expected: dim,
            });
        }

        let mut scores = Vec::with_capacity(dim * dim);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(ConfigurationError::NotSquare {
                    name,
                    row: i,
                    found: row.len(),
                    expected: dim,
                });
            }
            for (j, &score) in row.iter().enumerate() {
                if !score.is_finite() {
                    return Err(ConfigurationError::NonFiniteScore {
                        name,
                        a: char::from(symbols[i]),
                        b: char::from(symbols[j]),
                        score,
                    });
                }
                scores.push(score);
            }
        }

        for i in 0..dim {
            for j in (i + 1)..dim {
                let (ab, ba) = (scores[i * dim + j], scores[j * dim + i]);
                if ab != ba {
                    return Err(ConfigurationError::Asymmetric {
                        name,
                        a: char::from(symbols[i]),
                        b: char::from(symbols[j]),
                        ab,
                        ba,
                    });
                }
            }
        }

        let Some(index) = SymbolIndex::new(&symbols) else {
            return Err(ConfigurationError::TooManySymbols {
                name,
                found: dim,
                max: SymbolIndex::MAX_SYMBOLS,
            });
        };

        Ok(SubstitutionMatrix { name, index, scores })
    }

    /// Builds a custom matrix from a nested map, where `mapping[a][b]` is the
    /// score of substituting `a` with `b`. The alphabet is the set of outer
    /// keys, and every inner map must have exactly the same keys.
    ///
    /// ## Errors
    ///
    /// See [`from_rows`]. Additionally, a missing inner entry is reported as
    /// [`ConfigurationError::MissingEntry`], and an inner map with extra keys
    /// as [`ConfigurationError::NotSquare`].
    ///
    /// [`from_rows`]: SubstitutionMatrix::from_rows
    pub fn from_mapping(
        name: impl Into<String>, mapping: &BTreeMap<char, BTreeMap<char, f64>>,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        let dim = mapping.len();

        let mut rows = Vec::with_capacity(dim);
        for (row, (&a, entries)) in mapping.iter().enumerate() {
            if entries.len() != dim {
                // Either a key is missing or an unknown key is present
                if let Some(&b) = mapping.keys().find(|b| !entries.contains_key(b)) {
                    return Err(ConfigurationError::MissingEntry { name, a, b });
                }
                return Err(ConfigurationError::NotSquare {
                    name,
                    row,
                    found: entries.len(),
                    expected: dim,
                });
            }

            let mut values = Vec::with_capacity(dim);
            for &b in mapping.keys() {
                let Some(&score) = entries.get(&b) else {
                    return Err(ConfigurationError::MissingEntry { name, a, b });
                };
                values.push(score);
            }
            rows.push(values);
        }

        let index = mapping.keys().enumerate().map(|(i, &c)| (c, i)).collect();
        Self::from_rows(name, &index, &rows)
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn index(&self) -> &SymbolIndex {
        &self.index
    }

    /// The number of symbols, which is the number of rows and of columns.
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.index.len()
    }

    /// Retrieves the score for substituting `a` with `b`.
    ///
    /// ## Errors
    ///
    /// Either symbol not being in the alphabet results in a [`LookupError`].
    #[inline]
    pub fn score(&self, a: u8, b: u8) -> Result<f64, LookupError> {
        let i = self.index.to_index(a).ok_or_else(|| LookupError::new(a))?;
        let j = self.index.to_index(b).ok_or_else(|| LookupError::new(b))?;
        Ok(self.score_at(i, j))
    }

    /// Retrieves the score for a pair of symbol indices, as produced by
    /// [`encode`](SubstitutionMatrix::encode).
    ///
    /// ## Panics
    ///
    /// Both indices must be less than [`dim`](SubstitutionMatrix::dim).
    #[inline]
    #[must_use]
    pub fn score_at(&self, i: usize, j: usize) -> f64 {
        self.scores[i * self.dim() + j]
    }

    /// Encodes a sequence into symbol indices for use with
    /// [`score_at`](SubstitutionMatrix::score_at).
    ///
    /// ## Errors
    ///
    /// The first unresolvable symbol is returned as a [`LookupError`].
    #[inline]
    pub fn encode(&self, seq: &[u8]) -> Result<Vec<u8>, LookupError> {
        self.index.encode(seq)
    }
}

/// Where a metric obtains its substitution matrix from.
///
/// With the `serde` feature, a string deserializes to [`MatrixSource::Named`]
/// (ignoring case), and an object with `index` and `substitution_matrix` keys
/// deserializes to [`MatrixSource::Custom`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(untagged, deny_unknown_fields))]
pub enum MatrixSource {
    Named(MatrixName),
    Custom {
        #[cfg_attr(feature = "serde", serde(default = "custom_name"))]
        name:                String,
        index:               BTreeMap<char, usize>,
        substitution_matrix: Vec<Vec<f64>>,
    },
    /// An already-built matrix, possibly shared with other metrics.
    #[cfg_attr(feature = "serde", serde(skip))]
    Loaded(Arc<SubstitutionMatrix>),
}

#[cfg(feature = "serde")]
fn custom_name() -> String {
    "custom".to_string()
}

impl Default for MatrixSource {
    fn default() -> Self {
        MatrixSource::Named(MatrixName::default())
    }
}

impl From<MatrixName> for MatrixSource {
    fn from(value: MatrixName) -> Self {
        MatrixSource::Named(value)
    }
}

impl From<SubstitutionMatrix> for MatrixSource {
    fn from(value: SubstitutionMatrix) -> Self {
        MatrixSource::Loaded(Arc::new(value))
    }
}

impl From<Arc<SubstitutionMatrix>> for MatrixSource {
    fn from(value: Arc<SubstitutionMatrix>) -> Self {
        MatrixSource::Loaded(value)
    }
}

impl MatrixSource {
    /// Builds (or shares) the matrix described by this source.
    ///
    /// ## Errors
    ///
    /// Custom tables are validated as in [`SubstitutionMatrix::from_rows`].
    pub fn load(&self) -> Result<Arc<SubstitutionMatrix>, ConfigurationError> {
        match self {
            MatrixSource::Named(name) => Ok(Arc::new(SubstitutionMatrix::named(*name))),
            MatrixSource::Custom {
                name,
                index,
                substitution_matrix,
            } => SubstitutionMatrix::from_rows(name.clone(), index, substitution_matrix).map(Arc::new),
            MatrixSource::Loaded(matrix) => Ok(Arc::clone(matrix)),
        }
    }
}
