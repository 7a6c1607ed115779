//! ## Smith-Waterman Alignment
//!
//! [`sw_score`] yields the optimal local alignment score of two sequences
//! that have been encoded against a [`SubstitutionMatrix`]. One operand is
//! wrapped in a [`LocalProfile`], which combines the sequence, the matrix,
//! and the [`AffineGaps`] penalties, and can be scored against any number of
//! references.
//!
//! ### Affine Gap Penalties
//!
//! We use the affine gap formula, $W(k) = u(k-1) + v$, where $k$ is the gap
//! length, $u$ is the gap extend penalty, $v$ is the gap open penalty, and
//! $W(k)$ is the total penalty for the gap. Penalties are given as
//! non-negative magnitudes and subtracted from the score.
//!
//! ```
//! # use setriq::{
//! #     alignment::{AffineGaps, LocalProfile, sw_score},
//! #     data::matrices::{MatrixName, SubstitutionMatrix},
//! # };
//! let matrix = SubstitutionMatrix::named(MatrixName::Blosum62);
//! let gaps = AffineGaps::new(10.0, 1.0).unwrap();
//!
//! let query = matrix.encode(b"AASQ").unwrap();
//! let reference = matrix.encode(b"PASQ").unwrap();
//!
//! let profile = LocalProfile::new(&query, &matrix, gaps);
//! assert_eq!(sw_score(&reference, &profile), 13.0);
//! assert_eq!(profile.self_score(), 17.0);
//! ```
//!
//! ## Module Citations
//!
//! 1. Smith, Temple F. & Waterman, Michael S. (1981). "Identification of Common
//!    Molecular Subsequences" (PDF). Journal of Molecular Biology. 147 (1):
//!    195–197.
//!
//! 2. Osamu Gotoh (1982). "An improved algorithm for matching biological
//!    sequences". Journal of Molecular Biology. 162 (3): 705–708.
//!
//! 3. Tomáš Flouri, Kassian Kobert, Torbjørn Rognes, Alexandros
//!    Stamatakis(2015). "Are all global alignment algorithms and
//!    implementations correct?" bioRxiv 031500. doi:
//!    <https://doi.org/10.1101/031500>
//!
//! [`SubstitutionMatrix`]: crate::data::matrices::SubstitutionMatrix

use crate::data::{err::ConfigurationError, matrices::SubstitutionMatrix};

mod scalar;

pub use scalar::*;


/// Validated affine gap penalties, as non-negative magnitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineGaps {
    open:   f64,
    extend: f64,
}

impl AffineGaps {
    /// ## Errors
    ///
    /// Negative or non-finite penalties give
    /// [`ConfigurationError::InvalidGapPenalty`], and an extension penalty
    /// larger than the opening penalty gives
    /// [`ConfigurationError::BadGapWeights`].
    pub fn new(open: f64, extend: f64) -> Result<Self, ConfigurationError> {
        for penalty in [open, extend] {
            if !penalty.is_finite() || penalty < 0.0 {
                return Err(ConfigurationError::InvalidGapPenalty(penalty));
            }
        }
        if extend > open {
            return Err(ConfigurationError::BadGapWeights { open, extend });
        }
        Ok(AffineGaps { open, extend })
    }

    #[inline]
    #[must_use]
    pub fn open(&self) -> f64 {
        self.open
    }

    #[inline]
    #[must_use]
    pub fn extend(&self) -> f64 {
        self.extend
    }
}

impl Default for AffineGaps {
    fn default() -> Self {
        AffineGaps {
            open:   10.0,
            extend: 1.0,
        }
    }
}

/// An encoded query sequence together with the scoring parameters for local
/// alignment.
#[derive(Debug, Clone, Copy)]
pub struct LocalProfile<'a> {
    pub(crate) seq:    &'a [u8],
    pub(crate) matrix: &'a SubstitutionMatrix,
    pub(crate) gaps:   AffineGaps,
}

impl<'a> LocalProfile<'a> {
    /// Creates a profile for `seq`, which must already be encoded against
    /// `matrix` (see [`SubstitutionMatrix::encode`]).
    #[inline]
    #[must_use]
    pub fn new(seq: &'a [u8], matrix: &'a SubstitutionMatrix, gaps: AffineGaps) -> Self {
        LocalProfile { seq, matrix, gaps }
    }

    /// The score of aligning the query against itself.
    #[inline]
    #[must_use]
    pub fn self_score(&self) -> f64 {
        sw_score(self.seq, self)
    }
}
