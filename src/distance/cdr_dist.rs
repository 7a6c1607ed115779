use super::Distance;
use crate::{
    alignment::{AffineGaps, LocalProfile, sw_score},
    data::{
        Record,
        err::{ConfigurationError, DistanceError},
        matrices::{MatrixName, MatrixSource, SubstitutionMatrix},
    },
};
use std::sync::Arc;

/// The parameters of [`CdrDist`]. Gap penalties are non-negative magnitudes.
///
/// | Field        | Default    |
/// |--------------|------------|
/// | `matrix`     | BLOSUM62   |
/// | `gap_open`   | 10.0       |
/// | `gap_extend` | 1.0        |
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default, deny_unknown_fields))]
pub struct CdrDistConfig {
    pub matrix:     MatrixSource,
    pub gap_open:   f64,
    pub gap_extend: f64,
}

impl Default for CdrDistConfig {
    fn default() -> Self {
        let gaps = AffineGaps::default();
        CdrDistConfig {
            matrix:     MatrixSource::default(),
            gap_open:   gaps.open(),
            gap_extend: gaps.extend(),
        }
    }
}

/// A CDR sequence encoded against the metric's matrix, with its alignment
/// score against itself.
#[derive(Debug, Clone, PartialEq)]
pub struct CdrSequence {
    encoded:    Vec<u8>,
    self_score: f64,
}

impl CdrSequence {
    #[inline]
    #[must_use]
    pub fn self_score(&self) -> f64 {
        self.self_score
    }
}

/// A distance between CDR sequences derived from their local alignment score.
///
/// With $S(a, b)$ the Smith-Waterman score of $a$ and $b$ under the
/// configured matrix and affine gaps, the distance is
///
/// $$d(a, b) = 1 - \frac{S(a, b)}{\sqrt{S(a, a) \cdot S(b, b)}}$$
///
/// Identical sequences are at distance 0 and sequences sharing no
/// positively-scoring local alignment are at distance 1. When either
/// self-score is not positive, the distance is 0 for identical sequences and
/// 1 otherwise. The result is never negative.
///
/// ## Example
///
/// ```
/// # use setriq::{assert_fp_eq, data::Record, distance::{CdrDist, Distance}};
/// let metric = CdrDist::default();
/// let d = metric.between(&Record::from("AASQ"), &Record::from("PASQ")).unwrap();
/// assert_fp_eq!(@absolute, d, 0.2950, 5e-5);
/// ```
#[derive(Debug, Clone)]
pub struct CdrDist {
    matrix: Arc<SubstitutionMatrix>,
    gaps:   AffineGaps,
}

impl CdrDist {
    /// ## Errors
    ///
    /// The matrix must load, and the gap penalties must be valid (see
    /// [`AffineGaps::new`]).
    pub fn new(config: CdrDistConfig) -> Result<Self, ConfigurationError> {
        let matrix = config.matrix.load()?;
        let gaps = AffineGaps::new(config.gap_open, config.gap_extend)?;
        Ok(CdrDist { matrix, gaps })
    }

    #[inline]
    #[must_use]
    pub fn matrix(&self) -> &SubstitutionMatrix {
        &self.matrix
    }

    #[inline]
    #[must_use]
    pub fn gaps(&self) -> AffineGaps {
        self.gaps
    }
}

impl Default for CdrDist {
    fn default() -> Self {
        CdrDist {
            matrix: Arc::new(SubstitutionMatrix::named(MatrixName::default())),
            gaps:   AffineGaps::default(),
        }
    }
}

impl Distance for CdrDist {
    type Prepared = CdrSequence;

    fn prepare(&self, record: &Record, index: usize) -> Result<CdrSequence, DistanceError> {
        let seq = record.as_sequence(index)?;
        let encoded = self.matrix.encode(seq).map_err(|e| e.in_record(index))?;
        let self_score = LocalProfile::new(&encoded, &self.matrix, self.gaps).self_score();
        Ok(CdrSequence { encoded, self_score })
    }

    fn distance(&self, a: &CdrSequence, b: &CdrSequence) -> f64 {
        if a.encoded == b.encoded {
            return 0.0;
        }

        let denominator = (a.self_score * b.self_score).sqrt();
        if denominator <= 0.0 {
            return 1.0;
        }

        // A fixed operand order keeps the score bit-identical under swapping
        let (query, reference) = if (a.encoded.len(), &a.encoded) <= (b.encoded.len(), &b.encoded) {
            (a, b)
        } else {
            (b, a)
        };
        let score = sw_score(&reference.encoded, &LocalProfile::new(&query.encoded, &self.matrix, self.gaps));

        (1.0 - score / denominator).max(0.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{assert_fp_eq, data::err::LookupError};
    use std::collections::BTreeMap;

    fn distance(metric: &CdrDist, a: &str, b: &str) -> f64 {
        metric.between(&a.into(), &b.into()).unwrap()
    }

    #[test]
    fn cdr_dist_values() {
        let metric = CdrDist::new(CdrDistConfig::default()).unwrap();

        assert_fp_eq!(@absolute, distance(&metric, "AASQ", "PASQ"), 0.2950, 5e-5);
        assert_fp_eq!(@absolute, distance(&metric, "GTA", "HLA"), 0.7418, 5e-5);
        assert_fp_eq!(distance(&metric, "GTA", "KKR"), 1.0);
        assert_fp_eq!(distance(&metric, "HLA", "KKR"), 1.0);
        assert_eq!(distance(&metric, "CASSLGQAYEQYF", "CASSLGQAYEQYF"), 0.0);
    }

    #[test]
    fn cdr_dist_is_symmetric() {
        let metric = CdrDist::default();
        let pairs = [("CASSLGQAYEQYF", "CASSPGQGYEQYF"), ("CAWSV", "CASSLAPGATNEKLFF"), ("MNHEY", "SVGAGI")];
        for (a, b) in pairs {
            assert_eq!(distance(&metric, a, b).to_bits(), distance(&metric, b, a).to_bits());
        }
    }

    #[test]
    fn cdr_dist_ignores_case_for_named_matrices() {
        let metric = CdrDist::default();
        assert_eq!(distance(&metric, "aasq", "AASQ"), 0.0);
    }

    #[test]
    fn cdr_dist_unknown_symbol() {
        let metric = CdrDist::default();
        let err = metric.between(&"AASQ".into(), &"AAJQ".into()).unwrap_err();
        assert_eq!(err, LookupError::new(b'J').in_record(1).into());
    }

    #[test]
    fn cdr_dist_zero_self_score() {
        // Every score is negative, so no local alignment scores above zero
        let mut mapping = BTreeMap::new();
        mapping.insert('A', [('A', -1.0), ('C', -2.0)].into_iter().collect());
        mapping.insert('C', [('A', -2.0), ('C', -1.0)].into_iter().collect());
        let matrix = SubstitutionMatrix::from_mapping("negative", &mapping).unwrap();

        let metric = CdrDist::new(CdrDistConfig {
            matrix: matrix.into(),
            ..CdrDistConfig::default()
        })
        .unwrap();

        assert_eq!(distance(&metric, "AC", "AC"), 0.0);
        assert_eq!(distance(&metric, "AC", "CA"), 1.0);
    }

    #[test]
    fn cdr_dist_configuration() {
        let err = CdrDist::new(CdrDistConfig {
            gap_open: 1.0,
            gap_extend: 2.0,
            ..CdrDistConfig::default()
        })
        .unwrap_err();
        assert_eq!(err, ConfigurationError::BadGapWeights { open: 1.0, extend: 2.0 });

        let metric = CdrDist::new(CdrDistConfig {
            matrix: MatrixName::Blosum45.into(),
            ..CdrDistConfig::default()
        })
        .unwrap();
        assert_eq!(metric.matrix().name(), "BLOSUM45");
    }
}
