use super::{Advisory, Distance};
use crate::{
    alignment::{CostTable, MatrixCost, edit_distance},
    data::{
        Record,
        err::{ConfigurationError, DistanceError, LookupError},
        matrices::{MatrixSource, SubstitutionMatrix},
    },
};
use std::{collections::BTreeSet, sync::Arc};
use tracing::warn;

/// The weight given to each default segment other than `cdr_3`.
const DEFAULT_WEIGHT: f64 = 1.0;
/// The weight given to the default `cdr_3` segment.
const DEFAULT_CDR3_WEIGHT: f64 = 3.0;
const DEFAULT_GAP_PENALTY: f64 = 4.0;
const DEFAULT_DISTANCE_BOUND: f64 = 4.0;

/// One named segment compared by [`TcrDist`].
///
/// With the `serde` feature, `weight` defaults to 1, `gap_penalty` to 4, and
/// `normalize` to `false` when omitted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(deny_unknown_fields))]
pub struct SegmentConfig {
    pub name:        String,
    #[cfg_attr(feature = "serde", serde(default = "default_weight"))]
    pub weight:      f64,
    #[cfg_attr(feature = "serde", serde(default = "default_gap_penalty"))]
    pub gap_penalty: f64,
    /// Divide the segment's distance by the length of the longer of the two
    /// segments before weighting.
    #[cfg_attr(feature = "serde", serde(default))]
    pub normalize:   bool,
}

#[cfg(feature = "serde")]
fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

#[cfg(feature = "serde")]
fn default_gap_penalty() -> f64 {
    DEFAULT_GAP_PENALTY
}

impl SegmentConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, weight: f64, gap_penalty: f64) -> Self {
        SegmentConfig {
            name: name.into(),
            weight,
            gap_penalty,
            normalize: false,
        }
    }

    /// Enables length normalization for this segment.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.normalize = true;
        self
    }
}

/// The parameters of [`TcrDist`].
///
/// | Field            | Default                                 |
/// |------------------|-----------------------------------------|
/// | `matrix`         | BLOSUM62                                |
/// | `distance_bound` | 4.0                                     |
/// | `gap_symbol`     | `'-'`                                   |
/// | `segments`       | `None` (the defaults, with an advisory) |
///
/// The default segments are `cdr_1`, `cdr_2`, and `cdr_2_5` with weight 1,
/// and `cdr_3` with weight 3, all with a gap penalty of 4. Leaving `segments`
/// unset uses them but raises [`Advisory::DefaultSegments`]; call
/// [`with_default_segments`] to confirm them instead.
///
/// [`with_default_segments`]: TcrDistConfig::with_default_segments
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default, deny_unknown_fields))]
pub struct TcrDistConfig {
    pub matrix:         MatrixSource,
    pub distance_bound: f64,
    pub gap_symbol:     Option<char>,
    pub segments:       Option<Vec<SegmentConfig>>,
}

impl Default for TcrDistConfig {
    fn default() -> Self {
        TcrDistConfig {
            matrix:         MatrixSource::default(),
            distance_bound: DEFAULT_DISTANCE_BOUND,
            gap_symbol:     Some('-'),
            segments:       None,
        }
    }
}

impl TcrDistConfig {
    /// The segments used when none are configured.
    #[must_use]
    pub fn default_segments() -> Vec<SegmentConfig> {
        vec![
            SegmentConfig::new("cdr_1", DEFAULT_WEIGHT, DEFAULT_GAP_PENALTY),
            SegmentConfig::new("cdr_2", DEFAULT_WEIGHT, DEFAULT_GAP_PENALTY),
            SegmentConfig::new("cdr_2_5", DEFAULT_WEIGHT, DEFAULT_GAP_PENALTY),
            SegmentConfig::new("cdr_3", DEFAULT_CDR3_WEIGHT, DEFAULT_GAP_PENALTY),
        ]
    }

    /// Confirms the default segments, so no advisory is raised.
    #[must_use]
    pub fn with_default_segments(mut self) -> Self {
        self.segments = Some(Self::default_segments());
        self
    }

    #[must_use]
    pub fn with_segments(mut self, segments: Vec<SegmentConfig>) -> Self {
        self.segments = Some(segments);
        self
    }
}

/// The TCR-dist metric between receptor chains with named segments.
///
/// For each configured segment, the two chains' sequences are globally
/// aligned with substitution cost `clamp(bound - score(a, b), 0, bound)` and
/// the segment's gap penalty. The distance is the weighted sum of those
/// per-segment edit distances. Segments a record carries beyond the
/// configured ones are ignored.
///
/// Identical symbols are charged like any other pair, so a chain is at
/// distance zero from itself only if every symbol it carries scores at least
/// `bound` against itself. This holds for the standard residues of the
/// bundled matrices but not for ambiguity codes such as `X`.
///
/// Segments may be pre-aligned with the configured gap symbol: a gap opposite
/// a residue costs the segment's gap penalty, and two gaps cost nothing.
///
/// ## Example
///
/// ```
/// # use setriq::{data::Record, distance::{Distance, SegmentConfig, TcrDist, TcrDistConfig}};
/// let config = TcrDistConfig::default().with_segments(vec![
///     SegmentConfig::new("cdr_1", 1.0, 4.0),
///     SegmentConfig::new("cdr_3", 3.0, 4.0),
/// ]);
/// let metric = TcrDist::new(config).unwrap();
///
/// let a: Record = [("cdr_1", "GTA"), ("cdr_3", "AASQ")].into_iter().collect();
/// let b: Record = [("cdr_1", "GTA"), ("cdr_3", "PASQ")].into_iter().collect();
///
/// // A/P costs 4 in cdr_3, which has weight 3
/// assert_eq!(metric.between(&a, &b).unwrap(), 12.0);
/// ```
#[derive(Debug, Clone)]
pub struct TcrDist {
    matrix:     Arc<SubstitutionMatrix>,
    costs:      CostTable,
    gap_symbol: Option<u8>,
    segments:   Vec<SegmentConfig>,
    advisories: Vec<Advisory>,
}

impl TcrDist {
    /// Builds the metric, logging a warning if the default segments were not
    /// confirmed.
    ///
    /// ## Errors
    ///
    /// Returns a [`ConfigurationError`] if the matrix does not load, the
    /// distance bound is not finite and positive, the gap symbol is not ASCII
    /// or belongs to the matrix, or the segments are empty, duplicated, or
    /// have invalid weights or gap penalties.
    pub fn new(config: TcrDistConfig) -> Result<Self, ConfigurationError> {
        let matrix = config.matrix.load()?;

        let bound = config.distance_bound;
        if !bound.is_finite() || bound <= 0.0 {
            return Err(ConfigurationError::InvalidDistanceBound(bound));
        }

        let gap_symbol = match config.gap_symbol {
            None => None,
            Some(symbol) => {
                let byte = match u8::try_from(symbol) {
                    Ok(byte) if byte.is_ascii() => byte,
                    _ => {
                        return Err(ConfigurationError::NonAsciiSymbol {
                            name: "gap_symbol".to_string(),
                            symbol,
                        });
                    }
                };
                if matrix.index().contains(byte) {
                    return Err(ConfigurationError::GapSymbolInMatrix {
                        name: matrix.name().to_string(),
                        symbol,
                    });
                }
                Some(byte)
            }
        };

        let mut advisories = Vec::new();
        let segments = match config.segments {
            Some(segments) => segments,
            None => {
                let segments = TcrDistConfig::default_segments();
                let names: Vec<String> = segments.iter().map(|s| s.name.clone()).collect();
                warn!(
                    segments = %names.join(","),
                    "TCR-dist segments were not configured, so the defaults are used"
                );
                advisories.push(Advisory::DefaultSegments { names });
                segments
            }
        };
        validate_segments(&segments)?;

        let costs = CostTable::from_scores(&matrix, bound);
        Ok(TcrDist {
            matrix,
            costs,
            gap_symbol,
            segments,
            advisories,
        })
    }

    #[inline]
    #[must_use]
    pub fn matrix(&self) -> &SubstitutionMatrix {
        &self.matrix
    }

    /// The segments compared, in order.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[SegmentConfig] {
        &self.segments
    }

    #[inline]
    #[must_use]
    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    /// Encodes a segment, mapping the gap symbol one past the last matrix
    /// index.
    #[allow(clippy::cast_possible_truncation)]
    fn encode_segment(&self, seq: &[u8]) -> Result<Vec<u8>, LookupError> {
        // A matrix has at most 255 symbols, so its dimension fits in a u8
        let gap_index = self.matrix.dim() as u8;
        let index = self.matrix.index();
        seq.iter()
            .map(|&b| match index.to_index(b) {
                Some(i) => Ok(i as u8),
                None if Some(b) == self.gap_symbol => Ok(gap_index),
                None => Err(LookupError::new(b)),
            })
            .collect()
    }
}

fn validate_segments(segments: &[SegmentConfig]) -> Result<(), ConfigurationError> {
    if segments.is_empty() {
        return Err(ConfigurationError::NoSegments);
    }

    let mut seen = BTreeSet::new();
    for segment in segments {
        if !seen.insert(segment.name.as_str()) {
            return Err(ConfigurationError::DuplicateSegment(segment.name.clone()));
        }
        if !segment.weight.is_finite() || segment.weight < 0.0 {
            return Err(ConfigurationError::InvalidWeight {
                segment: segment.name.clone(),
                weight:  segment.weight,
            });
        }
        if !segment.gap_penalty.is_finite() || segment.gap_penalty < 0.0 {
            return Err(ConfigurationError::InvalidGapPenalty(segment.gap_penalty));
        }
    }
    Ok(())
}

impl Distance for TcrDist {
    /// The encoded segments, in configured order.
    type Prepared = Vec<Vec<u8>>;

    fn prepare(&self, record: &Record, index: usize) -> Result<Vec<Vec<u8>>, DistanceError> {
        self.segments
            .iter()
            .map(|segment| -> Result<Vec<u8>, DistanceError> {
                let seq = record.segment(index, &segment.name)?;
                Ok(self
                    .encode_segment(seq)
                    .map_err(|e| e.in_record(index).in_segment(segment.name.as_str()))?)
            })
            .collect()
    }

    #[allow(clippy::cast_precision_loss)]
    fn distance(&self, a: &Vec<Vec<u8>>, b: &Vec<Vec<u8>>) -> f64 {
        self.segments
            .iter()
            .zip(a.iter().zip(b))
            .map(|(segment, (x, y))| {
                let mut d = edit_distance(x, y, &MatrixCost::new(&self.costs, segment.gap_penalty));
                if segment.normalize {
                    d /= x.len().max(y.len()) as f64;
                }
                segment.weight * d
            })
            .sum()
    }
}

#[cfg(test)]
mod test;
