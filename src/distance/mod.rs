//! ## Distance metrics over sequence records.
//!
//! Three metrics are provided:
//!
//! - [`Levenshtein`]: the unit-cost edit distance between two sequences.
//! - [`CdrDist`]: one minus the normalized Smith-Waterman similarity of two
//!   CDR sequences under a substitution matrix.
//! - [`TcrDist`]: a weighted sum of matrix-derived edit distances over the
//!   named segments of two receptor chains.
//!
//! Every metric implements [`Distance`], which splits the work into a
//! per-record [`prepare`] step (validation, symbol encoding, and cached
//! self-scores) and a per-pair [`distance`] step that cannot fail. The
//! [`PairwiseEngine`] prepares each record once and then computes every pair.
//!
//! [`Metric`] is the closed set of metrics, built from a [`MetricConfig`] or
//! selected by name:
//!
//! ```
//! # use setriq::{data::Record, distance::Metric};
//! let metric = Metric::by_name("levenshtein").unwrap();
//! let records: Vec<Record> = ["GTA", "HLA", "KKR"].into_iter().map(Record::from).collect();
//!
//! let distances = metric.compute(&records).unwrap();
//! assert_eq!(distances.values(), &[2.0, 3.0, 3.0]);
//! ```
//!
//! [`prepare`]: Distance::prepare
//! [`distance`]: Distance::distance
//! [`PairwiseEngine`]: crate::pairwise::PairwiseEngine

use crate::{
    data::{
        Record,
        err::{ConfigurationError, DistanceError},
    },
    pairwise::{CondensedMatrix, PairwiseEngine},
};
use std::{fmt::Display, str::FromStr};

mod cdr_dist;
mod levenshtein;
mod tcr_dist;

pub use cdr_dist::*;
pub use levenshtein::*;
pub use tcr_dist::*;

/// A symmetric distance between records.
///
/// Implementors must guarantee `distance(a, b) == distance(b, a)` bit for
/// bit. A record is not necessarily at distance zero from itself:
/// [`TcrDist`] charges the matrix's self-substitution cost, which is
/// non-zero for symbols such as BLOSUM62's `X`.
pub trait Distance: Send + Sync {
    /// The form of a record the metric compares, built once per record.
    type Prepared: Send + Sync;

    /// Validates and encodes a record. `index` is the record's position in
    /// its collection and is used for error reporting.
    ///
    /// ## Errors
    ///
    /// Records of the wrong shape give a [`ValidationError`], and symbols the
    /// metric cannot score give a [`LookupError`].
    ///
    /// [`ValidationError`]: crate::data::err::ValidationError
    /// [`LookupError`]: crate::data::err::LookupError
    fn prepare(&self, record: &Record, index: usize) -> Result<Self::Prepared, DistanceError>;

    /// The distance between two prepared records.
    fn distance(&self, a: &Self::Prepared, b: &Self::Prepared) -> f64;

    /// Prepares both records and computes their distance.
    ///
    /// ## Errors
    ///
    /// See [`prepare`](Distance::prepare). `a` is reported as record 0 and `b`
    /// as record 1.
    fn between(&self, a: &Record, b: &Record) -> Result<f64, DistanceError> {
        let a = self.prepare(a, 0)?;
        let b = self.prepare(b, 1)?;
        Ok(self.distance(&a, &b))
    }
}

/// A non-fatal notice raised while building a metric. Advisories never block
/// computation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Advisory {
    /// TCR-dist was built without confirming its segments, so the defaults
    /// are in use.
    DefaultSegments { names: Vec<String> },
}

impl Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::DefaultSegments { names } => write!(
                f,
                "TCR-dist is using the default segments ({}); confirm them with \
                 `TcrDistConfig::with_default_segments` or configure the segments explicitly",
                names.join(", ")
            ),
        }
    }
}

/// The names of the available metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Levenshtein,
    CdrDist,
    TcrDist,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [MetricKind::Levenshtein, MetricKind::CdrDist, MetricKind::TcrDist];

    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MetricKind::Levenshtein => "levenshtein",
            MetricKind::CdrDist => "cdr_dist",
            MetricKind::TcrDist => "tcr_dist",
        }
    }
}

impl Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = ConfigurationError;

    /// Parses a metric name, ignoring case, `_`, and `-`, so `"tcr_dist"`,
    /// `"TcrDist"`, and `"tcr-dist"` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-'))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "levenshtein" => Ok(MetricKind::Levenshtein),
            "cdrdist" => Ok(MetricKind::CdrDist),
            "tcrdist" => Ok(MetricKind::TcrDist),
            _ => Err(ConfigurationError::UnknownMetric(s.to_string())),
        }
    }
}

/// The configuration of any metric. With the `serde` feature this
/// deserializes from an object whose `"metric"` field names the metric, for
/// example `{"metric": "cdr_dist", "gap_open": 8.0}`. Omitted fields take
/// their defaults, and unknown fields are rejected.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(tag = "metric", rename_all = "snake_case")
)]
pub enum MetricConfig {
    Levenshtein,
    CdrDist(CdrDistConfig),
    TcrDist(TcrDistConfig),
}

impl MetricConfig {
    #[inline]
    #[must_use]
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricConfig::Levenshtein => MetricKind::Levenshtein,
            MetricConfig::CdrDist(_) => MetricKind::CdrDist,
            MetricConfig::TcrDist(_) => MetricKind::TcrDist,
        }
    }
}

impl From<MetricKind> for MetricConfig {
    /// The default configuration of each metric.
    fn from(kind: MetricKind) -> Self {
        match kind {
            MetricKind::Levenshtein => MetricConfig::Levenshtein,
            MetricKind::CdrDist => MetricConfig::CdrDist(CdrDistConfig::default()),
            MetricKind::TcrDist => MetricConfig::TcrDist(TcrDistConfig::default()),
        }
    }
}

impl From<CdrDistConfig> for MetricConfig {
    fn from(config: CdrDistConfig) -> Self {
        MetricConfig::CdrDist(config)
    }
}

impl From<TcrDistConfig> for MetricConfig {
    fn from(config: TcrDistConfig) -> Self {
        MetricConfig::TcrDist(config)
    }
}

/// A configured metric, ready to compute distances.
#[derive(Debug, Clone)]
pub enum Metric {
    Levenshtein(Levenshtein),
    CdrDist(CdrDist),
    TcrDist(TcrDist),
}

/// Dispatches an engine call to the metric held by a [`Metric`].
macro_rules! dispatch {
    ($metric:expr, $m:ident => $call:expr) => {
        match $metric {
            Metric::Levenshtein($m) => $call,
            Metric::CdrDist($m) => $call,
            Metric::TcrDist($m) => $call,
        }
    };
}

impl Metric {
    /// Builds and validates a metric.
    ///
    /// ## Errors
    ///
    /// Any invalid parameter gives a [`ConfigurationError`].
    pub fn from_config(config: MetricConfig) -> Result<Self, ConfigurationError> {
        Ok(match config {
            MetricConfig::Levenshtein => Metric::Levenshtein(Levenshtein),
            MetricConfig::CdrDist(config) => Metric::CdrDist(CdrDist::new(config)?),
            MetricConfig::TcrDist(config) => Metric::TcrDist(TcrDist::new(config)?),
        })
    }

    /// Builds a metric with its default configuration from its name.
    ///
    /// ## Errors
    ///
    /// Unknown names give [`ConfigurationError::UnknownMetric`].
    pub fn by_name(name: &str) -> Result<Self, ConfigurationError> {
        Self::from_config(name.parse::<MetricKind>()?.into())
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Levenshtein(_) => MetricKind::Levenshtein,
            Metric::CdrDist(_) => MetricKind::CdrDist,
            Metric::TcrDist(_) => MetricKind::TcrDist,
        }
    }

    /// Any advisories raised while the metric was built.
    #[inline]
    #[must_use]
    pub fn advisories(&self) -> &[Advisory] {
        match self {
            Metric::TcrDist(m) => m.advisories(),
            Metric::Levenshtein(_) | Metric::CdrDist(_) => &[],
        }
    }

    /// The distance between two records.
    ///
    /// ## Errors
    ///
    /// See [`Distance::between`].
    pub fn between(&self, a: &Record, b: &Record) -> Result<f64, DistanceError> {
        dispatch!(self, m => m.between(a, b))
    }

    /// All pairwise distances of `records` using the default
    /// [`PairwiseEngine`].
    ///
    /// ## Errors
    ///
    /// See [`PairwiseEngine::compute`].
    pub fn compute(&self, records: &[Record]) -> Result<CondensedMatrix, DistanceError> {
        self.pairwise(&PairwiseEngine::new(), records)
    }

    /// All pairwise distances of `records` using `engine`.
    ///
    /// ## Errors
    ///
    /// See [`PairwiseEngine::compute`].
    pub fn pairwise(&self, engine: &PairwiseEngine, records: &[Record]) -> Result<CondensedMatrix, DistanceError> {
        dispatch!(self, m => engine.compute(m, records))
    }

    /// Every error `records` would raise, in record order, without computing
    /// any distances.
    #[must_use]
    pub fn validate(&self, engine: &PairwiseEngine, records: &[Record]) -> Vec<DistanceError> {
        dispatch!(self, m => engine.validate(m, records))
    }

    /// The distances between every record of `a` and every record of `b`, in
    /// row-major order.
    ///
    /// ## Errors
    ///
    /// See [`PairwiseEngine::compute_cross`].
    pub fn compute_cross(&self, engine: &PairwiseEngine, a: &[Record], b: &[Record]) -> Result<Vec<f64>, DistanceError> {
        dispatch!(self, m => engine.compute_cross(m, a, b))
    }
}

impl From<Levenshtein> for Metric {
    fn from(metric: Levenshtein) -> Self {
        Metric::Levenshtein(metric)
    }
}

impl From<CdrDist> for Metric {
    fn from(metric: CdrDist) -> Self {
        Metric::CdrDist(metric)
    }
}

impl From<TcrDist> for Metric {
    fn from(metric: TcrDist) -> Self {
        Metric::TcrDist(metric)
    }
}

impl TryFrom<MetricConfig> for Metric {
    type Error = ConfigurationError;

    fn try_from(config: MetricConfig) -> Result<Self, Self::Error> {
        Metric::from_config(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn metric_names() {
        for kind in MetricKind::ALL {
            assert_eq!(kind.as_str().parse::<MetricKind>(), Ok(kind));
        }
        assert_eq!("TcrDist".parse::<MetricKind>(), Ok(MetricKind::TcrDist));
        assert_eq!("cdr-dist".parse::<MetricKind>(), Ok(MetricKind::CdrDist));
        assert_eq!(
            "hamming".parse::<MetricKind>(),
            Err(ConfigurationError::UnknownMetric("hamming".to_string()))
        );
    }

    #[test]
    fn by_name_uses_defaults() {
        let metric = Metric::by_name("tcr_dist").unwrap();
        assert_eq!(metric.kind(), MetricKind::TcrDist);
        assert!(matches!(metric.advisories(), [Advisory::DefaultSegments { .. }]));

        let metric = Metric::by_name("cdr_dist").unwrap();
        assert_eq!(metric.kind(), MetricKind::CdrDist);
        assert!(metric.advisories().is_empty());
    }

    #[test]
    fn advisory_message_lists_segments() {
        let advisory = Advisory::DefaultSegments {
            names: vec!["cdr_1".to_string(), "cdr_3".to_string()],
        };
        assert!(advisory.to_string().contains("(cdr_1, cdr_3)"));
    }
}
