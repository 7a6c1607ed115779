#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::wildcard_imports)]

/// Dynamic-programming alignment kernels.
pub mod alignment;
/// Records, substitution matrices, and error types.
pub mod data;
/// Distance metrics and the metric registry.
pub mod distance;
/// All-pairs computation and the condensed result.
pub mod pairwise;

/// Generate random sequences.
#[cfg(feature = "rand")]
pub mod generate;

/// Floating point comparison used by [`assert_fp_eq`] and [`is_fp_eq`].
#[doc(hidden)]
pub mod math;

/// Common structures and traits re-exported
pub mod prelude {
    pub use crate::data::{
        MatrixName, MatrixSource, Record, SubstitutionMatrix,
        err::{ConfigurationError, DistanceError, LookupError, ValidationError},
    };
    pub use crate::distance::{
        Advisory, CdrDist, CdrDistConfig, Distance, Levenshtein, Metric, MetricConfig, MetricKind, SegmentConfig,
        TcrDist, TcrDistConfig,
    };
    #[cfg(feature = "rand")]
    pub use crate::generate::rand_sequence;
    pub use crate::pairwise::{CancelToken, CondensedMatrix, PairwiseEngine};
}
