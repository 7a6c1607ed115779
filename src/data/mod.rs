//! ## Records, substitution matrices, and error types.
//!
//! A [`Record`] is the unit the metrics compare: either a single sequence, or
//! a set of named segments such as the CDR loops of a T-cell receptor chain.
//! Sequences are plain bytes, and each metric validates the records it is
//! given before computing anything.
//!
//! Substitution matrices live in [`matrices`]. Symbols are resolved through a
//! [`SymbolIndex`], which encodes a sequence into dense indices once so the
//! alignment kernels only perform table lookups.
//!
//! ## Errors in *setriq*
//!
//! Every fallible operation returns one of the enums in [`err`]:
//!
//! - [`ConfigurationError`] when a metric, matrix, or engine is built with
//!   invalid parameters,
//! - [`ValidationError`] when a record has the wrong shape for a metric,
//! - [`LookupError`] when a symbol is missing from the active matrix.
//!
//! The pairwise API wraps all of these in [`DistanceError`], which also
//! reports cancellation. No error is ever replaced by a placeholder distance.
//!
//! [`ConfigurationError`]: err::ConfigurationError
//! [`ValidationError`]: err::ValidationError
//! [`LookupError`]: err::LookupError
//! [`DistanceError`]: err::DistanceError

/// Error types for configuration, validation, and symbol lookup.
pub mod err;
pub mod matrices;

mod mappings;
mod records;

pub use mappings::SymbolIndex;
pub use matrices::{MatrixName, MatrixSource, SubstitutionMatrix};
pub use records::Record;
