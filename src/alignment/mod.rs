//! ## Dynamic-programming kernels over pairs of sequences.
//!
//! - [Edit distance]: global, minimum-cost alignment in the [`edit`] module,
//!   parameterized by a [`CostModel`]. [`UnitCost`] yields the Levenshtein
//!   distance, while [`MatrixCost`] derives substitution costs from a
//!   [`SubstitutionMatrix`].
//! - [Smith-Waterman]: optimal local alignment score with affine gap
//!   penalties in the [`sw`] module.
//!
//! Both kernels keep two rolling rows of the dynamic-programming table, so
//! memory is linear in the length of one operand.
//!
//! [Edit distance]: https://en.wikipedia.org/wiki/Edit_distance
//! [Smith-Waterman]: https://en.wikipedia.org/wiki/Smith%E2%80%93Waterman_algorithm
//! [`SubstitutionMatrix`]: crate::data::matrices::SubstitutionMatrix

pub mod edit;
pub mod sw;

pub use edit::{CostModel, CostTable, MatrixCost, UnitCost, edit_distance};
pub use sw::{AffineGaps, LocalProfile, sw_score};
