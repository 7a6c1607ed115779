//! Approximate comparison of floating point results, used by the
//! [`assert_fp_eq`](crate::assert_fp_eq) and [`is_fp_eq`](crate::is_fp_eq)
//! macros.

mod float_compare;

pub use float_compare::*;
