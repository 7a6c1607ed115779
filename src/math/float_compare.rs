/// How [`assert_fp_eq`] and [`is_fp_eq`] compare two distances.
///
/// [`is_fp_eq`]: crate::is_fp_eq
/// [`assert_fp_eq`]: crate::assert_fp_eq
#[doc(hidden)]
pub trait NearlyEqualMethod {
    fn nearly_equal_float(&self, a: f64, b: f64) -> bool;
}

#[doc(hidden)]
pub enum NearlyEqualStrategy {
    Relative { eps: f64 },
    /// Suits values reported to a fixed number of decimal places.
    Absolute { eps: f64 },
}

impl NearlyEqualMethod for NearlyEqualStrategy {
    #[allow(clippy::float_cmp)]
    fn nearly_equal_float(&self, a: f64, b: f64) -> bool {
        match self {
            NearlyEqualStrategy::Relative { eps } => {
                let abs_a = a.abs();
                let abs_b = b.abs();
                let diff = (a - b).abs();

                if a == b {
                    true
                } else if a == 0.0 || b == 0.0 || (abs_a + abs_b < f64::MIN_POSITIVE) {
                    diff < *eps * f64::MIN_POSITIVE
                } else {
                    diff / (abs_a + abs_b).min(f64::MAX) < *eps
                }
            }
            NearlyEqualStrategy::Absolute { eps } => a == b || (a - b).abs() < *eps,
        }
    }
}

impl<F: Fn(f64, f64) -> bool> NearlyEqualMethod for F {
    fn nearly_equal_float(&self, a: f64, b: f64) -> bool {
        self(a, b)
    }
}

/// Approximate equality of distances and collections of them. Returns whether
/// the values match and, on a mismatch of the same shape, the first differing
/// pair.
#[doc(hidden)]
pub trait NearlyEqual {
    fn nearly_equal<M: NearlyEqualMethod>(&self, b: &Self, method: &M) -> (bool, Option<(f64, f64)>);
}

impl NearlyEqual for f64 {
    #[inline]
    fn nearly_equal<M: NearlyEqualMethod>(&self, b: &Self, strategy: &M) -> (bool, Option<(f64, f64)>) {
        if strategy.nearly_equal_float(*self, *b) {
            (true, None)
        } else {
            (false, Some((*self, *b)))
        }
    }
}

impl<S: NearlyEqual> NearlyEqual for Option<S> {
    #[inline]
    fn nearly_equal<M: NearlyEqualMethod>(&self, b: &Self, strategy: &M) -> (bool, Option<(f64, f64)>) {
        match (self, b) {
            (Some(x), Some(y)) => x.nearly_equal(y, strategy),
            (None, None) => (true, None),
            _ => (false, None),
        }
    }
}

impl<S: NearlyEqual> NearlyEqual for [S] {
    #[inline]
    fn nearly_equal<M: NearlyEqualMethod>(&self, b: &Self, strategy: &M) -> (bool, Option<(f64, f64)>) {
        if self.len() != b.len() {
            return (false, None);
        }
        for (eq, vals) in self.iter().zip(b).map(|(x, y)| x.nearly_equal(y, strategy)) {
            if !eq {
                return (false, vals);
            }
        }
        (true, None)
    }
}

impl<S: NearlyEqual, const N: usize> NearlyEqual for [S; N] {
    #[inline]
    fn nearly_equal<M: NearlyEqualMethod>(&self, b: &Self, strategy: &M) -> (bool, Option<(f64, f64)>) {
        self.as_slice().nearly_equal(b.as_slice(), strategy)
    }
}

impl<S: NearlyEqual> NearlyEqual for Vec<S> {
    #[inline]
    fn nearly_equal<M: NearlyEqualMethod>(&self, b: &Self, strategy: &M) -> (bool, Option<(f64, f64)>) {
        self.as_slice().nearly_equal(b.as_slice(), strategy)
    }
}

/// Asserts that two distances, or collections of them, are approximately
/// equal. The default is a relative tolerance of $10^{-8}$:
/// ```
/// # use setriq::assert_fp_eq;
/// assert_fp_eq!(3.0, 1.0 + 2.0);
/// assert_fp_eq!(3.0, 2.99999, 1e-4);
/// ```
///
/// Distances reported to four decimal places are checked with `@absolute`,
/// and `@custom` takes any comparison closure:
/// ```
/// # use setriq::{assert_fp_eq, is_fp_eq};
/// assert_fp_eq!(@absolute, vec![0.294_976, 1.0], vec![0.2950, 1.0], 5e-5);
///
/// let same_to_four_places = |x: f64, y: f64| (x * 1e4).round() == (y * 1e4).round();
/// assert_fp_eq!(@custom, 0.741_83, 0.7418, same_to_four_places);
/// assert!(!is_fp_eq!(@custom, 0.7419, 0.7418, same_to_four_places));
/// ```
///
/// Accepts `f64`, `Option`, arrays, slices, and vectors of those, and
/// [`CondensedMatrix`].
///
/// [`CondensedMatrix`]: crate::pairwise::CondensedMatrix
#[macro_export]
macro_rules! assert_fp_eq {
    ($(@$method:tt,)? $a:expr, $b:expr) => {
        $crate::assert_fp_eq!($(@$method,)? $a, $b, 1e-8); // Default epsilon
    };
    ($(@relative,)? $a:expr, $b:expr, $epsilon:expr) => {
        $crate::assert_fp_eq!(@strategy, $a, $b, $epsilon, $crate::math::NearlyEqualStrategy::Relative { eps: $epsilon })
    };
    (@absolute, $a:expr, $b:expr, $epsilon:expr) => {
        $crate::assert_fp_eq!(@strategy, $a, $b, $epsilon, $crate::math::NearlyEqualStrategy::Absolute { eps: $epsilon })
    };
    (@strategy, $a:expr, $b:expr, $epsilon:expr, $strategy:expr) => {
        let (eq, vals) = $crate::math::NearlyEqual::nearly_equal(&$a, &$b, &$strategy);
        if !eq {
            if let Some((a, b)) = vals {
                panic!("assertion failed: `(found ≈ expected)`\n left:\t`{:?}`,\n right:\t`{:?}`,\n eps:\t`{}`,\n\n Caused by the comparison of:\n left:\t`{:?}`,\n right:\t`{:?}`", $a, $b, $epsilon, a, b)
            } else {
                panic!("assertion failed: `(found ≈ expected)`\n left:\t`{:?}`,\n right:\t`{:?}`,\n eps:\t`{}`", $a, $b, $epsilon)
            }
        }
    };
    (@custom, $a:expr, $b:expr, $closure:expr) => {
        let (eq, vals) = $crate::math::NearlyEqual::nearly_equal(&$a, &$b, &$closure);
        if !eq {
            if let Some((a, b)) = vals {
                panic!("assertion failed: `(found ≈ expected)`\n left:\t`{:?}`,\n right:\t`{:?}`,\n\n Caused by the comparison of:\n left:\t`{:?}`,\n right:\t`{:?}`", $a, $b, a, b)
            } else {
                panic!("assertion failed: `(found ≈ expected)`\n left:\t`{:?}`,\n right:\t`{:?}`", $a, $b)
            }
        }
    };
}

/// [`assert_fp_eq`] returning a `bool` instead of panicking.
#[macro_export]
macro_rules! is_fp_eq {
    ($(@$method:tt,)? $a:expr, $b:expr) => {
        $crate::is_fp_eq!($(@$method,)? $a, $b, 1e-8) // Default epsilon
    };
    ($(@relative,)? $a:expr, $b:expr, $epsilon:expr) => {
        $crate::math::NearlyEqual::nearly_equal(
            &$a,
            &$b,
            &$crate::math::NearlyEqualStrategy::Relative { eps: $epsilon }
        ).0
    };
    (@absolute, $a:expr, $b:expr, $epsilon:expr) => {
        $crate::math::NearlyEqual::nearly_equal(
            &$a,
            &$b,
            &$crate::math::NearlyEqualStrategy::Absolute { eps: $epsilon }
        ).0
    };
    (@custom, $a:expr, $b:expr, $closure:expr) => {
        $crate::math::NearlyEqual::nearly_equal(&$a, &$b, &$closure).0
    };
}

#[cfg(test)]
mod test {
    #[test]
    fn strategies() {
        assert!(is_fp_eq!(0.1 + 0.2, 0.3));
        assert!(!is_fp_eq!(0.3, 0.31));
        assert!(is_fp_eq!(@absolute, 0.294_976, 0.2950, 5e-5));
        assert!(!is_fp_eq!(@absolute, 0.2949, 0.2950, 5e-5));
        assert!(is_fp_eq!(@custom, 1.0, 1.5, |a: f64, b: f64| (a - b).abs() <= 0.5));
    }

    #[test]
    fn containers() {
        assert_fp_eq!(vec![1.0, 2.0], vec![1.0, 2.0 + 1e-12]);
        assert_fp_eq!(Some(0.5), Some(0.5));
        assert!(!is_fp_eq!(vec![1.0], vec![1.0, 2.0]));
        assert!(!is_fp_eq!(Some(1.0), None));
    }

    #[test]
    #[should_panic(expected = "Caused by the comparison of")]
    fn failing_assertion_names_the_values() {
        assert_fp_eq!(@absolute, [0.7418, 1.0], [0.7418, 0.9], 1e-4);
    }
}
