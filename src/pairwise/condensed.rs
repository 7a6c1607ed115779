use crate::math::{NearlyEqual, NearlyEqualMethod};

/// The number of unordered pairs of `n` records, `n(n-1)/2`.
#[inline]
#[must_use]
pub const fn condensed_len(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// The position of the pair `(i, j)` in the condensed order of `n` records,
/// for `i < j < n`.
///
/// ```
/// # use setriq::pairwise::condensed_index;
/// assert_eq!(condensed_index(4, 0, 1), Some(0));
/// assert_eq!(condensed_index(4, 1, 2), Some(3));
/// assert_eq!(condensed_index(4, 2, 3), Some(5));
/// assert_eq!(condensed_index(4, 2, 2), None);
/// ```
#[inline]
#[must_use]
pub const fn condensed_index(n: usize, i: usize, j: usize) -> Option<usize> {
    if i < j && j < n {
        Some(i * n - i * (i + 1) / 2 + (j - i - 1))
    } else {
        None
    }
}

/// The pair `(i, j)` at position `k` of the condensed order of `n` records.
/// This is the inverse of [`condensed_index`].
#[must_use]
pub fn pair_at(n: usize, k: usize) -> Option<(usize, usize)> {
    if k >= condensed_len(n) {
        return None;
    }

    let mut k = k;
    let mut i = 0;
    // Row i holds the n - 1 - i pairs (i, i+1), ..., (i, n-1)
    while k >= n - 1 - i {
        k -= n - 1 - i;
        i += 1;
    }
    Some((i, i + 1 + k))
}

/// The distances between every unordered pair of `n` records, stored as the
/// row-major upper triangle of the distance matrix without its diagonal:
/// `(0,1), (0,2), ..., (0,n-1), (1,2), ...`.
///
/// ```
/// # use setriq::pairwise::CondensedMatrix;
/// let matrix = CondensedMatrix::from_values(3, vec![2.0, 3.0, 3.0]).unwrap();
/// assert_eq!(matrix.get(2, 0), Some(3.0));
/// assert_eq!(matrix.get(1, 1), None);
/// assert_eq!(matrix.to_square(0.0)[1], vec![2.0, 0.0, 3.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CondensedMatrix {
    n:      usize,
    values: Vec<f64>,
}

impl CondensedMatrix {
    /// An empty result for fewer than two records.
    #[inline]
    #[must_use]
    pub(crate) fn empty(n: usize) -> Self {
        CondensedMatrix { n, values: Vec::new() }
    }

    /// Wraps values already known to have the condensed length for `n`.
    #[inline]
    #[must_use]
    pub(crate) fn from_parts(n: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), condensed_len(n));
        CondensedMatrix { n, values }
    }

    /// Wraps condensed values for `n` records, returning `None` unless there
    /// are exactly [`condensed_len(n)`](condensed_len) of them.
    #[must_use]
    pub fn from_values(n: usize, values: Vec<f64>) -> Option<Self> {
        (values.len() == condensed_len(n)).then_some(CondensedMatrix { n, values })
    }

    /// The number of records the distances were computed between.
    #[inline]
    #[must_use]
    pub fn num_records(&self) -> usize {
        self.n
    }

    /// The number of pairs.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    #[must_use]
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// The distance between records `i` and `j` in either order. The
    /// diagonal is not stored, so `None` is returned when `i == j` as well as
    /// when either index is out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let (i, j) = if i <= j { (i, j) } else { (j, i) };
        condensed_index(self.n, i, j).map(|k| self.values[k])
    }

    /// Iterates over `((i, j), distance)` in condensed order.
    pub fn iter_pairs(&self) -> impl Iterator<Item = ((usize, usize), f64)> + '_ {
        let n = self.n;
        (0..n)
            .flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
            .zip(self.values.iter().copied())
    }

    /// Expands the distances into a full symmetric `n × n` matrix, filling the
    /// diagonal with `diagonal`.
    #[must_use]
    pub fn to_square(&self, diagonal: f64) -> Vec<Vec<f64>> {
        let mut square = vec![vec![0.0; self.n]; self.n];
        for (i, row) in square.iter_mut().enumerate() {
            row[i] = diagonal;
        }
        for ((i, j), d) in self.iter_pairs() {
            square[i][j] = d;
            square[j][i] = d;
        }
        square
    }
}

impl AsRef<[f64]> for CondensedMatrix {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

impl From<CondensedMatrix> for Vec<f64> {
    fn from(matrix: CondensedMatrix) -> Self {
        matrix.values
    }
}

impl NearlyEqual for CondensedMatrix {
    #[inline]
    fn nearly_equal<M: NearlyEqualMethod>(&self, b: &Self, strategy: &M) -> (bool, Option<(f64, f64)>) {
        if self.n == b.n {
            self.values.nearly_equal(&b.values, strategy)
        } else {
            (false, None)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn condensed_lengths() {
        assert_eq!(condensed_len(0), 0);
        assert_eq!(condensed_len(1), 0);
        assert_eq!(condensed_len(2), 1);
        assert_eq!(condensed_len(5), 10);
    }

    #[test]
    fn index_and_pair_agree() {
        for n in 0..12 {
            let mut k = 0;
            for i in 0..n {
                for j in (i + 1)..n {
                    assert_eq!(condensed_index(n, i, j), Some(k));
                    assert_eq!(pair_at(n, k), Some((i, j)));
                    k += 1;
                }
            }
            assert_eq!(k, condensed_len(n));
            assert_eq!(pair_at(n, k), None);
        }
    }

    #[test]
    fn lookups() {
        let matrix = CondensedMatrix::from_values(4, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(matrix.get(0, 3), Some(3.0));
        assert_eq!(matrix.get(3, 1), Some(5.0));
        assert_eq!(matrix.get(4, 0), None);
        assert_eq!(matrix.get(2, 2), None);

        let pairs: Vec<_> = matrix.iter_pairs().map(|(pair, _)| pair).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);

        assert!(CondensedMatrix::from_values(4, vec![1.0]).is_none());
        assert_eq!(CondensedMatrix::from_values(1, Vec::new()).unwrap().to_square(0.0), vec![vec![0.0]]);

        let square = CondensedMatrix::from_values(3, vec![2.0, 3.0, 4.0]).unwrap().to_square(f64::NAN);
        assert!(square.iter().enumerate().all(|(i, row)| row[i].is_nan()));
        assert_eq!(square[2][..2], [3.0, 4.0]);
    }
}
