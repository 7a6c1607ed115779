use crate::data::matrices::SubstitutionMatrix;

/// The costs used by [`edit_distance`]. Implementors must be symmetric in
/// their arguments for the resulting distance to be symmetric.
pub trait CostModel {
    /// The cost of aligning `a` against `b`.
    fn substitution(&self, a: u8, b: u8) -> f64;

    /// The cost of inserting or deleting a single symbol.
    fn gap(&self) -> f64;
}

/// Every mismatch and every gap costs 1, giving the Levenshtein distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitCost;

impl CostModel for UnitCost {
    #[inline]
    fn substitution(&self, a: u8, b: u8) -> f64 {
        if a == b { 0.0 } else { 1.0 }
    }

    #[inline]
    fn gap(&self) -> f64 {
        1.0
    }
}

/// Substitution costs derived from a [`SubstitutionMatrix`], indexed by
/// encoded symbol. The cost of aligning `a` and `b` is
/// `clamp(bound - score(a, b), 0, bound)`, so well-scoring pairs are cheap
/// and every pair costs at most `bound`.
#[derive(Debug, Clone, PartialEq)]
pub struct CostTable {
    dim:   usize,
    costs: Vec<f64>,
}

impl CostTable {
    /// Precomputes the cost of every symbol pair in `matrix`. The bound is
    /// validated by the caller.
    #[must_use]
    pub fn from_scores(matrix: &SubstitutionMatrix, bound: f64) -> Self {
        let dim = matrix.dim();
        let mut costs = Vec::with_capacity(dim * dim);
        for i in 0..dim {
            for j in 0..dim {
                costs.push((bound - matrix.score_at(i, j)).clamp(0.0, bound));
            }
        }
        CostTable { dim, costs }
    }

    /// The number of symbols covered by the table.
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The cost of aligning the symbols with indices `i` and `j`.
    ///
    /// ## Panics
    ///
    /// Both indices must be less than [`dim`](CostTable::dim).
    #[inline]
    #[must_use]
    pub fn cost_at(&self, i: usize, j: usize) -> f64 {
        self.costs[i * self.dim + j]
    }
}

/// A [`CostModel`] over sequences encoded against a [`CostTable`].
///
/// Any index at or beyond the table's dimension is treated as a gap symbol
/// carried by a pre-aligned sequence: a gap opposite a residue costs the gap
/// penalty and two gaps cost nothing.
#[derive(Debug, Clone, Copy)]
pub struct MatrixCost<'a> {
    pub table: &'a CostTable,
    pub gap:   f64,
}

impl<'a> MatrixCost<'a> {
    #[inline]
    #[must_use]
    pub fn new(table: &'a CostTable, gap: f64) -> Self {
        MatrixCost { table, gap }
    }
}

impl CostModel for MatrixCost<'_> {
    #[inline]
    fn substitution(&self, a: u8, b: u8) -> f64 {
        let (a, b) = (a as usize, b as usize);
        let dim = self.table.dim();
        match (a >= dim, b >= dim) {
            (false, false) => self.table.cost_at(a, b),
            (true, true) => 0.0,
            _ => self.gap,
        }
    }

    #[inline]
    fn gap(&self) -> f64 {
        self.gap
    }
}

/// Global minimum-cost edit distance between `a` and `b` under `costs`.
///
/// The recurrence is
///
/// $$D(i,j) = \min\big(D(i-1,j-1) + s(a_i, b_j),\ D(i-1,j) + g,\ D(i,j-1) +
/// g\big)$$
///
/// with $D(i,0) = ig$ and $D(0,j) = jg$. Only two rows of $D$ are kept, each
/// sized to the shorter operand. Empty input yields the base case (the other
/// operand's length times the gap cost).
///
/// ## Example
///
/// ```
/// # use setriq::alignment::{UnitCost, edit_distance};
/// assert_eq!(edit_distance(b"KITTEN", b"SITTING", &UnitCost), 3.0);
/// assert_eq!(edit_distance(b"GTA", b"KKR", &UnitCost), 3.0);
/// ```
///
/// ## Complexity
///
/// For operand lengths $m \ge n$:
///
/// - Time: $O(mn)$
/// - Space: $O(n)$
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn edit_distance<C: CostModel + ?Sized>(a: &[u8], b: &[u8], costs: &C) -> f64 {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let gap = costs.gap();

    // D(i-1, ..) and D(i, ..)
    let mut prev: Vec<f64> = (0..=short.len()).map(|j| j as f64 * gap).collect();
    let mut curr = vec![0.0; short.len() + 1];

    for (i, &x) in long.iter().enumerate() {
        curr[0] = (i + 1) as f64 * gap;
        for (j, &y) in short.iter().enumerate() {
            let diagonal = prev[j] + costs.substitution(x, y);
            let up = prev[j + 1] + gap;
            let left = curr[j] + gap;
            curr[j + 1] = diagonal.min(up).min(left);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::matrices::MatrixName;

    #[test]
    fn levenshtein_values() {
        assert_eq!(edit_distance(b"AASQ", b"PASQ", &UnitCost), 1.0);
        assert_eq!(edit_distance(b"GTA", b"HLA", &UnitCost), 2.0);
        assert_eq!(edit_distance(b"HLA", b"KKR", &UnitCost), 3.0);
        assert_eq!(edit_distance(b"SEQVENCES", b"SEQVENCES", &UnitCost), 0.0);
        assert_eq!(edit_distance(b"ABC", b"", &UnitCost), 3.0);
        assert_eq!(edit_distance(b"", b"", &UnitCost), 0.0);
    }

    #[test]
    fn operand_order_is_irrelevant() {
        let pairs: [(&[u8], &[u8]); 3] = [(b"CASSLGQ", b"CASRQ"), (b"A", b"AAAAA"), (b"MNHEY", b"SVGAGI")];
        for (a, b) in pairs {
            assert_eq!(
                edit_distance(a, b, &UnitCost).to_bits(),
                edit_distance(b, a, &UnitCost).to_bits()
            );
        }
    }

    #[test]
    fn matrix_costs() {
        let matrix = SubstitutionMatrix::named(MatrixName::Blosum62);
        let table = CostTable::from_scores(&matrix, 4.0);
        let costs = MatrixCost::new(&table, 4.0);

        // A/P scores -1 in BLOSUM62
        let a = matrix.encode(b"AASQ").unwrap();
        let p = matrix.encode(b"PASQ").unwrap();
        assert_eq!(edit_distance(&a, &p, &costs), 4.0);
        assert_eq!(edit_distance(&a, &a, &costs), 0.0);

        // G/H scores -2, T/L -1, and A/A 4
        let gta = matrix.encode(b"GTA").unwrap();
        let hla = matrix.encode(b"HLA").unwrap();
        assert_eq!(edit_distance(&gta, &hla, &costs), 8.0);
    }

    #[test]
    fn cost_table_is_bounded() {
        let matrix = SubstitutionMatrix::named(MatrixName::Blosum62);
        let table = CostTable::from_scores(&matrix, 4.0);
        for i in 0..table.dim() {
            for j in 0..table.dim() {
                let cost = table.cost_at(i, j);
                assert!((0.0..=4.0).contains(&cost));
                assert_eq!(cost, table.cost_at(j, i));
            }
        }
    }

    #[test]
    fn gap_symbols() {
        let matrix = SubstitutionMatrix::named(MatrixName::Blosum62);
        let table = CostTable::from_scores(&matrix, 4.0);
        let costs = MatrixCost::new(&table, 3.0);
        let gap = u8::try_from(table.dim()).unwrap();

        let mut a = matrix.encode(b"CAS").unwrap();
        let mut b = a.clone();
        a.push(gap);
        b.push(gap);
        assert_eq!(edit_distance(&a, &b, &costs), 0.0);

        let c = matrix.encode(b"CASS").unwrap();
        assert_eq!(edit_distance(&a, &c, &costs), 3.0);
    }
}
