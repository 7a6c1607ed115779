use super::LocalProfile;

/// Smith-Waterman algorithm, yielding the optimal local alignment score.
///
/// Provides the locally optimal sequence alignment score (1) using affine gap
/// penalties (2). Our implementation adapts the algorithm provided by [*Flouri
/// et al.*](https://cme.h-its.org/exelixis/web/software/alignment/correct.html)
/// (3). `reference` must be encoded against the profile's matrix. The score is
/// never negative; zero means no positively-scoring local alignment exists.
///
/// See **[module citations](crate::alignment::sw#module-citations)**.
///
/// ## Complexity
///
/// For query length $m$ and reference length $n$:
///
/// - Time: $O(mn)$
/// - Space: $O(m)$
///
/// ## Panics
///
/// Every byte of `reference` and of the query must be a valid index into the
/// profile's matrix.
#[must_use]
pub fn sw_score(reference: &[u8], query: &LocalProfile) -> f64 {
    // Definitions:
    // * Q[c] = c-th symbol in the query, zero-indexed
    // * R[r] = r-th symbol in the reference, zero-indexed
    // * W[r,c] = contribution to score of aligning Q[c] and R[r]
    // * H[r,c] = maximum score for aligning Q[0..c] to R[0..r]
    // * E[r,c] = maximum score for aligning Q[0..c] to R[0..r] such that the
    //   alignment ends with a gap consuming a symbol in the reference
    // * F[r,c] = maximum score for aligning Q[0..c] to R[0..r] such that the
    //   alignment ends with a gap consuming a symbol in the query
    let gap_open = -query.gaps.open();
    let gap_extend = -query.gaps.extend();

    let mut best_score: f64 = 0.0;
    // H[r, ..], initialized for row -1 (no symbols in the reference consumed)
    let mut h_row = vec![0.0; query.seq.len()];
    // E[r, ..], initialized for row 0
    let mut e_row = vec![gap_open; query.seq.len()];

    for &reference_symbol in reference {
        // F[r,0], reached by consuming Q[0] via a gap
        let mut f = gap_open;
        // H[r-1,-1]
        let mut h = 0.0;

        for (c, &query_symbol) in query.seq.iter().enumerate() {
            h += query.matrix.score_at(reference_symbol as usize, query_symbol as usize);

            let mut e = e_row[c];
            h = f64::max(h, e).max(f).max(0.0);
            best_score = best_score.max(h);

            // E[r,c] to E[r,c+1] and F[r,c] to F[r,c+1]
            e = (e + gap_extend).max(h + gap_open);
            f = (f + gap_extend).max(h + gap_open);

            // Store H[r,c], and carry H[r-1,c] as the next diagonal
            (h, h_row[c]) = (h_row[c], h);
            e_row[c] = e;
        }
    }

    best_score
}
