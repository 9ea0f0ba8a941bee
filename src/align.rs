//! Order-preserving alignment of two child sequences.
//!
//! The engines precompute two boolean pair tables, one for exact equality
//! ("comparator total weight is zero") and one for a looser similarity
//! relation, and hand them to a weighted LCS here. Keeping the predicate evaluation
//! out of this module keeps the alignment itself pure, so the synchronous
//! and asynchronous engines share it unchanged.

/// Precomputed pairwise predicate results between an actual sequence (rows)
/// and an expected sequence (columns).
#[derive(Debug, Clone)]
pub struct PairTable {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl PairTable {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    pub fn set(&mut self, row: usize, col: usize) {
        self.cells[row * self.cols + col] = true;
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.cols + col]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }
}

/// One step of an alignment, in sequence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignOp {
    /// Actual item matched an expected item; `exact` distinguishes an
    /// equality match from a similarity-only match.
    Match {
        actual: usize,
        expected: usize,
        exact: bool,
    },
    /// Actual-only item (extra in actual).
    Remove { actual: usize },
    /// Expected-only item (missing from actual).
    Insert { expected: usize },
}

/// Aligns the two sequences described by the pair tables.
///
/// Weighted LCS: an exact match scores 2, a similarity-only match 1, so the
/// alignment prefers real matches without ever pairing dissimilar items.
/// Backtracking prefers match, then remove, then insert, which makes the
/// output deterministic.
pub fn align(eq: &PairTable, sim: &PairTable) -> Vec<AlignOp> {
    let n = eq.rows();
    let m = eq.cols();
    debug_assert_eq!(sim.rows(), n);
    debug_assert_eq!(sim.cols(), m);

    let match_gain = |i: usize, j: usize| -> Option<usize> {
        if eq.get(i, j) {
            Some(2)
        } else if sim.get(i, j) {
            Some(1)
        } else {
            None
        }
    };

    // score[i][j] = best score aligning actual[i..] with expected[j..]
    let mut score = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            let mut best = score[i + 1][j].max(score[i][j + 1]);
            if let Some(gain) = match_gain(i, j) {
                best = best.max(score[i + 1][j + 1] + gain);
            }
            score[i][j] = best;
        }
    }

    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if let Some(gain) = match_gain(i, j) {
            if score[i][j] == score[i + 1][j + 1] + gain {
                ops.push(AlignOp::Match {
                    actual: i,
                    expected: j,
                    exact: eq.get(i, j),
                });
                i += 1;
                j += 1;
                continue;
            }
        }
        if score[i][j] == score[i + 1][j] {
            ops.push(AlignOp::Remove { actual: i });
            i += 1;
        } else {
            ops.push(AlignOp::Insert { expected: j });
            j += 1;
        }
    }
    while i < n {
        ops.push(AlignOp::Remove { actual: i });
        i += 1;
    }
    while j < m {
        ops.push(AlignOp::Insert { expected: j });
        j += 1;
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(n: usize, m: usize, eq_pairs: &[(usize, usize)], sim_pairs: &[(usize, usize)]) -> (PairTable, PairTable) {
        let mut eq = PairTable::new(n, m);
        for &(i, j) in eq_pairs {
            eq.set(i, j);
        }
        let mut sim = PairTable::new(n, m);
        for &(i, j) in sim_pairs {
            sim.set(i, j);
        }
        (eq, sim)
    }

    #[test]
    fn identical_sequences_align_as_matches() {
        let (eq, sim) = tables(3, 3, &[(0, 0), (1, 1), (2, 2)], &[]);
        let ops = align(&eq, &sim);
        assert_eq!(
            ops,
            vec![
                AlignOp::Match { actual: 0, expected: 0, exact: true },
                AlignOp::Match { actual: 1, expected: 1, exact: true },
                AlignOp::Match { actual: 2, expected: 2, exact: true },
            ]
        );
    }

    #[test]
    fn trailing_insert() {
        // actual = [a, b], expected = [a, b, c]
        let (eq, sim) = tables(2, 3, &[(0, 0), (1, 1)], &[]);
        let ops = align(&eq, &sim);
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[2], AlignOp::Insert { expected: 2 });
    }

    #[test]
    fn middle_removal_keeps_surrounding_matches() {
        // actual = [a, x, b], expected = [a, b]
        let (eq, sim) = tables(3, 2, &[(0, 0), (2, 1)], &[]);
        let ops = align(&eq, &sim);
        assert_eq!(
            ops,
            vec![
                AlignOp::Match { actual: 0, expected: 0, exact: true },
                AlignOp::Remove { actual: 1 },
                AlignOp::Match { actual: 2, expected: 1, exact: true },
            ]
        );
    }

    #[test]
    fn no_matches_yields_removes_then_inserts() {
        let (eq, sim) = tables(2, 2, &[], &[]);
        let ops = align(&eq, &sim);
        assert_eq!(
            ops,
            vec![
                AlignOp::Remove { actual: 0 },
                AlignOp::Remove { actual: 1 },
                AlignOp::Insert { expected: 0 },
                AlignOp::Insert { expected: 1 },
            ]
        );
    }

    #[test]
    fn similar_match_used_when_no_exact_exists() {
        let (eq, sim) = tables(1, 1, &[], &[(0, 0)]);
        let ops = align(&eq, &sim);
        assert_eq!(
            ops,
            vec![AlignOp::Match { actual: 0, expected: 0, exact: false }]
        );
    }

    #[test]
    fn exact_match_preferred_over_similar() {
        // actual = [x], expected = [a, b]: x is similar to a but equal to b.
        let (eq, sim) = tables(1, 2, &[(0, 1)], &[(0, 0), (0, 1)]);
        let ops = align(&eq, &sim);
        assert_eq!(
            ops,
            vec![
                AlignOp::Insert { expected: 0 },
                AlignOp::Match { actual: 0, expected: 1, exact: true },
            ]
        );
    }

    #[test]
    fn empty_sequences_align_to_nothing() {
        let (eq, sim) = tables(0, 0, &[], &[]);
        assert!(align(&eq, &sim).is_empty());
    }
}
