use bio::alignment::pairwise::MatchFunc;

use crate::{
    align::{
        aligners::constants::FLOOR_SCORE,
        alignment::Alignment,
        scoring::Scoring,
        traceback::{traceback, ScoreMatrix},
    },
    error::{AlignError, Result},
};

/// Aligns two sequences with a linear gap score.
///
/// The boundary row and column hold `i * gap` (they are not clamped), while every interior cell
/// is the best of the diagonal, up and left moves, floored at zero.  A new score matrix is
/// allocated for every call, so one aligner may be shared between threads.
#[derive(Clone, Debug)]
pub struct PairwiseAligner<F: MatchFunc> {
    scoring: Scoring<F>,
}

impl<F: MatchFunc> PairwiseAligner<F> {
    pub fn new(scoring: Scoring<F>) -> Self {
        PairwiseAligner { scoring }
    }

    pub fn scoring(&self) -> &Scoring<F> {
        &self.scoring
    }

    /// Fills the `(|x| + 1) x (|y| + 1)` score matrix for `x` and `y`.
    pub fn fill(&self, x: &[u8], y: &[u8]) -> ScoreMatrix {
        let (m, n) = (x.len(), y.len());
        let gap = self.scoring.gap_score;
        let mut matrix = ScoreMatrix::with_capacity(m, n);
        matrix.init(m, n);

        for i in 1..=m {
            matrix.set(i, 0, i as i32 * gap);
        }
        for j in 1..=n {
            matrix.set(0, j, j as i32 * gap);
        }

        for i in 1..=m {
            let p = x[i - 1];
            for j in 1..=n {
                let diag = matrix.get(i - 1, j - 1) + self.scoring.substitution(p, y[j - 1]);
                let up = matrix.get(i - 1, j) + gap;
                let left = matrix.get(i, j - 1) + gap;
                matrix.set(i, j, diag.max(up).max(left).max(FLOOR_SCORE));
            }
        }
        matrix
    }

    /// Aligns `x` against `y`, returning one optimal alignment.  Both must be non-empty.
    pub fn align(&self, x: &[u8], y: &[u8]) -> Result<Alignment> {
        if x.is_empty() || y.is_empty() {
            return Err(AlignError::invalid(format!(
                "cannot align an empty sequence (lengths {} and {})",
                x.len(),
                y.len()
            )));
        }
        let matrix = self.fill(x, y);
        traceback(&matrix, x, y, &self.scoring)
    }
}
