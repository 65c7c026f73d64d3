use bio::alignment::pairwise::MatchFunc;
use log::trace;

use super::{
    aligners::constants::{
        AlignmentOperation::{self, Del, Ins},
        FLOOR_SCORE,
    },
    alignment::Alignment,
    scoring::Scoring,
};
use crate::error::{AlignError, Result};

/// A dense `(m + 1) x (n + 1)` matrix of cell scores, stored row-major.
///
/// Row 0 and column 0 hold the boundary ("before the first symbol") scores.
#[derive(Default, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    matrix: Vec<i32>,
}

impl ScoreMatrix {
    pub fn with_capacity(m: usize, n: usize) -> Self {
        let rows = m + 1;
        let cols = n + 1;
        ScoreMatrix {
            rows,
            cols,
            matrix: Vec::with_capacity(rows * cols),
        }
    }

    /// Resizes to `(m + 1) x (n + 1)` and sets every cell to the floor score.
    pub fn init(&mut self, m: usize, n: usize) {
        self.matrix.clear();
        self.rows = m + 1;
        self.cols = n + 1;
        self.matrix.resize(self.rows * self.cols, FLOOR_SCORE);
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, v: i32) {
        debug_assert!(i < self.rows);
        debug_assert!(j < self.cols);
        self.matrix[i * self.cols + j] = v;
    }

    #[inline(always)]
    pub fn get(&self, i: usize, j: usize) -> i32 {
        debug_assert!(i < self.rows);
        debug_assert!(j < self.cols);
        self.matrix[i * self.cols + j]
    }

    /// The first cell, in row-major order, holding the maximum score, as `(row, col, score)`.
    pub fn max_cell(&self) -> (usize, usize, i32) {
        let mut best = (0, 0, self.get(0, 0));
        for (idx, &v) in self.matrix.iter().enumerate() {
            if v > best.2 {
                best = (idx / self.cols, idx % self.cols, v);
            }
        }
        best
    }
}

/// Recovers one optimal alignment of `x` and `y` from a filled score matrix.
///
/// The walk starts at the first maximum cell and moves back to the origin, preferring at each
/// cell a diagonal step, then an up step (x symbol against a gap), then a left step (y symbol
/// against a gap).  Row 0 only allows left steps and column 0 only up steps.  An interior cell
/// explained by none of its predecessors but holding the floor score restarts the alignment and
/// is crossed diagonally.  Any other unexplained cell is an error.
///
/// The symbols of `x` and `y` after the start cell are appended pairwise, with the excess of the
/// longer one against gaps.
pub fn traceback<F: MatchFunc>(
    matrix: &ScoreMatrix,
    x: &[u8],
    y: &[u8],
    scoring: &Scoring<F>,
) -> Result<Alignment> {
    debug_assert_eq!(matrix.rows(), x.len() + 1);
    debug_assert_eq!(matrix.cols(), y.len() + 1);

    let (xend, yend, score) = matrix.max_cell();
    let gap = scoring.gap_score;

    let mut operations: Vec<AlignmentOperation> = Vec::with_capacity(x.len() + y.len());
    let (mut i, mut j) = (xend, yend);
    while i > 0 || j > 0 {
        let op = if i == 0 {
            Del
        } else if j == 0 {
            Ins
        } else {
            let current = matrix.get(i, j);
            if current == matrix.get(i - 1, j - 1) + scoring.substitution(x[i - 1], y[j - 1]) {
                AlignmentOperation::diagonal(x[i - 1], y[j - 1])
            } else if current == matrix.get(i - 1, j) + gap {
                Ins
            } else if current == matrix.get(i, j - 1) + gap {
                Del
            } else if current == FLOOR_SCORE {
                trace!("Restarting traceback at row {} column {}", i, j);
                AlignmentOperation::diagonal(x[i - 1], y[j - 1])
            } else {
                return Err(AlignError::AmbiguousTraceback {
                    row: i,
                    col: j,
                    score: current,
                });
            }
        };
        operations.push(op);
        i -= op.length_on_x();
        j -= op.length_on_y();
    }
    operations.reverse();

    let x_tail = &x[xend..];
    let y_tail = &y[yend..];
    let paired = x_tail.len().min(y_tail.len());
    operations.extend(
        x_tail
            .iter()
            .zip(y_tail.iter())
            .map(|(&a, &b)| AlignmentOperation::diagonal(a, b)),
    );
    operations.extend(std::iter::repeat(Ins).take(x_tail.len() - paired));
    operations.extend(std::iter::repeat(Del).take(y_tail.len() - paired));

    Ok(Alignment::from_operations(score, xend, yend, x, y, operations))
}
