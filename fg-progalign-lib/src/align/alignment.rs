use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::align::aligners::constants::{
    AlignmentOperation::{self, Del, Ins, Match, Subst},
    GAP,
};

/// We consider alignment between two sequences x and y.  An alignment consists of the optimal
/// score found in the score matrix, the matrix cell the traceback started from, the lengths of
/// x and y, the per-column edit operations, and the two gapped strings those operations spell.
///
/// The traceback starts at `(xend, yend)` and walks back to the origin; the symbols of x and y
/// after that cell are appended as trailing columns.  Every alignment therefore spells out both
/// complete input sequences.
#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize)]
pub struct Alignment {
    /// Maximum score over the whole score matrix
    pub score: i32,

    /// Row of the cell the traceback started from (the number of x symbols before the trailing
    /// columns)
    pub xend: usize,

    /// Column of the cell the traceback started from
    pub yend: usize,

    /// Length of x
    pub xlen: usize,

    /// Length of y
    pub ylen: usize,

    /// Vector of alignment operations, one per column
    pub operations: Vec<AlignmentOperation>,

    /// x with gaps inserted
    pub aligned_x: Vec<u8>,

    /// y with gaps inserted
    pub aligned_y: Vec<u8>,
}

impl Alignment {
    /// Builds the alignment of `x` and `y` from per-column operations.
    pub(crate) fn from_operations(
        score: i32,
        xend: usize,
        yend: usize,
        x: &[u8],
        y: &[u8],
        operations: Vec<AlignmentOperation>,
    ) -> Self {
        let mut aligned_x = Vec::with_capacity(operations.len());
        let mut aligned_y = Vec::with_capacity(operations.len());
        let (mut i, mut j) = (0, 0);
        for op in &operations {
            match op {
                Match | Subst => {
                    aligned_x.push(x[i]);
                    aligned_y.push(y[j]);
                }
                Ins => {
                    aligned_x.push(x[i]);
                    aligned_y.push(GAP);
                }
                Del => {
                    aligned_x.push(GAP);
                    aligned_y.push(y[j]);
                }
            }
            i += op.length_on_x();
            j += op.length_on_y();
        }
        Self {
            score,
            xend,
            yend,
            xlen: x.len(),
            ylen: y.len(),
            operations,
            aligned_x,
            aligned_y,
        }
    }

    /// The number of alignment columns.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Validate that the aligned strings, lengths and end cell agree with the operations.
    pub fn validate(&self) {
        assert!(self.xend <= self.xlen, "xend");
        assert!(self.yend <= self.ylen, "yend");
        assert_eq!(self.aligned_x.len(), self.operations.len(), "aligned x length");
        assert_eq!(self.aligned_y.len(), self.operations.len(), "aligned y length");
        let mut xlen = 0;
        let mut ylen = 0;
        for (op, (&a, &b)) in self
            .operations
            .iter()
            .zip(self.aligned_x.iter().zip(self.aligned_y.iter()))
        {
            match op {
                Match => assert!(a == b && a != GAP, "match column {}/{}", a, b),
                Subst => assert!(a != b && a != GAP && b != GAP, "subst column {}/{}", a, b),
                Ins => assert!(a != GAP && b == GAP, "ins column {}/{}", a, b),
                Del => assert!(a == GAP && b != GAP, "del column {}/{}", a, b),
            }
            xlen += op.length_on_x();
            ylen += op.length_on_y();
        }
        assert_eq!(self.xlen, xlen, "xlen");
        assert_eq!(self.ylen, ylen, "ylen");
    }

    /// Run-length encodes the operations, e.g. `3=1X2I`.
    pub fn cigar(&self) -> String {
        self.operations
            .iter()
            .dedup_with_count()
            .map(|(count, op)| format!("{}{}", count, op.as_char()))
            .join("")
    }

    /// The two gapped strings of this alignment.
    pub fn aligned_strings(&self) -> (String, String) {
        (
            String::from_utf8_lossy(&self.aligned_x).into_owned(),
            String::from_utf8_lossy(&self.aligned_y).into_owned(),
        )
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x-end: {}/{} y-end: {}/{} score: {} cigar: {} aln-len: {}",
            self.xend,
            self.xlen,
            self.yend,
            self.ylen,
            self.score,
            self.cigar(),
            self.len()
        )
    }
}
