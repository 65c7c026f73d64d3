//! Scalar distances between aligned pairs and the all-pairs distance matrix.
use bio::alignment::pairwise::MatchFunc;
use itertools::Itertools;
use log::debug;
use rayon::{prelude::*, ThreadPool};
use serde::Serialize;

use crate::{
    align::{aligners::pairwise::PairwiseAligner, alignment::Alignment, scoring::Scoring},
    error::{AlignError, Result},
};

/// Sums the per-column scores of two equal-length gapped strings: the substitution score for
/// columns without gaps and the gap score for columns with a gap on either side.
///
/// With the default scores this is a similarity: identical sequences score highest.
pub fn distance<F: MatchFunc>(aligned_x: &[u8], aligned_y: &[u8], scoring: &Scoring<F>) -> i32 {
    debug_assert_eq!(aligned_x.len(), aligned_y.len());
    aligned_x
        .iter()
        .zip(aligned_y.iter())
        .map(|(&a, &b)| scoring.column(a, b))
        .sum()
}

/// Recomputes the distance of an alignment from its columns, ignoring its matrix score.
pub fn alignment_distance<F: MatchFunc>(alignment: &Alignment, scoring: &Scoring<F>) -> i32 {
    distance(&alignment.aligned_x, &alignment.aligned_y, scoring)
}

/// A symmetric N x N table of pairwise distances.  The diagonal is stored as zero and is never
/// consulted.
#[derive(Default, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub struct DistanceMatrix {
    values: Vec<Vec<i32>>,
}

impl DistanceMatrix {
    /// Aligns every unordered pair of `seqs` once on the given pool and mirrors each distance.
    pub fn build<S, F>(seqs: &[S], aligner: &PairwiseAligner<F>, pool: &ThreadPool) -> Result<Self>
    where
        S: AsRef<[u8]> + Sync,
        F: MatchFunc + Sync,
    {
        let n = seqs.len();
        let pairs: Vec<(usize, usize)> = (0..n).tuple_combinations().collect();
        debug!(
            "Computing distances for {} pairs of {} sequences",
            pairs.len(),
            n
        );
        let distances: Vec<i32> = pool.install(|| {
            pairs
                .par_iter()
                .map(|&(i, j)| -> Result<i32> {
                    let aln = aligner.align(seqs[i].as_ref(), seqs[j].as_ref())?;
                    Ok(alignment_distance(&aln, aligner.scoring()))
                })
                .collect::<Result<Vec<i32>>>()
        })?;

        let mut values = vec![vec![0; n]; n];
        for (&(i, j), d) in pairs.iter().zip(distances) {
            values[i][j] = d;
            values[j][i] = d;
        }
        Ok(Self { values })
    }

    /// Wraps an existing square, symmetric table.
    pub fn from_rows(values: Vec<Vec<i32>>) -> Result<Self> {
        let n = values.len();
        if let Some((i, row)) = values.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(AlignError::invalid(format!(
                "distance matrix row {} has {} entries, expected {}",
                i,
                row.len(),
                n
            )));
        }
        for (i, row) in values.iter().enumerate() {
            for (j, &v) in row.iter().enumerate().skip(i + 1) {
                if values[j][i] != v {
                    return Err(AlignError::invalid(format!(
                        "distance matrix is not symmetric at ({}, {})",
                        i, j
                    )));
                }
            }
        }
        Ok(Self { values })
    }

    /// The number of sequences.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i32 {
        self.values[i][j]
    }

    pub fn rows(&self) -> &[Vec<i32>] {
        &self.values
    }
}
