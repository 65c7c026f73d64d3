use bio::alignment::pairwise::MatchFunc;
use serde::Serialize;

use crate::align::aligners::constants::{
    DEFAULT_GAP_SCORE, DEFAULT_MATCH_SCORE, DEFAULT_MISMATCH_SCORE, GAP,
};

/// Scores a pair of symbols as `match_score` when they are equal and `mismatch_score`
/// otherwise.
///
/// Unlike [`bio::alignment::pairwise::MatchParams`] no sign constraint is imposed on either
/// score.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub struct MatchMismatch {
    pub match_score: i32,
    pub mismatch_score: i32,
}

impl MatchMismatch {
    pub fn new(match_score: i32, mismatch_score: i32) -> Self {
        Self {
            match_score,
            mismatch_score,
        }
    }
}

impl MatchFunc for MatchMismatch {
    #[inline]
    fn score(&self, a: u8, b: u8) -> i32 {
        if a == b {
            self.match_score
        } else {
            self.mismatch_score
        }
    }
}

/// Details of scoring are encapsulated in this structure.
///
/// A linear gap model is used: every column pairing a symbol with a gap scores `gap_score`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize)]
pub struct Scoring<F: MatchFunc> {
    pub gap_score: i32,
    pub match_fn: F,
}

impl<F: MatchFunc> Scoring<F> {
    /// Create new Scoring instance with the given gap score and the substitution score function.
    pub fn new(gap_score: i32, match_fn: F) -> Self {
        Self {
            gap_score,
            match_fn,
        }
    }

    /// The score for aligning the (non-gap) symbols `a` and `b` against each other.
    #[inline(always)]
    pub fn substitution(&self, a: u8, b: u8) -> i32 {
        self.match_fn.score(a, b)
    }

    /// The score for one column of an alignment, either symbol of which may be a gap.
    #[inline(always)]
    pub fn column(&self, a: u8, b: u8) -> i32 {
        if a == GAP || b == GAP {
            self.gap_score
        } else {
            self.substitution(a, b)
        }
    }
}

impl Scoring<MatchMismatch> {
    pub fn from_scores(match_score: i32, mismatch_score: i32, gap_score: i32) -> Self {
        Self::new(gap_score, MatchMismatch::new(match_score, mismatch_score))
    }
}

impl Default for Scoring<MatchMismatch> {
    fn default() -> Self {
        Self::from_scores(
            DEFAULT_MATCH_SCORE,
            DEFAULT_MISMATCH_SCORE,
            DEFAULT_GAP_SCORE,
        )
    }
}

#[cfg(test)]
pub mod tests {
    use rstest::rstest;

    use super::Scoring;

    #[rstest]
    #[case(b'A', b'A', 2)]
    #[case(b'A', b'C', -3)]
    #[case(b'-', b'C', -5)]
    #[case(b'A', b'-', -5)]
    #[case(b'-', b'-', -5)]
    fn test_column(#[case] a: u8, #[case] b: u8, #[case] expected: i32) {
        let scoring = Scoring::from_scores(2, -3, -5);
        assert_eq!(scoring.column(a, b), expected);
    }

    #[test]
    fn test_positive_scores_are_allowed() {
        let scoring = Scoring::from_scores(-1, 2, 3);
        assert_eq!(scoring.substitution(b'A', b'A'), -1);
        assert_eq!(scoring.substitution(b'A', b'T'), 2);
        assert_eq!(scoring.column(b'A', b'-'), 3);
    }

    #[test]
    fn test_default() {
        let scoring = Scoring::default();
        assert_eq!(scoring.substitution(b'G', b'G'), 1);
        assert_eq!(scoring.substitution(b'G', b'C'), -1);
        assert_eq!(scoring.gap_score, -1);
    }

    #[test]
    fn test_closure_match_fn() {
        let scoring = Scoring::new(-2, |a: u8, b: u8| if a == b { 5 } else { -4 });
        assert_eq!(scoring.column(b'A', b'A'), 5);
        assert_eq!(scoring.column(b'A', b'C'), -4);
        assert_eq!(scoring.column(b'A', b'-'), -2);
    }
}
