use anyhow::{anyhow, Error};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// The gap symbol used in aligned sequences.
pub const GAP: u8 = b'-';

/// Interior cells of the score matrix never fall below this value.
pub const FLOOR_SCORE: i32 = 0;

pub const DEFAULT_MATCH_SCORE: i32 = 1;
pub const DEFAULT_MISMATCH_SCORE: i32 = -1;
pub const DEFAULT_GAP_SCORE: i32 = -1;

/// The number of symbols per space-separated chunk when formatting.
pub const DEFAULT_CHUNK_SIZE: usize = 10;

/// The number of chunks per formatted line.
pub const DEFAULT_CHUNKS_PER_LINE: usize = 5;

/// Alignment operations supported are match, substitution, insertion and deletion, where `x` is
/// the first and `y` the second sequence of a pairwise alignment.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, Serialize, Deserialize)]
pub enum AlignmentOperation {
    Match, // Consumes one x and one y symbol, which are equal
    Subst, // Consumes one x and one y symbol, which differ
    Ins,   // Consumes a single x symbol, aligned to a gap in y
    Del,   // Consumes a single y symbol, aligned to a gap in x
}

impl AlignmentOperation {
    /// The CIGAR-like character for this operation.
    pub fn as_char(self) -> char {
        match self {
            AlignmentOperation::Match => '=',
            AlignmentOperation::Subst => 'X',
            AlignmentOperation::Ins => 'I',
            AlignmentOperation::Del => 'D',
        }
    }

    pub fn length_on_x(self) -> usize {
        match self {
            AlignmentOperation::Match | AlignmentOperation::Subst | AlignmentOperation::Ins => 1,
            AlignmentOperation::Del => 0,
        }
    }

    pub fn length_on_y(self) -> usize {
        match self {
            AlignmentOperation::Match | AlignmentOperation::Subst | AlignmentOperation::Del => 1,
            AlignmentOperation::Ins => 0,
        }
    }

    /// The operation for a column pairing `x` and `y`, neither of which is a gap.
    pub fn diagonal(x: u8, y: u8) -> Self {
        if x == y {
            AlignmentOperation::Match
        } else {
            AlignmentOperation::Subst
        }
    }
}

/// The order in which the progressive merger joins sequences.
///
/// The default is `Greedy`.
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
pub enum MergeOrder {
    /// At every step, re-align all pairs of not-yet-merged representatives and merge the pair
    /// with the smallest distance.
    #[default]
    Greedy,
    /// Merge in the order recorded by the average-linkage guide tree.
    GuideTree,
}

impl Display for MergeOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Greedy => write!(f, "greedy"),
            Self::GuideTree => write!(f, "guide-tree"),
        }
    }
}

impl FromStr for MergeOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(MergeOrder::Greedy),
            "guide-tree" | "guide_tree" | "guidetree" | "tree" => Ok(MergeOrder::GuideTree),
            _ => Err(anyhow!("Invalid merge order: {}", s)),
        }
    }
}
