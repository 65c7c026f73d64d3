//! Progressive merging of pairwise alignments into one profile per input sequence.
use bio::alignment::pairwise::MatchFunc;
use bit_set::BitSet;
use itertools::Itertools;
use log::debug;
use rayon::{prelude::*, ThreadPool};

use crate::{
    align::{
        aligners::{constants::GAP, pairwise::PairwiseAligner},
        distance::alignment_distance,
        guide_tree::GuideTree,
    },
    error::{AlignError, Result},
};

/// Splices the gaps of a freshly aligned string into an existing profile.
///
/// Walks `aligned`; a symbol equal to the next unconsumed profile symbol keeps that symbol and
/// advances the profile, any other symbol emits a gap.  Unconsumed profile symbols are appended
/// at the end.  Gaps already in the profile are never removed, so the result is never shorter
/// than `profile` and, stripped of gaps, spells the same sequence.
///
/// This is a greedy one-sided diff, not a column-consistent profile merge.
pub fn splice_gaps(profile: &[u8], aligned: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(aligned.len().max(profile.len()));
    let mut p = 0;
    for &c in aligned {
        if p < profile.len() && profile[p] == c {
            out.push(c);
            p += 1;
        } else {
            out.push(GAP);
        }
    }
    out.extend_from_slice(&profile[p..]);
    out
}

/// Right-pads every profile with gaps to the length of the longest.
pub fn pad_profiles(profiles: &mut [Vec<u8>]) {
    let width = profiles.iter().map(Vec::len).max().unwrap_or(0);
    for profile in profiles.iter_mut() {
        profile.resize(width, GAP);
    }
}

fn check_input<S: AsRef<[u8]>>(seqs: &[S]) -> Result<()> {
    if seqs.is_empty() {
        return Err(AlignError::invalid("no sequences to align"));
    }
    if let Some(k) = seqs.iter().position(|s| s.as_ref().is_empty()) {
        return Err(AlignError::invalid(format!("sequence {} is empty", k + 1)));
    }
    Ok(())
}

/// Aligns `seqs[i]` to `seqs[j]` and splices the result into both profiles.
fn merge_pair<S, F>(
    seqs: &[S],
    profiles: &mut [Vec<u8>],
    i: usize,
    j: usize,
    aligner: &PairwiseAligner<F>,
) -> Result<()>
where
    S: AsRef<[u8]>,
    F: MatchFunc,
{
    let aln = aligner.align(seqs[i].as_ref(), seqs[j].as_ref())?;
    profiles[i] = splice_gaps(&profiles[i], &aln.aligned_x);
    profiles[j] = splice_gaps(&profiles[j], &aln.aligned_y);
    Ok(())
}

/// Merges greedily: every step aligns all pairs of active representatives (in parallel on
/// `pool`), picks the first pair with the smallest distance, splices its alignment into the two
/// profiles and retires the second index of the pair.
pub fn merge_greedy<S, F>(
    seqs: &[S],
    aligner: &PairwiseAligner<F>,
    pool: &ThreadPool,
) -> Result<Vec<Vec<u8>>>
where
    S: AsRef<[u8]> + Sync,
    F: MatchFunc + Sync,
{
    check_input(seqs)?;
    let mut profiles: Vec<Vec<u8>> = seqs.iter().map(|s| s.as_ref().to_vec()).collect();
    let mut active: BitSet = (0..seqs.len()).collect();

    while active.len() > 1 {
        let pairs: Vec<(usize, usize)> = active.iter().tuple_combinations().collect();
        let distances: Vec<i32> = pool.install(|| {
            pairs
                .par_iter()
                .map(|&(i, j)| -> Result<i32> {
                    let aln = aligner.align(seqs[i].as_ref(), seqs[j].as_ref())?;
                    Ok(alignment_distance(&aln, aligner.scoring()))
                })
                .collect::<Result<Vec<i32>>>()
        })?;
        let best = match distances.iter().position_min() {
            Some(best) => best,
            None => break,
        };
        let (i, j) = pairs[best];
        debug!(
            "Merging sequence {} into {} at distance {} ({} active)",
            j,
            i,
            distances[best],
            active.len()
        );
        merge_pair(seqs, &mut profiles, i, j, aligner)?;
        active.remove(j);
    }

    pad_profiles(&mut profiles);
    Ok(profiles)
}

/// Merges in guide tree order.  Each cluster is represented by the representative of its left
/// child, so a leaf-only cluster is represented by its single sequence.
pub fn merge_guide_tree<S, F>(
    seqs: &[S],
    tree: &GuideTree,
    aligner: &PairwiseAligner<F>,
) -> Result<Vec<Vec<u8>>>
where
    S: AsRef<[u8]>,
    F: MatchFunc,
{
    check_input(seqs)?;
    if tree.num_leaves() != seqs.len() {
        return Err(AlignError::invalid(format!(
            "guide tree has {} leaves but {} sequences were given",
            tree.num_leaves(),
            seqs.len()
        )));
    }
    let mut profiles: Vec<Vec<u8>> = seqs.iter().map(|s| s.as_ref().to_vec()).collect();
    let mut representative: Vec<usize> = (0..seqs.len()).collect();

    for merge in tree.merges() {
        let i = representative[merge.left];
        let j = representative[merge.right];
        debug!(
            "Merging guide tree nodes {} and {} (sequences {} and {})",
            merge.left, merge.right, i, j
        );
        merge_pair(seqs, &mut profiles, i, j, aligner)?;
        representative.push(i);
    }

    pad_profiles(&mut profiles);
    Ok(profiles)
}

#[cfg(test)]
pub mod tests {
    use rayon::{ThreadPool, ThreadPoolBuilder};
    use rstest::rstest;

    use crate::{
        align::{
            aligners::{constants::GAP, pairwise::PairwiseAligner},
            distance::DistanceMatrix,
            guide_tree::GuideTree,
            scoring::{MatchMismatch, Scoring},
        },
        error::ErrorKind,
    };

    use super::{merge_greedy, merge_guide_tree, pad_profiles, splice_gaps};

    fn pool(threads: usize) -> ThreadPool {
        ThreadPoolBuilder::new().num_threads(threads).build().unwrap()
    }

    fn aligner() -> PairwiseAligner<MatchMismatch> {
        PairwiseAligner::new(Scoring::default())
    }

    fn strings(profiles: Vec<Vec<u8>>) -> Vec<String> {
        profiles
            .into_iter()
            .map(|p| String::from_utf8(p).unwrap())
            .collect()
    }

    fn greedy(seqs: &[&str], threads: usize) -> Vec<String> {
        strings(merge_greedy(seqs, &aligner(), &pool(threads)).unwrap())
    }

    fn by_tree(seqs: &[&str]) -> Vec<String> {
        let distances = DistanceMatrix::build(seqs, &aligner(), &pool(1)).unwrap();
        let tree = GuideTree::build(&distances).unwrap();
        strings(merge_guide_tree(seqs, &tree, &aligner()).unwrap())
    }

    #[rstest]
    #[case("ACGT", "ACGT", "ACGT")]
    #[case("ACGT", "A-CGT", "A-CGT")]
    #[case("ACGT", "AC--GT", "AC--GT")]
    #[case("ACGT", "TACGT", "-ACGT")]
    #[case("AC-GT", "ACGT", "AC---GT")]
    #[case("ACGT", "AC", "ACGT")]
    #[case("ACGT", "--", "--ACGT")]
    #[case("G-ATTACA", "G-ATTACA", "G-ATTACA")]
    fn test_splice_gaps(#[case] profile: &str, #[case] aligned: &str, #[case] expected: &str) {
        let spliced = splice_gaps(profile.as_bytes(), aligned.as_bytes());
        assert_eq!(String::from_utf8(spliced).unwrap(), expected);
    }

    #[test]
    fn test_splice_gaps_keeps_symbols() {
        let spliced = splice_gaps(b"A-CG-T", b"TTA-CCGT");
        let ungapped: Vec<u8> = spliced.iter().copied().filter(|&b| b != GAP).collect();
        assert_eq!(ungapped, b"ACGT");
        assert!(spliced.len() >= 6);
    }

    #[test]
    fn test_pad_profiles() {
        let mut profiles = vec![b"AC".to_vec(), b"A-CG".to_vec(), Vec::new()];
        pad_profiles(&mut profiles);
        assert_eq!(strings(profiles), vec!["AC--", "A-CG", "----"]);
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    fn test_identical_sequences(#[case] threads: usize) {
        let seqs = ["AAAA", "AAAA", "AAAA"];
        assert_eq!(greedy(&seqs, threads), vec!["AAAA"; 3]);
        assert_eq!(by_tree(&seqs), vec!["AAAA"; 3]);
    }

    #[test]
    fn test_four_sequences() {
        let seqs = ["ACGTACGT", "ACGAACGT", "ACGT", "TTACGTAA"];
        let expected = vec!["ACGTACGT--", "ACGAACGT--", "ACGT------", "--TTACGTAA"];
        assert_eq!(greedy(&seqs, 2), expected);
        assert_eq!(by_tree(&seqs), expected);
    }

    #[test]
    fn test_three_sequences() {
        let seqs = ["GATTACA", "GCATGCT", "GATACA"];
        let expected = vec![
            "G-ATTACA---------",
            "----------GCATGCT",
            "GATACA-----------",
        ];
        assert_eq!(greedy(&seqs, 1), expected);
        assert_eq!(by_tree(&seqs), expected);
    }

    #[test]
    fn test_single_sequence_is_unchanged() {
        assert_eq!(greedy(&["ACGT"], 1), vec!["ACGT"]);
        assert_eq!(by_tree(&["ACGT"]), vec!["ACGT"]);
    }

    #[test]
    fn test_profiles_are_rectangular_and_spell_inputs() {
        let seqs = ["GATTACA", "GCATGCT", "GATACA", "ACGTACGT", "TTTTGGGG", "CATCAT"];
        for profiles in [greedy(&seqs, 1), greedy(&seqs, 4), by_tree(&seqs)] {
            let width = profiles[0].len();
            for (profile, seq) in profiles.iter().zip(seqs) {
                assert_eq!(profile.len(), width);
                assert_eq!(profile.replace('-', ""), seq);
            }
        }
        assert_eq!(greedy(&seqs, 1), greedy(&seqs, 4));
    }

    #[test]
    fn test_rejects_empty_input() {
        let empty: [&str; 0] = [];
        let err = merge_greedy(&empty, &aligner(), &pool(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = merge_greedy(&["ACGT", ""], &aligner(), &pool(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_guide_tree_size_mismatch() {
        let distances = DistanceMatrix::from_rows(vec![vec![0, 1], vec![1, 0]]).unwrap();
        let tree = GuideTree::build(&distances).unwrap();
        let err = merge_guide_tree(&["ACGT"], &tree, &aligner()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
