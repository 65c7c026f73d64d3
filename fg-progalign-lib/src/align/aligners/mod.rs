pub mod constants;
pub mod pairwise;

pub use constants::MergeOrder;

use derive_builder::Builder;
use derive_getters::Getters;
use log::{debug, info};
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;

use crate::{
    align::{
        aligners::{
            constants::{
                DEFAULT_CHUNKS_PER_LINE, DEFAULT_CHUNK_SIZE, DEFAULT_GAP_SCORE,
                DEFAULT_MATCH_SCORE, DEFAULT_MISMATCH_SCORE,
            },
            pairwise::PairwiseAligner,
        },
        alignment::Alignment,
        distance::DistanceMatrix,
        format::{Formatter, Table},
        guide_tree::GuideTree,
        io::SequenceRecord,
        merger::{merge_greedy, merge_guide_tree},
        scoring::{MatchMismatch, Scoring},
    },
    error::{AlignError, Result},
    util::sequence::{default_name, normalize, Alphabet},
};

/// The settings shared by every alignment, merge and formatting call of one run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Builder, Getters, Serialize)]
#[builder(
    name = "Builder",
    build_fn(name = "build_options", validate = "Self::validate")
)]
pub struct Options {
    #[builder(default = "DEFAULT_MATCH_SCORE")]
    match_score: i32,
    #[builder(default = "DEFAULT_MISMATCH_SCORE")]
    mismatch_score: i32,
    #[builder(default = "DEFAULT_GAP_SCORE")]
    gap_score: i32,
    #[builder(default = "DEFAULT_CHUNK_SIZE")]
    chunk_size: usize,
    #[builder(default = "DEFAULT_CHUNKS_PER_LINE")]
    chunks_per_line: usize,
    #[builder(default)]
    merge_order: MergeOrder,
    #[builder(default)]
    alphabet: Alphabet,
    #[builder(default = "num_cpus::get()")]
    threads: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            match_score: DEFAULT_MATCH_SCORE,
            mismatch_score: DEFAULT_MISMATCH_SCORE,
            gap_score: DEFAULT_GAP_SCORE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunks_per_line: DEFAULT_CHUNKS_PER_LINE,
            merge_order: MergeOrder::default(),
            alphabet: Alphabet::default(),
            threads: num_cpus::get(),
        }
    }
}

impl Options {
    pub fn scoring(&self) -> Scoring<MatchMismatch> {
        Scoring::from_scores(self.match_score, self.mismatch_score, self.gap_score)
    }
}

impl Builder {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.chunk_size == Some(0) {
            return Err("chunk size must be positive".to_string());
        }
        if self.chunks_per_line == Some(0) {
            return Err("chunks per line must be positive".to_string());
        }
        if self.threads == Some(0) {
            return Err("threads must be positive".to_string());
        }
        Ok(())
    }

    pub fn build_engine(&self) -> Result<Engine> {
        let opts = self
            .build_options()
            .map_err(|e| AlignError::invalid(e.to_string()))?;
        Engine::new(opts)
    }
}

/// The result of a multiple sequence alignment.
#[derive(Debug, Clone, PartialEq, Getters, Serialize)]
pub struct MultipleAlignment {
    /// One name per input sequence
    names: Vec<String>,
    /// The normalized input sequences
    sequences: Vec<String>,
    /// The aligned sequences, all of the same length
    profiles: Vec<String>,
    distances: DistanceMatrix,
    guide_tree: GuideTree,
}

impl MultipleAlignment {
    /// The number of alignment columns.
    pub fn width(&self) -> usize {
        self.profiles.first().map_or(0, String::len)
    }
}

/// Aligns sequences with one fixed set of [`Options`].
#[derive(Debug)]
pub struct Engine {
    opts: Options,
    aligner: PairwiseAligner<MatchMismatch>,
    formatter: Formatter,
    pool: ThreadPool,
}

impl Engine {
    pub fn new(opts: Options) -> Result<Self> {
        let formatter = Formatter::new(opts.chunk_size, opts.chunks_per_line)?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(opts.threads)
            .build()
            .map_err(|e| AlignError::invalid(format!("could not start thread pool: {}", e)))?;
        Ok(Self {
            aligner: PairwiseAligner::new(opts.scoring()),
            formatter,
            pool,
            opts,
        })
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub fn aligner(&self) -> &PairwiseAligner<MatchMismatch> {
        &self.aligner
    }

    /// Normalizes one raw sequence, naming it in any error.
    fn normalize_named(&self, name: &str, raw: &str) -> Result<Vec<u8>> {
        normalize(raw, self.opts.alphabet).map_err(|e| match e {
            AlignError::InvalidInput(message) => {
                AlignError::InvalidInput(format!("{}: {}", name, message))
            }
            other => other,
        })
    }

    pub fn normalize(&self, raw: &str) -> Result<Vec<u8>> {
        normalize(raw, self.opts.alphabet)
    }

    /// Normalizes and aligns two raw sequences, naming them `Seq1` and `Seq2` in any error.
    pub fn align_pair(&self, seq1: &str, seq2: &str) -> Result<Alignment> {
        let (name1, name2) = (default_name(0), default_name(1));
        self.align_named_pair((name1.as_str(), name2.as_str()), seq1, seq2)
    }

    /// Normalizes and aligns two raw sequences, naming them `names` in any error.
    pub fn align_named_pair(
        &self,
        names: (&str, &str),
        seq1: &str,
        seq2: &str,
    ) -> Result<Alignment> {
        let x = self.normalize_named(names.0, seq1)?;
        let y = self.normalize_named(names.1, seq2)?;
        let alignment = self.aligner.align(&x, &y)?;
        debug!("Aligned pair: {}", alignment);
        Ok(alignment)
    }

    /// The all-pairs distance matrix of already normalized sequences.
    pub fn distance_matrix<S: AsRef<[u8]> + Sync>(&self, seqs: &[S]) -> Result<DistanceMatrix> {
        DistanceMatrix::build(seqs, &self.aligner, &self.pool)
    }

    /// Aligns raw sequences, naming them `Seq1`, `Seq2`, ...
    pub fn align_many<S: AsRef<str>>(&self, seqs: &[S]) -> Result<MultipleAlignment> {
        let records: Vec<SequenceRecord> = seqs
            .iter()
            .enumerate()
            .map(|(k, s)| SequenceRecord::new(default_name(k), s.as_ref()))
            .collect();
        self.align_records(&records)
    }

    /// Normalizes every record.  Every sequence is checked before any alignment is attempted.
    fn normalize_records(&self, records: &[SequenceRecord]) -> Result<Vec<Vec<u8>>> {
        if records.is_empty() {
            return Err(AlignError::invalid("no sequences to align"));
        }
        records
            .iter()
            .map(|r| self.normalize_named(&r.name, &r.seq))
            .collect()
    }

    /// The distance matrix and the guide tree of the records, without merging them.
    pub fn guide_tree(&self, records: &[SequenceRecord]) -> Result<(DistanceMatrix, GuideTree)> {
        let sequences = self.normalize_records(records)?;
        let distances = self.distance_matrix(&sequences)?;
        let guide_tree = GuideTree::build(&distances)?;
        Ok((distances, guide_tree))
    }

    /// Normalizes every record, then builds the distance matrix, the guide tree and the
    /// profiles.
    pub fn align_records(&self, records: &[SequenceRecord]) -> Result<MultipleAlignment> {
        let sequences = self.normalize_records(records)?;
        info!(
            "Aligning {} sequences with merge order {}",
            sequences.len(),
            self.opts.merge_order
        );
        let distances = self.distance_matrix(&sequences)?;
        let guide_tree = GuideTree::build(&distances)?;
        let profiles = match self.opts.merge_order {
            MergeOrder::Greedy => merge_greedy(&sequences, &self.aligner, &self.pool)?,
            MergeOrder::GuideTree => merge_guide_tree(&sequences, &guide_tree, &self.aligner)?,
        };

        let to_string = |s: Vec<u8>| String::from_utf8_lossy(&s).into_owned();
        let msa = MultipleAlignment {
            names: records.iter().map(|r| r.name.clone()).collect(),
            sequences: sequences.into_iter().map(to_string).collect(),
            profiles: profiles.into_iter().map(to_string).collect(),
            distances,
            guide_tree,
        };
        info!("Aligned {} sequences over {} columns", msa.names.len(), msa.width());
        Ok(msa)
    }

    pub fn format_pairwise(&self, names: (&str, &str), alignment: &Alignment) -> Result<Table> {
        self.formatter
            .format_pairwise(names, &alignment.aligned_x, &alignment.aligned_y)
    }

    pub fn format_msa(&self, msa: &MultipleAlignment) -> Result<Table> {
        self.formatter.format_msa(&msa.names, &msa.profiles)
    }
}

#[cfg(test)]
pub mod tests {
    use rstest::rstest;

    use crate::{align::io::SequenceRecord, error::ErrorKind, util::sequence::Alphabet};

    use super::{Builder, MergeOrder, Options};

    fn builder() -> Builder {
        let mut builder = Builder::default();
        builder.threads(2);
        builder
    }

    #[test]
    fn test_defaults() {
        let opts = Builder::default().build_options().unwrap();
        assert_eq!(*opts.match_score(), 1);
        assert_eq!(*opts.mismatch_score(), -1);
        assert_eq!(*opts.gap_score(), -1);
        assert_eq!(*opts.chunk_size(), 10);
        assert_eq!(*opts.chunks_per_line(), 5);
        assert_eq!(*opts.merge_order(), MergeOrder::Greedy);
        assert_eq!(*opts.alphabet(), Alphabet::Any);
        assert!(*opts.threads() >= 1);
        assert_eq!(opts, Options::default());
    }

    #[rstest]
    #[case(0, 5, 1)]
    #[case(10, 0, 1)]
    #[case(10, 5, 0)]
    fn test_validation(
        #[case] chunk_size: usize,
        #[case] chunks_per_line: usize,
        #[case] threads: usize,
    ) {
        let err = Builder::default()
            .chunk_size(chunk_size)
            .chunks_per_line(chunks_per_line)
            .threads(threads)
            .build_engine()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_align_pair() {
        let engine = builder().build_engine().unwrap();
        let aln = engine.align_pair(" gattaca\n", "GCATGCT").unwrap();
        assert_eq!(
            aln.aligned_strings(),
            ("G-ATTACA".to_string(), "GCATGCT-".to_string())
        );
        let table = engine.format_pairwise(("a", "b"), &aln).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table[1], vec!["1".to_string(), "| ||xxx ".to_string()]);
    }

    #[test]
    fn test_align_pair_rejects_empty() {
        let engine = builder().build_engine().unwrap();
        let err = engine.align_pair("ACGT", "  \n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("Seq2"));
    }

    #[test]
    fn test_align_named_pair_reports_record_name() {
        let engine = builder().alphabet(Alphabet::Dna).build_engine().unwrap();
        let err = engine
            .align_named_pair(("chr1", "chr2"), "ACGT", "ACGU")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("chr2"));
        assert!(!err.to_string().contains("Seq2"));

        let aln = engine
            .align_named_pair(("chr1", "chr2"), "gattaca", "GCATGCT")
            .unwrap();
        assert_eq!(aln, engine.align_pair("GATTACA", "GCATGCT").unwrap());
    }

    #[rstest]
    #[case(MergeOrder::Greedy)]
    #[case(MergeOrder::GuideTree)]
    fn test_align_many(#[case] merge_order: MergeOrder) {
        let engine = builder().merge_order(merge_order).build_engine().unwrap();
        let msa = engine
            .align_many(&["ACGTACGT", "acgaacgt", "ACGT", "TTACGTAA"])
            .unwrap();
        assert_eq!(msa.names(), &["Seq1", "Seq2", "Seq3", "Seq4"]);
        assert_eq!(msa.sequences()[1], "ACGAACGT");
        assert_eq!(
            msa.profiles(),
            &["ACGTACGT--", "ACGAACGT--", "ACGT------", "--TTACGTAA"]
        );
        assert_eq!(msa.width(), 10);
        assert_eq!(msa.guide_tree().merges().len(), 3);
        assert_eq!(msa.distances().get(0, 1), 6);
    }

    #[test]
    fn test_align_many_empty_sequence_fails_first() {
        let engine = builder().build_engine().unwrap();
        let err = engine.align_many(&["ACGT", "GATTACA", ""]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("Seq3"));
        let none: [&str; 0] = [];
        assert!(engine.align_many(&none).is_err());
    }

    #[test]
    fn test_guide_tree() {
        let engine = builder().build_engine().unwrap();
        let records = vec![
            SequenceRecord::new("a", "GATTACA"),
            SequenceRecord::new("b", "GCATGCT"),
            SequenceRecord::new("c", "GATACA"),
        ];
        let (distances, tree) = engine.guide_tree(&records).unwrap();
        assert_eq!(distances.get(1, 2), -6);
        assert_eq!(tree.merges().len(), 2);
        assert_eq!(tree.newick(&["a", "b", "c"]), "(a,(b,c));");
    }

    #[test]
    fn test_alphabet_is_enforced() {
        let engine = builder().alphabet(Alphabet::Dna).build_engine().unwrap();
        let err = engine.align_many(&["ACGT", "ACGU"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_threads_agree() {
        let seqs = ["GATTACA", "GCATGCT", "GATACA", "ACGTACGT", "TTTTGGGG", "CATCAT"];
        let single = builder().threads(1).build_engine().unwrap();
        let multi = builder().threads(4).build_engine().unwrap();
        assert_eq!(
            single.align_many(&seqs).unwrap(),
            multi.align_many(&seqs).unwrap()
        );
    }

    #[test]
    fn test_format_msa() {
        let engine = builder().chunk_size(2).chunks_per_line(1).build_engine().unwrap();
        let msa = engine.align_many(&["AAAA", "AAAA", "AAAA"]).unwrap();
        let table = engine.format_msa(&msa).unwrap();
        // two blocks of three rows plus a separator
        assert_eq!(table.len(), 8);
        assert_eq!(table[0], vec!["Seq1".to_string(), "AA".to_string()]);
        assert_eq!(table[3], vec![String::new(), String::new()]);
    }
}
