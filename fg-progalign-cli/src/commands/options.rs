use super::command::ValueEnum;
use clap::{
    builder::{PossibleValuesParser, TypedValueParser as _},
    Args,
};
use progalign::{
    align::{
        aligners::constants::{
            DEFAULT_CHUNKS_PER_LINE, DEFAULT_CHUNK_SIZE, DEFAULT_GAP_SCORE, DEFAULT_MATCH_SCORE,
            DEFAULT_MISMATCH_SCORE,
        },
        Builder,
    },
    util::{sequence::Alphabet, NUM_CPU},
};
use std::path::PathBuf;

/// Scoring, formatting and threading options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Score for a sequence match
    #[clap(long, short = 'A', default_value_t = DEFAULT_MATCH_SCORE, allow_hyphen_values = true, display_order = 10)]
    match_score: i32,

    /// Score for a sequence mismatch
    #[clap(long, short = 'B', default_value_t = DEFAULT_MISMATCH_SCORE, allow_hyphen_values = true, display_order = 11)]
    mismatch_score: i32,

    /// Score for a symbol aligned to a gap
    #[clap(long, short = 'G', default_value_t = DEFAULT_GAP_SCORE, allow_hyphen_values = true, display_order = 12)]
    gap_score: i32,

    /// The number of symbols per space-separated chunk in the output table.
    #[clap(long, default_value_t = DEFAULT_CHUNK_SIZE, display_order = 13)]
    chunk_size: usize,

    /// The number of chunks per line in the output table.
    #[clap(long, default_value_t = DEFAULT_CHUNKS_PER_LINE, display_order = 14)]
    chunks_per_line: usize,

    /// The symbols allowed in input sequences:
    /// - any: any symbol other than the gap symbol `-`
    /// - dna: A, C, G, T and N
    /// - iupac: the IUPAC nucleotide codes
    /// - protein: the IUPAC amino acid codes
    #[clap(
        long,
        value_parser = PossibleValuesParser::new(Alphabet::possible_values())
            .map(|s| s.parse::<Alphabet>().unwrap()),
        default_value_t = Alphabet::Any,
        ignore_case = true,
        display_order = 15,
        verbatim_doc_comment
    )]
    alphabet: Alphabet,

    /// The number of threads to use.
    #[clap(long, short = 't', default_value = NUM_CPU.as_str(), display_order = 16)]
    threads: usize,
}

impl EngineArgs {
    /// A [`Builder`] populated from the command line.
    pub fn builder(&self) -> Builder {
        let mut builder = Builder::default();
        builder
            .match_score(self.match_score)
            .mismatch_score(self.mismatch_score)
            .gap_score(self.gap_score)
            .chunk_size(self.chunk_size)
            .chunks_per_line(self.chunks_per_line)
            .alphabet(self.alphabet)
            .threads(self.threads);
        builder
    }
}

/// Where to read sequences from and write results to.
#[derive(Args, Debug, Clone)]
pub struct IoArgs {
    /// The path to the input FASTA, or `-` for standard input.
    #[clap(long, short = 'i', display_order = 1)]
    pub input: Option<PathBuf>,

    /// The path to the output file, standard output if not given.
    #[clap(long, short = 'o', display_order = 2)]
    pub output: Option<PathBuf>,

    /// Assume an unrecognized input (based on file extension) is GZIP compressed.
    #[clap(long, short = 'z', default_value = "false", display_order = 3)]
    pub decompress: bool,
}
