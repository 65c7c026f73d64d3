pub mod aligners;
pub mod alignment;
pub mod distance;
pub mod format;
pub mod guide_tree;
pub mod io;
pub mod merger;
pub mod scoring;
pub mod traceback;

pub use aligners::{Builder, Engine, MergeOrder, MultipleAlignment, Options};
pub use alignment::Alignment;
pub use format::{Formatter, Table};

use crate::{error::Result, util::sequence::default_name};

/// Aligns two raw sequences and returns the two gapped strings.
pub fn pairwise_align(
    seq1: &str,
    seq2: &str,
    match_score: i32,
    mismatch_score: i32,
    gap_score: i32,
) -> Result<(String, String)> {
    let engine = Builder::default()
        .match_score(match_score)
        .mismatch_score(mismatch_score)
        .gap_score(gap_score)
        .threads(1)
        .build_engine()?;
    Ok(engine.align_pair(seq1, seq2)?.aligned_strings())
}

/// Aligns raw sequences progressively and formats the profiles as a table of `[name, line]`
/// rows, with an empty row after every block.
///
/// Each call starts its own thread pool with one thread per CPU.  Callers aligning many small
/// sets should build one [`Engine`] and call [`Engine::align_many`] instead.
pub fn multiple_sequence_align<S: AsRef<str>>(
    sequences: &[S],
    chunk_size: usize,
    chunks_per_line: usize,
    match_score: i32,
    mismatch_score: i32,
    gap_score: i32,
) -> Result<Table> {
    let engine = Builder::default()
        .chunk_size(chunk_size)
        .chunks_per_line(chunks_per_line)
        .match_score(match_score)
        .mismatch_score(mismatch_score)
        .gap_score(gap_score)
        .build_engine()?;
    let msa = engine.align_many(sequences)?;
    engine.format_msa(&msa)
}

/// Formats an aligned pair with a symbol track between the two sequences.
pub fn format_pairwise(
    aligned: (&str, &str),
    chunk_size: usize,
    chunks_per_line: usize,
) -> Result<Table> {
    let (name1, name2) = (default_name(0), default_name(1));
    Formatter::new(chunk_size, chunks_per_line)?.format_pairwise(
        (name1.as_str(), name2.as_str()),
        aligned.0.as_bytes(),
        aligned.1.as_bytes(),
    )
}
