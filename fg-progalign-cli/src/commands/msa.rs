use super::{
    command::{Command, ValueEnum},
    options::{EngineArgs, IoArgs},
};
use anyhow::{ensure, Result};
use clap::{
    builder::{PossibleValuesParser, TypedValueParser as _},
    Parser,
};
use log::info;
use progalign::{
    align::{
        io::{open_output, read_fasta, write_table},
        MergeOrder,
    },
    util::version::built_info,
};

/// Builds a progressive multiple sequence alignment of the records of a FASTA file.
///
/// All pairs of sequences are aligned to build a distance matrix, from which an average-linkage
/// guide tree is built.  Sequences are then merged one pair at a time, splicing the gaps of each
/// new pairwise alignment into the profiles built so far.  Profiles are padded with trailing gaps
/// to a common length.
///
/// The output is tab-separated: for each block of `--chunk-size * --chunks-per-line` columns one
/// `name, line` row per sequence followed by an empty row.
#[derive(Parser, Debug, Clone)]
#[clap(version = built_info::VERSION.as_str(), term_width=0)]
pub struct Msa {
    #[command(flatten)]
    io: IoArgs,

    /// The order in which sequences are merged:
    /// - greedy: at each step, merge the closest pair of not yet merged sequences
    /// - guide-tree: merge in the order of the average-linkage guide tree
    #[clap(
        long,
        short = 'm',
        value_parser = PossibleValuesParser::new(MergeOrder::possible_values())
            .map(|s| s.parse::<MergeOrder>().unwrap()),
        default_value_t = MergeOrder::Greedy,
        ignore_case = true,
        display_order = 4,
        verbatim_doc_comment
    )]
    merge_order: MergeOrder,

    #[command(flatten)]
    engine: EngineArgs,
}

impl Msa {
    /// Executes the msa command
    pub fn execute(&self) -> Result<()> {
        let input = self.io.input.clone().unwrap_or_else(|| "-".into());
        let mut builder = self.engine.builder();
        builder.merge_order(self.merge_order);
        let engine = builder.build_engine()?;

        let records = read_fasta(&input, self.io.decompress)?;
        ensure!(!records.is_empty(), "No records found in {}", input.display());

        let msa = engine.align_records(&records)?;
        let table = engine.format_msa(&msa)?;
        let mut writer = open_output(self.io.output.as_deref())?;
        write_table(&mut writer, &table)?;
        info!(
            "Wrote the alignment of {} sequences ({} columns)",
            msa.names().len(),
            msa.width()
        );
        Ok(())
    }
}

impl Command for Msa {
    fn execute(&self) -> Result<()> {
        Msa::execute(self)
    }
}
