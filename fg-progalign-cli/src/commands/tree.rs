use super::{
    command::Command,
    options::{EngineArgs, IoArgs},
};
use anyhow::{ensure, Context, Result};
use clap::Parser;
use log::info;
use progalign::{
    align::{
        distance::DistanceMatrix,
        guide_tree::{GuideTree, Merge},
        io::{open_output, read_fasta},
    },
    util::version::{built_info, built_info::VERSION},
};
use serde::Serialize;
use std::io::Write;

/// The distances and merges written by the `guide-tree` command.
#[derive(Serialize, Debug)]
struct GuideTreeReport<'a> {
    version: &'a str,
    names: Vec<&'a str>,
    distances: &'a DistanceMatrix,
    merges: &'a [Merge],
    newick: String,
}

/// Builds the average-linkage guide tree over the records of a FASTA file.
///
/// All pairs of sequences are aligned and scored to build a distance matrix, which is then
/// clustered by repeatedly joining the two clusters with the smallest average distance.
///
/// The output is a JSON document holding the sequence names, the distance matrix, every merge
/// step (the two joined node ids, the new node id, the average distance and the members of the
/// new cluster) and the tree in Newick format.  Leaves are numbered from zero in input order and
/// the node created by the k-th merge is numbered `N + k`.  With `--newick` only the Newick tree
/// is written.
#[derive(Parser, Debug, Clone)]
#[clap(version = built_info::VERSION.as_str(), term_width=0)]
pub struct Tree {
    #[command(flatten)]
    io: IoArgs,

    /// Write only the tree in Newick format.
    #[clap(long, default_value = "false", display_order = 4)]
    newick: bool,

    #[command(flatten)]
    engine: EngineArgs,
}

impl Tree {
    /// Executes the guide-tree command
    pub fn execute(&self) -> Result<()> {
        let input = self.io.input.clone().unwrap_or_else(|| "-".into());
        let engine = self.engine.builder().build_engine()?;

        let records = read_fasta(&input, self.io.decompress)?;
        ensure!(!records.is_empty(), "No records found in {}", input.display());
        let names: Vec<&str> = records.iter().map(|r| r.name().as_str()).collect();

        let (distances, tree): (DistanceMatrix, GuideTree) = engine.guide_tree(&records)?;
        info!(
            "Built a guide tree with {} merges over {} sequences",
            tree.merges().len(),
            tree.num_leaves()
        );

        let mut writer = open_output(self.io.output.as_deref())?;
        if self.newick {
            writeln!(writer, "{}", tree.newick(&names)).context("Error writing Newick tree")?;
        } else {
            let report = GuideTreeReport {
                version: VERSION.as_str(),
                newick: tree.newick(&names),
                names,
                distances: &distances,
                merges: tree.merges(),
            };
            serde_json::to_writer_pretty(&mut writer, &report)
                .context("Error writing guide tree report")?;
            writeln!(writer).context("Error writing guide tree report")?;
        }
        writer.flush().context("Error flushing output")?;
        Ok(())
    }
}

impl Command for Tree {
    fn execute(&self) -> Result<()> {
        Tree::execute(self)
    }
}
