use super::{
    command::Command,
    options::{EngineArgs, IoArgs},
};
use anyhow::{bail, ensure, Result};
use clap::Parser;
use log::info;
use progalign::{
    align::io::{open_output, read_fasta, write_table, SequenceRecord},
    util::{sequence::default_name, version::built_info},
};

/// Aligns two sequences and writes them in chunked blocks with a symbol track.
///
/// The two sequences are either the two records of the input FASTA (`--input`) or are given
/// directly with `--seq1` and `--seq2`.  Whitespace is removed and symbols are upper-cased
/// before aligning.
///
/// The output is tab-separated: for each block of `--chunk-size * --chunks-per-line` columns a
/// row for the first sequence, a row with the 1-based column the block starts at and the symbol
/// track (`|` match, `x` mismatch, space for a gap), a row for the second sequence, and an empty
/// row.
#[derive(Parser, Debug, Clone)]
#[clap(version = built_info::VERSION.as_str(), term_width=0)]
pub struct Pairwise {
    #[command(flatten)]
    io: IoArgs,

    /// The first sequence, when no input FASTA is given.
    #[clap(long, conflicts_with = "input", requires = "seq2", display_order = 4)]
    seq1: Option<String>,

    /// The second sequence, when no input FASTA is given.
    #[clap(long, conflicts_with = "input", requires = "seq1", display_order = 5)]
    seq2: Option<String>,

    #[command(flatten)]
    engine: EngineArgs,
}

impl Pairwise {
    /// The two records to align.
    fn records(&self) -> Result<(SequenceRecord, SequenceRecord)> {
        match (&self.io.input, &self.seq1, &self.seq2) {
            (Some(input), _, _) => {
                let mut records = read_fasta(input, self.io.decompress)?;
                ensure!(
                    records.len() == 2,
                    "Expected exactly two records in {}, found {}",
                    input.display(),
                    records.len()
                );
                let second = records.remove(1);
                let first = records.remove(0);
                Ok((first, second))
            }
            (None, Some(seq1), Some(seq2)) => Ok((
                SequenceRecord::new(default_name(0), seq1.as_str()),
                SequenceRecord::new(default_name(1), seq2.as_str()),
            )),
            _ => bail!("Either --input or both --seq1 and --seq2 must be given"),
        }
    }

    /// Executes the pairwise command
    pub fn execute(&self) -> Result<()> {
        let engine = self.engine.builder().build_engine()?;
        let (first, second) = self.records()?;
        info!("Aligning {} and {}", first.name(), second.name());

        let names = (first.name().as_str(), second.name().as_str());
        let alignment = engine.align_named_pair(names, first.seq(), second.seq())?;
        info!("Alignment: {}", alignment);

        let table = engine.format_pairwise(names, &alignment)?;
        let mut writer = open_output(self.io.output.as_deref())?;
        write_table(&mut writer, &table)?;
        Ok(())
    }
}

impl Command for Pairwise {
    fn execute(&self) -> Result<()> {
        Pairwise::execute(self)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use std::{fs, path::Path};
    use tempfile::TempDir;

    use super::Pairwise;

    fn command(input: &Path, output: &Path) -> Pairwise {
        Pairwise::parse_from([
            "pairwise",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-t",
            "1",
        ])
    }

    /// Check that the argument parser works
    #[test]
    fn test_parse() {
        Pairwise::parse_from(["pairwise", "-i", "."]);
        Pairwise::parse_from(["pairwise", "--seq1", "ACGT", "--seq2", "AGT", "-G", "-2"]);
    }

    #[test]
    fn test_conflicting_inputs() {
        assert!(Pairwise::try_parse_from(["pairwise", "-i", ".", "--seq1", "ACGT"]).is_err());
        assert!(Pairwise::try_parse_from(["pairwise", "--seq1", "ACGT"]).is_err());
    }

    #[test]
    fn test_records_from_arguments() {
        let cmd = Pairwise::parse_from(["pairwise", "--seq1", "acgt", "--seq2", "AGT"]);
        let (first, second) = cmd.records().unwrap();
        assert_eq!(first.name(), "Seq1");
        assert_eq!(first.seq(), "acgt");
        assert_eq!(second.name(), "Seq2");
    }

    #[test]
    fn test_execute_writes_table() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("pair.fa");
        let output = dir.path().join("pair.tsv");
        fs::write(&input, ">first desc\ngatt\nACA\n>second\nGCATGCT\n").unwrap();

        command(&input, &output).execute().unwrap();
        let table = fs::read_to_string(&output).unwrap();
        assert_eq!(table, "first\tG-ATTACA\n1\t| ||xxx \nsecond\tGCATGCT-\n\t\n");
    }

    #[test]
    fn test_records_requires_two() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("three.fa");
        let output = dir.path().join("out.tsv");
        fs::write(&input, ">a\nACGT\n>b\nACGT\n>c\nACGT\n").unwrap();

        let err = command(&input, &output).records().unwrap_err();
        assert!(err.to_string().contains("Expected exactly two records"));
        assert!(command(&input, &output).execute().is_err());
    }

    #[test]
    fn test_execute_names_bad_record() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("bad.fa");
        let output = dir.path().join("out.tsv");
        fs::write(&input, ">good\nACGT\n>bad\nAC-GT\n").unwrap();

        let err = command(&input, &output).execute().unwrap_err();
        assert!(format!("{:#}", err).contains("bad"));
    }
}
