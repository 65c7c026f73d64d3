use crate::{
    align::format::Table,
    util::io::{is_fasta_path, is_gzip_path},
};
use anyhow::{Context, Result};
use bio::io::fasta::Reader as FastaReader;
use derive_getters::Getters;
use flate2::bufread::MultiGzDecoder;
use itertools::Itertools;
use log::info;
use serde::Serialize;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

/// 128 KB default buffer size, same as pigz.
pub const GZ_BUFSIZE: usize = 64 * (1 << 10) * 2;

/// A named, not yet normalized, input sequence.
#[derive(Clone, Debug, PartialEq, Eq, Getters, Serialize)]
pub struct SequenceRecord {
    pub name: String,
    pub seq: String,
}

impl SequenceRecord {
    pub fn new<N: Into<String>, S: Into<String>>(name: N, seq: S) -> Self {
        Self {
            name: name.into(),
            seq: seq.into(),
        }
    }
}

/// Opens the file, or standard input when the path is `-`, decompressing it when it has a GZIP
/// extension or `decompress` is set and it does not have a plain FASTA extension.
fn open_input(file: &Path, decompress: bool) -> Result<Box<dyn Read>> {
    let raw_handle = if file.as_os_str() == "-" {
        Box::new(std::io::stdin()) as Box<dyn Read>
    } else {
        let handle = File::open(file)
            .with_context(|| format!("Error opening input: {}", file.display()))?;
        Box::new(handle) as Box<dyn Read>
    };
    let buf_handle = BufReader::with_capacity(GZ_BUFSIZE, raw_handle);
    let is_gzip = is_gzip_path(&file) || (!is_fasta_path(&file) && decompress);
    if is_gzip {
        Ok(Box::new(MultiGzDecoder::new(buf_handle)) as Box<dyn Read>)
    } else {
        Ok(Box::new(buf_handle) as Box<dyn Read>)
    }
}

/// Reads every record of a FASTA file.  Record names are the first word of the header line.
pub fn read_fasta(file: &Path, decompress: bool) -> Result<Vec<SequenceRecord>> {
    let reader = FastaReader::new(open_input(file, decompress)?);
    let records: Vec<SequenceRecord> = reader
        .records()
        .map(|result| {
            result
                .map(|record| {
                    SequenceRecord::new(record.id(), String::from_utf8_lossy(record.seq()))
                })
                .with_context(|| format!("Error reading FASTA record from: {}", file.display()))
        })
        .collect::<Result<_>>()?;
    info!("Read {} records from {}", records.len(), file.display());
    Ok(records)
}

/// Opens a buffered writer to the file, or to standard output when no path (or `-`) is given.
pub fn open_output(file: Option<&Path>) -> Result<Box<dyn Write>> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            let handle = File::create(path)
                .with_context(|| format!("Error creating output: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(handle)))
        }
        _ => Ok(Box::new(BufWriter::new(std::io::stdout()))),
    }
}

/// Writes each row of the table as one line of tab-separated cells.
pub fn write_table<W: Write + ?Sized>(writer: &mut W, table: &Table) -> Result<()> {
    for row in table {
        writeln!(writer, "{}", row.iter().join("\t")).context("Error writing table row")?;
    }
    writer.flush().context("Error flushing output")?;
    Ok(())
}
