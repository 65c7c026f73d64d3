//! Chunked, line-wrapped tables of aligned sequences.
use itertools::Itertools;

use crate::{
    align::aligners::constants::GAP,
    error::{AlignError, Result},
};

/// Rows of cells, as handed to a spreadsheet or written as tab-separated lines.
pub type Table = Vec<Vec<String>>;

pub const TRACK_MATCH: u8 = b'|';
pub const TRACK_MISMATCH: u8 = b'x';
pub const TRACK_GAP: u8 = b' ';

/// The symbol track of two aligned strings: `|` for a match, `x` for a mismatch and a space for
/// a column with a gap.
pub fn symbol_track(x: &[u8], y: &[u8]) -> Vec<u8> {
    x.iter()
        .zip(y.iter())
        .map(|(&a, &b)| {
            if a == GAP || b == GAP {
                TRACK_GAP
            } else if a == b {
                TRACK_MATCH
            } else {
                TRACK_MISMATCH
            }
        })
        .collect()
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn separator() -> Vec<String> {
    vec![String::new(), String::new()]
}

/// Splits aligned strings into blocks of `chunk_size * chunks_per_line` columns.  Within a line
/// chunks of `chunk_size` symbols are joined by a single space; the last chunk and block may be
/// partial.  Every block is followed by an empty two-cell separator row.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Formatter {
    chunk_size: usize,
    chunks_per_line: usize,
}

impl Formatter {
    pub fn new(chunk_size: usize, chunks_per_line: usize) -> Result<Self> {
        if chunk_size == 0 || chunks_per_line == 0 {
            return Err(AlignError::invalid(format!(
                "chunk size ({}) and chunks per line ({}) must be positive",
                chunk_size, chunks_per_line
            )));
        }
        Ok(Self {
            chunk_size,
            chunks_per_line,
        })
    }

    /// The number of alignment columns per block.
    pub fn block_width(&self) -> usize {
        self.chunk_size * self.chunks_per_line
    }

    fn line(&self, columns: &[u8]) -> String {
        columns.chunks(self.chunk_size).map(text).join(" ")
    }

    /// The `[start, end)` column ranges of the blocks covering `len` columns.
    fn blocks(&self, len: usize) -> impl Iterator<Item = (usize, usize)> {
        let width = self.block_width();
        (0..len)
            .step_by(width)
            .map(move |start| (start, (start + width).min(len)))
    }

    /// One `[name, line]` row per aligned sequence per block.
    pub fn format_msa<N, S>(&self, names: &[N], rows: &[S]) -> Result<Table>
    where
        N: AsRef<str>,
        S: AsRef<[u8]>,
    {
        let len = check_lengths(rows.iter().map(AsRef::<[u8]>::as_ref))?;
        if names.len() != rows.len() {
            return Err(AlignError::invalid(format!(
                "{} names given for {} aligned sequences",
                names.len(),
                rows.len()
            )));
        }

        let mut table = Table::new();
        for (start, end) in self.blocks(len) {
            for (name, row) in names.iter().zip(rows.iter()) {
                table.push(vec![
                    name.as_ref().to_string(),
                    self.line(&row.as_ref()[start..end]),
                ]);
            }
            table.push(separator());
        }
        Ok(table)
    }

    /// Per block, the first sequence, the symbol track labelled with the 1-based column the
    /// block starts at, and the second sequence.
    pub fn format_pairwise(&self, names: (&str, &str), x: &[u8], y: &[u8]) -> Result<Table> {
        let len = check_lengths([x, y].into_iter())?;
        let track = symbol_track(x, y);

        let mut table = Table::new();
        for (start, end) in self.blocks(len) {
            table.push(vec![names.0.to_string(), self.line(&x[start..end])]);
            table.push(vec![(start + 1).to_string(), self.line(&track[start..end])]);
            table.push(vec![names.1.to_string(), self.line(&y[start..end])]);
            table.push(separator());
        }
        Ok(table)
    }
}

/// The shared length of the aligned strings, which must be non-empty and all equally long.
fn check_lengths<'a, I: Iterator<Item = &'a [u8]>>(mut rows: I) -> Result<usize> {
    let len = match rows.next() {
        Some(first) => first.len(),
        None => return Err(AlignError::invalid("no aligned sequences to format")),
    };
    if len == 0 {
        return Err(AlignError::invalid("aligned sequences are empty"));
    }
    for (k, row) in rows.enumerate() {
        if row.len() != len {
            return Err(AlignError::invalid(format!(
                "aligned sequence {} has length {}, expected {}",
                k + 2,
                row.len(),
                len
            )));
        }
    }
    Ok(len)
}

#[cfg(test)]
pub mod tests {
    use rstest::rstest;

    use crate::error::ErrorKind;

    use super::{symbol_track, Formatter, Table};

    fn row(a: &str, b: &str) -> Vec<String> {
        vec![a.to_string(), b.to_string()]
    }

    #[test]
    fn test_symbol_track() {
        assert_eq!(symbol_track(b"AC-GTA", b"ACTG-C"), b"|| | x");
    }

    #[test]
    fn test_format_msa() {
        let formatter = Formatter::new(3, 2).unwrap();
        let table = formatter
            .format_msa(&["s1", "s2"], &["ACGTACGT", "AC-TACG-"])
            .unwrap();
        let expected: Table = vec![
            row("s1", "ACG TAC"),
            row("s2", "AC- TAC"),
            row("", ""),
            row("s1", "GT"),
            row("s2", "G-"),
            row("", ""),
        ];
        assert_eq!(table, expected);
    }

    #[test]
    fn test_format_msa_exact_block() {
        let formatter = Formatter::new(2, 2).unwrap();
        let table = formatter.format_msa(&["a"], &["ACGT"]).unwrap();
        assert_eq!(table, vec![row("a", "AC GT"), row("", "")]);
    }

    #[test]
    fn test_format_pairwise() {
        let formatter = Formatter::new(2, 2).unwrap();
        let table = formatter
            .format_pairwise(("x", "y"), b"G-ATTACA", b"GCATGCT-")
            .unwrap();
        let expected: Table = vec![
            row("x", "G- AT"),
            row("1", "|  ||"),
            row("y", "GC AT"),
            row("", ""),
            row("x", "TA CA"),
            row("5", "xx x "),
            row("y", "GC T-"),
            row("", ""),
        ];
        assert_eq!(table, expected);
    }

    #[test]
    fn test_round_trip() {
        let aligned = ["G-ATTACA-----ACGTTTGCAGTAGC", "TTGA-CAT-ACGTAGCAGCTAGC-ACG"];
        for (chunk_size, chunks_per_line) in [(1, 1), (3, 2), (5, 5), (10, 5), (100, 1)] {
            let formatter = Formatter::new(chunk_size, chunks_per_line).unwrap();
            let table = formatter.format_msa(&["a", "b"], &aligned).unwrap();
            for (k, seq) in aligned.iter().enumerate() {
                let joined: String = table
                    .iter()
                    .filter(|r| r[0] == ["a", "b"][k])
                    .map(|r| r[1].replace(' ', ""))
                    .collect();
                assert_eq!(&joined, seq);
            }
        }
    }

    #[rstest]
    #[case(0, 5)]
    #[case(10, 0)]
    fn test_zero_sizes(#[case] chunk_size: usize, #[case] chunks_per_line: usize) {
        let err = Formatter::new(chunk_size, chunks_per_line).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_unequal_lengths() {
        let formatter = Formatter::new(10, 5).unwrap();
        let err = formatter
            .format_msa(&["a", "b"], &["ACGT", "ACG"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = formatter
            .format_pairwise(("a", "b"), b"ACGT", b"AC")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_no_rows() {
        let formatter = Formatter::new(10, 5).unwrap();
        let names: [&str; 0] = [];
        let rows: [&str; 0] = [];
        let err = formatter.format_msa(&names, &rows).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
