//! Clean-up and validation of raw sequences before they reach the aligner.
use anyhow::anyhow;
use bio::alphabets::{dna, protein, Alphabet as BioAlphabet};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::{
    align::aligners::constants::GAP,
    error::{AlignError, Result},
};

/// The symbols a normalized sequence may contain.
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
pub enum Alphabet {
    /// Any printable ASCII symbol other than the gap symbol.
    #[default]
    Any,
    /// `ACGTN`
    Dna,
    /// The IUPAC nucleotide codes.
    Iupac,
    /// The IUPAC amino acid codes.
    Protein,
}

impl Alphabet {
    fn symbols(self) -> Option<BioAlphabet> {
        match self {
            Self::Any => None,
            Self::Dna => Some(dna::n_alphabet()),
            Self::Iupac => Some(dna::iupac_alphabet()),
            Self::Protein => Some(protein::iupac_alphabet()),
        }
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Dna => write!(f, "dna"),
            Self::Iupac => write!(f, "iupac"),
            Self::Protein => write!(f, "protein"),
        }
    }
}

impl FromStr for Alphabet {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" => Ok(Alphabet::Any),
            "dna" | "nucleotide" => Ok(Alphabet::Dna),
            "iupac" => Ok(Alphabet::Iupac),
            "protein" | "aa" => Ok(Alphabet::Protein),
            _ => Err(anyhow!("Invalid alphabet: {}", s)),
        }
    }
}

/// The name given to the sequence at the (0-based) `index` when the caller supplies none.
pub fn default_name(index: usize) -> String {
    format!("Seq{}", index + 1)
}

/// Strips all whitespace from `raw`, upper-cases it, and checks that the result is a non-empty
/// word over `alphabet` that does not contain the gap symbol.
pub fn normalize(raw: &str, alphabet: Alphabet) -> Result<Vec<u8>> {
    let mut seq = Vec::with_capacity(raw.len());
    for c in raw.chars().filter(|c| !c.is_whitespace()) {
        if !c.is_ascii() {
            return Err(AlignError::invalid(format!(
                "non-ASCII symbol '{c}' in sequence"
            )));
        }
        seq.push(c.to_ascii_uppercase() as u8);
    }

    if seq.is_empty() {
        return Err(AlignError::invalid("empty sequence"));
    }
    if let Some(position) = seq.iter().position(|&b| b == GAP) {
        return Err(AlignError::invalid(format!(
            "gap symbol '{}' at position {} of a raw sequence",
            GAP as char,
            position + 1
        )));
    }
    if let Some(symbols) = alphabet.symbols() {
        if let Some(&bad) = seq.iter().find(|&&b| !symbols.is_word(&[b])) {
            return Err(AlignError::invalid(format!(
                "symbol '{}' is not in the {} alphabet",
                bad as char, alphabet
            )));
        }
    }
    Ok(seq)
}
