use anyhow::Result;
use clap::builder::PossibleValue;
use enum_dispatch::enum_dispatch;
use progalign::{align::MergeOrder, util::sequence::Alphabet};
use std::{fmt::Display, str::FromStr};

/// A subcommand of the `progalign` binary.
#[enum_dispatch]
pub trait Command {
    #[allow(clippy::missing_errors_doc)]
    fn execute(&self) -> Result<()>;
}

/// An enum option whose values are listed on the command line by their `Display` form.
pub trait ValueEnum: Display + FromStr {
    fn variants<'a>() -> &'a [Self];

    fn possible_values() -> Vec<PossibleValue> {
        Self::variants()
            .iter()
            .map(|variant| PossibleValue::new(variant.to_string()))
            .collect()
    }
}

impl ValueEnum for MergeOrder {
    fn variants<'a>() -> &'a [Self] {
        &[Self::Greedy, Self::GuideTree]
    }
}

impl ValueEnum for Alphabet {
    fn variants<'a>() -> &'a [Self] {
        &[Self::Any, Self::Dna, Self::Iupac, Self::Protein]
    }
}
