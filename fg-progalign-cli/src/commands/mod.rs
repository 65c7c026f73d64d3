pub mod command;
pub mod msa;
pub mod options;
pub mod pairwise;
pub mod tree;
