pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{command::Command, msa::Msa, pairwise::Pairwise, tree::Tree};
use enum_dispatch::enum_dispatch;
use env_logger::Env;
use log::error;
use progalign::util::version::built_info;

#[derive(Parser, Debug)]
#[command(version = built_info::VERSION.as_str())]
struct Args {
    #[clap(subcommand)]
    subcommand: Subcommand,
}

#[enum_dispatch(Command)]
#[derive(Parser, Debug)]
#[command(version = built_info::VERSION.as_str())]
enum Subcommand {
    Pairwise(Pairwise),
    Msa(Msa),
    GuideTree(Tree),
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args: Args = Args::parse();
    if let Err(err) = args.subcommand.execute() {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
