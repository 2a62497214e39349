use clap::Parser;
use env_logger::Env;
use seqcompare::util::version::built_info;

pub mod commands;

use anyhow::Result;
use commands::{command::Command, compare::Compare};
use enum_dispatch::enum_dispatch;

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
    Compare(Compare),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args: Args = Args::parse();
    args.subcommand.execute()
}
