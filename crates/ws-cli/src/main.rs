//! Warehouse Sync CLI - inspect type mappings and render load SQL

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{diff, kind, merge};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Kind(args) => kind::execute(args, &cli.global),
        cli::Commands::Merge(args) => merge::execute(args, &cli.global),
        cli::Commands::Diff(args) => diff::execute(args, &cli.global),
    }
}
