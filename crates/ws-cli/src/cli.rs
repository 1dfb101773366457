//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use ws_core::Dialect;

/// Warehouse Sync - inspect warehouse type mappings and render load SQL
#[derive(Parser, Debug)]
#[command(name = "ws")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a warehouse column type and show its kind per dialect
    Kind(KindArgs),

    /// Render the load statements described by a YAML file
    Merge(MergeArgs),

    /// Diff source and target columns and print the ALTER TABLE statements
    Diff(DiffArgs),
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

/// Arguments for the kind command
#[derive(Args, Debug)]
pub struct KindArgs {
    /// Warehouse type as reported by the warehouse, e.g. `NUMBER(10,2)`
    pub data_type: String,

    /// Dialect that reported the type
    #[arg(short, long, value_enum, default_value = "snowflake")]
    pub dialect: Dialect,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the merge command
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// YAML file describing the merge
    pub file: PathBuf,

    /// Override the dialect named in the file
    #[arg(short, long, value_enum)]
    pub dialect: Option<Dialect>,

    /// Parse the rendered SQL and fail if the dialect parser rejects it
    #[arg(long)]
    pub check: bool,
}

/// Arguments for the diff command
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// YAML file with the source and target column sets
    pub file: PathBuf,

    /// Override the dialect named in the file
    #[arg(short, long, value_enum)]
    pub dialect: Option<Dialect>,

    /// Also drop target columns the source no longer has
    #[arg(long)]
    pub drop: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
