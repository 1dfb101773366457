//! Kind command implementation

use anyhow::{bail, Result};
use serde::Serialize;
use ws_core::Dialect;
use ws_typing::{kind_from_dwh_type, kind_to_dwh_type};

use crate::cli::{GlobalArgs, KindArgs, OutputFormat};

/// How one warehouse type is understood and re-rendered.
#[derive(Debug, Serialize)]
pub(crate) struct KindReport {
    pub input: String,
    pub dialect: String,
    pub kind: String,
    pub types: Vec<DialectType>,
}

/// Column type a kind renders to on one destination
#[derive(Debug, Serialize)]
pub(crate) struct DialectType {
    pub dialect: String,
    pub data_type: Option<String>,
}

/// Execute the kind command
pub fn execute(args: &KindArgs, global: &GlobalArgs) -> Result<()> {
    let report = build_report(&args.data_type, args.dialect)?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            if global.verbose {
                println!("{} type: {}", report.dialect, report.input);
            }
            println!("kind: {}", report.kind);
            for entry in &report.types {
                println!(
                    "  {:<10} {}",
                    entry.dialect,
                    entry.data_type.as_deref().unwrap_or("-")
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn build_report(data_type: &str, dialect: Dialect) -> Result<KindReport> {
    let kind = kind_from_dwh_type(dialect, data_type);
    if kind.is_invalid() {
        bail!("'{}' is not a recognized {} type", data_type, dialect);
    }

    let types = Dialect::ALL
        .iter()
        .map(|d| DialectType {
            dialect: d.name().to_string(),
            data_type: kind_to_dwh_type(&kind, *d),
        })
        .collect();

    Ok(KindReport {
        input: data_type.to_string(),
        dialect: dialect.name().to_string(),
        kind: kind.to_string(),
        types,
    })
}

#[cfg(test)]
#[path = "kind_test.rs"]
mod tests;
