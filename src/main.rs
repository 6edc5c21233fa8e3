use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use inventory_check::{parse_date, report, Inventory};

/// Check an inventory file for low stock or soon-to-expire products.
///
/// The file is `name,code,quantity,expiration` with a header line. It is
/// re-read on every run.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Inventory file to load.
    file: PathBuf,

    /// How to print the result.
    #[arg(long, value_enum, default_value_t = Format::Table, global = true)]
    format: Format,

    #[command(subcommand)]
    query: Query,
}

#[derive(Debug, Subcommand)]
enum Query {
    /// Products with fewer items left than THRESHOLD.
    LowQuantity {
        #[arg(allow_negative_numbers = true)]
        threshold: i64,
    },
    /// Products expiring before DATE (YYYY-MM-DD).
    Expiring {
        #[arg(value_parser = cutoff_date)]
        date: NaiveDate,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn cutoff_date(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| {
        format!("invalid date {s:?}: must be YYYY-MM-DD, including the hyphens, e.g. 2020-01-01")
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let inventory = Inventory::load(&cli.file)
        .with_context(|| format!("loading {}", cli.file.display()))?;

    let output = match cli.query {
        Query::LowQuantity { threshold } => {
            let view = inventory.low_quantity(threshold);
            log::debug!("{} of {} records below {threshold}", view.len(), inventory.len());
            match cli.format {
                Format::Table => report::low_quantity_table(&view),
                Format::Json => report::to_json(&view).context("encoding JSON")?,
            }
        }
        Query::Expiring { date } => {
            let view = inventory
                .expiring_before(date)
                .with_context(|| format!("checking expiration dates in {}", cli.file.display()))?;
            log::debug!("{} of {} records expire before {date}", view.len(), inventory.len());
            match cli.format {
                Format::Table => report::expiring_table(&view),
                Format::Json => report::to_json(&view).context("encoding JSON")?,
            }
        }
    };

    print!("{output}");
    if cli.format == Format::Json {
        println!();
    }
    Ok(())
}
