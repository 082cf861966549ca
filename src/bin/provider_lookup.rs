//! Print the catalog providers that may handle one media type.
//!
//! Usage:
//!   provider-lookup --catalog catalog.json --index writers application/json
//!   provider-lookup --index readers --json 'text/event-stream;element-type=text/plain'
//!
//! One provider id per line, sorted, or a JSON array with `--json`.

use anyhow::{Context, Result};
use clap::Parser;
use providerscope::logging::init_logging;
use providerscope::{
    CATALOG_PATH_ENV, IndexKind, MediaType, categorize_providers, load_validated_catalog,
    resolve_input_path,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "provider-lookup")]
#[command(about = "List catalog providers for a media type")]
struct Cli {
    /// Provider catalog; defaults to $PROVIDERSCOPE_CATALOG.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Index to query.
    #[arg(
        long,
        default_value = "writers",
        value_parser = ["readers", "writers", "context_resolvers"]
    )]
    index: String,
    /// Emit a JSON array instead of one id per line.
    #[arg(long)]
    json: bool,
    /// Log level when PROVIDERSCOPE_LOG is unset.
    #[arg(long)]
    log_level: Option<String>,
    /// Media type to look up, e.g. `application/json` or `text/*`.
    media_type: String,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    let kind = IndexKind::try_from(cli.index.as_str())?;
    let media_type = MediaType::parse(&cli.media_type)
        .with_context(|| format!("parsing media type argument '{}'", cli.media_type))?;
    let catalog_path = resolve_input_path(cli.catalog.as_deref(), CATALOG_PATH_ENV, "catalog")?;
    let catalog = load_validated_catalog(&catalog_path)?;

    let categorized = categorize_providers(&catalog.providers);
    let providers = categorized.index(kind).get_possible(&media_type);

    if cli.json {
        let rendered =
            serde_json::to_string_pretty(&providers).context("serializing provider list")?;
        println!("{rendered}");
    } else {
        for provider in &providers {
            println!("{provider}");
        }
    }
    Ok(())
}
