//! Resolve the provider set for an API surface.
//!
//! Usage:
//!   resolve-providers --catalog catalog.json --endpoints endpoints.json
//!   resolve-providers --catalog catalog.json --endpoints endpoints.json --json-default
//!   PROVIDERSCOPE_CATALOG=catalog.json resolve-providers --endpoints endpoints.json
//!
//! Prints the resolution result as JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use providerscope::config::CONFIG_PATH_ENV;
use providerscope::endpoint::load_manifest_from_path;
use providerscope::logging::init_logging;
use providerscope::{
    CATALOG_PATH_ENV, ENDPOINTS_PATH_ENV, ProviderId, ResolutionConfig, ResolutionEngine,
    load_validated_catalog, resolve_input_path,
};
use std::env;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "resolve-providers")]
#[command(about = "Decide which serialization providers an API surface needs")]
struct Cli {
    /// Provider catalog; defaults to $PROVIDERSCOPE_CATALOG.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Endpoint manifest; defaults to $PROVIDERSCOPE_ENDPOINTS.
    #[arg(long)]
    endpoints: Option<PathBuf>,
    /// Resolution config; defaults to $PROVIDERSCOPE_CONFIG when set.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Treat JSON as the default content type.
    #[arg(long)]
    json_default: bool,
    /// A JSON provider family is installed.
    #[arg(long)]
    json_support: bool,
    /// A reactive capability is installed.
    #[arg(long)]
    reactive_present: bool,
    /// Extra provider id to register; repeatable.
    #[arg(long = "contribute", value_name = "ID")]
    contribute: Vec<String>,
    /// Log level when PROVIDERSCOPE_LOG is unset.
    #[arg(long)]
    log_level: Option<String>,
    /// Print compact JSON instead of pretty JSON.
    #[arg(long)]
    compact: bool,
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

    let catalog_path = resolve_input_path(cli.catalog.as_deref(), CATALOG_PATH_ENV, "catalog")?;
    let endpoints_path =
        resolve_input_path(cli.endpoints.as_deref(), ENDPOINTS_PATH_ENV, "endpoint manifest")?;
    let config_path = cli.config.clone().or_else(|| {
        env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
    });

    let catalog = load_validated_catalog(&catalog_path)?;
    let manifest = load_manifest_from_path(&endpoints_path)?;
    let mut config = ResolutionConfig::load(config_path.as_deref())?;
    apply_cli_flags(&cli, &mut config);

    let result = ResolutionEngine::new(&catalog, &manifest, &config)
        .resolve()
        .context("resolving providers")?;

    let rendered = if cli.compact {
        serde_json::to_string(&result)
    } else {
        serde_json::to_string_pretty(&result)
    }
    .context("serializing resolution result")?;
    println!("{rendered}");
    Ok(())
}

fn apply_cli_flags(cli: &Cli, config: &mut ResolutionConfig) {
    config.json_default |= cli.json_default;
    config.json_support_present |= cli.json_support;
    config.reactive_present |= cli.reactive_present;
    config
        .override_providers
        .extend(cli.contribute.iter().map(ProviderId::new));
}
