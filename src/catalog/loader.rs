//! Validated loading of provider catalogs.
//!
//! The loader checks the document against `schema/provider_catalog.schema.json`,
//! enforces the expected schema version, and rejects empty or duplicate
//! provider ids so the engine never sees an ambiguous catalog.

use crate::catalog::model::{ProviderCatalog, load_catalog_from_path};
use crate::schema_loader::{SchemaLoadOptions, load_json_schema, validate_against};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::BTreeSet;
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const DEFAULT_SCHEMA_VERSION: &str = "provider_catalog_v1";

const SCHEMA_OVERRIDE_ENV: &str = "PROVIDERSCOPE_CATALOG_SCHEMA";
const SCHEMA_RELATIVE_PATH: &str = "schema/provider_catalog.schema.json";

/// Load a catalog after schema and structural validation.
pub fn load_validated_catalog(path: &Path) -> Result<ProviderCatalog> {
    validate_against_schema(path)?;
    let catalog =
        load_catalog_from_path(path).with_context(|| format!("loading {}", path.display()))?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Structural checks that the schema cannot express.
pub fn validate_catalog(catalog: &ProviderCatalog) -> Result<()> {
    validate_schema_version(&catalog.schema_version.0)?;

    let mut seen = BTreeSet::new();
    for provider in &catalog.providers {
        if provider.id.0.trim().is_empty() {
            bail!("encountered provider with no id");
        }
        if !seen.insert(provider.id.clone()) {
            bail!("duplicate provider id {}", provider.id);
        }
    }
    Ok(())
}

pub fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from_iter([DEFAULT_SCHEMA_VERSION.to_string()])
}

fn validate_schema_version(schema_version: &str) -> Result<()> {
    if schema_version.is_empty() {
        bail!("schema_version must not be empty");
    }
    let allowed = allowed_schema_versions();
    if !allowed.contains(schema_version) {
        bail!(
            "schema_version '{}' not in allowed set {:?}",
            schema_version,
            allowed
        );
    }
    Ok(())
}

fn validate_against_schema(catalog_path: &Path) -> Result<()> {
    let catalog_file = File::open(catalog_path)
        .with_context(|| format!("opening catalog {}", catalog_path.display()))?;
    let catalog_value: Value = serde_json::from_reader(BufReader::new(catalog_file))
        .with_context(|| format!("parsing catalog {}", catalog_path.display()))?;

    let schema_path = catalog_schema_path();
    let allowed = allowed_schema_versions();
    let schema = load_json_schema(
        &schema_path,
        SchemaLoadOptions {
            allowed_versions: Some(&allowed),
            ..Default::default()
        },
    )
    .with_context(|| format!("loading catalog schema {}", schema_path.display()))?;

    validate_against(
        &schema.compiled,
        &catalog_value,
        &format!(
            "provider catalog {} ({})",
            catalog_path.display(),
            schema.schema_version
        ),
    )
}

/// Schema location: `PROVIDERSCOPE_CATALOG_SCHEMA` when set, else the copy
/// shipped with the crate.
pub fn catalog_schema_path() -> PathBuf {
    if let Ok(path) = env::var(SCHEMA_OVERRIDE_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(SCHEMA_RELATIVE_PATH)
}
