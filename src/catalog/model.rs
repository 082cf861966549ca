//! Deserializable representation of a provider catalog document.
//!
//! Media types stay raw strings here: a malformed declaration must not reject
//! the whole catalog, so parsing happens during categorization where bad
//! entries are skipped one at a time. Use `loader::load_validated_catalog`
//! when schema and uniqueness checks are wanted.

use crate::catalog::identity::{CatalogKey, ProviderCapability, ProviderId};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Full provider catalog as stored on disk.
pub struct ProviderCatalog {
    pub schema_version: CatalogKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub providers: Vec<ProviderEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// One discoverable provider and its statically declared metadata.
///
/// `consumes` applies to the reader capability, `produces` to the writer and
/// context-resolver capabilities. An empty list means "every media type".
pub struct ProviderEntry {
    pub id: ProviderId,
    #[serde(default)]
    pub capabilities: BTreeSet<ProviderCapability>,
    #[serde(default)]
    pub consumes: Vec<String>,
    #[serde(default)]
    pub produces: Vec<String>,
}

impl ProviderEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ProviderId::new(id),
            capabilities: BTreeSet::new(),
            consumes: Vec::new(),
            produces: Vec::new(),
        }
    }

    pub fn with_capability(mut self, capability: ProviderCapability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn consuming(mut self, media_types: &[&str]) -> Self {
        self.consumes = media_types.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn producing(mut self, media_types: &[&str]) -> Self {
        self.produces = media_types.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn has(&self, capability: &ProviderCapability) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn is_reader(&self) -> bool {
        self.has(&ProviderCapability::Reader)
    }

    pub fn is_writer(&self) -> bool {
        self.has(&ProviderCapability::Writer)
    }

    pub fn is_context_resolver(&self) -> bool {
        self.has(&ProviderCapability::ContextResolver)
    }
}

impl ProviderCatalog {
    pub fn new(schema_version: impl Into<String>, providers: Vec<ProviderEntry>) -> Self {
        Self {
            schema_version: CatalogKey(schema_version.into()),
            description: None,
            providers,
        }
    }

    /// Every provider id in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &ProviderId> {
        self.providers.iter().map(|provider| &provider.id)
    }

    pub fn contains(&self, id: &ProviderId) -> bool {
        self.providers.iter().any(|provider| &provider.id == id)
    }
}

/// Read and parse a provider catalog from disk without additional validation.
pub fn load_catalog_from_path(path: &Path) -> Result<ProviderCatalog> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading catalog {}", path.display()))?;
    let catalog: ProviderCatalog = serde_json::from_str(&data)
        .with_context(|| format!("parsing catalog {}", path.display()))?;
    Ok(catalog)
}
