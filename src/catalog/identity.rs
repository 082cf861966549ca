use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Versioned key for a provider catalog (e.g., `provider_catalog_v1`).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogKey(pub String);

/// Stable, unique identifier of a provider (usually its fully qualified name).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(pub String);

impl ProviderId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Declared capability of a provider.
///
/// The three recognized variants drive media-type indexing; `Other` keeps
/// catalogs that list extra roles (filters, interceptors, ...) loadable. A
/// provider whose capabilities are all `Other` is never media-type gated.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ProviderCapability {
    Reader,
    Writer,
    ContextResolver,
    Other(String),
}

impl ProviderCapability {
    pub fn as_str(&self) -> &str {
        match self {
            ProviderCapability::Reader => "reader",
            ProviderCapability::Writer => "writer",
            ProviderCapability::ContextResolver => "context_resolver",
            ProviderCapability::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "reader" => ProviderCapability::Reader,
            "writer" => ProviderCapability::Writer,
            "context_resolver" => ProviderCapability::ContextResolver,
            other => ProviderCapability::Other(other.to_string()),
        }
    }

    /// Capabilities that place a provider into a media-type index.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, ProviderCapability::Other(_))
    }
}

impl Serialize for ProviderCapability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProviderCapability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}
