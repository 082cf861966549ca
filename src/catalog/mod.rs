//! Provider catalog wiring.
//!
//! This module wraps the JSON catalog of discoverable providers so callers can
//! load a validated snapshot and split it into per-capability media type
//! indexes. `categorize_providers` is the entry point the resolution engine
//! uses; `load_validated_catalog` is what binaries call.

pub mod categorize;
pub mod identity;
pub mod loader;
pub mod media_index;
pub mod model;

pub use categorize::{CategorizedProviders, IndexKind, categorize_providers};
pub use identity::{CatalogKey, ProviderCapability, ProviderId};
pub use loader::{load_validated_catalog, validate_catalog};
pub use media_index::MediaTypeIndex;
pub use model::{ProviderCatalog, ProviderEntry};

pub use model::load_catalog_from_path;
