//! Shared library for the providerscope resolver.
//!
//! Given a catalog of discoverable serialization providers and a description
//! of an application's HTTP API surface, the crate decides which providers
//! must be registered for the media types that surface can actually exchange.
//! When any endpoint can exchange every media type the answer is the full
//! catalog instead. The binaries under `src/bin` are thin wrappers over
//! [`resolution::ResolutionEngine`] and the catalog loaders.

use anyhow::{Result, bail};
use std::{
    env,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod endpoint;
pub mod error;
pub mod inference;
pub mod logging;
pub mod media_resolver;
pub mod media_type;
pub mod resolution;
pub(crate) mod schema_loader;
pub mod verb_policy;

pub use catalog::{
    CategorizedProviders, IndexKind, MediaTypeIndex, ProviderCapability, ProviderCatalog,
    ProviderEntry, ProviderId, categorize_providers, load_catalog_from_path,
    load_validated_catalog,
};
pub use config::ResolutionConfig;
pub use diagnostics::Diagnostic;
pub use endpoint::{Direction, Endpoint, EndpointKind, EndpointManifest, HttpVerb};
pub use error::ResolveError;
pub use media_resolver::{EffectiveMediaTypes, EndpointMediaTypeResolver};
pub use media_type::MediaType;
pub use resolution::{ResolutionEngine, ResolutionResult, resolve_providers};

pub const CATALOG_PATH_ENV: &str = "PROVIDERSCOPE_CATALOG";
pub const ENDPOINTS_PATH_ENV: &str = "PROVIDERSCOPE_ENDPOINTS";

/// Pick an input document path: the CLI value if given, else `env_var`.
///
/// The path must name an existing file; callers treat failure as fatal.
pub fn resolve_input_path(cli: Option<&Path>, env_var: &str, label: &str) -> Result<PathBuf> {
    let candidate = match cli {
        Some(path) => path.to_path_buf(),
        None => match env::var(env_var) {
            Ok(value) if !value.trim().is_empty() => PathBuf::from(value.trim()),
            _ => bail!("no {label} given; pass it on the command line or set {env_var}"),
        },
    };
    if !candidate.is_file() {
        bail!("{label} {} does not exist", candidate.display());
    }
    Ok(candidate)
}

/// Split comma- or whitespace-delimited configuration lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
