//! Configuration consumed by a resolution run.
//!
//! Values come from an optional JSON file, then `PROVIDERSCOPE_*` environment
//! overrides, then CLI flags applied by the binaries. None of these flags
//! change how media types are matched; they only pick defaults, add
//! caller-contributed providers, and gate diagnostics.

use crate::catalog::ProviderId;
use crate::error::{ResolveError, Result};
use crate::split_list;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

pub const CONFIG_PATH_ENV: &str = "PROVIDERSCOPE_CONFIG";
const JSON_DEFAULT_ENV: &str = "PROVIDERSCOPE_JSON_DEFAULT";
const JSON_SUPPORT_ENV: &str = "PROVIDERSCOPE_JSON_SUPPORT";
const REACTIVE_PRESENT_ENV: &str = "PROVIDERSCOPE_REACTIVE_PRESENT";
const CONTRIBUTED_ENV: &str = "PROVIDERSCOPE_CONTRIBUTED";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// JSON is the system-wide default content type. Has no effect unless
    /// `json_support_present` is also set.
    pub json_default: bool,
    /// A JSON provider family is installed.
    pub json_support_present: bool,
    /// Context resolvers of the installed JSON family; contributed whenever
    /// JSON support is present.
    pub json_context_resolvers: Vec<ProviderId>,
    /// Default JSON serializers; contributed when the JSON default is in
    /// effect.
    pub json_serializers: Vec<ProviderId>,
    /// Hypermedia (HAL) support is installed.
    pub hal_present: bool,
    /// A reactive/streaming capability is installed; only gates a warning.
    pub reactive_present: bool,
    /// Simple names of return types that need the reactive capability.
    pub reactive_return_types: Vec<String>,
    /// Registered on every run regardless of endpoints.
    pub always_register: Vec<ProviderId>,
    /// Provider names contributed from outside the catalog scan.
    pub contributed_providers: Vec<ProviderId>,
    /// Deprecated spelling of `contributed_providers`.
    pub extra_providers: Vec<ProviderId>,
    pub gzip: GzipConfig,
    /// Ids added from the environment or the command line. Merged after the
    /// `contributed_providers`/`extra_providers` conflict check.
    #[serde(skip)]
    pub override_providers: Vec<ProviderId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GzipConfig {
    pub enabled: bool,
    /// Filters and interceptors contributed when compression is enabled.
    pub providers: Vec<ProviderId>,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            json_default: false,
            json_support_present: false,
            json_context_resolvers: Vec::new(),
            json_serializers: Vec::new(),
            hal_present: false,
            reactive_present: false,
            reactive_return_types: ["Uni", "Multi", "GroupedMulti"]
                .into_iter()
                .map(String::from)
                .collect(),
            always_register: Vec::new(),
            contributed_providers: Vec::new(),
            extra_providers: Vec::new(),
            gzip: GzipConfig::default(),
            override_providers: Vec::new(),
        }
    }
}

impl ResolutionConfig {
    /// Read `path` (or defaults when `None`), then apply environment overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        use anyhow::Context;

        let mut config = match path {
            Some(path) => {
                let data = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&data)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => ResolutionConfig::default(),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| env::var(name).ok());
    }

    /// Apply `PROVIDERSCOPE_*` overrides using `lookup` to read variables.
    ///
    /// Boolean variables are true when non-empty and not `0`; list variables
    /// are comma- or whitespace-separated.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(JSON_DEFAULT_ENV) {
            self.json_default = flag_value(&value);
        }
        if let Some(value) = lookup(JSON_SUPPORT_ENV) {
            self.json_support_present = flag_value(&value);
        }
        if let Some(value) = lookup(REACTIVE_PRESENT_ENV) {
            self.reactive_present = flag_value(&value);
        }
        if let Some(value) = lookup(CONTRIBUTED_ENV) {
            self.override_providers
                .extend(split_list(&value).into_iter().map(ProviderId));
        }
    }

    /// Whether endpoints without a declaration default to JSON. Requires an
    /// installed JSON provider family.
    pub fn effective_json_default(&self) -> bool {
        self.json_default && self.json_support_present
    }

    /// Providers contributed from outside the catalog.
    ///
    /// Fails when both `contributed_providers` and the deprecated
    /// `extra_providers` are populated. Environment and command-line
    /// additions, gzip providers and the JSON family's context resolvers and
    /// serializers are appended afterwards.
    pub fn contributed(&self) -> Result<Vec<ProviderId>> {
        if !self.contributed_providers.is_empty() && !self.extra_providers.is_empty() {
            return Err(ResolveError::ConflictingConfiguration {
                message: "'contributed_providers' and 'extra_providers' cannot be used together; \
                          use the former as the latter is deprecated"
                    .to_string(),
            });
        }
        let mut contributed = if self.extra_providers.is_empty() {
            self.contributed_providers.clone()
        } else {
            self.extra_providers.clone()
        };
        contributed.extend(self.override_providers.iter().cloned());
        if self.gzip.enabled {
            contributed.extend(self.gzip.providers.iter().cloned());
        }
        if self.json_support_present {
            contributed.extend(self.json_context_resolvers.iter().cloned());
        }
        if self.effective_json_default() {
            contributed.extend(self.json_serializers.iter().cloned());
        }
        Ok(contributed)
    }

    /// Whether `return_type` names a reactive type, by simple name.
    pub fn is_reactive_type(&self, return_type: &str) -> bool {
        let simple = return_type
            .split('<')
            .next()
            .unwrap_or(return_type)
            .rsplit('.')
            .next()
            .unwrap_or(return_type)
            .trim();
        self.reactive_return_types.iter().any(|t| t == simple)
    }
}

fn flag_value(value: &str) -> bool {
    !value.trim().is_empty() && value.trim() != "0"
}
