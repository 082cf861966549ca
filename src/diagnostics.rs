//! Warnings about capabilities the API surface needs but the build lacks.
//!
//! Diagnostics never change the resolved provider set. They are logged when
//! collected and copied into the result for tooling.

use crate::config::ResolutionConfig;
use crate::endpoint::{Direction, Endpoint, EndpointManifest};
use crate::media_type::{
    APPLICATION_HAL_JSON, APPLICATION_JSON, APPLICATION_JSON_PATCH_JSON, MediaType,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Endpoints declare JSON but no JSON provider family is installed.
    MissingJsonSupport { message: String },
    /// Endpoints return reactive types but the reactive capability is absent.
    MissingReactiveSupport {
        message: String,
        endpoints: Vec<String>,
    },
}

impl Diagnostic {
    pub fn message(&self) -> &str {
        match self {
            Diagnostic::MissingJsonSupport { message } => message,
            Diagnostic::MissingReactiveSupport { message, .. } => message,
        }
    }
}

/// Collect and log every diagnostic that applies to `manifest`.
pub fn collect_diagnostics(
    manifest: &EndpointManifest,
    config: &ResolutionConfig,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if !config.json_support_present && json_support_needed(manifest, config) {
        diagnostics.push(Diagnostic::MissingJsonSupport {
            message: "endpoints declare JSON media types but no JSON provider family is \
                      installed; JSON bodies will not be serialized"
                .to_string(),
        });
    }

    if !config.reactive_present {
        let endpoints: Vec<String> = manifest
            .endpoints
            .iter()
            .filter(|endpoint| {
                endpoint
                    .return_type
                    .as_deref()
                    .is_some_and(|ty| config.is_reactive_type(ty))
            })
            .map(Endpoint::display_name)
            .collect();
        if !endpoints.is_empty() {
            diagnostics.push(Diagnostic::MissingReactiveSupport {
                message: format!(
                    "endpoints return reactive types but reactive support is not installed; \
                     they will not behave as expected: {}",
                    endpoints.join(", ")
                ),
                endpoints,
            });
        }
    }

    for diagnostic in &diagnostics {
        warn!("{}", diagnostic.message());
    }
    diagnostics
}

fn json_support_needed(manifest: &EndpointManifest, config: &ResolutionConfig) -> bool {
    let json_types = [APPLICATION_JSON, APPLICATION_JSON_PATCH_JSON];
    manifest.endpoints.iter().any(|endpoint| {
        let mentions_json = endpoint
            .all_declared(Direction::Consumes)
            .chain(endpoint.all_declared(Direction::Produces))
            .chain(endpoint.element_type.iter())
            .chain(endpoint.part_types.iter())
            .any(|raw| is_one_of(raw, &json_types));
        let mentions_hal = config.hal_present
            && endpoint
                .all_declared(Direction::Produces)
                .any(|raw| is_one_of(raw, &[APPLICATION_HAL_JSON]));
        mentions_json || mentions_hal
    })
}

fn is_one_of(raw: &str, candidates: &[&str]) -> bool {
    let Ok(declared) = MediaType::parse(raw) else {
        return false;
    };
    candidates.iter().any(|candidate| {
        MediaType::parse(candidate).is_ok_and(|candidate| candidate.matches(&declared))
    })
}
