//! The resolution engine: from catalog plus API surface to a provider set.
//!
//! One run is a single pass over the endpoints. Every effective media type is
//! looked up in the index that matches the endpoint kind and direction, plus
//! the context-resolver index. The first effective wildcard stops the pass and
//! switches the run to the full catalog; there is no partial answer in that
//! case. Inputs are borrowed and nothing is shared between runs.

use crate::catalog::{
    CategorizedProviders, IndexKind, ProviderCatalog, ProviderId, categorize_providers,
};
use crate::config::ResolutionConfig;
use crate::diagnostics::{Diagnostic, collect_diagnostics};
use crate::endpoint::{Direction, Endpoint, EndpointKind, EndpointManifest};
use crate::error::Result;
use crate::inference::infer_providers;
use crate::media_resolver::EndpointMediaTypeResolver;
use crate::media_type::MediaType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Every provider id to register.
    pub providers: BTreeSet<ProviderId>,
    /// Caller-contributed and annotation-declared ids that were kept.
    pub contributed: BTreeSet<ProviderId>,
    /// Annotation-declared ids that were kept.
    pub annotated: BTreeSet<ProviderId>,
    pub use_full_catalog: bool,
    /// Registered ids that are also user-managed components.
    pub unremovable: BTreeSet<ProviderId>,
    /// What forced the full catalog, when it was forced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackTrigger>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

/// The endpoint and direction whose effective media type was the wildcard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackTrigger {
    pub endpoint: String,
    pub direction: String,
    pub index: String,
}

pub struct ResolutionEngine<'a> {
    catalog: &'a ProviderCatalog,
    manifest: &'a EndpointManifest,
    config: &'a ResolutionConfig,
    categorized: CategorizedProviders,
    media_types: EndpointMediaTypeResolver,
}

impl<'a> ResolutionEngine<'a> {
    /// Categorize the catalog and prepare a run.
    pub fn new(
        catalog: &'a ProviderCatalog,
        manifest: &'a EndpointManifest,
        config: &'a ResolutionConfig,
    ) -> Self {
        Self {
            catalog,
            manifest,
            config,
            categorized: categorize_providers(&catalog.providers),
            media_types: EndpointMediaTypeResolver::new(config.effective_json_default()),
        }
    }

    pub fn categorized(&self) -> &CategorizedProviders {
        &self.categorized
    }

    /// Run the resolution.
    ///
    /// Only conflicting configuration is an error; malformed media types are
    /// skipped where they are found.
    pub fn resolve(&self) -> Result<ResolutionResult> {
        let contributed_names = self.config.contributed()?;
        let diagnostics = collect_diagnostics(self.manifest, self.config);

        let mut providers: BTreeSet<ProviderId> = self.categorized.others.clone();
        providers.extend(self.config.always_register.iter().cloned());
        providers.extend(
            self.categorized
                .writers
                .get_possible(&MediaType::application_json()),
        );

        let fallback = self.collect_declared_providers(&mut providers);
        let use_full_catalog = fallback.is_some();

        // With the full catalog registered, names the catalog already holds
        // would be registered twice.
        let keep = |id: &ProviderId| !use_full_catalog || !self.catalog.contains(id);

        let annotated: BTreeSet<ProviderId> = self
            .manifest
            .annotated_providers
            .iter()
            .map(|name| ProviderId::new(name.as_str()))
            .filter(|id| keep(id))
            .collect();
        let mut contributed: BTreeSet<ProviderId> = contributed_names
            .into_iter()
            .filter(|id| keep(id))
            .collect();
        contributed.extend(annotated.iter().cloned());

        providers.extend(contributed.iter().cloned());
        if use_full_catalog {
            providers.extend(self.catalog.ids().cloned());
        }

        let json_resolvers: &[ProviderId] = if self.config.json_support_present {
            &self.config.json_context_resolvers
        } else {
            &[]
        };
        let unremovable: BTreeSet<ProviderId> = providers
            .iter()
            .filter(|id| {
                self.manifest.managed_components.contains(id.as_str())
                    || json_resolvers.contains(id)
            })
            .cloned()
            .collect();

        info!(
            providers = providers.len(),
            contributed = contributed.len(),
            unremovable = unremovable.len(),
            use_full_catalog,
            "provider resolution finished"
        );

        Ok(ResolutionResult {
            providers,
            contributed,
            annotated,
            use_full_catalog,
            unremovable,
            fallback,
            diagnostics,
        })
    }

    /// Accumulate providers for every endpoint; returns the trigger when an
    /// effective wildcard forces the full catalog.
    fn collect_declared_providers(
        &self,
        providers: &mut BTreeSet<ProviderId>,
    ) -> Option<FallbackTrigger> {
        for endpoint in &self.manifest.endpoints {
            let kind = self.manifest.kind_of(endpoint);
            let lookups = [
                (Direction::Consumes, body_index(kind, Direction::Consumes)),
                (Direction::Produces, body_index(kind, Direction::Produces)),
                (Direction::Consumes, IndexKind::ContextResolvers),
                (Direction::Produces, IndexKind::ContextResolvers),
            ];
            for (direction, index) in lookups {
                if let Some(trigger) = self.collect_for(endpoint, direction, index, providers) {
                    info!(
                        endpoint = %trigger.endpoint,
                        direction = %trigger.direction,
                        "wildcard media type; registering the full provider catalog"
                    );
                    return Some(trigger);
                }
            }
        }

        // Part types do not say which way they flow, so both sides are kept.
        for endpoint in &self.manifest.endpoints {
            for raw in &endpoint.part_types {
                match MediaType::parse(raw) {
                    Ok(part_type) => {
                        providers.extend(self.categorized.readers.get_possible(&part_type));
                        providers.extend(self.categorized.writers.get_possible(&part_type));
                    }
                    Err(err) => warn!(
                        endpoint = %endpoint.display_name(),
                        "skipping part type: {err}"
                    ),
                }
            }
        }
        None
    }

    fn collect_for(
        &self,
        endpoint: &Endpoint,
        direction: Direction,
        index_kind: IndexKind,
        providers: &mut BTreeSet<ProviderId>,
    ) -> Option<FallbackTrigger> {
        let effective = self.media_types.resolve(endpoint, direction);
        if effective.is_wildcard() {
            return Some(FallbackTrigger {
                endpoint: endpoint.display_name(),
                direction: direction.as_str().to_string(),
                index: index_kind.as_str().to_string(),
            });
        }

        let index = self.categorized.index(index_kind);
        for media_type in effective.media_types() {
            let possible = index.get_possible(&media_type);
            debug!(
                endpoint = %endpoint.display_name(),
                direction = direction.as_str(),
                index = index_kind.as_str(),
                media_type = %media_type,
                candidates = possible.len(),
                "looked up providers"
            );
            providers.extend(possible);
            providers.extend(infer_providers(&media_type, endpoint, index));
        }
        None
    }
}

/// Index consulted for an endpoint's body in `direction`.
///
/// A resource reads what it consumes and writes what it produces; a client
/// interface does the opposite.
fn body_index(kind: EndpointKind, direction: Direction) -> IndexKind {
    let resource_side = match direction {
        Direction::Consumes => IndexKind::Readers,
        Direction::Produces => IndexKind::Writers,
    };
    match kind {
        EndpointKind::Resource => resource_side,
        EndpointKind::Client => resource_side.inverse(),
    }
}

/// Convenience wrapper: build an engine and run it once.
pub fn resolve_providers(
    catalog: &ProviderCatalog,
    manifest: &EndpointManifest,
    config: &ResolutionConfig,
) -> Result<ResolutionResult> {
    ResolutionEngine::new(catalog, manifest, config).resolve()
}
