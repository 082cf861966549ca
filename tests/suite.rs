// Library-level scenarios: catalog loading, categorization and end-to-end
// resolution over JSON documents shaped like the ones the binaries read.
mod support;

use anyhow::{Context, Result};
use providerscope::{
    Diagnostic, EndpointManifest, IndexKind, MediaType, ProviderCatalog, ProviderId,
    ResolutionConfig, ResolutionEngine, ResolveError, categorize_providers,
    load_validated_catalog, resolve_providers,
};
use serde_json::{Value, json};
use std::collections::BTreeSet;
use support::{Fixture, get_endpoint_without_produces, sample_catalog, write_json};
use tempfile::TempDir;

fn ids(raw: &[&str]) -> BTreeSet<ProviderId> {
    raw.iter().map(|id| ProviderId::new(*id)).collect()
}

fn catalog_from(value: Value) -> Result<ProviderCatalog> {
    serde_json::from_value(value).context("parsing catalog fixture")
}

fn manifest_from(value: Value) -> Result<EndpointManifest> {
    serde_json::from_value(value).context("parsing manifest fixture")
}

fn json_default() -> ResolutionConfig {
    ResolutionConfig {
        json_default: true,
        json_support_present: true,
        ..Default::default()
    }
}

#[test]
fn json_provider_is_found_by_exact_and_wildcard_queries() -> Result<()> {
    let catalog = catalog_from(sample_catalog())?;
    let categorized = categorize_providers(&catalog.providers);
    let json = MediaType::application_json();
    let any = MediaType::wildcard();
    for kind in [IndexKind::Readers, IndexKind::Writers] {
        let index = categorized.index(kind);
        assert!(index.get_possible(&json).contains(&ProviderId::new("P1")));
        assert!(index.get_possible(&any).contains(&ProviderId::new("P1")));
    }
    assert!(categorized.others.is_empty());
    Ok(())
}

#[test]
fn get_without_produces_uses_json_default() -> Result<()> {
    let catalog = catalog_from(sample_catalog())?;
    let manifest = manifest_from(get_endpoint_without_produces())?;
    let result = resolve_providers(&catalog, &manifest, &json_default())?;
    assert!(!result.use_full_catalog);
    assert_eq!(result.providers, ids(&["P1"]));
    Ok(())
}

#[test]
fn get_without_produces_falls_back_without_json_default() -> Result<()> {
    let catalog = catalog_from(sample_catalog())?;
    let manifest = manifest_from(get_endpoint_without_produces())?;
    let result = resolve_providers(&catalog, &manifest, &ResolutionConfig::default())?;
    assert!(result.use_full_catalog);
    assert_eq!(result.providers, ids(&["P1", "P2", "P3"]));
    let trigger = result.fallback.context("fallback trigger")?;
    assert_eq!(trigger.endpoint, "acme.Greeting{hello}");
    assert_eq!(trigger.direction, "produces");
    Ok(())
}

#[test]
fn json_default_needs_an_installed_json_family() -> Result<()> {
    let catalog = catalog_from(json!({
        "schema_version": "provider_catalog_v1",
        "providers": [{"id": "TextWriter", "capabilities": ["writer"], "produces": ["text/plain"]}]
    }))?;
    let manifest = manifest_from(get_endpoint_without_produces())?;
    let config = ResolutionConfig {
        json_default: true,
        ..Default::default()
    };
    let result = resolve_providers(&catalog, &manifest, &config)?;
    assert!(result.use_full_catalog);
    assert_eq!(result.providers, ids(&["TextWriter"]));
    Ok(())
}

#[test]
fn declared_wildcard_forces_full_catalog_even_with_json_default() -> Result<()> {
    let catalog = catalog_from(sample_catalog())?;
    let manifest = manifest_from(json!({
        "endpoints": [
            {"verb": "PUT", "declaring_type": "acme.Docs", "method": "store",
             "consumes": ["*/*"], "produces": ["text/plain"]}
        ]
    }))?;
    let result = resolve_providers(&catalog, &manifest, &json_default())?;
    assert!(result.use_full_catalog);
    assert_eq!(result.providers, ids(&["P1", "P2", "P3"]));
    Ok(())
}

#[test]
fn event_stream_pulls_in_element_type_providers() -> Result<()> {
    let mut catalog = sample_catalog();
    catalog["providers"]
        .as_array_mut()
        .context("providers array")?
        .push(json!({"id": "SSE", "capabilities": ["writer"], "produces": ["text/event-stream"]}));
    let catalog = catalog_from(catalog)?;
    let manifest = manifest_from(json!({
        "endpoints": [
            {"verb": "GET", "declaring_type": "acme.Ticker", "method": "ticks",
             "produces": ["text/event-stream"], "element_type": "text/plain"}
        ]
    }))?;
    let result = resolve_providers(&catalog, &manifest, &ResolutionConfig::default())?;
    assert!(!result.use_full_catalog);
    assert_eq!(result.providers, ids(&["P1", "P2", "SSE"]));
    Ok(())
}

#[test]
fn client_interfaces_invert_reader_and_writer_lookups() -> Result<()> {
    let mut catalog = sample_catalog();
    catalog["providers"]
        .as_array_mut()
        .context("providers array")?
        .push(json!({"id": "XR", "capabilities": ["reader"], "consumes": ["application/xml"]}));
    let catalog = catalog_from(catalog)?;
    let manifest = manifest_from(json!({
        "endpoints": [
            {"verb": "POST", "declaring_type": "acme.RemoteOrders", "method": "submit",
             "consumes": ["text/plain"], "produces": ["application/xml"]}
        ],
        "client_interfaces": ["acme.RemoteOrders"]
    }))?;
    let result = resolve_providers(&catalog, &manifest, &ResolutionConfig::default())?;
    // The client writes text/plain and reads application/xml.
    assert_eq!(result.providers, ids(&["P1", "P2", "XR"]));
    Ok(())
}

#[test]
fn contributed_names_already_in_catalog_are_dropped_on_fallback() -> Result<()> {
    let catalog = catalog_from(sample_catalog())?;
    let manifest = manifest_from(get_endpoint_without_produces())?;
    let config = ResolutionConfig {
        contributed_providers: vec![ProviderId::new("P2"), ProviderId::new("acme.Custom")],
        ..Default::default()
    };
    let result = resolve_providers(&catalog, &manifest, &config)?;
    assert!(result.use_full_catalog);
    assert_eq!(result.contributed, ids(&["acme.Custom"]));
    assert_eq!(result.providers, ids(&["P1", "P2", "P3", "acme.Custom"]));

    let narrowed = resolve_providers(&catalog, &manifest, &ResolutionConfig {
        json_default: true,
        json_support_present: true,
        ..config
    })?;
    assert_eq!(narrowed.contributed, ids(&["P2", "acme.Custom"]));
    assert_eq!(narrowed.providers, ids(&["P1", "P2", "acme.Custom"]));
    Ok(())
}

#[test]
fn providers_without_capabilities_are_always_registered() -> Result<()> {
    let catalog = catalog_from(json!({
        "schema_version": "provider_catalog_v1",
        "providers": [
            {"id": "acme.ExceptionMapper", "capabilities": ["exception_mapper"]},
            {"id": "P3", "capabilities": ["writer"], "produces": ["application/xml"]}
        ]
    }))?;
    let manifest = manifest_from(json!({
        "endpoints": [
            {"verb": "DELETE", "declaring_type": "acme.Orders", "method": "remove",
             "consumes": ["text/plain"]}
        ]
    }))?;
    let config = ResolutionConfig {
        always_register: vec![ProviderId::new("acme.Tracing")],
        ..Default::default()
    };
    let result = resolve_providers(&catalog, &manifest, &config)?;
    assert!(!result.use_full_catalog);
    assert_eq!(
        result.providers,
        ids(&["acme.ExceptionMapper", "acme.Tracing"])
    );
    Ok(())
}

#[test]
fn conflicting_configuration_fails_before_resolution() -> Result<()> {
    let catalog = catalog_from(sample_catalog())?;
    let manifest = manifest_from(get_endpoint_without_produces())?;
    let config: ResolutionConfig = serde_json::from_value(json!({
        "contributed_providers": ["acme.A"],
        "extra_providers": ["acme.B"]
    }))?;
    let err = ResolutionEngine::new(&catalog, &manifest, &config)
        .resolve()
        .expect_err("both contribution lists populated");
    assert!(matches!(err, ResolveError::ConflictingConfiguration { .. }));
    Ok(())
}

#[test]
fn diagnostics_are_reported_without_changing_providers() -> Result<()> {
    let catalog = catalog_from(sample_catalog())?;
    let manifest = manifest_from(json!({
        "endpoints": [
            {"verb": "GET", "declaring_type": "acme.Feed", "method": "latest",
             "produces": ["application/json"], "return_type": "io.reactive.Uni<Item>"}
        ]
    }))?;
    let quiet = resolve_providers(&catalog, &manifest, &ResolutionConfig {
        json_support_present: true,
        reactive_present: true,
        ..Default::default()
    })?;
    let noisy = resolve_providers(&catalog, &manifest, &ResolutionConfig::default())?;
    assert!(quiet.diagnostics.is_empty());
    assert_eq!(noisy.diagnostics.len(), 2);
    assert!(matches!(noisy.diagnostics[0], Diagnostic::MissingJsonSupport { .. }));
    assert!(matches!(
        noisy.diagnostics[1],
        Diagnostic::MissingReactiveSupport { .. }
    ));
    assert_eq!(quiet.providers, noisy.providers);
    Ok(())
}

#[test]
fn result_serializes_sets_as_sorted_arrays() -> Result<()> {
    let catalog = catalog_from(sample_catalog())?;
    let manifest = manifest_from(get_endpoint_without_produces())?;
    let result = resolve_providers(&catalog, &manifest, &ResolutionConfig::default())?;
    let value = serde_json::to_value(&result)?;
    assert_eq!(value["providers"], json!(["P1", "P2", "P3"]));
    assert_eq!(value["use_full_catalog"], json!(true));
    assert_eq!(value["fallback"]["index"], json!("writers"));
    Ok(())
}

#[test]
fn validated_loader_accepts_sample_catalog() -> Result<()> {
    let fixture = Fixture::new(&sample_catalog(), &get_endpoint_without_produces())?;
    let catalog = load_validated_catalog(&fixture.catalog)?;
    assert_eq!(catalog.providers.len(), 3);
    assert_eq!(catalog.description.as_deref(), Some("integration fixture"));
    Ok(())
}

#[test]
fn validated_loader_rejects_bad_catalogs() -> Result<()> {
    let dir = TempDir::new()?;
    let cases = [
        (
            "unknown_field.json",
            json!({"schema_version": "provider_catalog_v1",
                   "providers": [{"id": "P1", "priority": 3}]}),
        ),
        (
            "wrong_version.json",
            json!({"schema_version": "provider_catalog_v0", "providers": []}),
        ),
        (
            "duplicate.json",
            json!({"schema_version": "provider_catalog_v1",
                   "providers": [{"id": "P1"}, {"id": "P1"}]}),
        ),
    ];
    for (name, value) in cases {
        let path = write_json(dir.path(), name, &value)?;
        assert!(
            load_validated_catalog(&path).is_err(),
            "{name} should be rejected"
        );
    }
    Ok(())
}
