//! Static description of the API surface fed to the engine.
//!
//! Endpoints are produced by an external scanner (annotation inspection, an
//! OpenAPI export, ...) and arrive as a JSON manifest. Annotation presence is
//! significant: `None` means the annotation is absent, `Some(vec![])` means it
//! is present without values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Head,
    Delete,
    Options,
    Patch,
    Post,
    Put,
}

impl HttpVerb {
    pub const ALL: [HttpVerb; 7] = [
        HttpVerb::Get,
        HttpVerb::Head,
        HttpVerb::Delete,
        HttpVerb::Options,
        HttpVerb::Patch,
        HttpVerb::Post,
        HttpVerb::Put,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Head => "HEAD",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Options => "OPTIONS",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which media type annotation is being resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Consumes,
    Produces,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Consumes => "consumes",
            Direction::Produces => "produces",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointKind {
    /// Server-side resource: consumes are read, produces are written.
    Resource,
    /// Client interface: consumes are written on the way out, produces read.
    Client,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub verb: HttpVerb,
    pub declaring_type: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub consumes: Option<Vec<String>>,
    #[serde(default)]
    pub produces: Option<Vec<String>>,
    #[serde(default)]
    pub class_consumes: Option<Vec<String>>,
    #[serde(default)]
    pub class_produces: Option<Vec<String>>,
    /// Element type annotation for event streams.
    #[serde(default)]
    pub element_type: Option<String>,
    /// Multipart part type annotations on the method's parameters.
    #[serde(default)]
    pub part_types: Vec<String>,
    #[serde(default)]
    pub return_type: Option<String>,
}

impl Endpoint {
    pub fn new(verb: HttpVerb, declaring_type: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            verb,
            declaring_type: declaring_type.into(),
            method: method.into(),
            consumes: None,
            produces: None,
            class_consumes: None,
            class_produces: None,
            element_type: None,
            part_types: Vec::new(),
            return_type: None,
        }
    }

    pub fn consuming(mut self, media_types: &[&str]) -> Self {
        self.consumes = Some(to_owned_list(media_types));
        self
    }

    pub fn producing(mut self, media_types: &[&str]) -> Self {
        self.produces = Some(to_owned_list(media_types));
        self
    }

    pub fn class_consuming(mut self, media_types: &[&str]) -> Self {
        self.class_consumes = Some(to_owned_list(media_types));
        self
    }

    pub fn class_producing(mut self, media_types: &[&str]) -> Self {
        self.class_produces = Some(to_owned_list(media_types));
        self
    }

    pub fn with_element_type(mut self, element_type: &str) -> Self {
        self.element_type = Some(element_type.to_string());
        self
    }

    pub fn with_part_types(mut self, part_types: &[&str]) -> Self {
        self.part_types = to_owned_list(part_types);
        self
    }

    pub fn returning(mut self, return_type: &str) -> Self {
        self.return_type = Some(return_type.to_string());
        self
    }

    /// Method-level annotation for `direction`.
    pub fn method_declared(&self, direction: Direction) -> Option<&[String]> {
        match direction {
            Direction::Consumes => self.consumes.as_deref(),
            Direction::Produces => self.produces.as_deref(),
        }
    }

    /// Class-level annotation for `direction`.
    pub fn class_declared(&self, direction: Direction) -> Option<&[String]> {
        match direction {
            Direction::Consumes => self.class_consumes.as_deref(),
            Direction::Produces => self.class_produces.as_deref(),
        }
    }

    /// Raw media type strings declared anywhere on this endpoint for
    /// `direction`, method level first.
    pub fn all_declared(&self, direction: Direction) -> impl Iterator<Item = &String> {
        self.method_declared(direction)
            .into_iter()
            .chain(self.class_declared(direction))
            .flatten()
    }

    /// `Type{method}` label used in diagnostics.
    pub fn display_name(&self) -> String {
        format!("{}{{{}}}", self.declaring_type, self.method)
    }
}

fn to_owned_list(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
/// Everything the scanner knows about the application's API surface.
pub struct EndpointManifest {
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    /// Declaring types that are client interfaces rather than resources.
    #[serde(default)]
    pub client_interfaces: BTreeSet<String>,
    /// User classes carrying the provider marker annotation.
    #[serde(default)]
    pub annotated_providers: BTreeSet<String>,
    /// User classes managed as components by the container.
    #[serde(default)]
    pub managed_components: BTreeSet<String>,
}

impl EndpointManifest {
    pub fn kind_of(&self, endpoint: &Endpoint) -> EndpointKind {
        if self.client_interfaces.contains(&endpoint.declaring_type) {
            EndpointKind::Client
        } else {
            EndpointKind::Resource
        }
    }
}

/// Read and parse an endpoint manifest from disk.
pub fn load_manifest_from_path(path: &Path) -> Result<EndpointManifest> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading endpoint manifest {}", path.display()))?;
    let manifest: EndpointManifest = serde_json::from_str(&data)
        .with_context(|| format!("parsing endpoint manifest {}", path.display()))?;
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn annotation_presence_survives_deserialization() {
        let endpoint: Endpoint = serde_json::from_value(json!({
            "verb": "POST",
            "declaring_type": "acme.Orders",
            "method": "create",
            "consumes": [],
            "produces": null
        }))
        .unwrap();
        assert_eq!(endpoint.verb, HttpVerb::Post);
        assert_eq!(endpoint.method_declared(Direction::Consumes), Some(&[][..]));
        assert_eq!(endpoint.method_declared(Direction::Produces), None);
        assert_eq!(endpoint.class_declared(Direction::Produces), None);
        assert_eq!(endpoint.display_name(), "acme.Orders{create}");
    }

    #[test]
    fn unknown_verbs_are_rejected() {
        let result = serde_json::from_value::<Endpoint>(json!({
            "verb": "TRACE",
            "declaring_type": "acme.Orders"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn manifest_classifies_client_interfaces() {
        let manifest: EndpointManifest = serde_json::from_value(json!({
            "endpoints": [
                {"verb": "GET", "declaring_type": "acme.RemoteApi"},
                {"verb": "GET", "declaring_type": "acme.LocalResource"}
            ],
            "client_interfaces": ["acme.RemoteApi"]
        }))
        .unwrap();
        assert_eq!(manifest.kind_of(&manifest.endpoints[0]), EndpointKind::Client);
        assert_eq!(manifest.kind_of(&manifest.endpoints[1]), EndpointKind::Resource);
    }

    #[test]
    fn all_declared_chains_method_then_class() {
        let endpoint = Endpoint::new(HttpVerb::Get, "acme.R", "get")
            .producing(&["text/plain"])
            .class_producing(&["application/json"]);
        let declared: Vec<&String> = endpoint.all_declared(Direction::Produces).collect();
        assert_eq!(declared, ["text/plain", "application/json"]);
        assert_eq!(endpoint.all_declared(Direction::Consumes).count(), 0);
    }
}
