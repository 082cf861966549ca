//! Effective consumed/produced media types of one endpoint.
//!
//! Lookup order is method annotation, then class annotation, then the verb
//! default table. The outcome tells the engine whether to query indexes, fall
//! back to the full catalog, or skip the direction entirely.

use crate::endpoint::{Direction, Endpoint};
use crate::media_type::MediaType;
use crate::verb_policy::policy_for;
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectiveMediaTypes {
    /// Concrete media types taken from an annotation.
    Declared(Vec<MediaType>),
    /// No annotation; the verb defaults to everything and JSON is the
    /// configured default content type.
    JsonDefault,
    /// The endpoint matches every media type in this direction.
    Wildcard,
    /// Nothing to register for this direction.
    Nothing,
}

impl EffectiveMediaTypes {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, EffectiveMediaTypes::Wildcard)
    }

    /// Media types to look up; empty for `Wildcard` and `Nothing`.
    pub fn media_types(&self) -> Vec<MediaType> {
        match self {
            EffectiveMediaTypes::Declared(media_types) => media_types.clone(),
            EffectiveMediaTypes::JsonDefault => vec![MediaType::application_json()],
            EffectiveMediaTypes::Wildcard | EffectiveMediaTypes::Nothing => Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EndpointMediaTypeResolver {
    json_default: bool,
}

impl EndpointMediaTypeResolver {
    pub fn new(json_default: bool) -> Self {
        Self { json_default }
    }

    pub fn resolve(&self, endpoint: &Endpoint, direction: Direction) -> EffectiveMediaTypes {
        if let Some(declared) = endpoint.method_declared(direction) {
            // Annotation present without values means every media type.
            if declared.is_empty() {
                return EffectiveMediaTypes::Wildcard;
            }
            return parse_declared(endpoint, direction, declared);
        }

        if let Some(declared) = endpoint.class_declared(direction) {
            if declared.is_empty() {
                return EffectiveMediaTypes::Nothing;
            }
            return parse_declared(endpoint, direction, declared);
        }

        if !policy_for(endpoint.verb).defaults_to_wildcard(direction) {
            return EffectiveMediaTypes::Nothing;
        }
        if self.json_default {
            EffectiveMediaTypes::JsonDefault
        } else {
            EffectiveMediaTypes::Wildcard
        }
    }
}

fn parse_declared(endpoint: &Endpoint, direction: Direction, raw: &[String]) -> EffectiveMediaTypes {
    let mut media_types = Vec::with_capacity(raw.len());
    for value in raw {
        match MediaType::parse(value) {
            Ok(media_type) if media_type.is_wildcard() => return EffectiveMediaTypes::Wildcard,
            Ok(media_type) => media_types.push(media_type),
            Err(err) => warn!(
                endpoint = %endpoint.display_name(),
                direction = direction.as_str(),
                "skipping declaration: {err}"
            ),
        }
    }
    if media_types.is_empty() {
        EffectiveMediaTypes::Nothing
    } else {
        EffectiveMediaTypes::Declared(media_types)
    }
}
