//! Media type values as declared by providers and endpoints.
//!
//! Parsing only extracts type, subtype and parameters; nothing is validated
//! against a registry. Matching and indexing look at type and subtype only,
//! case-insensitively. Parameters ride along so the event-stream inference can
//! read its `element-type` hint, but they never influence a lookup.

use crate::error::{ResolveError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

pub const WILDCARD: &str = "*/*";
pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_JSON_PATCH_JSON: &str = "application/json-patch+json";
pub const APPLICATION_HAL_JSON: &str = "application/hal+json";
pub const TEXT_PLAIN: &str = "text/plain";
pub const SERVER_SENT_EVENTS: &str = "text/event-stream";

/// Media type parameter carrying the payload type of an event stream.
pub const ELEMENT_TYPE_PARAMETER: &str = "element-type";

const WILDCARD_TOKEN: &str = "*";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaType {
    main_type: String,
    subtype: String,
    parameters: BTreeMap<String, String>,
}

/// Lower-cased (type, subtype) pair used as the index key.
///
/// Two media types that differ only by parameters or letter case share a key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MediaTypeKey {
    main_type: String,
    subtype: String,
}

impl MediaType {
    /// Parse `type/subtype[;name=value]*`.
    ///
    /// Fails with [`ResolveError::MalformedMediaType`] when the type or the
    /// subtype is missing. Parameters without `=` are dropped; quoted values
    /// are unquoted.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let mut sections = trimmed.split(';');
        let essence = sections.next().unwrap_or_default().trim();

        let Some((main_type, subtype)) = essence.split_once('/') else {
            return Err(ResolveError::malformed(raw, "missing subtype"));
        };
        let main_type = main_type.trim();
        let subtype = subtype.trim();
        if main_type.is_empty() {
            return Err(ResolveError::malformed(raw, "missing type"));
        }
        if subtype.is_empty() {
            return Err(ResolveError::malformed(raw, "missing subtype"));
        }
        if subtype.contains('/') {
            return Err(ResolveError::malformed(raw, "more than one '/' separator"));
        }

        let mut parameters = BTreeMap::new();
        for section in sections {
            let Some((name, value)) = section.split_once('=') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            if name.is_empty() {
                continue;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            parameters.insert(name, value.to_string());
        }

        Ok(Self {
            main_type: main_type.to_string(),
            subtype: subtype.to_string(),
            parameters,
        })
    }

    pub fn wildcard() -> Self {
        Self::well_known(WILDCARD_TOKEN, WILDCARD_TOKEN)
    }

    pub fn application_json() -> Self {
        Self::well_known("application", "json")
    }

    pub fn text_plain() -> Self {
        Self::well_known("text", "plain")
    }

    pub fn server_sent_events() -> Self {
        Self::well_known("text", "event-stream")
    }

    fn well_known(main_type: &str, subtype: &str) -> Self {
        Self {
            main_type: main_type.to_string(),
            subtype: subtype.to_string(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn main_type(&self) -> &str {
        &self.main_type
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// Parameter lookup; names are stored lower-cased.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// True only for `*/*`. Partial wildcards such as `text/*` are concrete
    /// index keys.
    pub fn is_wildcard(&self) -> bool {
        self.main_type == WILDCARD_TOKEN && self.subtype == WILDCARD_TOKEN
    }

    /// Case-insensitive comparison of type and subtype; parameters ignored.
    pub fn matches(&self, other: &MediaType) -> bool {
        self.main_type.eq_ignore_ascii_case(&other.main_type)
            && self.subtype.eq_ignore_ascii_case(&other.subtype)
    }

    pub fn key(&self) -> MediaTypeKey {
        MediaTypeKey {
            main_type: self.main_type.to_ascii_lowercase(),
            subtype: self.subtype.to_ascii_lowercase(),
        }
    }
}

impl MediaTypeKey {
    pub fn wildcard() -> Self {
        MediaType::wildcard().key()
    }

    pub fn main_type(&self) -> &str {
        &self.main_type
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// `type/*` with a concrete type.
    pub fn is_subtype_wildcard(&self) -> bool {
        self.subtype == WILDCARD_TOKEN && self.main_type != WILDCARD_TOKEN
    }

    /// The `type/*` key covering this key's family.
    pub fn subtype_wildcard(&self) -> Self {
        Self {
            main_type: self.main_type.clone(),
            subtype: WILDCARD_TOKEN.to_string(),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.subtype)?;
        for (name, value) in &self.parameters {
            write!(f, ";{name}={value}")?;
        }
        Ok(())
    }
}

impl fmt::Display for MediaTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.subtype)
    }
}

impl std::str::FromStr for MediaType {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self> {
        MediaType::parse(s)
    }
}

impl Serialize for MediaType {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MediaType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        MediaType::parse(&value).map_err(serde::de::Error::custom)
    }
}
