//! Splits a provider catalog into per-capability media type indexes.
//!
//! Classification uses only the statically declared capability set and media
//! types; providers are never instantiated. Readers index their `consumes`
//! declarations, writers and context resolvers their `produces` declarations.

use crate::catalog::identity::ProviderId;
use crate::catalog::media_index::MediaTypeIndex;
use crate::catalog::model::ProviderEntry;
use crate::media_type::MediaType;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Which categorized index a lookup should go to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexKind {
    Readers,
    Writers,
    ContextResolvers,
}

impl IndexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Readers => "readers",
            IndexKind::Writers => "writers",
            IndexKind::ContextResolvers => "context_resolvers",
        }
    }

    /// The index holding the opposite end of a body conversion.
    pub fn inverse(self) -> Self {
        match self {
            IndexKind::Readers => IndexKind::Writers,
            IndexKind::Writers => IndexKind::Readers,
            IndexKind::ContextResolvers => IndexKind::ContextResolvers,
        }
    }
}

impl TryFrom<&str> for IndexKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "reader" | "readers" => Ok(IndexKind::Readers),
            "writer" | "writers" => Ok(IndexKind::Writers),
            "context_resolver" | "context_resolvers" => Ok(IndexKind::ContextResolvers),
            other => anyhow::bail!("Unknown provider index: {other}"),
        }
    }
}

#[derive(Clone, Debug, Default)]
/// Output of one categorization pass.
pub struct CategorizedProviders {
    pub readers: MediaTypeIndex,
    pub writers: MediaTypeIndex,
    pub context_resolvers: MediaTypeIndex,
    /// Providers with no recognized capability; registered unconditionally.
    pub others: BTreeSet<ProviderId>,
}

impl CategorizedProviders {
    pub fn index(&self, kind: IndexKind) -> &MediaTypeIndex {
        match kind {
            IndexKind::Readers => &self.readers,
            IndexKind::Writers => &self.writers,
            IndexKind::ContextResolvers => &self.context_resolvers,
        }
    }
}

/// Categorize every provider into the reader, writer and context-resolver
/// indexes, or the `others` set.
///
/// A provider that is both reader and writer is registered in both indexes.
/// The context-resolver index only receives providers that are neither. A
/// malformed media type declaration is skipped; the provider's remaining
/// declarations still count.
pub fn categorize_providers<'a, I>(providers: I) -> CategorizedProviders
where
    I: IntoIterator<Item = &'a ProviderEntry>,
{
    let mut categorized = CategorizedProviders::default();
    for provider in providers {
        if provider.is_reader() || provider.is_writer() {
            if provider.is_reader() {
                register(&mut categorized.readers, &provider.id, &provider.consumes);
            }
            if provider.is_writer() {
                register(&mut categorized.writers, &provider.id, &provider.produces);
            }
        } else if provider.is_context_resolver() {
            register(
                &mut categorized.context_resolvers,
                &provider.id,
                &provider.produces,
            );
        } else {
            categorized.others.insert(provider.id.clone());
        }
    }
    debug!(
        others = categorized.others.len(),
        "categorized provider catalog"
    );
    categorized
}

fn register(index: &mut MediaTypeIndex, id: &ProviderId, declared: &[String]) {
    if declared.is_empty() {
        index.add_wildcard(id.clone());
        return;
    }
    for raw in declared {
        match MediaType::parse(raw) {
            Ok(media_type) => index.add(&media_type, id.clone()),
            Err(err) => warn!(provider = %id, "skipping declaration: {err}"),
        }
    }
}
