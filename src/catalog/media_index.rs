//! Media type → provider index with wildcard fallback.

use crate::catalog::identity::ProviderId;
use crate::media_type::{MediaType, MediaTypeKey};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, Default)]
/// Providers keyed by the (type, subtype) they declared.
///
/// Registrations for `*/*` live under a reserved wildcard key and are returned
/// by every lookup. The index only grows; a fresh one is built per run.
pub struct MediaTypeIndex {
    by_key: BTreeMap<MediaTypeKey, BTreeSet<ProviderId>>,
    wildcard: BTreeSet<ProviderId>,
}

impl MediaTypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, media_type: &MediaType, provider: ProviderId) {
        if media_type.is_wildcard() {
            self.wildcard.insert(provider);
        } else {
            self.by_key
                .entry(media_type.key())
                .or_default()
                .insert(provider);
        }
    }

    /// Register a provider that declared no media type at all.
    pub fn add_wildcard(&mut self, provider: ProviderId) {
        self.wildcard.insert(provider);
    }

    /// Candidate providers for `media_type`.
    ///
    /// Always includes every wildcard registration. A concrete query adds the
    /// exact (type, subtype) registrations and any `type/*` registrations of
    /// the same main type. A `type/*` query adds everything under that main
    /// type, and a `*/*` query returns the whole index.
    pub fn get_possible(&self, media_type: &MediaType) -> BTreeSet<ProviderId> {
        let mut possible = self.wildcard.clone();
        if media_type.is_wildcard() {
            for providers in self.by_key.values() {
                possible.extend(providers.iter().cloned());
            }
            return possible;
        }

        let key = media_type.key();
        if key.is_subtype_wildcard() {
            for (registered, providers) in &self.by_key {
                if registered.main_type() == key.main_type() {
                    possible.extend(providers.iter().cloned());
                }
            }
            return possible;
        }

        if let Some(exact) = self.by_key.get(&key) {
            possible.extend(exact.iter().cloned());
        }
        if let Some(family) = self.by_key.get(&key.subtype_wildcard()) {
            possible.extend(family.iter().cloned());
        }
        possible
    }

    /// Every provider id present in the index, any key.
    pub fn providers(&self) -> BTreeSet<ProviderId> {
        self.get_possible(&MediaType::wildcard())
    }

    pub fn wildcard_providers(&self) -> &BTreeSet<ProviderId> {
        &self.wildcard
    }

    pub fn is_empty(&self) -> bool {
        self.wildcard.is_empty() && self.by_key.is_empty()
    }
}
