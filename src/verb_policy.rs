//! Per-verb defaulting for endpoints that declare no media type.
//!
//! A `true` flag means a missing declaration in that direction is treated as
//! "every media type", which forces the full-catalog fallback unless a JSON
//! default is configured. The table is the single source of truth; it is
//! indexed by verb and covers all seven verbs.

use crate::endpoint::{Direction, HttpVerb};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerbDefaultPolicy {
    pub verb: HttpVerb,
    pub consumes_defaults_to_wildcard: bool,
    pub produces_defaults_to_wildcard: bool,
}

impl VerbDefaultPolicy {
    const fn new(verb: HttpVerb, consumes: bool, produces: bool) -> Self {
        Self {
            verb,
            consumes_defaults_to_wildcard: consumes,
            produces_defaults_to_wildcard: produces,
        }
    }

    pub fn defaults_to_wildcard(&self, direction: Direction) -> bool {
        match direction {
            Direction::Consumes => self.consumes_defaults_to_wildcard,
            Direction::Produces => self.produces_defaults_to_wildcard,
        }
    }
}

pub const VERB_DEFAULT_POLICIES: [VerbDefaultPolicy; 7] = [
    VerbDefaultPolicy::new(HttpVerb::Get, false, true),
    VerbDefaultPolicy::new(HttpVerb::Head, false, false),
    VerbDefaultPolicy::new(HttpVerb::Delete, true, false),
    VerbDefaultPolicy::new(HttpVerb::Options, false, true),
    VerbDefaultPolicy::new(HttpVerb::Patch, true, false),
    VerbDefaultPolicy::new(HttpVerb::Post, true, true),
    VerbDefaultPolicy::new(HttpVerb::Put, true, false),
];

pub fn policy_for(verb: HttpVerb) -> &'static VerbDefaultPolicy {
    let slot = match verb {
        HttpVerb::Get => 0,
        HttpVerb::Head => 1,
        HttpVerb::Delete => 2,
        HttpVerb::Options => 3,
        HttpVerb::Patch => 4,
        HttpVerb::Post => 5,
        HttpVerb::Put => 6,
    };
    &VERB_DEFAULT_POLICIES[slot]
}
