//! Typed errors raised by the resolution engine.
//!
//! Only two conditions are modelled. Malformed media types are recoverable:
//! callers skip the offending declaration and keep going. Conflicting
//! configuration is fatal and aborts a run before any lookup happens.

use thiserror::Error;

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A declared media type could not be split into type and subtype.
    #[error("malformed media type '{raw}': {reason}")]
    MalformedMediaType {
        /// The declaration exactly as supplied.
        raw: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// Two mutually exclusive configuration entries were both populated.
    #[error("conflicting configuration: {message}")]
    ConflictingConfiguration { message: String },
}

impl ResolveError {
    pub(crate) fn malformed(raw: &str, reason: &'static str) -> Self {
        ResolveError::MalformedMediaType {
            raw: raw.to_string(),
            reason,
        }
    }

    /// True for conditions the engine absorbs instead of propagating.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ResolveError::MalformedMediaType { .. })
    }
}
