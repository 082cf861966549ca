//! Providers implied by a media type rather than named by it.
//!
//! Only the server-sent-event family has a rule today: an event stream carries
//! elements of some other media type, and whichever providers handle that
//! element type must be registered too. Inferred providers are additive; an
//! element type never triggers the full-catalog fallback.

use crate::catalog::{MediaTypeIndex, ProviderId};
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::media_type::{ELEMENT_TYPE_PARAMETER, MediaType};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Where an event stream's element media type came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementTypeSource {
    Annotation,
    Parameter,
    Default,
}

/// Element media type of an event stream, or `None` when `media_type` is not
/// an event stream.
///
/// Priority: the endpoint's element-type annotation, then the media type's
/// `element-type` parameter, then `text/plain`. Returns `Some(Err(..))` when
/// the chosen value does not parse.
pub fn element_media_type(
    media_type: &MediaType,
    endpoint: &Endpoint,
) -> Option<(ElementTypeSource, Result<MediaType>)> {
    if !MediaType::server_sent_events().matches(media_type) {
        return None;
    }
    if let Some(annotated) = endpoint.element_type.as_deref() {
        return Some((ElementTypeSource::Annotation, MediaType::parse(annotated)));
    }
    if let Some(parameter) = media_type.parameter(ELEMENT_TYPE_PARAMETER) {
        return Some((ElementTypeSource::Parameter, MediaType::parse(parameter)));
    }
    Some((ElementTypeSource::Default, Ok(MediaType::text_plain())))
}

/// Extra providers from `index` that the inference rules attach to
/// `media_type` on `endpoint`. Empty when no rule applies.
pub fn infer_providers(
    media_type: &MediaType,
    endpoint: &Endpoint,
    index: &MediaTypeIndex,
) -> BTreeSet<ProviderId> {
    match element_media_type(media_type, endpoint) {
        None => BTreeSet::new(),
        Some((source, Ok(element))) => {
            debug!(
                endpoint = %endpoint.display_name(),
                element = %element,
                ?source,
                "inferring event stream element providers"
            );
            index.get_possible(&element)
        }
        Some((source, Err(err))) => {
            warn!(
                endpoint = %endpoint.display_name(),
                ?source,
                "skipping element type: {err}"
            );
            BTreeSet::new()
        }
    }
}
