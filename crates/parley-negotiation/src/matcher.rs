//! Matching ranked preferences against the supported media types.

use crate::error::NegotiationError;
use crate::types::{MatchResult, PreferenceEntry};
use tracing::debug;

/// Find the first ranked entry the server can satisfy.
///
/// Returns `Ok(None)` when nothing matches. `supported` is scanned in order,
/// so earlier types win among equally acceptable ones.
pub fn best_match<S: AsRef<str>>(
    ranked: &[PreferenceEntry],
    supported: &[S],
) -> Result<Option<MatchResult>, NegotiationError> {
    for entry in ranked {
        if supported.iter().any(|s| s.as_ref() == entry.value) {
            return Ok(Some(MatchResult::from_entry(entry)));
        }

        if let Some(media_type) = entry
            .value
            .strip_suffix("/*")
            .and_then(|type_name| first_of_type(type_name, supported))
        {
            return Ok(Some(MatchResult::expanded(entry, media_type)));
        }

        if entry.value == "*/*" {
            return accepts_anything(entry.quality, supported).map(Some);
        }
    }

    Ok(None)
}

/// The client takes anything: answer with the server's first choice.
///
/// An empty `supported` list is a server misconfiguration, reported as
/// [`NegotiationError::NoRepresentations`].
pub fn accepts_anything<S: AsRef<str>>(
    quality: f64,
    supported: &[S],
) -> Result<MatchResult, NegotiationError> {
    let first = supported
        .first()
        .ok_or(NegotiationError::NoRepresentations)?;
    debug!("Accepting any media type, falling back to {}", first.as_ref());
    Ok(MatchResult::new(first.as_ref(), quality))
}

/// First supported type whose top-level type is `type_name`.
///
/// Only a full type segment matches: `image/*` accepts `image/png` but not
/// `image2/foo`.
fn first_of_type<'a, S: AsRef<str>>(type_name: &str, supported: &'a [S]) -> Option<&'a str> {
    supported.iter().map(|s| s.as_ref()).find(|support| {
        support
            .strip_prefix(type_name)
            .is_some_and(|rest| rest.starts_with('/'))
    })
}
