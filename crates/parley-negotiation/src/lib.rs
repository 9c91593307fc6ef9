//! HTTP/1.1 proactive content negotiation.
//!
//! Given a client's `Accept` header and the ordered list of media types a
//! server can produce, this crate selects the single best representation
//! following RFC 2616 §14.1: quality values, wildcard ranges and specificity
//! tie-breaking.
//!
//! The work happens in three steps that can also be used on their own:
//!
//! 1. [`parse_header`] turns the raw header into [`PreferenceEntry`] values.
//! 2. [`sort_entries`] ranks them by quality, then specificity, then position.
//! 3. [`best_match`] finds the first entry the server can satisfy.
//!
//! # Example
//!
//! ```
//! use parley_negotiation::negotiate;
//!
//! let supported = ["application/json", "text/json"];
//!
//! let best = negotiate(Some("application/json;version=2"), &supported).unwrap();
//! assert_eq!(best.value, "application/json");
//! assert_eq!(best.parameters.unwrap()["version"], "2");
//!
//! // No Accept header: the client takes anything.
//! assert_eq!(negotiate(None, &supported).unwrap().value, "application/json");
//!
//! // Nothing acceptable.
//! let err = negotiate(Some("text/html"), &supported).unwrap_err();
//! assert_eq!(err.status_code(), 406);
//! ```
//!
//! For servers with a fixed configuration (charset, strict parsing) use
//! [`Negotiator`].

mod config;
mod error;
mod matcher;
mod negotiator;
mod parser;
mod ranker;
mod types;

// Re-export public types
pub use config::NegotiationConfig;
pub use error::NegotiationError;
pub use negotiator::{Negotiated, Negotiator};
pub use parser::QualityParsing;
pub use types::{MatchResult, Parameters, PreferenceEntry};

// Re-export pipeline stages for advanced usage
pub use matcher::{accepts_anything, best_match};
pub use parser::{
    lenient_quality, parse_header, parse_header_strict, parse_header_with, strict_quality,
};
pub use ranker::{compare_entries, sort_entries};

/// Select the best representation for an `Accept` header.
///
/// `accept` is `None` when the request had no `Accept` header at all. Quality
/// values are parsed leniently; see [`negotiate_with`] for strict parsing.
///
/// # Errors
///
/// - [`NegotiationError::NotAcceptable`] when no supported type satisfies the
///   header.
/// - [`NegotiationError::NoRepresentations`] when `supported` is empty and a
///   fallback was required.
pub fn negotiate<S: AsRef<str>>(
    accept: Option<&str>,
    supported: &[S],
) -> Result<MatchResult, NegotiationError> {
    negotiate_with(accept, supported, QualityParsing::Lenient)
}

/// Like [`negotiate`], with an explicit quality parsing mode.
pub fn negotiate_with<S: AsRef<str>>(
    accept: Option<&str>,
    supported: &[S],
    mode: QualityParsing,
) -> Result<MatchResult, NegotiationError> {
    let Some(header) = accept else {
        return accepts_anything(1.0, supported);
    };

    let ranked = sort_entries(&parse_header_with(header, mode)?);
    tracing::debug!(
        "Ranked Accept preferences: {:?}",
        ranked.iter().map(|e| e.value.as_str()).collect::<Vec<_>>()
    );

    best_match(&ranked, supported)?.ok_or_else(|| NegotiationError::NotAcceptable {
        supported: supported.iter().map(|s| s.as_ref().to_string()).collect(),
    })
}
