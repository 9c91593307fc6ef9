//! Configured negotiation for the integration layer.
//!
//! A [`Negotiator`] owns the server's [`NegotiationConfig`] and turns the
//! request's `Accept` header into a [`Negotiated`] outcome: the chosen media
//! type, the Content-Type value to send, and any parameters the client
//! attached to the winning range.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::NegotiationConfig;
use crate::error::NegotiationError;
use crate::negotiate_with;
use crate::types::{MatchResult, Parameters};

/// Outcome of a successful negotiation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Negotiated {
    pub best: MatchResult,
    /// Value for the response's Content-Type header.
    pub content_type: String,
}

impl Negotiated {
    pub fn media_type(&self) -> &str {
        &self.best.value
    }

    pub fn quality(&self) -> f64 {
        self.best.quality
    }

    /// Parameters from the client's matching range, e.g. `version=2`.
    pub fn parameters(&self) -> Option<&Parameters> {
        self.best.parameters.as_ref()
    }
}

/// Selects representations for a fixed server configuration.
#[derive(Debug, Clone)]
pub struct Negotiator {
    config: NegotiationConfig,
}

impl Negotiator {
    pub fn new(config: NegotiationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NegotiationConfig {
        &self.config
    }

    /// Negotiate against the request's `Accept` header.
    ///
    /// `None` means the request carried no `Accept` header, in which case the
    /// client accepts everything and the first supported type is used.
    pub fn negotiate(&self, accept: Option<&str>) -> Result<Negotiated, NegotiationError> {
        let best = negotiate_with(accept, &self.config.supported, self.config.quality_parsing)
            .inspect_err(|e| match e {
                NegotiationError::NoRepresentations => {
                    warn!("Content negotiation failed: no representations registered")
                }
                _ => debug!("Content negotiation failed: {}", e),
            })?;

        debug!(
            "Negotiated {} (q={}) for Accept {:?}",
            best.value, best.quality, accept
        );

        Ok(Negotiated {
            content_type: self.content_type_for(&best.value),
            best,
        })
    }

    /// Media type to render error bodies in when negotiation fails.
    pub fn fallback_media_type(&self) -> Option<&str> {
        self.config.supported.first().map(String::as_str)
    }

    /// Content-Type for error responses, with the configured charset.
    pub fn error_content_type(&self) -> Option<String> {
        self.fallback_media_type()
            .map(|media_type| self.content_type_for(media_type))
    }

    fn content_type_for(&self, media_type: &str) -> String {
        match &self.config.charset {
            Some(charset) => format!("{media_type};charset={charset}"),
            None => media_type.to_string(),
        }
    }
}
