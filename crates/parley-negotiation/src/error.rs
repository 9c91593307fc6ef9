//! Negotiation failures.

/// Error types for content negotiation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NegotiationError {
    /// The server has no representations registered at all.
    #[error("No serializers seems to be configured")]
    NoRepresentations,

    /// None of the client's media ranges can be satisfied.
    #[error(
        "Can not send a response which is acceptable according to the Accept header. \
         Supported mime types are: {}",
        .supported.join(", ")
    )]
    NotAcceptable { supported: Vec<String> },

    /// A `q` parameter that is not a number (strict parsing only).
    #[error("Invalid quality value {value:?} in media range #{index}")]
    MalformedQuality { index: usize, value: String },
}

impl NegotiationError {
    /// HTTP status the integration layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            NegotiationError::NoRepresentations => 500,
            NegotiationError::NotAcceptable { .. } => 406,
            NegotiationError::MalformedQuality { .. } => 400,
        }
    }

    /// Whether the failure was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}
