//! Error types for gateway operations.

/// Errors from server gateway operations.
///
/// Configuration errors ([`LinkNotFound`](Self::LinkNotFound),
/// [`NotRegistered`](Self::NotRegistered)) are caller bugs or server contract
/// violations and are never worth retrying. The rest are the network path:
/// HTTP failure statuses, transport faults, and undecodable bodies.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No link in the set has a relation ending with the requested name.
    #[error("link {0} not found")]
    LinkNotFound(String),

    /// An operation that needs discovered URLs ran before registration.
    #[error("discovery links not available, register the pack first")]
    NotRegistered,

    /// The server answered with a client or server error status.
    #[error("server returned {status}: {body}")]
    Server {
        /// HTTP status code (always >= 400).
        status: u16,
        /// Response body, kept verbatim for diagnostics.
        body: String,
    },

    /// The server answered an event POST with a success status other than
    /// 202 Accepted.
    #[error("event {event} not accepted, response was: {status}")]
    EventNotAccepted {
        /// The event name that was rejected.
        event: String,
        /// The status the server answered with.
        status: u16,
    },

    /// The request never produced a response: connection, timeout, or TLS.
    #[error("request to {url} failed")]
    Transport {
        /// The URL that was being called.
        url: String,
        /// Underlying transport error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A response body did not decode into the expected wire type.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The HTTP client itself could not be constructed.
    #[error("failed to build http client: {0}")]
    Http(String),
}

impl ClientError {
    /// Whether this error is a configuration problem rather than a network
    /// one. Configuration errors are fatal to the call and never retried.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::LinkNotFound(_) | Self::NotRegistered)
    }
}
