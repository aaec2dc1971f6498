//! Error types for the pack runtime.

use courier_types::ClientError;

/// Errors surfaced by the pack runtime to the embedder.
///
/// Loop-body failures are absorbed and logged, never surfaced here; only
/// registration giving up and spontaneous event emission propagate.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    /// Both registration attempts failed; the runtime never reached the
    /// polling loop.
    #[error("registration failed after retry")]
    Registration(#[source] ClientError),

    /// A spontaneous event could not be delivered. Carries the offending
    /// event for caller visibility.
    #[error("failed when sending event {event}")]
    SendEvent {
        /// Debug rendering of the event that failed to send.
        event: String,
        /// The underlying gateway error.
        #[source]
        source: ClientError,
    },
}
