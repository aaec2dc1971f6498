//! Internal helpers for mapping reqwest failures to [`ClientError`].

use courier_types::ClientError;

/// Map a [`reqwest::Error`] to a transport error tagged with the URL that
/// was being called. Covers connection failures, timeouts, and TLS faults.
pub(crate) fn map_transport_error(url: &str, err: reqwest::Error) -> ClientError {
    ClientError::Transport {
        url: url.to_string(),
        source: Box::new(err),
    }
}
