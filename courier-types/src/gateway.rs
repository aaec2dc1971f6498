//! The gateway seam between the pack runtime and the server.

use std::future::Future;

use crate::error::ClientError;
use crate::wire::{Action, Event, Pack};

/// Remote operations a pack runtime needs from its orchestration server.
///
/// Uses RPITIT (return position impl trait in trait) — Rust 2024 native
/// async. Not object-safe by design; compose with generics `<G: Gateway>`.
///
/// `courier-client` provides the HTTP implementation. Tests drive the
/// runtime against in-process fakes.
///
/// Registration takes `&mut self` because it is the only operation that
/// writes gateway state (the cached discovery URLs); everything after
/// registration reads that state through `&self`.
pub trait Gateway: Send {
    /// Register the pack and return the server's echo, augmented with
    /// discovery links.
    fn register_pack(
        &mut self,
        pack: &Pack,
    ) -> impl Future<Output = Result<Pack, ClientError>> + Send;

    /// Post a spontaneous or result event.
    ///
    /// Only 202 Accepted counts as success.
    fn post_event(&self, event: &Event) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Poll for the next action. `Ok(None)` means no work is available.
    fn take_action(&self) -> impl Future<Output = Result<Option<Action>, ClientError>> + Send;

    /// Report an action's result event to the action's own completion URL.
    fn complete_action(
        &self,
        action: &Action,
        event: &Event,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}
