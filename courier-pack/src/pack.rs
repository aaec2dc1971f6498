//! The pack runtime: registration with bounded retry, then the
//! poll–dispatch–complete loop.

use courier_types::{ClientError, Gateway, wire};

use crate::config::PackConfig;
use crate::dispatch::DispatchTable;
use crate::domain::{Event, PackDef};
use crate::error::PackError;
use crate::mapping::{to_wire_event, to_wire_pack};

/// A running pack: one registration, one polling loop, one gateway.
///
/// The runtime moves through `Unregistered → Registering → Running` and
/// stops when the continuation predicate returns false. There is no paused
/// state and no internal parallelism: one outstanding request at a time,
/// with async sleeps between polls.
///
/// Generic over `G: Gateway` (the server transport). Production code uses
/// `courier_client::Client`; tests drive the loop with in-process fakes.
pub struct Pack<G: Gateway> {
    gateway: G,
    def: PackDef,
    handlers: DispatchTable,
    config: PackConfig,
    registration: Option<wire::Pack>,
    continue_running: Box<dyn FnMut() -> bool + Send>,
}

impl<G: Gateway> Pack<G> {
    /// Create a pack runtime with default timing configuration.
    #[must_use]
    pub fn new(def: PackDef, gateway: G) -> Self {
        Self::with_config(def, gateway, PackConfig::default())
    }

    /// Create a pack runtime with explicit timing configuration.
    #[must_use]
    pub fn with_config(def: PackDef, gateway: G, config: PackConfig) -> Self {
        let handlers = DispatchTable::new(&def.commands);
        Self {
            gateway,
            def,
            handlers,
            config,
            registration: None,
            continue_running: Box::new(|| true),
        }
    }

    /// Replace the continuation predicate (default: always true).
    ///
    /// The predicate is consulted once per loop iteration, between action
    /// cycles — never mid-request. This is the seam for cooperative
    /// shutdown in production and for bounding iterations in tests.
    #[must_use]
    pub fn run_while(mut self, predicate: impl FnMut() -> bool + Send + 'static) -> Self {
        self.continue_running = Box::new(predicate);
        self
    }

    /// The runtime's timing configuration.
    #[must_use]
    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// The server's registration echo, once registration has completed.
    #[must_use]
    pub fn registration(&self) -> Option<&wire::Pack> {
        self.registration.as_ref()
    }

    /// Register with the server and run the polling loop until the
    /// continuation predicate stops it.
    ///
    /// Registration is attempted twice at most: on the first failure the
    /// runtime waits the configured backoff and retries once; a second
    /// failure propagates and the loop is never entered. A pack that
    /// declares no commands returns after registering — it stays usable for
    /// [`send_event`](Self::send_event), but there is nothing to poll for.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::Registration`] when both attempts fail.
    pub async fn start(&mut self) -> Result<(), PackError> {
        if let Err(err) = self.register().await {
            tracing::warn!(error = %err, "registration failed, retrying once");
            tokio::time::sleep(self.config.registration_backoff).await;
            self.register().await.map_err(PackError::Registration)?;
        }
        tracing::info!(pack = %self.def.name, "pack registered successfully");

        if self.handlers.is_empty() {
            return Ok(());
        }
        self.run().await;
        Ok(())
    }

    /// Spontaneously send an event the pack has observed.
    ///
    /// Independent of the polling loop; callable any time after
    /// registration has completed.
    ///
    /// # Errors
    ///
    /// Returns [`PackError::SendEvent`] naming the offending event when the
    /// gateway rejects it or the request fails. Emission is not retried.
    pub async fn send_event(&self, event: &Event) -> Result<(), PackError> {
        self.gateway
            .post_event(&to_wire_event(event))
            .await
            .map_err(|source| {
                tracing::error!(error = %source, "failed to send the event");
                PackError::SendEvent {
                    event: format!("{event:?}"),
                    source,
                }
            })
    }

    async fn register(&mut self) -> Result<(), ClientError> {
        let pack = to_wire_pack(&self.def);
        let registered = self.gateway.register_pack(&pack).await?;
        self.registration = Some(registered);
        Ok(())
    }

    /// The poll–dispatch–complete loop.
    ///
    /// Take-action failures degrade to the sleep-and-retry path so a server
    /// outage never kills the loop; only the predicate ends it.
    async fn run(&mut self) {
        while (self.continue_running)() {
            match self.gateway.take_action().await {
                Ok(Some(action)) => self.handle_action(&action).await,
                Ok(None) => tokio::time::sleep(self.config.polling_interval).await,
                Err(err) => {
                    tracing::error!(error = %err, "there was an error fetching actions");
                    tokio::time::sleep(self.config.polling_interval).await;
                }
            }
        }
        tracing::info!(pack = %self.def.name, "pack stopped");
    }

    /// Dispatch one action and report its result.
    ///
    /// Completion failures are logged and absorbed; the action is dropped
    /// after the single attempt.
    async fn handle_action(&self, action: &wire::Action) {
        let event = self.handlers.dispatch(action);
        if let Err(err) = self
            .gateway
            .complete_action(action, &to_wire_event(&event))
            .await
        {
            tracing::error!(command = %action.command, error = %err, "could not complete action");
        }
    }
}
