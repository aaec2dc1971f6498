//! Command dispatch: route an action to its handler.

use std::collections::HashMap;
use std::sync::Arc;

use courier_types::wire;

use crate::domain::{Command, Event};
use crate::handler::Handler;

/// Dispatch table from command name to handler.
///
/// Built once from a pack definition's commands at startup and treated as
/// immutable for the runtime's lifetime.
pub struct DispatchTable {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl DispatchTable {
    /// Build the table from a pack's commands.
    #[must_use]
    pub fn new(commands: &[Command]) -> Self {
        let handlers = commands
            .iter()
            .map(|c| (c.name.clone(), Arc::clone(&c.handler)))
            .collect();
        Self { handlers }
    }

    /// Dispatch an action to the handler registered for its command.
    ///
    /// An unrecognized command must never abort the polling loop: it is
    /// logged and answered with the reserved fatal event naming the command,
    /// so the server still receives a completion.
    pub fn dispatch(&self, action: &wire::Action) -> Event {
        match self.handlers.get(&action.command) {
            Some(handler) => handler.handle(&action.input),
            None => {
                tracing::error!(command = %action.command, "no handler registered for command");
                Event::fatal(format!(
                    "no handler could be found for command {}",
                    action.command
                ))
            }
        }
    }

    /// Whether any commands are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
