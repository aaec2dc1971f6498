//! Domain vocabulary for declaring a pack.
//!
//! These are the types the embedding application works with. The mapping
//! layer converts them to the wire vocabulary in [`courier_types::wire`]
//! before anything is sent to the server.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::handler::Handler;

/// Name of the reserved event kind emitted when no handler matches an
/// action's command.
pub const FATAL_EVENT_NAME: &str = "FATAL";

/// Declares an event a command or pack may emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDef {
    /// Event name.
    pub name: String,
    /// Optional documentation URL, surfaced to the server as a help link.
    pub help_url: Option<String>,
}

impl EventDef {
    /// Create an event definition with the given name and no help URL.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help_url: None,
        }
    }

    /// Attach a help URL.
    #[must_use]
    pub fn help_url(mut self, url: impl Into<String>) -> Self {
        self.help_url = Some(url.into());
        self
    }
}

/// A named occurrence with a payload: a command's result or a spontaneous
/// observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// The definition this event instantiates.
    pub event_def: EventDef,
    /// Opaque payload.
    pub payload: String,
}

impl Event {
    /// Create an event from a definition and payload.
    #[must_use]
    pub fn new(event_def: EventDef, payload: impl Into<String>) -> Self {
        Self {
            event_def,
            payload: payload.into(),
        }
    }

    /// The reserved fatal event, carrying a diagnostic payload.
    ///
    /// Sent as an action's completion when no handler matches its command,
    /// so the server always receives a result.
    #[must_use]
    pub fn fatal(payload: impl Into<String>) -> Self {
        Self::new(EventDef::new(FATAL_EVENT_NAME), payload)
    }
}

/// A command the pack exposes: a dispatch key, the handler that services it,
/// and the events it declares as output.
#[derive(Clone)]
pub struct Command {
    /// Dispatch key; must be unique within a pack.
    pub name: String,
    /// The handler invoked for this command's actions.
    pub handler: Arc<dyn Handler>,
    /// Events this command may emit.
    pub output_events: Vec<EventDef>,
    /// Optional documentation URL.
    pub help_url: Option<String>,
}

impl Command {
    /// Create a command with the given dispatch key and handler.
    #[must_use]
    pub fn new(name: impl Into<String>, handler: impl Handler + 'static) -> Self {
        Self {
            name: name.into(),
            handler: Arc::new(handler),
            output_events: Vec::new(),
            help_url: None,
        }
    }

    /// Declare an output event.
    #[must_use]
    pub fn output_event(mut self, def: EventDef) -> Self {
        self.output_events.push(def);
        self
    }

    /// Attach a help URL.
    #[must_use]
    pub fn help_url(mut self, url: impl Into<String>) -> Self {
        self.help_url = Some(url.into());
        self
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("output_events", &self.output_events)
            .field("help_url", &self.help_url)
            .finish_non_exhaustive()
    }
}

/// The complete static description of one pack: its identity, labels, the
/// commands it services, and the spontaneous events it may emit.
///
/// Created once by the embedding application before the runtime starts and
/// never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct PackDef {
    /// Pack name, as registered with the server.
    pub name: String,
    /// Free-form labels.
    pub labels: HashMap<String, String>,
    /// Spontaneous events not tied to a command.
    pub event_defs: Vec<EventDef>,
    /// Commands this pack services.
    pub commands: Vec<Command>,
    /// Optional documentation URL.
    pub help_url: Option<String>,
}

impl PackDef {
    /// Create an empty pack definition with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Attach a label.
    #[must_use]
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Declare a spontaneous event.
    #[must_use]
    pub fn event_def(mut self, def: EventDef) -> Self {
        self.event_defs.push(def);
        self
    }

    /// Add a command.
    #[must_use]
    pub fn command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Attach a help URL.
    #[must_use]
    pub fn help_url(mut self, url: impl Into<String>) -> Self {
        self.help_url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_event_uses_the_reserved_name() {
        let event = Event::fatal("no handler for command X");
        assert_eq!(event.event_def.name, FATAL_EVENT_NAME);
        assert_eq!(event.payload, "no handler for command X");
    }

    #[test]
    fn pack_def_builder_accumulates() {
        let def = PackDef::new("rota-pack")
            .label("team", "oncall")
            .event_def(EventDef::new("Heartbeat"))
            .command(Command::new("Rota", |_: &str| {
                Event::new(EventDef::new("RotaRetrieved"), "Isaac")
            }))
            .help_url("http://example.com/docs");

        assert_eq!(def.name, "rota-pack");
        assert_eq!(def.labels["team"], "oncall");
        assert_eq!(def.event_defs.len(), 1);
        assert_eq!(def.commands.len(), 1);
        assert_eq!(def.help_url.as_deref(), Some("http://example.com/docs"));
    }
}
