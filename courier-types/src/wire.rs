//! Wire representation of the server's JSON vocabulary.
//!
//! These types mirror the orchestration server's bodies field for field.
//! The domain-facing vocabulary (handlers, pack definitions) lives in
//! `courier-pack`; its mapping layer converts into these types before
//! anything touches the network.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::links::find_by_rel;

/// Relation suffix of the link used to complete an action.
pub const ACTION_RESULT_REL: &str = "actionResult";

/// Relation suffix of the link used to poll for the next action.
pub const TAKE_ACTION_REL: &str = "takeAction";

/// Relation suffix of the link used to post events.
pub const EVENT_REL: &str = "event";

/// A HATEOAS hyperlink: a relation name and the URL it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target URL.
    pub href: String,
    /// Relation name, possibly fully qualified.
    pub rel: String,
}

/// One unit of work assigned by the server to a specific command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Name of the command this action is addressed to.
    pub command: String,
    /// Opaque input payload for the command handler.
    pub input: String,
    /// Discovery links; must include the action-result relation.
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Action {
    /// URL for marking this action complete.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::LinkNotFound`] when the server sent the action
    /// without an `actionResult` link.
    pub fn action_result_url(&self) -> Result<&str, ClientError> {
        find_by_rel(&self.links, ACTION_RESULT_REL)
    }
}

/// A named occurrence with a payload: a command result or a spontaneous
/// observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event name, matching a declared event definition.
    pub event: String,
    /// Opaque payload.
    #[serde(default)]
    pub payload: Option<String>,
}

/// A command as declared to (and echoed by) the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Dispatch key, unique within a pack.
    pub name: String,
    /// Names of the events this command may emit.
    #[serde(default)]
    pub events: Vec<String>,
    /// Help links, if any.
    #[serde(default)]
    pub links: Vec<Link>,
}

/// An event definition as declared to (and echoed by) the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDef {
    /// Event name.
    pub name: String,
    /// Help links, if any.
    #[serde(default)]
    pub links: Vec<Link>,
}

/// A pack as sent to the server for registration, and as echoed back
/// augmented with discovery links (the registered pack).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pack {
    /// Pack name.
    pub name: String,
    /// Free-form labels.
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// Discovery links. Empty before registration; the registered echo must
    /// carry the take-action and event relations.
    #[serde(default)]
    pub links: Vec<Link>,
    /// Commands this pack exposes.
    #[serde(default)]
    pub commands: Vec<Command>,
    /// Events this pack may emit.
    #[serde(default)]
    pub events: Vec<EventDef>,
}

impl Pack {
    /// URL for polling the next action.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::LinkNotFound`] when the registered pack carries
    /// no `takeAction` link.
    pub fn take_action_url(&self) -> Result<&str, ClientError> {
        find_by_rel(&self.links, TAKE_ACTION_REL)
    }

    /// URL for posting events.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::LinkNotFound`] when the registered pack carries
    /// no `event` link.
    pub fn events_url(&self) -> Result<&str, ClientError> {
        find_by_rel(&self.links, EVENT_REL)
    }
}

/// The body of the server's versioned root: its discovery links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootLinks {
    /// Discovery links for the whole API.
    #[serde(default)]
    pub links: Vec<Link>,
}
