//! Mapping between the domain vocabulary and the wire vocabulary.
//!
//! The server speaks in flat names and links: a command's output events
//! become a list of event names, and a help URL becomes a link with the
//! `help` relation. All conversions here are pure.

use courier_types::wire;

use crate::domain::{Command, Event, EventDef, PackDef};

/// Relation used for documentation links.
const HELP_REL: &str = "help";

/// Convert a pack definition into its wire representation for registration.
///
/// The wire pack's event list is the pack's spontaneous events followed by
/// every command's output events, flattened in declaration order.
#[must_use]
pub fn to_wire_pack(def: &PackDef) -> wire::Pack {
    let mut events: Vec<wire::EventDef> = def.event_defs.iter().map(to_wire_event_def).collect();
    events.extend(
        def.commands
            .iter()
            .flat_map(|c| c.output_events.iter())
            .map(to_wire_event_def),
    );

    wire::Pack {
        name: def.name.clone(),
        labels: def.labels.clone(),
        links: help_link(def.help_url.as_deref()),
        commands: def.commands.iter().map(to_wire_command).collect(),
        events,
    }
}

/// Convert a domain event into its wire representation.
#[must_use]
pub fn to_wire_event(event: &Event) -> wire::Event {
    wire::Event {
        event: event.event_def.name.clone(),
        payload: Some(event.payload.clone()),
    }
}

/// Convert a command, flattening its output events to their names.
fn to_wire_command(command: &Command) -> wire::Command {
    wire::Command {
        name: command.name.clone(),
        events: command.output_events.iter().map(|e| e.name.clone()).collect(),
        links: help_link(command.help_url.as_deref()),
    }
}

/// Convert an event definition, turning its help URL into a help link.
fn to_wire_event_def(def: &EventDef) -> wire::EventDef {
    wire::EventDef {
        name: def.name.clone(),
        links: help_link(def.help_url.as_deref()),
    }
}

/// A help URL becomes a single link with the `help` relation; none becomes
/// no links at all.
fn help_link(help_url: Option<&str>) -> Vec<wire::Link> {
    match help_url {
        Some(url) => vec![wire::Link {
            href: url.to_string(),
            rel: HELP_REL.to_string(),
        }],
        None => vec![],
    }
}
