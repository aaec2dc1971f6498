#![doc = include_str!("../README.md")]

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod handler;
pub mod mapping;
pub mod pack;

pub use config::PackConfig;
pub use dispatch::DispatchTable;
pub use domain::{Command, Event, EventDef, FATAL_EVENT_NAME, PackDef};
pub use error::PackError;
pub use handler::Handler;
pub use pack::Pack;

// Re-export courier-types for convenience
pub use courier_types::{ClientError, Gateway, wire};
