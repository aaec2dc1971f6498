#![doc = include_str!("../README.md")]

pub mod client;
pub(crate) mod error;

pub use client::{Client, ClientBuilder};

// Re-export courier-types for convenience
pub use courier_types::{ClientError, Gateway, wire};
