#![doc = include_str!("../README.md")]

pub mod error;
pub mod gateway;
pub mod links;
pub mod wire;

pub use error::ClientError;
pub use gateway::Gateway;
pub use links::find_by_rel;
