//! IRC protocol layer: line parsing and a minimal client session.

pub mod client;
pub mod message;

pub use client::{connect_network, ClientError, Session};
pub use message::{Message, ParseError};
