//! zounce — a certificate-authenticated IRC bouncer.
//!
//! # Architecture Overview
//!
//! ```text
//!   config.toml ──▶ config::loader ──▶ config::validation ──▶ Config
//!                        │                    │
//!                        │                    └─▶ violations, rendered
//!                        │                        one line per problem
//!                        ▼
//!                  config::defaults (missing title/port become defaults)
//!
//!   IRC client ──TLS──▶ net::listener ──▶ byte relay
//!                        (client cert checked against config ca_path)
//!
//!   irc::client ──TCP──▶ upstream networks (NICK/USER, perform, PONG)
//! ```
//!
//! The config subsystem is the substantial part: a recursive validator that
//! mirrors the document's shape in its error report. The network surfaces
//! are deliberately thin.

// Core subsystems
pub mod config;
pub mod irc;
pub mod net;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::{load_config, Config, ConfigError};
pub use lifecycle::Shutdown;
