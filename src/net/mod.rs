//! Network layer: TLS listener and certificate loading.
//!
//! Clients connect over TLS and authenticate with a client certificate
//! signed by the CA named in the config's `ca_path`. The accepted stream is
//! currently relayed back to the client; protocol handling lives in the
//! `irc` module.

pub mod listener;
pub mod tls;

pub use listener::{Listener, ListenerError, DEFAULT_MAX_CONNECTIONS};
pub use tls::{server_config, TlsError};
