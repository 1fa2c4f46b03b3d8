//! TLS listener with backpressure.
//!
//! # Responsibilities
//! - Bind the configured port and accept incoming TCP connections
//! - Complete a server-side TLS handshake (client certificate required)
//! - Enforce a concurrent connection limit via semaphore
//! - Relay bytes back to the client until EOF
//!
//! # Design Decisions
//! - A failed handshake closes that connection and logs; the accept loop
//!   keeps running
//! - Shutdown is cooperative: the loop exits between accepts when signalled

use std::net::SocketAddr;
use std::sync::Arc;

use rustls::ServerConfig;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tokio_rustls::server::TlsStream;
use tokio_rustls::TlsAcceptor;

use crate::lifecycle::Shutdown;

/// Default cap on concurrent client connections.
pub const DEFAULT_MAX_CONNECTIONS: usize = 1024;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Configured port does not fit a TCP port.
    #[error("cannot listen on port {0}")]
    InvalidPort(i64),

    /// Failed to bind to the address.
    #[error("failed to bind: {0}")]
    Bind(#[source] std::io::Error),

    /// Failed to accept a connection.
    #[error("failed to accept: {0}")]
    Accept(#[source] std::io::Error),
}

/// A bounded TLS listener.
///
/// Uses a semaphore to enforce the connection limit. When the limit is
/// reached, new connections wait until a slot becomes available.
pub struct Listener {
    /// The underlying TCP listener.
    inner: TcpListener,
    /// Performs the server-side handshake per connection.
    acceptor: TlsAcceptor,
    /// Semaphore to limit concurrent connections.
    connection_limit: Arc<Semaphore>,
}

impl Listener {
    /// Bind the configured port on all interfaces.
    pub async fn bind(
        port: i64,
        tls: Arc<ServerConfig>,
        max_connections: usize,
    ) -> Result<Self, ListenerError> {
        let port = listen_port(port)?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let listener = TcpListener::bind(addr).await.map_err(ListenerError::Bind)?;
        let local_addr = listener.local_addr().map_err(ListenerError::Bind)?;

        tracing::info!(
            address = %local_addr,
            max_connections,
            "Listener bound"
        );

        Ok(Self {
            inner: listener,
            acceptor: TlsAcceptor::from(tls),
            connection_limit: Arc::new(Semaphore::new(max_connections)),
        })
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }

    /// Get current available connection slots.
    pub fn available_permits(&self) -> usize {
        self.connection_limit.available_permits()
    }

    /// Accept connections until shutdown is signalled.
    ///
    /// Each accepted connection is handed to its own task: TLS handshake,
    /// then an echo relay until the client hangs up.
    pub async fn run(&self, shutdown: &Shutdown) -> Result<(), ListenerError> {
        let mut stop = shutdown.watcher();

        loop {
            // Acquire the permit first (backpressure), then accept.
            let permit = self
                .connection_limit
                .clone()
                .acquire_owned()
                .await
                .expect("Semaphore closed unexpectedly");

            tokio::select! {
                _ = stop.wait() => {
                    tracing::info!("Listener stopping");
                    return Ok(());
                }
                accepted = self.inner.accept() => {
                    let (stream, peer) = accepted.map_err(ListenerError::Accept)?;
                    let acceptor = self.acceptor.clone();

                    tokio::spawn(async move {
                        let _permit = permit;
                        match acceptor.accept(stream).await {
                            Ok(tls_stream) => {
                                tracing::debug!(peer = %peer, "Connection accepted");
                                if let Err(err) = relay(tls_stream).await {
                                    tracing::debug!(peer = %peer, error = %err, "Relay ended");
                                }
                            }
                            Err(err) => {
                                tracing::warn!(peer = %peer, error = %err, "TLS handshake failed");
                            }
                        }
                    });
                }
            }
        }
    }
}

/// Convert the validated config port into a TCP port.
fn listen_port(port: i64) -> Result<u16, ListenerError> {
    u16::try_from(port).map_err(|_| ListenerError::InvalidPort(port))
}

/// Copy bytes from the client back to the client until EOF.
async fn relay(stream: TlsStream<TcpStream>) -> std::io::Result<u64> {
    let (mut reader, mut writer) = tokio::io::split(stream);
    tokio::io::copy(&mut reader, &mut writer).await
}
