//! Minimal IRC client session.
//!
//! # Responsibilities
//! - Connect to the first reachable server of a network
//! - Register with NICK/USER and run any configured perform actions
//! - Answer PING so the server keeps the connection alive
//!
//! No reconnect logic, no channel state: the session pumps messages until
//! the server hangs up.

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use crate::config::schema::{NetworkConfig, UserConfig};
use crate::irc::message::Message;

/// Error type for client sessions.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Every configured server refused the connection.
    #[error("no reachable server for network {0}")]
    NoServer(String),

    /// The session's connection failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One live connection to an IRC server.
pub struct Session {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Session {
    /// Open a TCP connection to `server` (a `host:port` string).
    pub async fn connect(server: &str) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(server).await?;
        let (read, write) = stream.into_split();
        Ok(Self {
            lines: BufReader::new(read).lines(),
            writer: write,
        })
    }

    /// Send one message.
    pub async fn send(&mut self, message: &Message) -> Result<(), ClientError> {
        let line = format!("{message}\r\n");
        self.writer.write_all(line.as_bytes()).await?;
        Ok(())
    }

    /// Introduce ourselves to the server.
    pub async fn register(
        &mut self,
        nick: &str,
        username: &str,
        realname: &str,
    ) -> Result<(), ClientError> {
        self.send(&Message::new("NICK", &[nick])).await?;
        self.send(&Message::new("USER", &[username, "0", "*", realname]))
            .await
    }

    /// Next parseable message, or `None` when the server hangs up.
    /// Unparseable lines are logged and skipped.
    pub async fn next(&mut self) -> Result<Option<Message>, ClientError> {
        while let Some(line) = self.lines.next_line().await? {
            match Message::parse(&line) {
                Ok(message) => return Ok(Some(message)),
                Err(err) => {
                    tracing::warn!(error = %err, line, "Skipping unparseable line");
                }
            }
        }
        Ok(None)
    }

    /// Pump messages until EOF, answering PING along the way.
    pub async fn run(&mut self) -> Result<(), ClientError> {
        while let Some(message) = self.next().await? {
            if message.command == "PING" {
                let token = message.params.first().map(String::as_str).unwrap_or("");
                self.send(&Message::pong(token)).await?;
            } else {
                tracing::debug!(
                    command = %message.command,
                    params = ?message.params,
                    "Event"
                );
            }
        }
        tracing::info!("Server closed the connection");
        Ok(())
    }
}

/// Connect a user to one of their configured networks and keep the session
/// alive until the server hangs up.
///
/// Servers are tried in configured order; the first that accepts the TCP
/// connection wins.
pub async fn connect_network(
    user: &UserConfig,
    label: &str,
    network: &NetworkConfig,
) -> Result<(), ClientError> {
    let mut session = None;
    for server in &network.servers {
        match Session::connect(server).await {
            Ok(connected) => {
                tracing::info!(network = %label, server = %server, "Connected");
                session = Some(connected);
                break;
            }
            Err(err) => {
                tracing::warn!(network = %label, server = %server, error = %err, "Connect failed");
            }
        }
    }
    let mut session = session.ok_or_else(|| ClientError::NoServer(label.to_string()))?;

    session
        .register(&user.nick, &user.username, &user.realname)
        .await?;

    for channel in &network.perform.channels {
        session.send(&Message::new("JOIN", &[channel])).await?;
    }
    for command in &network.perform.commands {
        match Message::parse(command) {
            Ok(message) => session.send(&message).await?,
            Err(err) => {
                tracing::warn!(error = %err, command, "Skipping unparseable perform command");
            }
        }
    }

    session.run().await
}
