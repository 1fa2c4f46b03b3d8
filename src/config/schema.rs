//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bouncer.
//! All types derive Serde traits for deserialization from config files.
//!
//! Every struct opts into `#[serde(default)]`: a field absent from the source
//! text decodes to its zero value (empty string, zero integer, empty map).
//! The validation engine treats zero and absent identically, so the decoder
//! never produces a sentinel distinct from the default.
//!
//! Maps are `BTreeMap` rather than `HashMap` so that every walk over users,
//! certs, or networks observes entries in sorted key order. Validation output
//! is therefore reproducible across runs without a sort step in the engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the bouncer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Display title for this instance.
    pub title: String,

    /// Port the TLS listener binds to. Kept as a plain integer so an
    /// out-of-range value reaches validation instead of failing decode.
    pub port: i64,

    /// Path to the CA bundle that client certificates are verified against.
    pub ca_path: String,

    /// Per-user configuration, keyed by user name.
    pub users: BTreeMap<String, UserConfig>,
}

/// Configuration for a single bouncer user.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UserConfig {
    /// IRC nickname. The protocol caps nicknames at 9 characters.
    pub nick: String,

    /// Fallback nickname used when `nick` is taken. Same 9 character cap.
    pub alt_nick: String,

    /// IRC username (ident).
    pub username: String,

    /// Free-form real name sent at registration.
    pub realname: String,

    /// Message logging settings for this user.
    pub logging: LogConfig,

    /// Client certificates accepted for this user, keyed by label.
    pub certs: BTreeMap<String, CertConfig>,

    /// IRC networks this user connects to, keyed by network label.
    pub networks: BTreeMap<String, NetworkConfig>,
}

/// Message logging settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Storage adapter name (e.g. "SQLite3", "Flatfile").
    pub adapter: String,

    /// Name of the logging database.
    pub database: String,
}

/// A client certificate a user may authenticate with.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CertConfig {
    /// Filesystem location of the certificate. Existence is not checked at
    /// validation time; the TLS layer surfaces unreadable files on startup.
    #[serde(rename = "cert_path")]
    pub path: String,
}

/// A single IRC network a user connects to.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Human-readable network name.
    pub name: String,

    /// Servers to try, in order, as `host:port` strings.
    pub servers: Vec<String>,

    /// Optional server password.
    pub password: Option<String>,

    /// Actions performed after connecting.
    pub perform: PerformConfig,
}

/// Post-connect actions for a network. Not validated; free-form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PerformConfig {
    /// Channels to join after registration.
    pub channels: Vec<String>,

    /// Raw commands to send after registration.
    pub commands: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_decode_to_zero_values() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.title.is_empty());
        assert_eq!(config.port, 0);
        assert!(config.users.is_empty());
    }

    #[test]
    fn nested_tables_decode() {
        let text = r##"
            title = "test"
            port = 7777
            ca_path = "certs/ca.crt"

            [users.zamn]
            nick = "zamn"
            alt_nick = "zamn92"

            [users.zamn.certs.desktop]
            cert_path = "certs/zamn.crt"

            [users.zamn.networks.GameSurge]
            name = "The GameSurge Network"
            servers = ["irc.gamesurge.net:6666"]

            [users.zamn.networks.GameSurge.perform]
            channels = ["#zamN"]
        "##;

        let config: Config = toml::from_str(text).unwrap();
        let user = &config.users["zamn"];
        assert_eq!(user.nick, "zamn");
        assert_eq!(user.certs["desktop"].path, "certs/zamn.crt");
        let net = &user.networks["GameSurge"];
        assert_eq!(net.servers, vec!["irc.gamesurge.net:6666"]);
        assert_eq!(net.perform.channels, vec!["#zamN"]);
        assert!(net.password.is_none());
    }

    #[test]
    fn map_iteration_is_key_sorted() {
        let text = r#"
            [users.zebra]
            [users.alpha]
            [users.mike]
        "#;

        let config: Config = toml::from_str(text).unwrap();
        let names: Vec<&str> = config.users.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["alpha", "mike", "zebra"]);
    }
}
