//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Walk the document top-down, applying the rule registry per field
//! - Recurse into map-valued fields and scope nested failures to their entry
//!
//! # Design Decisions
//! - Returns all violations, not just the first: one entity's failure never
//!   prevents evaluation of its siblings
//! - Validation is a pure function of the document; no I/O, no shared state
//! - Rules for one field stop at the first failure; different fields of the
//!   same entity all report
//! - A required map that is empty yields a single leaf for the field itself
//!   and is not recursed into
//! - Recursion depth is fixed by the schema (root → user → network/cert),
//!   so no depth guard is needed

use std::collections::BTreeMap;

use crate::config::explain::Explanations;
use crate::config::rules::{EntityKind, FieldValue, Registry};
use crate::config::schema::{CertConfig, Config, NetworkConfig, UserConfig};
use crate::config::violation::Violation;

/// The validation engine: a rule registry plus an explanation table, both
/// immutable after construction. Safe to share across threads and reuse
/// across documents.
#[derive(Debug, Clone)]
pub struct Validator {
    registry: Registry,
    explanations: Explanations,
}

impl Validator {
    /// Build a validator from explicit lookup tables.
    pub fn new(registry: Registry, explanations: Explanations) -> Self {
        Self {
            registry,
            explanations,
        }
    }

    /// Validate a whole document. An empty result means the document passed.
    ///
    /// Root fields are checked in declaration order (title, port, ca_path),
    /// then the users map. Map entries are visited in sorted key order, so
    /// repeated runs over the same document render identically.
    pub fn validate(&self, config: &Config) -> Vec<Violation> {
        let mut out = Vec::new();

        self.check_field(
            EntityKind::Base,
            "title",
            FieldValue::Text(&config.title),
            "",
            &mut out,
        );
        self.check_field(
            EntityKind::Base,
            "port",
            FieldValue::Number(config.port),
            "",
            &mut out,
        );
        self.check_field(
            EntityKind::Base,
            "ca_path",
            FieldValue::Text(&config.ca_path),
            "",
            &mut out,
        );

        self.walk_map(
            EntityKind::Base,
            "users",
            EntityKind::User,
            &config.users,
            "",
            |key, user| self.validate_user(key, user),
            &mut out,
        );

        out
    }

    /// Validate one user entry. Returns the user's own field failures plus
    /// wrapped failures from its certs and networks.
    fn validate_user(&self, name: &str, user: &UserConfig) -> Vec<Violation> {
        let mut out = Vec::new();

        self.check_field(
            EntityKind::User,
            "nick",
            FieldValue::Text(&user.nick),
            name,
            &mut out,
        );
        self.check_field(
            EntityKind::User,
            "alt_nick",
            FieldValue::Text(&user.alt_nick),
            name,
            &mut out,
        );
        self.check_field(
            EntityKind::User,
            "logging.adapter",
            FieldValue::Text(&user.logging.adapter),
            name,
            &mut out,
        );
        self.check_field(
            EntityKind::User,
            "logging.database",
            FieldValue::Text(&user.logging.database),
            name,
            &mut out,
        );

        self.walk_map(
            EntityKind::User,
            "certs",
            EntityKind::Cert,
            &user.certs,
            name,
            |key, cert| self.validate_cert(key, cert),
            &mut out,
        );
        self.walk_map(
            EntityKind::User,
            "networks",
            EntityKind::Network,
            &user.networks,
            name,
            |key, network| self.validate_network(key, network),
            &mut out,
        );

        out
    }

    fn validate_network(&self, label: &str, network: &NetworkConfig) -> Vec<Violation> {
        let mut out = Vec::new();
        self.check_field(
            EntityKind::Network,
            "name",
            FieldValue::Text(&network.name),
            label,
            &mut out,
        );
        self.check_field(
            EntityKind::Network,
            "servers",
            FieldValue::Items(&network.servers),
            label,
            &mut out,
        );
        out
    }

    fn validate_cert(&self, label: &str, cert: &CertConfig) -> Vec<Violation> {
        let mut out = Vec::new();
        self.check_field(
            EntityKind::Cert,
            "cert_path",
            FieldValue::Text(&cert.path),
            label,
            &mut out,
        );
        out
    }

    /// Apply a field's rules in order, collecting at most one leaf: once a
    /// rule fails, the field's remaining rules are skipped to avoid
    /// cascading noise.
    fn check_field(
        &self,
        entity: EntityKind,
        field: &'static str,
        value: FieldValue<'_>,
        instance: &str,
        out: &mut Vec<Violation>,
    ) {
        for rule in self.registry.rules_for(entity, field) {
            if !rule.check(&value) {
                let message = self
                    .explanations
                    .message_for(entity, field, rule.kind(), instance);
                out.push(Violation::leaf(entity, field, rule.kind(), message));
                return;
            }
        }
    }

    /// Check a map field's own rules, then recurse into each entry.
    ///
    /// A failing map rule (e.g. required but empty) produces one leaf for
    /// the field and suppresses recursion. Otherwise every entry is
    /// validated as its own entity; non-empty results are wrapped in a
    /// container tagged with the entry's key.
    fn walk_map<T>(
        &self,
        parent: EntityKind,
        field: &'static str,
        entry_kind: EntityKind,
        entries: &BTreeMap<String, T>,
        instance: &str,
        validate_entry: impl Fn(&str, &T) -> Vec<Violation>,
        out: &mut Vec<Violation>,
    ) {
        let before = out.len();
        self.check_field(
            parent,
            field,
            FieldValue::Entries(entries.len()),
            instance,
            out,
        );
        if out.len() > before {
            return;
        }

        for (key, value) in entries {
            let children = validate_entry(key, value);
            if !children.is_empty() {
                out.push(Violation::container(entry_kind, key, children));
            }
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(Registry::new(), Explanations::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::rules::RuleKind;
    use crate::config::schema::LogConfig;
    use crate::config::violation::render_all;

    fn valid_config() -> Config {
        let mut config = Config {
            title: "Zounce Configuration".to_string(),
            port: 7777,
            ca_path: "certs/ca.crt".to_string(),
            users: BTreeMap::new(),
        };
        config.users.insert("zamn".to_string(), valid_user());
        config
    }

    fn valid_user() -> UserConfig {
        let mut user = UserConfig {
            nick: "zamn".to_string(),
            alt_nick: "zamn92".to_string(),
            username: "zamn".to_string(),
            realname: "Adam".to_string(),
            logging: LogConfig {
                adapter: "SQLite3".to_string(),
                database: "zounce".to_string(),
            },
            certs: BTreeMap::new(),
            networks: BTreeMap::new(),
        };
        user.certs.insert(
            "desktop".to_string(),
            CertConfig {
                path: "certs/zamn.crt".to_string(),
            },
        );
        user.networks.insert(
            "GameSurge".to_string(),
            NetworkConfig {
                name: "The GameSurge Network".to_string(),
                servers: vec!["irc.gamesurge.net:6666".to_string()],
                password: None,
                perform: Default::default(),
            },
        );
        user
    }

    #[test]
    fn valid_document_yields_nothing() {
        let validator = Validator::default();
        assert!(validator.validate(&valid_config()).is_empty());
    }

    #[test]
    fn empty_document_reports_each_root_field_once() {
        let validator = Validator::default();
        let violations = validator.validate(&Config::default());

        // One leaf per required root field plus one for the empty users map,
        // in declaration order; nothing to recurse into.
        let ids: Vec<&str> = violations.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["title", "port", "ca_path", "users"]);
        assert!(violations.iter().all(Violation::is_leaf));
    }

    #[test]
    fn zero_port_reports_required_not_min_value() {
        let validator = Validator::default();
        let violations = validator.validate(&Config::default());
        let port = violations
            .iter()
            .find(|v| v.id == "port")
            .expect("port violation");
        match &port.detail {
            crate::config::violation::Detail::Leaf { rule, .. } => {
                assert_eq!(*rule, RuleKind::Required)
            }
            other => panic!("expected leaf, got {other:?}"),
        }
    }

    #[test]
    fn user_failures_are_scoped_to_the_user() {
        let mut config = valid_config();
        let user = config.users.get_mut("zamn").unwrap();
        user.nick.clear();
        user.alt_nick.clear();
        user.logging = LogConfig::default();

        let validator = Validator::default();
        let lines = render_all(&validator.validate(&config));

        assert_eq!(lines.len(), 4);
        for line in &lines {
            assert!(
                line.starts_with("[users.zamn] -> "),
                "unexpected line {line}"
            );
        }
        // Distinct lines, never one merged string.
        assert!(lines.contains(
            &"[users.zamn] -> You must specify a nickname in order to connect to an IRC server."
                .to_string()
        ));
        assert!(lines.contains(
            &"[users.zamn] -> You must specify an alternate nickname in order to connect to an IRC server."
                .to_string()
        ));
    }

    #[test]
    fn broken_network_chains_through_both_containers() {
        let mut config = valid_config();
        let user = config.users.get_mut("zamn").unwrap();
        let network = user.networks.get_mut("GameSurge").unwrap();
        network.name.clear();
        network.servers.clear();

        let validator = Validator::default();
        let lines = render_all(&validator.validate(&config));

        assert_eq!(
            lines,
            vec![
                "[users.zamn] -> [networks.GameSurge] -> You must specify a name for this network!",
                "[users.zamn] -> [networks.GameSurge] -> You must specify at least one server in order to use this network with zounce.",
            ]
        );
    }

    #[test]
    fn empty_certs_map_is_one_leaf_without_recursion() {
        let mut config = valid_config();
        config.users.get_mut("zamn").unwrap().certs.clear();

        let validator = Validator::default();
        let violations = validator.validate(&config);
        let lines = render_all(&violations);

        assert_eq!(
            lines,
            vec![
                "[users.zamn] -> You must specify at least one certificate in order to authenticate to zounce."
            ]
        );
    }

    #[test]
    fn cert_message_names_the_failing_entry() {
        let mut config = valid_config();
        let user = config.users.get_mut("zamn").unwrap();
        user.certs.get_mut("desktop").unwrap().path.clear();

        let validator = Validator::default();
        let lines = render_all(&validator.validate(&config));

        assert_eq!(
            lines,
            vec![
                "[users.zamn] -> [certs.desktop] -> You must specify the path to the 'desktop' certificate."
            ]
        );
    }

    #[test]
    fn empty_networks_map_is_silent_by_default() {
        let mut config = valid_config();
        config.users.get_mut("zamn").unwrap().networks.clear();

        let validator = Validator::default();
        assert!(validator.validate(&config).is_empty());
    }

    #[test]
    fn empty_networks_map_reports_when_required() {
        let mut config = valid_config();
        config.users.get_mut("zamn").unwrap().networks.clear();

        let validator = Validator::new(
            Registry::new().require_networks(true),
            Explanations::new(),
        );
        let lines = render_all(&validator.validate(&config));
        assert_eq!(
            lines,
            vec!["[users.zamn] -> You must specify at least one network in order to use zounce."]
        );
    }

    #[test]
    fn sibling_users_all_report() {
        let mut config = valid_config();
        let mut broken = valid_user();
        broken.nick.clear();
        config.users.insert("alice".to_string(), broken.clone());
        config.users.insert("bob".to_string(), broken);

        let validator = Validator::default();
        let lines = render_all(&validator.validate(&config));

        // BTreeMap order: alice, bob (zamn is clean).
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[users.alice] -> "));
        assert!(lines[1].starts_with("[users.bob] -> "));
    }

    #[test]
    fn validation_is_idempotent() {
        let mut config = valid_config();
        config.ca_path.clear();
        let user = config.users.get_mut("zamn").unwrap();
        user.networks.get_mut("GameSurge").unwrap().servers.clear();

        let validator = Validator::default();
        let first = render_all(&validator.validate(&config));
        let second = render_all(&validator.validate(&config));
        assert_eq!(first, second);
    }

    #[test]
    fn rendered_lines_match_leaf_count() {
        let mut config = Config::default();
        config.users.insert("a".to_string(), UserConfig::default());
        config.users.insert("b".to_string(), UserConfig::default());

        let validator = Validator::default();
        let violations = validator.validate(&config);
        let leaves: usize = violations.iter().map(Violation::leaf_count).sum();
        assert_eq!(render_all(&violations).len(), leaves);
    }
}
