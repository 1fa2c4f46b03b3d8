//! Human-readable explanations for rule failures.
//!
//! # Responsibilities
//! - Map (entity kind, field name, rule kind) to a message template
//! - Substitute the failing entity's identifier into templates at
//!   formatting time, so one template serves every instance
//! - Fall back to a generic message when no template is registered, so a
//!   violation is never silently dropped
//!
//! # Design Decisions
//! - The table is a plain immutable value, constructed once and handed to
//!   the validator; nothing registers into it at runtime

use std::collections::BTreeMap;

use crate::config::rules::{EntityKind, RuleKind};

/// Placeholder replaced by the failing entity's identifier.
const ID_PLACEHOLDER: &str = "{id}";

/// Immutable lookup table of message templates.
#[derive(Debug, Clone)]
pub struct Explanations {
    entries: BTreeMap<(EntityKind, &'static str, RuleKind), &'static str>,
}

impl Explanations {
    /// Build the standard message table.
    pub fn new() -> Self {
        use EntityKind::{Base, Cert, Network, User};
        use RuleKind::{MaxLength, MinCount, MinValue, Required};

        let mut entries = BTreeMap::new();

        entries.insert(
            (Base, "title", Required),
            "Title not supplied, using default title 'Zounce Configuration'.",
        );
        entries.insert(
            (Base, "port", Required),
            "Port not supplied, using default port.",
        );
        entries.insert((Base, "port", MinValue), "Port must be greater than 0.");
        entries.insert(
            (Base, "ca_path", Required),
            "You must specify the CA for your user certificates to validate against.",
        );
        entries.insert(
            (Base, "users", MinCount),
            "You must specify at least one user in order to use zounce.",
        );

        entries.insert(
            (User, "nick", Required),
            "You must specify a nickname in order to connect to an IRC server.",
        );
        entries.insert(
            (User, "nick", MaxLength),
            "Nickname can only be 9 characters long.",
        );
        entries.insert(
            (User, "alt_nick", Required),
            "You must specify an alternate nickname in order to connect to an IRC server.",
        );
        entries.insert(
            (User, "alt_nick", MaxLength),
            "Alternate nickname can only be 9 characters long.",
        );
        entries.insert(
            (User, "logging.adapter", Required),
            "An adapter is required. Valid options: SQLite3, Flatfile.",
        );
        entries.insert(
            (User, "logging.database", Required),
            "You must specify the name of the logging database.",
        );
        entries.insert(
            (User, "certs", MinCount),
            "You must specify at least one certificate in order to authenticate to zounce.",
        );
        entries.insert(
            (User, "networks", MinCount),
            "You must specify at least one network in order to use zounce.",
        );

        entries.insert(
            (Network, "name", Required),
            "You must specify a name for this network!",
        );
        entries.insert(
            (Network, "servers", MinCount),
            "You must specify at least one server in order to use this network with zounce.",
        );

        entries.insert(
            (Cert, "cert_path", Required),
            "You must specify the path to the '{id}' certificate.",
        );

        Self { entries }
    }

    /// Look up the raw template for a failure. `None` when unregistered.
    ///
    /// Field names are schema constants, hence `&'static str`.
    pub fn explain(
        &self,
        entity: EntityKind,
        field: &'static str,
        rule: RuleKind,
    ) -> Option<&'static str> {
        self.entries.get(&(entity, field, rule)).copied()
    }

    /// The rendered message for a failure: the registered template with the
    /// entity identifier substituted, or a generic fallback naming the rule
    /// and field so the violation still surfaces.
    pub fn message_for(
        &self,
        entity: EntityKind,
        field: &'static str,
        rule: RuleKind,
        id: &str,
    ) -> String {
        match self.explain(entity, field, rule) {
            Some(template) => template.replace(ID_PLACEHOLDER, id),
            None => format!("unknown error for rule '{rule}' on field '{field}'"),
        }
    }
}

impl Default for Explanations {
    fn default() -> Self {
        Self::new()
    }
}
