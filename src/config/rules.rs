//! Validation rule registry.
//!
//! # Responsibilities
//! - Map (entity kind, field name) to an ordered list of rules
//! - Evaluate individual rules as pure predicates over field values
//!
//! # Design Decisions
//! - The registry is a plain immutable value handed to the validator at
//!   construction; there is no global registration step
//! - Rules for one field apply in declaration order and stop at the first
//!   failure, so an empty nickname reports "required" but not also "too long"
//! - Map fields carry their own rules (e.g. `certs` must be non-empty);
//!   whether `networks` is required is a per-registry knob

use std::collections::BTreeMap;
use std::fmt;

/// The schema category of a config node, used to select rules and
/// explanation templates and to tag violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    /// The document root.
    Base,
    /// A user entry under `[users.<name>]`.
    User,
    /// A network entry under `[users.<name>.networks.<label>]`.
    Network,
    /// A certificate entry under `[users.<name>.certs.<label>]`.
    Cert,
}

/// The category of constraint a rule enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleKind {
    /// Value must be non-zero (non-empty string, non-zero number, non-empty
    /// collection).
    Required,
    /// String length must not exceed a limit.
    MaxLength,
    /// String length must meet a minimum.
    MinLength,
    /// Collection must hold at least N entries.
    MinCount,
    /// Number must be at least N.
    MinValue,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::Required => "required",
            RuleKind::MaxLength => "max length",
            RuleKind::MinLength => "min length",
            RuleKind::MinCount => "min count",
            RuleKind::MinValue => "min value",
        };
        f.write_str(name)
    }
}

/// A borrowed view of a single field value, shaped for rule evaluation.
///
/// The validator builds these from the typed document; rules never touch the
/// document directly.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    /// A string field.
    Text(&'a str),
    /// An integer field.
    Number(i64),
    /// An ordered list field.
    Items(&'a [String]),
    /// A map field, reduced to its entry count.
    Entries(usize),
}

impl FieldValue<'_> {
    /// Whether this value is the zero value for its shape. Absent fields
    /// decode to zero, so "zero" and "missing" are the same condition.
    fn is_zero(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Number(n) => *n == 0,
            FieldValue::Items(items) => items.is_empty(),
            FieldValue::Entries(count) => *count == 0,
        }
    }

    /// Length of the value: characters for text, entries for collections.
    fn len(&self) -> usize {
        match self {
            FieldValue::Text(s) => s.chars().count(),
            FieldValue::Number(_) => 0,
            FieldValue::Items(items) => items.len(),
            FieldValue::Entries(count) => *count,
        }
    }
}

/// A single validation rule: a predicate plus its kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Value must be non-zero.
    Required,
    /// Length must be at most the limit.
    MaxLength(usize),
    /// Length must be at least the limit.
    MinLength(usize),
    /// Collection must hold at least this many entries.
    MinCount(usize),
    /// Number must be at least this value.
    MinValue(i64),
}

impl Rule {
    /// The kind tag for this rule, used for explanation lookup.
    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Required => RuleKind::Required,
            Rule::MaxLength(_) => RuleKind::MaxLength,
            Rule::MinLength(_) => RuleKind::MinLength,
            Rule::MinCount(_) => RuleKind::MinCount,
            Rule::MinValue(_) => RuleKind::MinValue,
        }
    }

    /// Evaluate the rule. Returns true when the value passes.
    pub fn check(&self, value: &FieldValue<'_>) -> bool {
        match self {
            Rule::Required => !value.is_zero(),
            Rule::MaxLength(limit) => value.len() <= *limit,
            Rule::MinLength(limit) => value.len() >= *limit,
            Rule::MinCount(limit) => value.len() >= *limit,
            Rule::MinValue(limit) => match value {
                FieldValue::Number(n) => *n >= *limit,
                _ => true,
            },
        }
    }
}

/// Immutable lookup table from (entity kind, field name) to ordered rules.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: BTreeMap<(EntityKind, &'static str), Vec<Rule>>,
}

impl Registry {
    /// Build the standard rule table.
    ///
    /// Certs are strictly required per user; networks are optional by
    /// default (see [`Registry::require_networks`]).
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();

        entries.insert((EntityKind::Base, "title"), vec![Rule::Required]);
        entries.insert(
            (EntityKind::Base, "port"),
            vec![Rule::Required, Rule::MinValue(1)],
        );
        entries.insert((EntityKind::Base, "ca_path"), vec![Rule::Required]);
        entries.insert((EntityKind::Base, "users"), vec![Rule::MinCount(1)]);

        entries.insert(
            (EntityKind::User, "nick"),
            vec![Rule::Required, Rule::MaxLength(9)],
        );
        entries.insert(
            (EntityKind::User, "alt_nick"),
            vec![Rule::Required, Rule::MaxLength(9)],
        );
        entries.insert((EntityKind::User, "logging.adapter"), vec![Rule::Required]);
        entries.insert((EntityKind::User, "logging.database"), vec![Rule::Required]);
        entries.insert((EntityKind::User, "certs"), vec![Rule::MinCount(1)]);
        entries.insert((EntityKind::User, "networks"), Vec::new());

        entries.insert((EntityKind::Network, "name"), vec![Rule::Required]);
        entries.insert((EntityKind::Network, "servers"), vec![Rule::MinCount(1)]);

        entries.insert((EntityKind::Cert, "cert_path"), vec![Rule::Required]);

        Self { entries }
    }

    /// Toggle whether each user must configure at least one network.
    pub fn require_networks(mut self, required: bool) -> Self {
        let rules = if required {
            vec![Rule::MinCount(1)]
        } else {
            Vec::new()
        };
        self.entries.insert((EntityKind::User, "networks"), rules);
        self
    }

    /// Rules for a field, in declaration order. Unknown fields have none.
    ///
    /// Field names are schema constants, hence `&'static str`.
    pub fn rules_for(&self, entity: EntityKind, field: &'static str) -> &[Rule] {
        self.entries
            .get(&(entity, field))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_zero_values() {
        assert!(!Rule::Required.check(&FieldValue::Text("")));
        assert!(!Rule::Required.check(&FieldValue::Number(0)));
        assert!(!Rule::Required.check(&FieldValue::Items(&[])));
        assert!(!Rule::Required.check(&FieldValue::Entries(0)));
        assert!(Rule::Required.check(&FieldValue::Text("zamn")));
        assert!(Rule::Required.check(&FieldValue::Number(7777)));
    }

    #[test]
    fn max_length_counts_characters() {
        assert!(Rule::MaxLength(9).check(&FieldValue::Text("zamn92")));
        assert!(!Rule::MaxLength(9).check(&FieldValue::Text("zamn92zamn92")));
        // Multi-byte characters count once.
        assert!(Rule::MaxLength(3).check(&FieldValue::Text("äöü")));
    }

    #[test]
    fn min_count_applies_to_collections() {
        let servers = vec!["irc.gamesurge.net:6666".to_string()];
        assert!(Rule::MinCount(1).check(&FieldValue::Items(&servers)));
        assert!(!Rule::MinCount(1).check(&FieldValue::Items(&[])));
        assert!(!Rule::MinCount(1).check(&FieldValue::Entries(0)));
        assert!(Rule::MinCount(1).check(&FieldValue::Entries(3)));
    }

    #[test]
    fn min_value_only_constrains_numbers() {
        assert!(Rule::MinValue(1).check(&FieldValue::Number(7777)));
        assert!(!Rule::MinValue(1).check(&FieldValue::Number(0)));
        assert!(Rule::MinValue(1).check(&FieldValue::Text("not a number")));
    }

    #[test]
    fn rules_are_in_declaration_order() {
        let registry = Registry::new();
        let rules = registry.rules_for(EntityKind::User, "nick");
        assert_eq!(rules, &[Rule::Required, Rule::MaxLength(9)]);
    }

    #[test]
    fn unknown_field_has_no_rules() {
        let registry = Registry::new();
        assert!(registry.rules_for(EntityKind::User, "realname").is_empty());
    }

    #[test]
    fn networks_requirement_is_a_knob() {
        let relaxed = Registry::new();
        assert!(relaxed
            .rules_for(EntityKind::User, "networks")
            .is_empty());

        let strict = Registry::new().require_networks(true);
        assert_eq!(
            strict.rules_for(EntityKind::User, "networks"),
            &[Rule::MinCount(1)]
        );
    }
}
