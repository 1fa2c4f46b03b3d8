//! Default substitution for recoverable root violations.
//!
//! # Responsibilities
//! - Replace a missing title or port with a default instead of reporting it
//! - Pass every other violation through untouched
//!
//! # Design Decisions
//! - Only `Required` (zero value) failures are recoverable; a supplied but
//!   out-of-range port stays a hard violation
//! - Applies only at the document root: a missing user nickname is never
//!   defaulted
//! - The table is explicit and tiny; anything not listed here passes through

use crate::config::rules::{EntityKind, RuleKind};
use crate::config::schema::Config;
use crate::config::violation::{Detail, Violation};

/// Title used when the document supplies none.
pub const DEFAULT_TITLE: &str = "Zounce Configuration";

/// Port used when the document supplies none.
pub const DEFAULT_PORT: i64 = 7777;

/// The substitution table: root fields that may be defaulted, with the
/// values to fill in.
#[derive(Debug, Clone)]
pub struct Defaults {
    /// Replacement for a missing title.
    pub title: String,
    /// Replacement for a missing port.
    pub port: i64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Defaults {
    /// Resolve recoverable root violations by mutating the document, and
    /// return the violations that remain reportable.
    pub fn apply(&self, config: &mut Config, violations: Vec<Violation>) -> Vec<Violation> {
        let mut remaining = Vec::with_capacity(violations.len());
        for violation in violations {
            if self.recover(config, &violation) {
                continue;
            }
            remaining.push(violation);
        }
        remaining
    }

    /// Attempt to resolve one violation. True means it was absorbed.
    fn recover(&self, config: &mut Config, violation: &Violation) -> bool {
        if violation.entity != EntityKind::Base {
            return false;
        }
        let rule = match &violation.detail {
            Detail::Leaf { rule, .. } => *rule,
            Detail::Container(_) => return false,
        };
        if rule != RuleKind::Required {
            return false;
        }

        match violation.id.as_str() {
            "title" => {
                config.title = self.title.clone();
                true
            }
            "port" => {
                config.port = self.port;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::Validator;

    #[test]
    fn missing_title_and_port_are_absorbed() {
        let mut config = Config {
            ca_path: "certs/ca.crt".to_string(),
            ..Default::default()
        };
        config
            .users
            .insert("zamn".to_string(), crate::config::schema::UserConfig::default());

        let validator = Validator::default();
        let violations = validator.validate(&config);
        let before = violations.len();

        let remaining = Defaults::default().apply(&mut config, violations);

        // Exactly the title and port violations vanish; the document now
        // carries the configured defaults.
        assert_eq!(remaining.len(), before - 2);
        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(remaining.iter().all(|v| v.id != "title" && v.id != "port"));
    }

    #[test]
    fn only_required_failures_recover() {
        let mut config = Config::default();
        let min_value = Violation::leaf(
            EntityKind::Base,
            "port",
            RuleKind::MinValue,
            "Port must be greater than 0.",
        );
        let remaining = Defaults::default().apply(&mut config, vec![min_value.clone()]);
        assert_eq!(remaining, vec![min_value]);
        assert_eq!(config.port, 0);
    }

    #[test]
    fn nested_violations_pass_through() {
        let mut config = Config::default();
        let nested = Violation::container(
            EntityKind::User,
            "zamn",
            vec![Violation::leaf(
                EntityKind::User,
                "nick",
                RuleKind::Required,
                "nick missing",
            )],
        );
        let remaining = Defaults::default().apply(&mut config, vec![nested.clone()]);
        assert_eq!(remaining, vec![nested]);
    }

    #[test]
    fn other_root_fields_pass_through() {
        let mut config = Config::default();
        let ca = Violation::leaf(EntityKind::Base, "ca_path", RuleKind::Required, "ca missing");
        let remaining = Defaults::default().apply(&mut config, vec![ca.clone()]);
        assert_eq!(remaining, vec![ca]);
        assert!(config.ca_path.is_empty());
    }
}
