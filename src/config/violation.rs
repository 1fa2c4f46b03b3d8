//! The violation tree produced by validation.
//!
//! # Responsibilities
//! - Represent rule failures as a tree mirroring the document's shape
//! - Render the tree as one independently printable line per failure
//!
//! # Design Decisions
//! - A node is either a leaf (message, rule kind) or a container (children);
//!   the enum makes mixing the two unrepresentable
//! - Containers carry no message of their own; they exist to scope children
//!   to one nested entity instance
//! - Rendering never merges or deduplicates: two identical failures on two
//!   entities stay two lines

use crate::config::rules::{EntityKind, RuleKind};

/// One node of the violation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Schema category of the node.
    pub entity: EntityKind,
    /// The field name (for root-level leaves) or map key (for containers)
    /// that produced this node.
    pub id: String,
    /// Leaf or container payload.
    pub detail: Detail,
}

/// Payload of a violation node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    /// A single field failed a single rule.
    Leaf {
        /// Which rule failed, kept for the default-substitution policy.
        rule: RuleKind,
        /// Rendered message, identifier already substituted.
        message: String,
    },
    /// One or more failures inside a nested entity instance.
    Container(Vec<Violation>),
}

impl Violation {
    /// A leaf failure.
    pub fn leaf(
        entity: EntityKind,
        id: impl Into<String>,
        rule: RuleKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            entity,
            id: id.into(),
            detail: Detail::Leaf {
                rule,
                message: message.into(),
            },
        }
    }

    /// A container scoping `children` to one nested entity instance.
    /// `children` must be non-empty; the validator never wraps an empty
    /// recursion result.
    pub fn container(entity: EntityKind, id: impl Into<String>, children: Vec<Violation>) -> Self {
        debug_assert!(!children.is_empty());
        Self {
            entity,
            id: id.into(),
            detail: Detail::Container(children),
        }
    }

    /// Whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self.detail, Detail::Leaf { .. })
    }

    /// Number of leaves reachable from this node. Containers count their
    /// descendants, never themselves.
    pub fn leaf_count(&self) -> usize {
        match &self.detail {
            Detail::Leaf { .. } => 1,
            Detail::Container(children) => children.iter().map(Violation::leaf_count).sum(),
        }
    }

    /// The `[namespace.id]` tag for this node. The root namespace is the
    /// bare identifier.
    fn tag(&self) -> String {
        match self.entity {
            EntityKind::Base => format!("[{}]", self.id),
            EntityKind::User => format!("[users.{}]", self.id),
            EntityKind::Network => format!("[networks.{}]", self.id),
            EntityKind::Cert => format!("[certs.{}]", self.id),
        }
    }

    /// Render this node as one string per reachable leaf.
    ///
    /// A leaf renders as `[tag] -> message`. A container prefixes its tag to
    /// each child line, with nested leaves contributing their message only,
    /// so paths chain: `[users.zamn] -> [networks.GameSurge] -> message`.
    pub fn render(&self) -> Vec<String> {
        match &self.detail {
            Detail::Leaf { message, .. } => vec![format!("{} -> {}", self.tag(), message)],
            Detail::Container(children) => {
                let prefix = self.tag();
                children
                    .iter()
                    .flat_map(|child| match &child.detail {
                        Detail::Leaf { message, .. } => {
                            vec![format!("{} -> {}", prefix, message)]
                        }
                        Detail::Container(_) => child
                            .render()
                            .into_iter()
                            .map(|line| format!("{} -> {}", prefix, line))
                            .collect(),
                    })
                    .collect()
            }
        }
    }
}

/// Render a batch of top-level violations in order.
pub fn render_all(violations: &[Violation]) -> Vec<String> {
    violations.iter().flat_map(Violation::render).collect()
}
