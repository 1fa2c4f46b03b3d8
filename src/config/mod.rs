//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize; absent fields become zero values)
//!     → validation.rs (recursive semantic checks, collect-all)
//!     → defaults.rs (recoverable root violations become defaults)
//!     → Config (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - Validation separates syntactic (serde) from semantic checks
//! - Rule and explanation tables are plain values, built once and handed to
//!   the validator; nothing registers into global state
//! - Violations are reported as a tree mirroring the document and rendered
//!   one line per problem

pub mod defaults;
pub mod explain;
pub mod loader;
pub mod rules;
pub mod schema;
pub mod validation;
pub mod violation;

pub use defaults::Defaults;
pub use explain::Explanations;
pub use loader::{load_config, parse_config, ConfigError};
pub use rules::{EntityKind, Registry, Rule, RuleKind};
pub use schema::Config;
pub use validation::Validator;
pub use violation::{render_all, Violation};
