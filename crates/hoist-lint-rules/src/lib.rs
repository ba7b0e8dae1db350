//! # hoist-lint-rules
//!
//! Built-in lint rules for hoist-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | HL001 | `vars-on-top` | Requires `var` declarations at the top of their function scope |
//!
//! ## Usage
//!
//! ```ignore
//! use hoist_lint_core::Analyzer;
//! use hoist_lint_rules::VarsOnTop;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(VarsOnTop::new().for_of_statement(false))
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod registry;
pub mod vars_on_top;

pub use registry::{all_rules, rules_from_config, RULE_NAMES};
pub use vars_on_top::{VarsOnTop, VarsOnTopOptions, VarsOnTopOverrides};

/// Re-export core types for convenience.
pub use hoist_lint_core::{Rule, Severity, Violation};
