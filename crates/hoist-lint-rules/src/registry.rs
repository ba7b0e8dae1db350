//! Rule registry for building rule sets from configuration.

use crate::vars_on_top::{self, VarsOnTop};
use hoist_lint_core::{Config, ConfigError, RuleBox};
use tracing::warn;

/// Names of every rule this crate provides.
pub const RULE_NAMES: &[&str] = &[vars_on_top::NAME];

/// Returns all available rules with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![Box::new(VarsOnTop::new())]
}

/// Returns all available rules configured from `config`.
///
/// Rule tables for names that no rule answers to are logged and ignored.
///
/// # Errors
///
/// Returns an error if a rule's options do not match its schema.
pub fn rules_from_config(config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    for name in config.rules.keys() {
        if !RULE_NAMES.contains(&name.as_str()) {
            warn!("Unknown rule in configuration: {name}");
        }
    }

    let vars_on_top = match config.rules.get(vars_on_top::NAME) {
        Some(rule_config) => VarsOnTop::from_config(rule_config)?,
        None => VarsOnTop::new(),
    };

    Ok(vec![Box::new(vars_on_top)])
}
