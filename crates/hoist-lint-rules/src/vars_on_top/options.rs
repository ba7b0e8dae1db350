//! Loop exemption options for `vars-on-top`.

use hoist_lint_core::syntax::NodeKind;
use serde::Deserialize;

/// Resolved options, fixed for the lifetime of the rule.
///
/// Each flag exempts `var` declarations that sit directly in the header of
/// the matching loop kind. The flags are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarsOnTopOptions {
    /// Exempt `for (var i = 0; ...; ...)` (default: true).
    pub exempt_for_statement: bool,
    /// Exempt `for (var key in object)` (default: true).
    pub exempt_for_in_statement: bool,
    /// Exempt `for (var item of iterable)` (default: true).
    pub exempt_for_of_statement: bool,
}

impl Default for VarsOnTopOptions {
    fn default() -> Self {
        Self {
            exempt_for_statement: true,
            exempt_for_in_statement: true,
            exempt_for_of_statement: true,
        }
    }
}

impl VarsOnTopOptions {
    /// Overlays the fields present in `overrides` onto `self`.
    #[must_use]
    pub fn merge(self, overrides: VarsOnTopOverrides) -> Self {
        Self {
            exempt_for_statement: overrides.for_statement.unwrap_or(self.exempt_for_statement),
            exempt_for_in_statement: overrides
                .for_in_statement
                .unwrap_or(self.exempt_for_in_statement),
            exempt_for_of_statement: overrides
                .for_of_statement
                .unwrap_or(self.exempt_for_of_statement),
        }
    }

    /// Returns true if a `var` whose parent has `kind` is skipped entirely.
    #[must_use]
    pub fn exempts(self, kind: NodeKind) -> bool {
        match kind {
            NodeKind::ForStatement => self.exempt_for_statement,
            NodeKind::ForInStatement => self.exempt_for_in_statement,
            NodeKind::ForOfStatement => self.exempt_for_of_statement,
            _ => false,
        }
    }
}

/// User-facing option object, as written in `[rules.vars-on-top]`.
///
/// Unknown keys and non-boolean values are rejected when deserializing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VarsOnTopOverrides {
    /// `forStatement`
    pub for_statement: Option<bool>,
    /// `forInStatement`
    pub for_in_statement: Option<bool>,
    /// `forOfStatement`
    pub for_of_statement: Option<bool>,
}
