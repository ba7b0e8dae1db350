//! Rule trait for defining lint rules.

use crate::context::FileContext;
use crate::syntax::SyntaxTree;
use crate::types::{Severity, Violation};

/// A per-file lint rule over the lowered [`SyntaxTree`].
///
/// Rules typically implement [`crate::syntax::Visitor`] on a private
/// visitor struct and drive it with [`crate::syntax::walk`].
///
/// # Example
///
/// ```ignore
/// use hoist_lint_core::{FileContext, Rule, Violation};
/// use hoist_lint_core::syntax::{walk, SyntaxTree};
///
/// pub struct NoWith;
///
/// impl Rule for NoWith {
///     fn name(&self) -> &'static str { "no-with" }
///     fn code(&self) -> &'static str { "HL900" }
///
///     fn check(&self, ctx: &FileContext, tree: &SyntaxTree) -> Vec<Violation> {
///         let mut visitor = WithVisitor::new(ctx);
///         walk(tree, &mut visitor);
///         visitor.violations
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "vars-on-top").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "HL001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule requires a reason when using allow directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Checks a single file and returns any violations found.
    fn check(&self, ctx: &FileContext, tree: &SyntaxTree) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
