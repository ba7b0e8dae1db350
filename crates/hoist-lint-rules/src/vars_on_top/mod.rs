//! Rule requiring `var` declarations at the top of their function scope.
//!
//! # Rationale
//!
//! `var` declarations are hoisted to the top of the enclosing function (or
//! program). Writing them there keeps the source in line with how the
//! engine actually scopes them.
//!
//! # Configuration
//!
//! - `forStatement`: Allow `var` in a `for (;;)` header (default: true)
//! - `forInStatement`: Allow `var` in a `for-in` header (default: true)
//! - `forOfStatement`: Allow `var` in a `for-of` header (default: true)
//!
//! # Suppression
//!
//! - `// hoist-lint: allow(vars-on-top) reason="..."` on the line of the
//!   declaration or the line above it

mod options;
mod placement;

pub use options::{VarsOnTopOptions, VarsOnTopOverrides};
pub use placement::{check_declaration, Misplacement, MESSAGE};

use hoist_lint_core::syntax::{walk, AncestorPath, DeclarationKind, NodeId, NodeKind, SyntaxTree, Visitor};
use hoist_lint_core::utils::check_allow_with_reason;
use hoist_lint_core::{
    ConfigError, FileContext, Label, Location, Rule, RuleConfig, Severity, Suggestion, Violation,
};
use tracing::trace;

/// Rule code for vars-on-top.
pub const CODE: &str = "HL001";

/// Rule name for vars-on-top.
pub const NAME: &str = "vars-on-top";

/// Requires `var` declarations to come first in their function or program.
#[derive(Debug, Clone)]
pub struct VarsOnTop {
    options: VarsOnTopOptions,
    severity: Severity,
}

impl Default for VarsOnTop {
    fn default() -> Self {
        Self::new()
    }
}

impl VarsOnTop {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: VarsOnTopOptions::default(),
            severity: Severity::Error,
        }
    }

    /// Builds the rule from its `[rules.vars-on-top]` table, including its
    /// `severity` override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRuleOptions`] for unknown keys or
    /// non-boolean values.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        let overrides: VarsOnTopOverrides = config.parse_options(NAME)?;
        let rule = Self::new().with_options(VarsOnTopOptions::default().merge(overrides));
        Ok(match config.severity {
            Some(severity) => rule.severity(severity),
            None => rule,
        })
    }

    /// Replaces all loop exemption options.
    #[must_use]
    pub fn with_options(mut self, options: VarsOnTopOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets whether `var` in a `for (;;)` header is exempt.
    #[must_use]
    pub fn for_statement(mut self, exempt: bool) -> Self {
        self.options.exempt_for_statement = exempt;
        self
    }

    /// Sets whether `var` in a `for-in` header is exempt.
    #[must_use]
    pub fn for_in_statement(mut self, exempt: bool) -> Self {
        self.options.exempt_for_in_statement = exempt;
        self
    }

    /// Sets whether `var` in a `for-of` header is exempt.
    #[must_use]
    pub fn for_of_statement(mut self, exempt: bool) -> Self {
        self.options.exempt_for_of_statement = exempt;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Returns the resolved options.
    #[must_use]
    pub fn options(&self) -> VarsOnTopOptions {
        self.options
    }
}

impl Rule for VarsOnTop {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires 'var' declarations at the top of their function scope"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, tree: &SyntaxTree) -> Vec<Violation> {
        let mut visitor = VarsOnTopVisitor {
            ctx,
            rule: self,
            violations: Vec::new(),
        };

        walk(tree, &mut visitor);
        visitor.violations
    }
}

struct VarsOnTopVisitor<'a> {
    ctx: &'a FileContext<'a>,
    rule: &'a VarsOnTop,
    violations: Vec<Violation>,
}

impl VarsOnTopVisitor<'_> {
    fn location(&self, tree: &SyntaxTree, node: NodeId) -> Location {
        Location::from_span(self.ctx.relative_path.clone(), tree.span(node))
    }

    fn report(&mut self, tree: &SyntaxTree, misplacement: Misplacement) {
        let location = self.location(tree, misplacement.node);

        let allow_check = check_allow_with_reason(self.ctx.content, location.line, NAME);
        if allow_check.is_allowed() {
            if self.rule.requires_allow_reason() && allow_check.reason().is_none() {
                self.violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        Severity::Warning,
                        location,
                        format!("Allow directive for '{NAME}' is missing required reason"),
                    )
                    .with_suggestion(Suggestion::new(
                        "Add reason=\"...\" to explain why this exception is necessary",
                    )),
                );
            }
            return;
        }

        let mut violation = Violation::new(CODE, NAME, self.rule.severity, location, MESSAGE);
        violation = match misplacement.blocker {
            Some(blocker) => violation
                .with_label(Label::new(
                    self.location(tree, blocker),
                    "first statement that is not a declaration",
                ))
                .with_suggestion(Suggestion::new(
                    "Move this declaration above the first non-declaration statement",
                )),
            None => violation.with_suggestion(Suggestion::new(
                "Move this declaration to the top of the enclosing function or program",
            )),
        };
        self.violations.push(violation);
    }
}

impl Visitor for VarsOnTopVisitor<'_> {
    fn interested_in(&self, kind: NodeKind) -> bool {
        kind == NodeKind::VariableDeclaration(DeclarationKind::Var)
    }

    fn visit_node(&mut self, tree: &SyntaxTree, node: NodeId, ancestors: AncestorPath<'_>) {
        if let Some(misplacement) = check_declaration(tree, self.rule.options, node, ancestors) {
            trace!(
                "misplaced var at {}:{}",
                self.ctx.relative_path.display(),
                tree.span(misplacement.node).line
            );
            self.report(tree, misplacement);
        }
    }
}
