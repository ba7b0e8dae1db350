//! Placement check for a single `var` declaration.
//!
//! A declaration is on top when, in the statement sequence of its program or
//! function body, it is preceded only by an optional prologue of directives
//! and imports followed by an unbroken run of declarations. Declarations
//! directly inside any other block are never on top.

use hoist_lint_core::syntax::{AncestorPath, NodeId, NodeKind, SyntaxTree};

use super::options::VarsOnTopOptions;

/// Message reported for every misplaced declaration.
pub const MESSAGE: &str = "All 'var' declarations must be at the top of the function scope.";

/// A `var` declaration that is not on top of its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Misplacement {
    /// The reported node: the declaration, or its `export` wrapper.
    pub node: NodeId,
    /// First statement of the scope that is not a declaration, when the
    /// scope was scanned and one was found before `node`.
    pub blocker: Option<NodeId>,
}

/// Outcome of scanning a statement sequence for a target declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    OnTop,
    Blocked(NodeId),
    NotFound,
}

/// Effective node and its surroundings after export unwrapping.
struct Position {
    node: NodeId,
    parent: NodeId,
    grandparent: Option<NodeId>,
}

/// Expression statement whose expression is a string literal (`"use strict";`).
fn looks_like_directive(tree: &SyntaxTree, statement: NodeId) -> bool {
    tree.expression(statement)
        .is_some_and(|expr| tree.kind(expr) == NodeKind::StringLiteral)
}

fn looks_like_import(tree: &SyntaxTree, statement: NodeId) -> bool {
    matches!(tree.kind(statement), NodeKind::Import(_))
}

/// Bare declaration of any keyword, or `export` wrapping one.
fn is_variable_declaration(tree: &SyntaxTree, statement: NodeId) -> bool {
    match tree.kind(statement) {
        NodeKind::VariableDeclaration(_) => true,
        NodeKind::ExportDeclaration => tree
            .payload(statement)
            .is_some_and(|payload| matches!(tree.kind(payload), NodeKind::VariableDeclaration(_))),
        _ => false,
    }
}

fn scan(tree: &SyntaxTree, target: NodeId, statements: &[NodeId]) -> Scan {
    let after_prologue = statements
        .iter()
        .copied()
        .skip_while(|&s| looks_like_directive(tree, s) || looks_like_import(tree, s));

    for statement in after_prologue {
        if !is_variable_declaration(tree, statement) {
            return Scan::Blocked(statement);
        }
        if statement == target {
            return Scan::OnTop;
        }
    }

    Scan::NotFound
}

/// Resolves the node to check together with its parent and grandparent,
/// substituting an `export` wrapper for the declaration it carries.
fn resolve(tree: &SyntaxTree, node: NodeId, ancestors: AncestorPath<'_>) -> Option<Position> {
    let (parent, rest) = ancestors.pop();
    let parent = parent?;
    let (grandparent, rest) = rest.pop();

    if tree.kind(parent) == NodeKind::ExportDeclaration && tree.payload(parent) == Some(node) {
        return Some(Position {
            node: parent,
            parent: grandparent?,
            grandparent: rest.parent(),
        });
    }

    Some(Position {
        node,
        parent,
        grandparent,
    })
}

/// Checks one `var` declaration against its ancestors.
///
/// Returns `None` when the declaration is exempt or on top of its scope.
#[must_use]
pub fn check_declaration(
    tree: &SyntaxTree,
    options: VarsOnTopOptions,
    node: NodeId,
    ancestors: AncestorPath<'_>,
) -> Option<Misplacement> {
    let parent_kind = tree.kind(ancestors.parent()?);
    if options.exempts(parent_kind) {
        return None;
    }

    let Position {
        node,
        parent,
        grandparent,
    } = resolve(tree, node, ancestors)?;

    let in_function_body = tree.kind(parent) == NodeKind::Block
        && grandparent.is_some_and(|g| tree.kind(g).is_function_like());

    if tree.kind(parent) != NodeKind::Program && !in_function_body {
        return Some(Misplacement { node, blocker: None });
    }

    let statements = tree.statements(parent)?;
    match scan(tree, node, statements) {
        Scan::OnTop => None,
        Scan::Blocked(blocker) => Some(Misplacement {
            node,
            blocker: Some(blocker),
        }),
        Scan::NotFound => Some(Misplacement { node, blocker: None }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoist_lint_core::syntax::{parse, DeclarationKind, Dialect};

    const VAR: NodeKind = NodeKind::VariableDeclaration(DeclarationKind::Var);

    /// (line of reported node, line of blocker) for every misplaced `var`.
    fn misplaced_in(source: &str, dialect: Dialect, options: VarsOnTopOptions) -> Vec<(usize, Option<usize>)> {
        let tree = parse(source, dialect).expect("source should parse");
        tree.find_all(VAR)
            .filter_map(|id| {
                let path = tree.ancestors(id);
                check_declaration(&tree, options, id, AncestorPath::new(&path))
            })
            .map(|m| (tree.span(m.node).line, m.blocker.map(|b| tree.span(b).line)))
            .collect()
    }

    fn misplaced(source: &str) -> Vec<(usize, Option<usize>)> {
        misplaced_in(source, Dialect::JavaScript, VarsOnTopOptions::default())
    }

    fn misplaced_with(source: &str, options: VarsOnTopOptions) -> Vec<(usize, Option<usize>)> {
        misplaced_in(source, Dialect::JavaScript, options)
    }

    #[test]
    fn prologue_then_declarations_pass_and_late_var_fails() {
        let source = r#""use strict";
import { x } from "m";
var a;
var b;
foo();
var c;
"#;
        assert_eq!(misplaced(source), vec![(6, Some(5))]);
    }

    #[test]
    fn statement_between_declarations_in_function_body() {
        let source = "function f() {
    var a;
    doWork();
    var b;
}
";
        assert_eq!(misplaced(source), vec![(4, Some(3))]);
    }

    #[test]
    fn for_statement_init_is_exempt_by_default() {
        assert!(misplaced("for (var i = 0; i < 10; i++) {}\n").is_empty());
    }

    #[test]
    fn for_statement_init_is_checked_when_not_exempt() {
        let options = VarsOnTopOptions {
            exempt_for_statement: false,
            ..VarsOnTopOptions::default()
        };
        assert_eq!(
            misplaced_with("for (var i = 0; i < 10; i++) {}\n", options),
            vec![(1, None)]
        );
        assert!(misplaced_with("for (var k in obj) {}\nfor (var v of list) {}\n", options).is_empty());
    }

    #[test]
    fn for_in_and_for_of_headers() {
        let source = "function f(obj, list) {
    for (var k in obj) {}
    for (var v of list) {}
}
";
        assert!(misplaced(source).is_empty());

        let no_for_in = VarsOnTopOptions {
            exempt_for_in_statement: false,
            ..VarsOnTopOptions::default()
        };
        assert_eq!(misplaced_with(source, no_for_in), vec![(2, None)]);

        let no_for_of = VarsOnTopOptions {
            exempt_for_of_statement: false,
            ..VarsOnTopOptions::default()
        };
        assert_eq!(misplaced_with(source, no_for_of), vec![(3, None)]);
    }

    #[test]
    fn loop_body_block_is_not_a_function_scope() {
        assert_eq!(misplaced("for (;;) {\n    var x;\n}\n"), vec![(2, None)]);
    }

    #[test]
    fn bare_block_is_always_reported() {
        assert_eq!(misplaced("{\n    var x;\n}\n"), vec![(2, None)]);
        assert_eq!(
            misplaced("function f() {\n    {\n        var x;\n    }\n}\n"),
            vec![(3, None)]
        );
    }

    #[test]
    fn non_function_blocks_are_reported() {
        let source = "function f(a) {
    if (a) {
        var x;
    }
    try {
        var y;
    } catch (e) {
        var z;
    }
    switch (a) {
        case 1:
            var w;
    }
}
";
        assert_eq!(
            misplaced(source),
            vec![(3, None), (6, None), (8, None), (12, None)]
        );
    }

    #[test]
    fn exported_declaration_is_checked_as_its_wrapper() {
        let source = "export var a = 1;
var b;
export var c;
";
        assert!(misplaced(source).is_empty());

        let tree = parse("foo();\nexport var late;\n", Dialect::JavaScript).unwrap();
        let id = tree.find_all(VAR).next().unwrap();
        let path = tree.ancestors(id);
        let found = check_declaration(&tree, VarsOnTopOptions::default(), id, AncestorPath::new(&path))
            .expect("export after a call is misplaced");
        assert_eq!(tree.kind(found.node), NodeKind::ExportDeclaration);
        assert_eq!(tree.span(found.node).column, 1);
    }

    #[test]
    fn export_of_non_declaration_blocks_the_run() {
        let source = "export function f() {}
var a;
";
        assert_eq!(misplaced(source), vec![(2, Some(1))]);
    }

    #[test]
    fn let_and_const_count_as_declarations() {
        assert!(misplaced("let a;\nconst b = 1;\nvar c;\n").is_empty());
        assert!(misplaced("foo();\nlet a;\nconst b = 1;\n").is_empty());
    }

    #[test]
    fn directive_after_declarations_is_not_skipped() {
        assert_eq!(
            misplaced("var a;\n\"use strict\";\nvar b;\n"),
            vec![(3, Some(2))]
        );
        assert_eq!(
            misplaced("var a;\nimport x from \"m\";\nvar b;\n"),
            vec![(3, Some(2))]
        );
    }

    #[test]
    fn single_gap_fails_every_later_declaration() {
        let source = "var a;
foo();
var b;
var c;
";
        assert_eq!(misplaced(source), vec![(3, Some(2)), (4, Some(2))]);
    }

    #[test]
    fn directive_forms() {
        assert!(misplaced("'use strict';\n(\"x\");\nvar a;\n").is_empty());
        assert_eq!(misplaced("`use strict`;\nvar a;\n"), vec![(2, Some(1))]);
        assert_eq!(misplaced("1;\nvar a;\n"), vec![(2, Some(1))]);
    }

    #[test]
    fn imports_and_directives_interleave_in_prologue() {
        let source = r#"import a from "a";
"use strict";
import * as b from "b";
import c, { d } from "c";
var e;
"#;
        assert!(misplaced(source).is_empty());
    }

    #[test]
    fn comments_do_not_break_the_run() {
        let source = "#!/usr/bin/env node
// leading
var a; // trailing
/* block */
var b;
";
        assert!(misplaced(source).is_empty());
    }

    #[test]
    fn nested_functions_use_their_own_body() {
        let source = "function outer() {
    var a;
    foo();
    function inner() {
        var b;
        bar();
    }
    return inner;
}
";
        assert!(misplaced(source).is_empty());
    }

    #[test]
    fn every_function_form_is_a_scope() {
        let source = "const f = () => {
    foo();
    var a;
};
const g = function () {
    var b;
};
class C {
    m() {
        var c;
        bar();
    }
}
function* gen() {
    var d;
    yield d;
}
";
        assert_eq!(misplaced(source), vec![(3, Some(2))]);
    }

    #[test]
    fn directive_prologue_inside_function() {
        let source = "function f() {
    'use strict';
    var a;
    go();
}
";
        assert!(misplaced(source).is_empty());
    }

    #[test]
    fn typescript_sources() {
        let source = "var a: number = 1;
foo();
var b: string;
";
        assert_eq!(
            misplaced_in(source, Dialect::TypeScript, VarsOnTopOptions::default()),
            vec![(3, Some(2))]
        );
    }

    #[test]
    fn ambient_declarations_count_as_declarations() {
        let ts = |source| misplaced_in(source, Dialect::TypeScript, VarsOnTopOptions::default());
        assert!(ts("declare var x: number;\nvar y;\n").is_empty());
        assert!(ts("export declare var x: number;\ndeclare const z: string;\nvar y;\n").is_empty());
        assert_eq!(ts("init();\ndeclare var x: number;\n"), vec![(2, Some(1))]);
    }

    #[test]
    fn import_equals_is_not_part_of_the_prologue() {
        let source = "import fs = require(\"fs\");\nvar a;\n";
        assert_eq!(
            misplaced_in(source, Dialect::TypeScript, VarsOnTopOptions::default()),
            vec![(2, Some(1))]
        );
    }
}
