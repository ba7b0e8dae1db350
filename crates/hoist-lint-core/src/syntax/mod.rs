//! Syntax tree model consumed by rules.
//!
//! Source files are parsed with Tree-sitter and lowered into a small,
//! immutable arena tree. The lowering keeps only what rules need to reason
//! about statement placement: a closed set of [`NodeKind`]s, source spans,
//! parent links and ordered children. Comments never appear in the tree,
//! and parenthesized expressions are transparent.

mod parse;
mod walk;

pub use parse::{parse, Dialect, ParseError};
pub use walk::{walk, AncestorPath, Visitor};

/// Index of a node inside a [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Keyword used by a variable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// `var` (function-scoped, hoisted).
    Var,
    /// `let`
    Let,
    /// `const`
    Const,
}

impl DeclarationKind {
    fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "let" => Self::Let,
            "const" => Self::Const,
            _ => Self::Var,
        }
    }
}

/// Constructs that introduce a new function scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// `function f() {}`
    Declaration,
    /// `const f = function () {}`
    Expression,
    /// `() => {}`
    Arrow,
    /// `class C { m() {} }`
    Method,
    /// `function* g() {}` and generator expressions.
    Generator,
}

/// Import declaration and its specifier forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// `import ... from "m";`
    Declaration,
    /// `{ x }` in `import { x } from "m"`
    Specifier,
    /// `x` in `import x from "m"`
    DefaultSpecifier,
    /// `* as x` in `import * as x from "m"`
    NamespaceSpecifier,
}

/// Node classification used by rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root of a source file.
    Program,
    /// `{ ... }` statement block, including function bodies.
    Block,
    /// `var`, `let` or `const` declaration.
    VariableDeclaration(DeclarationKind),
    /// `export ...` statement.
    ExportDeclaration,
    /// Import declaration or specifier.
    Import(ImportKind),
    /// Expression used as a statement.
    ExpressionStatement,
    /// String literal expression.
    StringLiteral,
    /// Function-scope introducing construct.
    Function(FunctionKind),
    /// `for (init; test; update)`
    ForStatement,
    /// `for (x in obj)`
    ForInStatement,
    /// `for (x of iterable)`
    ForOfStatement,
    /// Anything else.
    Other,
}

impl NodeKind {
    /// Returns true for kinds that introduce a function scope.
    #[must_use]
    pub fn is_function_like(self) -> bool {
        matches!(self, Self::Function(_))
    }

    /// Returns true for kinds whose children form a statement sequence.
    #[must_use]
    pub fn is_statement_container(self) -> bool {
        matches!(self, Self::Program | Self::Block)
    }
}

/// Source range of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Line of the start position (1-indexed).
    pub line: usize,
    /// Column of the start position (1-indexed, in bytes).
    pub column: usize,
}

impl Span {
    /// Length of the span in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node of the lowered syntax tree.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    kind: NodeKind,
    raw_kind: &'static str,
    span: Span,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    payload: Option<NodeId>,
}

impl SyntaxNode {
    /// Classified kind.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Tree-sitter kind this node was lowered from (e.g. `"if_statement"`).
    #[must_use]
    pub fn raw_kind(&self) -> &'static str {
        self.raw_kind
    }

    /// Source span.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Parent node, `None` for the program root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in source order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Immutable arena of lowered syntax nodes.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    fn with_root(raw_kind: &'static str, span: Span) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.push(NodeKind::Program, raw_kind, span, None);
        tree
    }

    fn push(
        &mut self,
        kind: NodeKind,
        raw_kind: &'static str,
        span: Span,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(SyntaxNode {
            kind,
            raw_kind,
            span,
            parent,
            children: Vec::new(),
            payload: None,
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }

    fn set_payload(&mut self, wrapper: NodeId, payload: NodeId) {
        self.nodes[wrapper.index()].payload = Some(payload);
    }

    /// The `Program` root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to a different tree and is out of range.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    /// Shorthand for `self.node(id).kind()`.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    /// Shorthand for `self.node(id).span()`.
    #[must_use]
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    /// Shorthand for `self.node(id).parent()`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Shorthand for `self.node(id).children()`.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Statement sequence of a `Program` or `Block`, `None` for other kinds.
    #[must_use]
    pub fn statements(&self, id: NodeId) -> Option<&[NodeId]> {
        self.kind(id)
            .is_statement_container()
            .then(|| self.children(id))
    }

    /// Expression of an `ExpressionStatement`.
    #[must_use]
    pub fn expression(&self, id: NodeId) -> Option<NodeId> {
        if self.kind(id) != NodeKind::ExpressionStatement {
            return None;
        }
        self.children(id).first().copied()
    }

    /// Declaration wrapped by an `ExportDeclaration` (`export var x;`).
    #[must_use]
    pub fn payload(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).payload
    }

    /// Node ids from the root down to the parent of `id`.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            path.push(node);
            current = self.parent(node);
        }
        path.reverse();
        path
    }

    /// All node ids in pre-order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter_map(|i| u32::try_from(i).ok().map(NodeId))
    }

    /// All node ids of the given kind, in pre-order.
    pub fn find_all(&self, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.ids().filter(move |id| self.kind(*id) == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn js(source: &str) -> SyntaxTree {
        parse(source, Dialect::JavaScript).expect("source should parse")
    }

    fn kinds(tree: &SyntaxTree, ids: &[NodeId]) -> Vec<NodeKind> {
        ids.iter().map(|id| tree.kind(*id)).collect()
    }

    #[test]
    fn program_statements_skip_comments() {
        let tree = js("#!/usr/bin/env node\n// lead\nvar a; /* mid */ let b;\nfoo();\n");
        let statements = tree.statements(tree.root()).expect("program has statements");
        assert_eq!(
            kinds(&tree, statements),
            vec![
                NodeKind::VariableDeclaration(DeclarationKind::Var),
                NodeKind::VariableDeclaration(DeclarationKind::Let),
                NodeKind::ExpressionStatement,
            ]
        );
    }

    #[test]
    fn classifies_declaration_keywords() {
        let tree = js("var a; let b; const c = 1;");
        let statements = tree.statements(tree.root()).expect("program has statements");
        assert_eq!(
            kinds(&tree, statements),
            vec![
                NodeKind::VariableDeclaration(DeclarationKind::Var),
                NodeKind::VariableDeclaration(DeclarationKind::Let),
                NodeKind::VariableDeclaration(DeclarationKind::Const),
            ]
        );
    }

    #[test]
    fn directive_expression_is_string_literal() {
        let tree = js("'use strict';\n(\"wrapped\");\n`template`;\n");
        let statements = tree.statements(tree.root()).expect("program has statements");
        let expressions: Vec<NodeKind> = statements
            .iter()
            .filter_map(|s| tree.expression(*s))
            .map(|e| tree.kind(e))
            .collect();
        assert_eq!(expressions[0], NodeKind::StringLiteral);
        assert_eq!(expressions[1], NodeKind::StringLiteral);
        assert_eq!(expressions[2], NodeKind::Other);
    }

    #[test]
    fn export_records_variable_payload() {
        let tree = js("export var a = 1;\nexport { a as b };\n");
        let statements = tree.statements(tree.root()).expect("program has statements");
        assert_eq!(tree.kind(statements[0]), NodeKind::ExportDeclaration);
        let payload = tree.payload(statements[0]).expect("payload recorded");
        assert_eq!(
            tree.kind(payload),
            NodeKind::VariableDeclaration(DeclarationKind::Var)
        );
        assert_eq!(tree.parent(payload), Some(statements[0]));
        assert_eq!(tree.payload(statements[1]), None);
    }

    #[test]
    fn import_forms_are_classified() {
        let tree = js("import d, * as ns from 'a';\nimport { x, y as z } from 'b';\n");
        assert_eq!(
            tree.find_all(NodeKind::Import(ImportKind::Declaration)).count(),
            2
        );
        assert_eq!(
            tree.find_all(NodeKind::Import(ImportKind::DefaultSpecifier))
                .count(),
            1
        );
        assert_eq!(
            tree.find_all(NodeKind::Import(ImportKind::NamespaceSpecifier))
                .count(),
            1
        );
        assert_eq!(
            tree.find_all(NodeKind::Import(ImportKind::Specifier)).count(),
            2
        );
    }

    #[test]
    fn function_bodies_are_blocks_under_function_kinds() {
        let tree = js(
            "function f() {}\nconst g = function () {};\nconst h = () => {};\nclass C { m() {} }\nfunction* gen() {}\n",
        );
        let owners: Vec<NodeKind> = tree
            .find_all(NodeKind::Block)
            .filter_map(|b| tree.parent(b))
            .map(|p| tree.kind(p))
            .collect();
        assert_eq!(
            owners,
            vec![
                NodeKind::Function(FunctionKind::Declaration),
                NodeKind::Function(FunctionKind::Expression),
                NodeKind::Function(FunctionKind::Arrow),
                NodeKind::Function(FunctionKind::Method),
                NodeKind::Function(FunctionKind::Generator),
            ]
        );
    }

    #[test]
    fn for_in_and_for_of_headers_get_declarations() {
        let tree = js("for (var k in o) {}\nfor (const v of xs) {}\nfor (k in o) {}\n");
        let statements = tree.statements(tree.root()).expect("program has statements");
        assert_eq!(
            kinds(&tree, statements),
            vec![
                NodeKind::ForInStatement,
                NodeKind::ForOfStatement,
                NodeKind::ForInStatement,
            ]
        );

        let first = tree.children(statements[0])[0];
        assert_eq!(
            tree.kind(first),
            NodeKind::VariableDeclaration(DeclarationKind::Var)
        );
        let second = tree.children(statements[1])[0];
        assert_eq!(
            tree.kind(second),
            NodeKind::VariableDeclaration(DeclarationKind::Const)
        );
        assert!(tree
            .children(statements[2])
            .iter()
            .all(|c| !matches!(tree.kind(*c), NodeKind::VariableDeclaration(_))));
    }

    #[test]
    fn for_statement_init_is_child_declaration() {
        let tree = js("for (var i = 0; i < 3; i++) {}");
        let var = tree
            .find_all(NodeKind::VariableDeclaration(DeclarationKind::Var))
            .next()
            .expect("var declaration");
        let parent = tree.parent(var).expect("has parent");
        assert_eq!(tree.kind(parent), NodeKind::ForStatement);
    }

    #[test]
    fn spans_are_one_indexed() {
        let tree = js("foo();\n  var a = 1;\n");
        let var = tree
            .find_all(NodeKind::VariableDeclaration(DeclarationKind::Var))
            .next()
            .expect("var declaration");
        let span = tree.span(var);
        assert_eq!((span.line, span.column), (2, 3));
        assert_eq!(span.start, 9);
        assert_eq!(span.len(), "var a = 1;".len());
    }

    #[test]
    fn ancestors_run_from_root_to_parent() {
        let tree = js("function f() { var a; }");
        let var = tree
            .find_all(NodeKind::VariableDeclaration(DeclarationKind::Var))
            .next()
            .expect("var declaration");
        let path = kinds(&tree, &tree.ancestors(var));
        assert_eq!(
            path,
            vec![
                NodeKind::Program,
                NodeKind::Function(FunctionKind::Declaration),
                NodeKind::Block,
            ]
        );
    }
}
