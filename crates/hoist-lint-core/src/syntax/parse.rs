//! Tree-sitter parsing and lowering into [`SyntaxTree`].

use std::path::Path;
use tree_sitter::{Language, Node, Parser};

use super::{DeclarationKind, FunctionKind, ImportKind, NodeId, NodeKind, Span, SyntaxTree};

/// Source dialect, selected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `.js`, `.mjs`, `.cjs`, `.jsx` (parsed with the TSX grammar so JSX is accepted).
    JavaScript,
    /// `.ts`, `.mts`, `.cts`
    TypeScript,
    /// `.tsx`
    Tsx,
}

impl Dialect {
    /// File extensions handled by the analyzer.
    pub const EXTENSIONS: &'static [&'static str] =
        &["js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx"];

    /// Picks the dialect for a file, or `None` for unsupported extensions.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "js" | "mjs" | "cjs" | "jsx" => Some(Self::JavaScript),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    fn language(self) -> Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::JavaScript | Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Errors produced while parsing a source file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The grammar could not be loaded into the parser.
    #[error("language error: {0}")]
    Language(String),

    /// Tree-sitter returned no tree.
    #[error("parse failed")]
    Failed,

    /// The source contains a syntax error.
    #[error("syntax error at {line}:{column}")]
    Syntax {
        /// Line of the first error (1-indexed).
        line: usize,
        /// Column of the first error (1-indexed).
        column: usize,
    },
}

/// Parses `source` and lowers it into a [`SyntaxTree`].
///
/// # Errors
///
/// Returns [`ParseError::Syntax`] when the source does not parse cleanly.
pub fn parse(source: &str, dialect: Dialect) -> Result<SyntaxTree, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.language())
        .map_err(|e| ParseError::Language(e.to_string()))?;

    let tree = parser.parse(source, None).ok_or(ParseError::Failed)?;
    let root = tree.root_node();

    if root.has_error() {
        let at = first_error(root).unwrap_or(root);
        let pos = at.start_position();
        return Err(ParseError::Syntax {
            line: pos.row + 1,
            column: pos.column + 1,
        });
    }

    Ok(Lowering::new(source.as_bytes()).run(root))
}

fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

/// The `var`/`let`/`const` declaration wrapped by a `declare` statement.
fn declared_variables<'tree>(node: &Node<'tree>) -> Option<Node<'tree>> {
    node.named_child(0)
        .filter(|inner| matches!(inner.kind(), "variable_declaration" | "lexical_declaration"))
}

fn has_named_child(node: &Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).any(|child| child.kind() == kind);
    found
}

fn span_of(node: &Node<'_>) -> Span {
    let pos = node.start_position();
    Span {
        start: node.start_byte(),
        end: node.end_byte(),
        line: pos.row + 1,
        column: pos.column + 1,
    }
}

/// How a pending child relates to the node it is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Plain,
    /// The `declaration` field of an `export_statement`.
    Payload,
}

struct Pending<'tree> {
    node: Node<'tree>,
    parent: NodeId,
    role: Role,
}

struct Lowering<'src> {
    src: &'src [u8],
}

impl<'src> Lowering<'src> {
    fn new(src: &'src [u8]) -> Self {
        Self { src }
    }

    fn text(&self, node: &Node<'_>) -> &'src str {
        node.utf8_text(self.src).unwrap_or("")
    }

    fn run(&self, root: Node<'_>) -> SyntaxTree {
        let mut tree = SyntaxTree::with_root(root.kind(), span_of(&root));
        let mut stack = Vec::new();
        Self::schedule(&mut stack, root, tree.root(), None, None);

        while let Some(Pending { node, parent, role }) = stack.pop() {
            match node.kind() {
                "comment" | "html_comment" | "hash_bang_line" => continue,
                "parenthesized_expression" => {
                    Self::schedule(&mut stack, node, parent, None, None);
                    continue;
                }
                "ambient_declaration" => {
                    // `declare var x;` lowers to the declaration itself.
                    if let Some(inner) = declared_variables(&node) {
                        let payload = (role == Role::Payload).then_some(inner);
                        Self::schedule(&mut stack, node, parent, payload, None);
                        continue;
                    }
                }
                _ => {}
            }

            let kind = self.classify(&node);
            let id = tree.push(kind, node.kind(), span_of(&node), Some(parent));
            if role == Role::Payload {
                tree.set_payload(parent, id);
            }

            match kind {
                NodeKind::ForInStatement | NodeKind::ForOfStatement => {
                    self.lower_loop_header(&mut tree, &mut stack, node, id);
                }
                NodeKind::ExportDeclaration => {
                    let declaration = node.child_by_field_name("declaration");
                    Self::schedule(&mut stack, node, id, declaration, None);
                }
                _ => Self::schedule(&mut stack, node, id, None, None),
            }
        }

        tree
    }

    /// `for (var x in obj)` carries its keyword as a bare token. A declaration
    /// node owning the `left` binding is synthesized so the header looks like
    /// any other declaration.
    fn lower_loop_header<'tree>(
        &self,
        tree: &mut SyntaxTree,
        stack: &mut Vec<Pending<'tree>>,
        node: Node<'tree>,
        id: NodeId,
    ) {
        let (Some(keyword), Some(left)) = (
            node.child_by_field_name("kind"),
            node.child_by_field_name("left"),
        ) else {
            Self::schedule(stack, node, id, None, None);
            return;
        };

        let kind = DeclarationKind::from_keyword(self.text(&keyword));
        let raw_kind = if kind == DeclarationKind::Var {
            "variable_declaration"
        } else {
            "lexical_declaration"
        };
        let mut span = span_of(&keyword);
        span.end = left.end_byte();

        let declaration = tree.push(
            NodeKind::VariableDeclaration(kind),
            raw_kind,
            span,
            Some(id),
        );
        Self::schedule(stack, node, id, None, Some((left, declaration)));
    }

    /// Pushes the named children of `node` in reverse so they pop in source order.
    fn schedule<'tree>(
        stack: &mut Vec<Pending<'tree>>,
        node: Node<'tree>,
        parent: NodeId,
        payload: Option<Node<'tree>>,
        reparent: Option<(Node<'tree>, NodeId)>,
    ) {
        let mut cursor = node.walk();
        let children: Vec<Node<'tree>> = node.named_children(&mut cursor).collect();
        for child in children.into_iter().rev() {
            let role = if payload == Some(child) {
                Role::Payload
            } else {
                Role::Plain
            };
            let parent = match reparent {
                Some((moved, to)) if moved == child => to,
                _ => parent,
            };
            stack.push(Pending {
                node: child,
                parent,
                role,
            });
        }
    }

    fn classify(&self, node: &Node<'_>) -> NodeKind {
        match node.kind() {
            "program" => NodeKind::Program,
            "statement_block" => NodeKind::Block,
            "variable_declaration" => NodeKind::VariableDeclaration(DeclarationKind::Var),
            "lexical_declaration" => {
                let keyword = node
                    .child_by_field_name("kind")
                    .map_or("let", |k| self.text(&k));
                NodeKind::VariableDeclaration(DeclarationKind::from_keyword(keyword))
            }
            "export_statement" => NodeKind::ExportDeclaration,
            "import_statement" if has_named_child(node, "import_require_clause") => NodeKind::Other,
            "import_statement" => NodeKind::Import(ImportKind::Declaration),
            "import_specifier" => NodeKind::Import(ImportKind::Specifier),
            "namespace_import" => NodeKind::Import(ImportKind::NamespaceSpecifier),
            "identifier"
                if node
                    .parent()
                    .is_some_and(|p| p.kind() == "import_clause") =>
            {
                NodeKind::Import(ImportKind::DefaultSpecifier)
            }
            "expression_statement" => NodeKind::ExpressionStatement,
            "string" => NodeKind::StringLiteral,
            "function_declaration" => NodeKind::Function(FunctionKind::Declaration),
            "function_expression" | "function" => NodeKind::Function(FunctionKind::Expression),
            "arrow_function" => NodeKind::Function(FunctionKind::Arrow),
            "method_definition" => NodeKind::Function(FunctionKind::Method),
            "generator_function_declaration" | "generator_function" => {
                NodeKind::Function(FunctionKind::Generator)
            }
            "for_statement" => NodeKind::ForStatement,
            "for_in_statement" => {
                let operator = node
                    .child_by_field_name("operator")
                    .map_or("in", |o| self.text(&o));
                if operator == "of" {
                    NodeKind::ForOfStatement
                } else {
                    NodeKind::ForInStatement
                }
            }
            _ => NodeKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_from_extension() {
        assert_eq!(
            Dialect::from_path(Path::new("src/a.js")),
            Some(Dialect::JavaScript)
        );
        assert_eq!(
            Dialect::from_path(Path::new("src/a.cjs")),
            Some(Dialect::JavaScript)
        );
        assert_eq!(
            Dialect::from_path(Path::new("src/a.mts")),
            Some(Dialect::TypeScript)
        );
        assert_eq!(Dialect::from_path(Path::new("src/a.tsx")), Some(Dialect::Tsx));
        assert_eq!(Dialect::from_path(Path::new("src/a.rs")), None);
        assert_eq!(Dialect::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn reports_syntax_errors_with_position() {
        let err = parse("var a = ;\n", Dialect::JavaScript).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 1, .. }), "{err}");
    }

    #[test]
    fn accepts_jsx_in_javascript() {
        let tree = parse("var el = <div>hi</div>;\n", Dialect::JavaScript);
        assert!(tree.is_ok());
    }

    #[test]
    fn parses_typescript_annotations() {
        let tree = parse(
            "var count: number = 0;\nfunction f(x: string): void { var y: string = x; }\n",
            Dialect::TypeScript,
        )
        .expect("typescript should parse");
        assert_eq!(
            tree.find_all(NodeKind::VariableDeclaration(DeclarationKind::Var))
                .count(),
            2
        );
    }

    #[test]
    fn declare_var_lowers_to_a_program_statement() {
        let tree = parse(
            "declare var x: number;\nexport declare var y: string;\n",
            Dialect::TypeScript,
        )
        .expect("ambient declarations should parse");
        let statements = tree.statements(tree.root()).unwrap();
        assert_eq!(
            tree.kind(statements[0]),
            NodeKind::VariableDeclaration(DeclarationKind::Var)
        );
        assert_eq!(tree.kind(statements[1]), NodeKind::ExportDeclaration);
        let payload = tree.payload(statements[1]).expect("export carries the declaration");
        assert_eq!(
            tree.kind(payload),
            NodeKind::VariableDeclaration(DeclarationKind::Var)
        );
    }

    #[test]
    fn declare_function_stays_opaque() {
        let tree = parse("declare function f(): void;\n", Dialect::TypeScript).unwrap();
        let statements = tree.statements(tree.root()).unwrap();
        assert_eq!(tree.kind(statements[0]), NodeKind::Other);
    }

    #[test]
    fn import_equals_is_not_an_import() {
        let tree = parse(
            "import fs = require(\"fs\");\nimport { a } from \"a\";\n",
            Dialect::TypeScript,
        )
        .unwrap();
        let statements = tree.statements(tree.root()).unwrap();
        assert_eq!(tree.kind(statements[0]), NodeKind::Other);
        assert_eq!(
            tree.kind(statements[1]),
            NodeKind::Import(ImportKind::Declaration)
        );
    }

    #[test]
    fn empty_source_is_an_empty_program() {
        let tree = parse("", Dialect::JavaScript).expect("empty source parses");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.statements(tree.root()), Some(&[][..]));
    }
}
