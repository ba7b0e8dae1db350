//! Pre-order traversal with ancestor tracking.

use super::{NodeId, NodeKind, SyntaxTree};

/// Borrowed view of the ancestors of the node being visited, ordered from
/// the root down to the immediate parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AncestorPath<'a> {
    nodes: &'a [NodeId],
}

impl<'a> AncestorPath<'a> {
    /// Wraps a root-to-parent slice.
    #[must_use]
    pub fn new(nodes: &'a [NodeId]) -> Self {
        Self { nodes }
    }

    /// Immediate parent.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Parent of the immediate parent.
    #[must_use]
    pub fn grandparent(&self) -> Option<NodeId> {
        self.nodes.len().checked_sub(2).map(|i| self.nodes[i])
    }

    /// Splits off the innermost ancestor, returning it with the remaining path.
    #[must_use]
    pub fn pop(self) -> (Option<NodeId>, Self) {
        match self.nodes.split_last() {
            Some((last, rest)) => (Some(*last), Self::new(rest)),
            None => (None, self),
        }
    }

    /// Number of ancestors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true for the root node, which has no ancestors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ancestors from the root down.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeId> + 'a {
        self.nodes.iter().copied()
    }
}

/// Callback interface for [`walk`].
pub trait Visitor {
    /// Filters which nodes are passed to [`Visitor::visit_node`].
    fn interested_in(&self, kind: NodeKind) -> bool {
        let _ = kind;
        true
    }

    /// Called once per node of interest, in pre-order.
    fn visit_node(&mut self, tree: &SyntaxTree, node: NodeId, ancestors: AncestorPath<'_>);
}

/// Walks `tree` in pre-order and dispatches matching nodes to `visitor`.
pub fn walk<V: Visitor + ?Sized>(tree: &SyntaxTree, visitor: &mut V) {
    let mut path: Vec<NodeId> = Vec::new();
    let mut stack: Vec<(NodeId, usize)> = vec![(tree.root(), 0)];

    while let Some((node, depth)) = stack.pop() {
        path.truncate(depth);
        if visitor.interested_in(tree.kind(node)) {
            visitor.visit_node(tree, node, AncestorPath::new(&path));
        }
        path.push(node);
        stack.extend(tree.children(node).iter().rev().map(|c| (*c, depth + 1)));
    }
}
