//! Tree indexer: flattens a tree-sitter tree into the `SyntaxTree` arena.

use super::{NodeId, Span, SyntaxNode, SyntaxTree};

/// Index a tree-sitter tree.
///
/// Single depth-first pre-order pass with a `TreeCursor`. Every node is pushed
/// into the arena in visit order and its parent is recorded in the side table,
/// so `NodeId` order is pre-order and indexing the same tree twice yields the
/// same arena.
pub fn build(tree: &tree_sitter::Tree, source: &str) -> SyntaxTree {
    let mut nodes: Vec<SyntaxNode> = Vec::new();
    let mut parents: Vec<Option<NodeId>> = Vec::new();
    // Ancestors of the cursor position
    let mut stack: Vec<NodeId> = Vec::new();
    let mut cursor = tree.walk();

    loop {
        let node = cursor.node();
        let id = NodeId(nodes.len());
        let parent = stack.last().copied();

        nodes.push(SyntaxNode {
            kind: node.kind(),
            field: cursor.field_name(),
            named: node.is_named(),
            error: node.is_error() || node.is_missing(),
            span: Span::from_node(node),
            children: Vec::new(),
        });
        parents.push(parent);
        if let Some(p) = parent {
            nodes[p.0].children.push(id);
        }

        if cursor.goto_first_child() {
            stack.push(id);
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return SyntaxTree {
                    source: source.to_string(),
                    nodes,
                    parents,
                };
            }
            stack.pop();
        }
    }
}
