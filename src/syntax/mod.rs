//! Navigable syntax tree built on top of the tolerant tree-sitter parse.
//!
//! This module provides:
//! - `parse`: tree-sitter JavaScript parse of a (possibly malformed) buffer
//! - `SyntaxTree`: an owned, pre-ordered arena of nodes with a separate parent table
//! - `Traversal`: pre-order, post-order and breadth-first walks with early exit
//! - Path search over nested object literals
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌────────────────┐
//! │ Source text  │────▶│ tree-sitter  │────▶│ index::build   │
//! └──────────────┘     │ (tolerant)   │     │ arena + parents│
//!                      └──────────────┘     └────────────────┘
//!                                                   │
//!                                                   ▼
//!                                           ┌────────────────┐
//!                                           │ Extractors     │
//!                                           └────────────────┘
//! ```

mod index;
mod parse;
mod search;

use std::borrow::Cow;

pub use index::build;
pub use parse::{javascript, parse};
pub use search::{Traversal, Walk};

/// Byte range of a node in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start_byte: usize,
    /// Exclusive.
    pub end_byte: usize,
}

impl Span {
    pub fn from_node(node: tree_sitter::Node) -> Self {
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
        }
    }
}

/// Index of a node inside its `SyntaxTree` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in pre-order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One node of the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    /// Grammar kind (e.g. "call_expression", "identifier", "(").
    pub kind: &'static str,
    /// Field under which the parent holds this node (e.g. "left", "arguments").
    pub field: Option<&'static str>,
    /// False for anonymous tokens such as punctuation and keywords.
    pub named: bool,
    /// True for ERROR nodes and nodes the parser had to invent.
    pub error: bool,
    pub span: Span,
    /// Children in source order.
    pub children: Vec<NodeId>,
}

/// An indexed syntax tree for one source string.
///
/// Nodes are owned by the arena; the parent relation lives in a separate
/// lookup table so the tree itself stays acyclic.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: String,
    nodes: Vec<SyntaxNode>,
    parents: Vec<Option<NodeId>>,
}

impl SyntaxTree {
    /// The root node (always the first node in pre-order).
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The source text the tree was built from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &'static str {
        self.nodes[id.0].kind
    }

    /// Get the source text covered by a node.
    pub fn text(&self, id: NodeId) -> &str {
        let span = &self.nodes[id.0].span;
        self.source.get(span.start_byte..span.end_byte).unwrap_or("")
    }

    /// Parent lookup. `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id.0]
    }

    /// Iterate from the parent of `id` up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Named children, skipping comments.
    pub fn named_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&c| self.nodes[c.0].named && self.nodes[c.0].kind != "comment")
    }

    /// First child held under the given field name.
    pub fn child_by_field(&self, id: NodeId, field: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.nodes[c.0].field == Some(field))
    }

    /// Whether the node has an anonymous token child of the given kind (e.g. "get").
    pub fn has_token(&self, id: NodeId, token: &str) -> bool {
        self.children(id)
            .iter()
            .any(|&c| !self.nodes[c.0].named && self.nodes[c.0].kind == token)
    }

    /// Next named, non-comment sibling.
    pub fn next_named_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        self.named_children(parent).skip_while(|&c| c != id).nth(1)
    }

    /// Whether the parser had to recover from any syntax error.
    pub fn has_errors(&self) -> bool {
        self.nodes.iter().any(|n| n.error)
    }

    /// All nodes of the sub-tree rooted at `root`, in pre-order.
    pub fn flatten(&self, root: NodeId) -> Vec<NodeId> {
        self.walk(root, Traversal::PreOrder).collect()
    }

    /// Value of a string literal: quotes removed and escape sequences decoded.
    ///
    /// Borrows from the source unless the literal contains an escape.
    pub fn string_value(&self, id: NodeId) -> Option<Cow<'_, str>> {
        if self.kind(id) != "string" {
            return None;
        }
        let escaped = self
            .children(id)
            .iter()
            .any(|&c| self.kind(c) == "escape_sequence");
        if !escaped {
            let text = self.text(id);
            let text = text.strip_prefix(['"', '\'']).unwrap_or(text);
            return Some(Cow::Borrowed(text.strip_suffix(['"', '\'']).unwrap_or(text)));
        }

        let mut value = String::new();
        for &part in self.children(id) {
            match self.kind(part) {
                "escape_sequence" => unescape_into(self.text(part), &mut value),
                _ if self.node(part).named => value.push_str(self.text(part)),
                _ => {}
            }
        }
        Some(Cow::Owned(value))
    }
}

/// Append the character(s) denoted by one escape sequence (`\n`, `\x41`, `\u{1F600}`...).
fn unescape_into(escape: &str, out: &mut String) {
    let body = match escape.strip_prefix('\\') {
        Some(b) => b,
        None => {
            out.push_str(escape);
            return;
        }
    };
    let first = match body.chars().next() {
        Some(c) => c,
        None => return,
    };

    let simple = match first {
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        'v' => Some('\u{b}'),
        '0' if body.len() == 1 => Some('\0'),
        _ => None,
    };
    if let Some(c) = simple {
        out.push(c);
        return;
    }

    let code = match first {
        'x' => u32::from_str_radix(&body[1..], 16).ok(),
        'u' => {
            let hex = body[1..].trim_start_matches('{').trim_end_matches('}');
            u32::from_str_radix(hex, 16).ok()
        }
        _ => None,
    };
    match code.and_then(char::from_u32) {
        Some(c) => out.push(c),
        // line continuation
        None if first == '\n' || first == '\r' => {}
        None if first == 'x' || first == 'u' => out.push_str(escape),
        None => out.push_str(body),
    }
}
