//! Traversal orders and sub-tree search.

use std::borrow::Cow;
use std::collections::VecDeque;

use super::{NodeId, SyntaxTree};

/// Order in which `SyntaxTree::walk` visits a sub-tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Parent before children, children in source order.
    PreOrder,
    /// Children before parent.
    PostOrder,
    /// Level by level; shallow nodes (top-level statements) first.
    BreadthFirst,
}

/// Lazy walk over a sub-tree. Dropping it early stops the search.
pub struct Walk<'t> {
    tree: &'t SyntaxTree,
    order: Traversal,
    // (node, children already expanded) - the flag is only used for post-order
    pending: VecDeque<(NodeId, bool)>,
}

impl<'t> Iterator for Walk<'t> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        match self.order {
            Traversal::PreOrder => {
                let (id, _) = self.pending.pop_back()?;
                for &child in self.tree.children(id).iter().rev() {
                    self.pending.push_back((child, false));
                }
                Some(id)
            }
            Traversal::BreadthFirst => {
                let (id, _) = self.pending.pop_front()?;
                for &child in self.tree.children(id) {
                    self.pending.push_back((child, false));
                }
                Some(id)
            }
            Traversal::PostOrder => loop {
                let (id, expanded) = self.pending.pop_back()?;
                if expanded || self.tree.children(id).is_empty() {
                    return Some(id);
                }
                self.pending.push_back((id, true));
                for &child in self.tree.children(id).iter().rev() {
                    self.pending.push_back((child, false));
                }
            },
        }
    }
}

impl SyntaxTree {
    /// Walk the sub-tree rooted at `from` in the given order.
    pub fn walk(&self, from: NodeId, order: Traversal) -> Walk<'_> {
        let mut pending = VecDeque::new();
        pending.push_back((from, false));
        Walk {
            tree: self,
            order,
            pending,
        }
    }

    /// First node matching the predicate. Stops at the first hit.
    pub fn find<F>(&self, from: NodeId, order: Traversal, mut predicate: F) -> Option<NodeId>
    where
        F: FnMut(NodeId) -> bool,
    {
        self.walk(from, order).find(|&id| predicate(id))
    }

    /// All nodes matching the predicate, in traversal order.
    pub fn find_all<F>(&self, from: NodeId, order: Traversal, mut predicate: F) -> Vec<NodeId>
    where
        F: FnMut(NodeId) -> bool,
    {
        self.walk(from, order).filter(|&id| predicate(id)).collect()
    }

    /// Key of an object-literal `pair`, for identifier and quoted keys.
    pub fn pair_key(&self, pair: NodeId) -> Option<Cow<'_, str>> {
        let key = self.child_by_field(pair, "key")?;
        match self.kind(key) {
            "property_identifier" => Some(Cow::Borrowed(self.text(key))),
            "string" => self.string_value(key),
            _ => None,
        }
    }

    /// Value of the property `name` in an object literal.
    pub fn object_property(&self, object: NodeId, name: &str) -> Option<NodeId> {
        if self.kind(object) != "object" {
            return None;
        }
        self.named_children(object)
            .filter(|&c| self.kind(c) == "pair")
            .find(|&pair| self.pair_key(pair).as_deref() == Some(name))
            .and_then(|pair| self.child_by_field(pair, "value"))
    }

    /// Resolve a nested key path from one object literal.
    pub fn resolve_path(&self, object: NodeId, path: &[&str]) -> Option<NodeId> {
        let (first, rest) = path.split_first()?;
        let value = self.object_property(object, first)?;
        if rest.is_empty() {
            Some(value)
        } else {
            self.resolve_path(value, rest)
        }
    }

    /// Find the first object literal under `from` (pre-order) from which the
    /// key path resolves, and return the value of the last key.
    ///
    /// For `["metadata", "properties"]` this matches `{ metadata: { properties: X } }`
    /// anywhere in the tree and returns `X`.
    pub fn object_path(&self, from: NodeId, path: &[&str]) -> Option<NodeId> {
        self.walk(from, Traversal::PreOrder)
            .filter(|&id| self.kind(id) == "object")
            .find_map(|object| self.resolve_path(object, path))
    }
}
