//! Callable member extraction: prototype assignments and class methods.

use phf::phf_set;

use super::{is_function_literal, parameter_names, FunctionDescriptor};
use crate::syntax::{NodeId, SyntaxTree, Traversal};

/// Lifecycle hooks that are never offered as members.
pub static LIFECYCLE_HOOKS: phf::Set<&'static str> = phf_set! {
    "init",
    "exit",
    "destroy",
    "onInit",
    "onExit",
};

/// Decides which member names are offered.
#[derive(Debug, Clone, Default)]
pub struct VisibilityPolicy {
    /// Include `_`-prefixed (protected) members.
    pub include_protected: bool,
    /// Names ignored on top of the lifecycle hooks.
    pub ignored: Vec<String>,
}

impl VisibilityPolicy {
    pub fn new(include_protected: bool) -> Self {
        Self {
            include_protected,
            ignored: Vec::new(),
        }
    }

    pub fn with_ignored(mut self, ignored: Vec<String>) -> Self {
        self.ignored = ignored;
        self
    }

    pub fn allows(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        if !self.include_protected && name.starts_with('_') {
            return false;
        }
        !LIFECYCLE_HOOKS.contains(name) && !self.ignored.iter().any(|i| i == name)
    }
}

/// Extract members with the default ignore-list.
pub fn members(tree: &SyntaxTree, include_protected: bool) -> Vec<FunctionDescriptor> {
    members_with_policy(tree, &VisibilityPolicy::new(include_protected))
}

/// Extract members: prototype-style assignments first, then class methods,
/// each in document order.
pub fn members_with_policy(tree: &SyntaxTree, policy: &VisibilityPolicy) -> Vec<FunctionDescriptor> {
    let assigned = tree
        .walk(tree.root(), Traversal::PreOrder)
        .filter_map(|id| assigned_function(tree, id));
    let methods = tree
        .walk(tree.root(), Traversal::PreOrder)
        .filter_map(|id| class_method(tree, id));

    assigned
        .chain(methods)
        .filter(|f| policy.allows(&f.name))
        .collect()
}

/// `a.b.name = function (...) {}` as a whole statement.
fn assigned_function(tree: &SyntaxTree, statement: NodeId) -> Option<FunctionDescriptor> {
    if tree.kind(statement) != "expression_statement" {
        return None;
    }
    let assignment = tree
        .named_children(statement)
        .next()
        .filter(|&e| tree.kind(e) == "assignment_expression")?;

    let left = tree
        .child_by_field(assignment, "left")
        .filter(|&l| tree.kind(l) == "member_expression")?;
    let right = tree
        .child_by_field(assignment, "right")
        .filter(|&r| is_function_literal(tree, r))?;

    // Computed access (`a[b] = ...`) is a subscript_expression and never gets here
    let property = tree
        .child_by_field(left, "property")
        .filter(|&p| tree.kind(p) == "property_identifier")?;

    Some(FunctionDescriptor::new(
        tree.text(property),
        parameter_names(tree, right),
    ))
}

/// Plain method of a class body (no getter, setter or constructor).
fn class_method(tree: &SyntaxTree, method: NodeId) -> Option<FunctionDescriptor> {
    if tree.kind(method) != "method_definition" {
        return None;
    }
    let in_class = tree
        .parent(method)
        .map(|p| tree.kind(p) == "class_body")
        .unwrap_or(false);
    if !in_class || tree.has_token(method, "get") || tree.has_token(method, "set") {
        return None;
    }

    let name = tree
        .child_by_field(method, "name")
        .filter(|&n| tree.kind(n) == "property_identifier")
        .map(|n| tree.text(n))?;
    if name == "constructor" {
        return None;
    }

    Some(FunctionDescriptor::new(name, parameter_names(tree, method)))
}
