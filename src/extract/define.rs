//! Module declaration ("define section") extraction.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::{formal_parameter_names, is_function_literal, parameter_names, DefineDescriptor};
use crate::syntax::{NodeId, SyntaxTree, Traversal};

/// Shape of the module declaration call: `namespace.member.method(...)`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModuleDeclaration {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_member")]
    pub member: String,
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_namespace() -> String {
    "sap".to_string()
}

fn default_member() -> String {
    "ui".to_string()
}

fn default_method() -> String {
    "define".to_string()
}

impl Default for ModuleDeclaration {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            member: default_member(),
            method: default_method(),
        }
    }
}

impl ModuleDeclaration {
    /// Check whether a call expression is a declaration call.
    fn matches(&self, tree: &SyntaxTree, call: NodeId) -> bool {
        if tree.kind(call) != "call_expression" {
            return false;
        }
        tree.child_by_field(call, "function")
            .map(|callee| self.is_callee(tree, callee))
            .unwrap_or(false)
    }

    /// Check whether a node is the declaration callee left inside an error node.
    ///
    /// A declaration call that is still open at the end of the buffer leaves
    /// no `call_expression`; its callee and arguments become siblings instead.
    fn matches_unclosed(&self, tree: &SyntaxTree, callee: NodeId) -> bool {
        tree.parent(callee).map(|p| tree.kind(p)) == Some("ERROR") && self.is_callee(tree, callee)
    }

    /// `namespace.member.method`
    fn is_callee(&self, tree: &SyntaxTree, callee: NodeId) -> bool {
        if tree.kind(callee) != "member_expression"
            || !self.field_text_is(tree, callee, "property", &self.method)
        {
            return false;
        }

        let receiver = match tree.child_by_field(callee, "object") {
            Some(r) if tree.kind(r) == "member_expression" => r,
            _ => return false,
        };
        self.field_text_is(tree, receiver, "object", &self.namespace)
            && self.field_text_is(tree, receiver, "property", &self.member)
    }

    fn field_text_is(&self, tree: &SyntaxTree, id: NodeId, field: &str, expected: &str) -> bool {
        tree.child_by_field(id, field)
            .map(|f| tree.text(f) == expected)
            .unwrap_or(false)
    }
}

/// Extract the dependency list of the first module declaration call.
///
/// The search is breadth-first so top-level statements are checked before
/// nested code. Array literals supply paths (string elements only) and
/// function literals supply variables, whatever their argument position.
/// When no function literal is passed, a function declaration directly after
/// the declaring statement provides the variables instead. A declaration
/// whose argument list is not closed yet is read from the recovered siblings
/// of its callee.
pub fn dependencies(tree: &SyntaxTree, declaration: &ModuleDeclaration) -> DefineDescriptor {
    let found = tree.find(tree.root(), Traversal::BreadthFirst, |id| {
        declaration.matches(tree, id) || declaration.matches_unclosed(tree, id)
    });
    let define = match found {
        Some(call) if tree.kind(call) == "call_expression" => from_call(tree, call),
        Some(callee) => from_unclosed(tree, callee),
        None => return DefineDescriptor::default(),
    };

    tracing::debug!(
        paths = define.paths.len(),
        variables = define.variables.len(),
        "module declaration found"
    );
    define
}

fn from_call(tree: &SyntaxTree, call: NodeId) -> DefineDescriptor {
    let mut define = DefineDescriptor::default();
    let mut has_factory = false;

    if let Some(arguments) = tree.child_by_field(call, "arguments") {
        for argument in tree.named_children(arguments) {
            if tree.kind(argument) == "array" {
                define.paths.extend(string_elements(tree, argument));
            } else if is_function_literal(tree, argument) {
                has_factory = true;
                define.variables.extend(parameter_names(tree, argument));
            }
        }
    }

    if !has_factory {
        if let Some(factory) = hoisted_factory(tree, call) {
            define.variables = parameter_names(tree, factory);
        }
    }
    define
}

/// Arguments of an unclosed call follow the callee inside the same error node.
/// Reading stops at the first parameter list.
fn from_unclosed(tree: &SyntaxTree, callee: NodeId) -> DefineDescriptor {
    let mut define = DefineDescriptor::default();
    let parent = match tree.parent(callee) {
        Some(p) => p,
        None => return define,
    };

    for node in tree.named_children(parent).skip_while(|&c| c != callee).skip(1) {
        match tree.kind(node) {
            "array" => define.paths.extend(string_elements(tree, node)),
            "formal_parameters" => {
                define.variables = formal_parameter_names(tree, node);
                break;
            }
            _ if is_function_literal(tree, node) => {
                define.variables = parameter_names(tree, node);
                break;
            }
            _ => {}
        }
    }

    tracing::debug!("module declaration recovered from an unclosed call");
    define
}

fn string_elements(tree: &SyntaxTree, array: NodeId) -> Vec<String> {
    tree.named_children(array)
        .filter_map(|element| tree.string_value(element))
        .map(Cow::into_owned)
        .collect()
}

/// Function declaration immediately following the top-level statement that holds `call`.
fn hoisted_factory(tree: &SyntaxTree, call: NodeId) -> Option<NodeId> {
    let root = tree.root();
    let statement = std::iter::once(call)
        .chain(tree.ancestors(call))
        .find(|&id| tree.parent(id) == Some(root))?;

    tree.next_named_sibling(statement)
        .filter(|&next| tree.kind(next) == "function_declaration")
}
