//! Symbol extraction over an indexed syntax tree.
//!
//! Three stateless passes:
//! - `dependencies`: the module declaration call (`sap.ui.define([...], function (...) {})`)
//! - `members`: prototype assignments and class methods, filtered by visibility
//! - `store_accessors`: accessors synthesized from a declarative store property list
//!
//! None of them fail. A tree without the expected shape yields empty results.

mod define;
mod members;
mod store;

use serde::{Deserialize, Serialize};

use crate::syntax::{NodeId, SyntaxTree};

pub use define::{dependencies, ModuleDeclaration};
pub use members::{members, members_with_policy, VisibilityPolicy, LIFECYCLE_HOOKS};
pub use store::{
    store_accessors, HANDLER_PARAM, KEY_ELEMENTS_PATH, RECEIVER_PARAM, STORE_PROPERTIES_PATH,
    VIEW_CONTEXT_PARAM,
};

/// One callable member and its parameter names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub params: Vec<String>,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Call signature, e.g. `getFormat(viewContext, objectId)`.
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.params.join(", "))
    }
}

/// Dependency paths of a module declaration and the names bound to them.
///
/// `paths[i]` is bound to `variables[i]`. Lengths may differ on malformed input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefineDescriptor {
    pub paths: Vec<String>,
    pub variables: Vec<String>,
}

impl DefineDescriptor {
    /// Dependency path bound to a local variable name.
    pub fn path_for(&self, variable: &str) -> Option<&str> {
        let index = self.variables.iter().position(|v| v == variable)?;
        self.paths.get(index).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.variables.is_empty()
    }
}

/// Whether the node is a function literal (expression, arrow or generator).
pub(crate) fn is_function_literal(tree: &SyntaxTree, id: NodeId) -> bool {
    matches!(
        tree.kind(id),
        "function_expression" | "arrow_function" | "generator_function"
    )
}

/// Parameter names of a function-like node, in declaration order.
///
/// A parameter with a default contributes its bound name, a rest element its
/// identifier, and a destructuring pattern its source text so positions stay
/// aligned with the call site.
pub(crate) fn parameter_names(tree: &SyntaxTree, function: NodeId) -> Vec<String> {
    // `x => x` has a single bare parameter
    if let Some(single) = tree.child_by_field(function, "parameter") {
        return vec![tree.text(single).to_string()];
    }

    match tree.child_by_field(function, "parameters") {
        Some(params) => formal_parameter_names(tree, params),
        None => Vec::new(),
    }
}

/// Names declared by a `formal_parameters` node.
pub(crate) fn formal_parameter_names(tree: &SyntaxTree, params: NodeId) -> Vec<String> {
    tree.named_children(params)
        .filter(|&p| !tree.node(p).error)
        .filter_map(|p| parameter_name(tree, p))
        .collect()
}

fn parameter_name(tree: &SyntaxTree, param: NodeId) -> Option<String> {
    let name = match tree.kind(param) {
        "identifier" => tree.text(param),
        "assignment_pattern" => {
            let left = tree.child_by_field(param, "left")?;
            tree.text(left)
        }
        "rest_pattern" => {
            let inner = tree.named_children(param).next()?;
            tree.text(inner)
        }
        _ => tree.text(param),
    };

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
