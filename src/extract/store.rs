//! Accessor synthesis from declarative store properties.
//!
//! A store module lists its properties as data:
//!
//! ```text
//! metadata: {
//!   properties: {
//!     storeProperties: { defaultValue: [{ name: 'Foo' }, { name: 'Bar' }] },
//!     keyElements: { ... }
//!   }
//! }
//! ```
//!
//! Each entry implies `getFoo`, `setFoo` and `registerFoo` members that never
//! appear literally in the source.

use std::borrow::Cow;

use super::FunctionDescriptor;
use crate::syntax::{NodeId, SyntaxTree};

pub const STORE_PROPERTIES_PATH: &[&str] =
    &["metadata", "properties", "storeProperties", "defaultValue"];
pub const KEY_ELEMENTS_PATH: &[&str] = &["metadata", "properties", "keyElements"];

pub const VIEW_CONTEXT_PARAM: &str = "viewContext";
pub const HANDLER_PARAM: &str = "handler";
pub const RECEIVER_PARAM: &str = "receiver";

/// Synthesize getter, setter and change-registration members per store property.
///
/// Returns `None` when the file declares no store property array at all, and
/// `Some(vec![])` for a store with zero properties. When the store is keyed by
/// view context, every accessor takes `viewContext` first.
pub fn store_accessors(tree: &SyntaxTree) -> Option<Vec<FunctionDescriptor>> {
    let array = tree
        .object_path(tree.root(), STORE_PROPERTIES_PATH)
        .filter(|&v| tree.kind(v) == "array")?;
    let keyed = tree.object_path(tree.root(), KEY_ELEMENTS_PATH).is_some();

    let accessors: Vec<_> = tree
        .named_children(array)
        .filter_map(|entry| property_name(tree, entry))
        .flat_map(|name| accessor_family(&name, keyed))
        .collect();

    tracing::debug!(accessors = accessors.len(), keyed, "store properties found");
    Some(accessors)
}

/// `name` of one `{ name: '...' }` entry. The key must be a plain identifier
/// and the value a string literal.
fn property_name(tree: &SyntaxTree, entry: NodeId) -> Option<Cow<'_, str>> {
    if tree.kind(entry) != "object" {
        return None;
    }
    tree.named_children(entry)
        .filter(|&c| tree.kind(c) == "pair")
        .find(|&pair| {
            tree.child_by_field(pair, "key")
                .map(|k| tree.kind(k) == "property_identifier" && tree.text(k) == "name")
                .unwrap_or(false)
        })
        .and_then(|pair| tree.child_by_field(pair, "value"))
        .and_then(|value| tree.string_value(value))
        .filter(|name| !name.is_empty())
}

fn accessor_family(name: &str, keyed: bool) -> [FunctionDescriptor; 3] {
    let capitalized = capitalize(name);
    let prefix = |mut params: Vec<String>| {
        if keyed {
            params.insert(0, VIEW_CONTEXT_PARAM.to_string());
        }
        params
    };

    [
        FunctionDescriptor::new(format!("get{}", capitalized), prefix(vec![])),
        FunctionDescriptor::new(format!("set{}", capitalized), prefix(vec![decapitalize(name)])),
        FunctionDescriptor::new(
            format!("register{}", capitalized),
            prefix(vec![HANDLER_PARAM.to_string(), RECEIVER_PARAM.to_string()]),
        ),
    ]
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse;

    fn signatures(functions: &[FunctionDescriptor]) -> Vec<String> {
        functions.iter().map(FunctionDescriptor::signature).collect()
    }

    #[test]
    fn test_accessor_triples_in_declaration_order() {
        let tree = parse(
            r#"
const DocumentStore = AbstractStore.extend('x.DocumentStore', {
  metadata: {
    properties: {
      storeProperties: {
        defaultValue: [{ name: 'Foo' }, { name: 'Bar', defaultValue: null }]
      }
    }
  }
});
"#,
        )
        .unwrap();

        let accessors = store_accessors(&tree).unwrap();
        assert_eq!(
            signatures(&accessors),
            vec![
                "getFoo()",
                "setFoo(foo)",
                "registerFoo(handler, receiver)",
                "getBar()",
                "setBar(bar)",
                "registerBar(handler, receiver)",
            ]
        );
    }

    #[test]
    fn test_key_elements_prefix_view_context() {
        let tree = parse(
            r#"
X.extend('x.S', {
  metadata: {
    properties: {
      keyElements: { defaultValue: ['viewContext'] },
      storeProperties: { defaultValue: [{ name: 'selection' }] }
    }
  }
});
"#,
        )
        .unwrap();

        let accessors = store_accessors(&tree).unwrap();
        assert_eq!(
            signatures(&accessors),
            vec![
                "getSelection(viewContext)",
                "setSelection(viewContext, selection)",
                "registerSelection(viewContext, handler, receiver)",
            ]
        );
    }

    #[test]
    fn test_not_a_store() {
        let tree = parse("X.extend('x.H', { metadata: { properties: { name: { defaultValue: 'h' } } } });")
            .unwrap();
        assert!(store_accessors(&tree).is_none());

        let tree = parse("X.extend('x.S', { metadata: { properties: { storeProperties: { defaultValue: null } } } });")
            .unwrap();
        assert!(store_accessors(&tree).is_none());
    }

    #[test]
    fn test_empty_store_is_not_none() {
        let tree = parse("X.extend('x.S', { metadata: { properties: { storeProperties: { defaultValue: [] } } } });")
            .unwrap();
        assert_eq!(store_accessors(&tree), Some(vec![]));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let tree = parse(
            r#"
X.extend('x.S', { metadata: { properties: { storeProperties: { defaultValue: [
  { name: 'Ok' },
  { 'name': 'QuotedKey' },
  { name: someVariable },
  { label: 'NoName' },
  'notAnObject',
  { name: '' }
] } } } });
"#,
        )
        .unwrap();

        let accessors = store_accessors(&tree).unwrap();
        assert_eq!(accessors.len(), 3);
        assert_eq!(accessors[0].name, "getOk");
    }

    #[test]
    fn test_escaped_names_are_decoded() {
        let tree = parse(
            r#"X.extend('x.S', { metadata: { properties: { storeProperties: { defaultValue: [
  { name: "a\"b" },
  { name: 'Zoom' }
] } } } });"#,
        )
        .unwrap();

        let accessors = store_accessors(&tree).unwrap();
        assert_eq!(
            signatures(&accessors),
            vec![
                "getA\"b()",
                "setA\"b(a\"b)",
                "registerA\"b(handler, receiver)",
                "getZoom()",
                "setZoom(zoom)",
                "registerZoom(handler, receiver)",
            ]
        );
    }

    #[test]
    fn test_capitalization() {
        assert_eq!(capitalize("fooBar"), "FooBar");
        assert_eq!(decapitalize("FooBar"), "fooBar");
        assert_eq!(capitalize(""), "");
    }
}
