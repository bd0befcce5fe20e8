//! Presentation form of extracted members.

use serde::Serialize;

use crate::extract::FunctionDescriptor;

/// Marker shown in front of every suggestion label.
pub const LABEL_MARKER: &str = "★";
pub const MEMBER_DETAIL: &str = "Prototype";

/// One completion item with a snippet to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub label: String,
    pub name: String,
    pub detail: String,
    /// Markdown: `**name** (_a_, _b_)`
    pub documentation: String,
    /// Snippet with one tab stop per parameter: `name(${1:a}, ${2:b})`
    pub insert_text: String,
}

impl Suggestion {
    pub fn from_descriptor(function: &FunctionDescriptor) -> Self {
        let documented: Vec<String> = function.params.iter().map(|p| format!("_{}_", p)).collect();
        Self {
            label: format!("{} {}", LABEL_MARKER, function.name),
            name: function.name.clone(),
            detail: MEMBER_DETAIL.to_string(),
            documentation: format!("**{}** ({})", function.name, documented.join(", ")),
            insert_text: snippet(&function.name, &function.params),
        }
    }
}

/// Call snippet `name(${1:a}, ${2:b})`.
pub fn snippet(name: &str, params: &[String]) -> String {
    let placeholders: Vec<String> = params
        .iter()
        .enumerate()
        .map(|(i, p)| format!("${{{}:{}}}", i + 1, escape_placeholder(p)))
        .collect();
    format!("{}({})", name.replace('$', "\\$"), placeholders.join(", "))
}

// `$`, `}` and `\` are significant inside a snippet placeholder
fn escape_placeholder(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '$' | '}' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Turn descriptors into suggestions sorted by name (case-insensitive).
///
/// Identical descriptors collapse into one suggestion.
pub fn build_suggestions<I>(descriptors: I) -> Vec<Suggestion>
where
    I: IntoIterator<Item = FunctionDescriptor>,
{
    let mut descriptors: Vec<FunctionDescriptor> = descriptors.into_iter().collect();
    descriptors.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.params.cmp(&b.params))
    });
    descriptors.dedup();

    descriptors.iter().map(Suggestion::from_descriptor).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(name: &str, params: &[&str]) -> FunctionDescriptor {
        FunctionDescriptor::new(name, params.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn test_suggestion_fields() {
        let s = Suggestion::from_descriptor(&f("getFormat", &["viewContext", "id"]));
        assert_eq!(s.label, "★ getFormat");
        assert_eq!(s.name, "getFormat");
        assert_eq!(s.detail, "Prototype");
        assert_eq!(s.documentation, "**getFormat** (_viewContext_, _id_)");
        assert_eq!(s.insert_text, "getFormat(${1:viewContext}, ${2:id})");
    }

    #[test]
    fn test_snippet_without_params() {
        assert_eq!(snippet("refresh", &[]), "refresh()");
    }

    #[test]
    fn test_snippet_escapes_placeholder_text() {
        let params = vec!["$scope".to_string(), "{ a }".to_string()];
        assert_eq!(snippet("run", &params), r"run(${1:\$scope}, ${2:{ a \}})");
    }

    #[test]
    fn test_sorted_case_insensitively() {
        let suggestions = build_suggestions(vec![
            f("setValue", &["value"]),
            f("Apply", &[]),
            f("getValue", &[]),
            f("apply", &[]),
            f("getValue", &[]),
        ]);
        let names: Vec<&str> = suggestions.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Apply", "apply", "getValue", "setValue"]);
    }

    #[test]
    fn test_duplicates_collapse_when_not_adjacent() {
        let suggestions = build_suggestions(vec![
            f("format", &["a"]),
            f("format", &["b"]),
            f("format", &["a"]),
        ]);
        let snippets: Vec<&str> = suggestions.iter().map(|s| s.insert_text.as_str()).collect();
        assert_eq!(snippets, vec!["format(${1:a})", "format(${1:b})"]);
    }
}
