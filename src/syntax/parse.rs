//! Tolerant JavaScript parsing via tree-sitter.

use tree_sitter::{Language, Parser};

use super::{build, SyntaxTree};
use crate::error::SourceError;

/// The tree-sitter JavaScript language.
pub fn javascript() -> Language {
    tree_sitter_javascript::LANGUAGE.into()
}

/// Parse source code and index the resulting tree.
///
/// Malformed input is not an error: tree-sitter recovers and the tree simply
/// contains ERROR nodes. Failures are limited to grammar/ABI problems.
pub fn parse(source: &str) -> Result<SyntaxTree, SourceError> {
    let mut parser = Parser::new();
    parser
        .set_language(&javascript())
        .map_err(|e| SourceError::Language(e.to_string()))?;
    let tree = parser.parse(source, None).ok_or(SourceError::Parse)?;

    let indexed = build(&tree, source);
    tracing::trace!(
        nodes = indexed.len(),
        has_errors = indexed.has_errors(),
        "indexed source"
    );
    Ok(indexed)
}
