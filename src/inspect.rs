//! Whole-file symbol summaries.
//!
//! Runs every extractor over a file: the module declaration, the visible
//! members and, for stores, the synthesized accessors.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::complete::load_tree;
use crate::config::Config;
use crate::error::SourceError;
use crate::extract::{
    dependencies, members_with_policy, store_accessors, DefineDescriptor, FunctionDescriptor,
    VisibilityPolicy,
};
use crate::syntax::SyntaxTree;

/// Extension of analyzed source files.
pub const SOURCE_EXTENSION: &str = "js";

/// Symbols of one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileSymbols {
    pub path: PathBuf,
    pub dependencies: DefineDescriptor,
    pub members: Vec<FunctionDescriptor>,
    /// `None` when the file is not a store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_accessors: Option<Vec<FunctionDescriptor>>,
    /// The parser had to recover from syntax errors.
    pub recovered: bool,
}

/// Extractor settings shared by all inspected files.
#[derive(Debug, Clone)]
pub struct Inspector {
    config: Config,
    policy: VisibilityPolicy,
}

impl Inspector {
    pub fn new(config: Config, include_protected: bool) -> Self {
        let policy = VisibilityPolicy::new(include_protected)
            .with_ignored(config.visibility.ignored_members.clone());
        Self { config, policy }
    }

    pub fn symbols(&self, path: &Path, tree: &SyntaxTree) -> FileSymbols {
        FileSymbols {
            path: path.to_path_buf(),
            dependencies: dependencies(tree, &self.config.module_declaration),
            members: members_with_policy(tree, &self.policy),
            store_accessors: store_accessors(tree),
            recovered: tree.has_errors(),
        }
    }

    pub fn inspect_file(&self, path: &Path) -> Result<FileSymbols, SourceError> {
        let tree = load_tree(path)?;
        Ok(self.symbols(path, &tree))
    }

    /// Inspect files in parallel. Unreadable files are logged and skipped;
    /// results are sorted by path.
    pub fn inspect_files(&self, paths: &[PathBuf]) -> Vec<FileSymbols> {
        let results: Vec<_> = paths.par_iter().map(|p| self.inspect_file(p)).collect();

        let mut all = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(symbols) => all.push(symbols),
                Err(e) => tracing::warn!(error = %e, "skipping file"),
            }
        }

        all.sort_by(|a, b| a.path.cmp(&b.path));
        all
    }
}

/// Expand files and directories into the list of source files to inspect.
///
/// Directories are walked recursively, skipping hidden directories and
/// `node_modules`. Explicit file arguments are kept whatever their extension.
pub fn collect_sources(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            anyhow::bail!("cannot access path {}", path.display());
        }

        for entry in WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                if e.file_type().is_dir() && e.depth() > 0 {
                    return !name.starts_with('.') && name != "node_modules";
                }
                true
            })
        {
            let entry = entry?;
            if entry.file_type().is_file()
                && entry.path().extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION)
            {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_collect_sources_skips_hidden_and_vendor_dirs() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "src/A.js", "");
        write(root, "src/nested/B.js", "");
        write(root, "src/notes.txt", "");
        write(root, "node_modules/lib/C.js", "");
        write(root, ".cache/D.js", "");

        let files = collect_sources(&[root.to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["A.js", "B.js"]);
    }

    #[test]
    fn test_collect_sources_missing_path() {
        let temp = TempDir::new().unwrap();
        assert!(collect_sources(&[temp.path().join("missing")]).is_err());
    }

    #[test]
    fn test_inspect_files_sorted_and_skips_unreadable() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let b = write(
            root,
            "b/ZoomHelper.js",
            "sap.ui.define(['x/Base'], function (Base) {\n  Base.prototype.zoom = function (level) {};\n});",
        );
        let a = write(root, "a/Empty.js", "var x = 1;");
        let missing = root.join("gone.js");

        let inspector = Inspector::new(Config::default(), false);
        let symbols = inspector.inspect_files(&[b, missing, a]);

        assert_eq!(symbols.len(), 2);
        assert!(symbols[0].path.ends_with("a/Empty.js"));
        assert!(symbols[0].dependencies.is_empty());
        assert_eq!(symbols[1].dependencies.variables, vec!["Base"]);
        assert_eq!(symbols[1].members[0].signature(), "zoom(level)");
        assert!(symbols[1].store_accessors.is_none());
        assert!(!symbols[1].recovered);
    }
}
