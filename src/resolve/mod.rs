//! Mapping logical module paths and role words to files in the workspace.
//!
//! - `ModuleResolver`: dependency path (`sap/bi/webi/lib/UI5Utils`) to a file
//! - `SymbolFileIndex`: helper/store files discovered by file-name suffix

mod files;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use files::{SharedFileIndex, SymbolFileIndex};

/// Resolves a module path from a declaration to a concrete file.
pub trait ModuleResolver: Send + Sync {
    /// Returns `None` when no mapping applies. The file is not checked for existence.
    fn resolve(&self, module_path: &str) -> Option<PathBuf>;
}

/// Prefix-based resolver.
///
/// Each entry maps a module path prefix to a directory relative to the
/// workspace root. The longest mapped prefix wins; segments between the
/// prefix and the file name are kept as sub-directories.
#[derive(Debug, Clone)]
pub struct PrefixResolver {
    workspace_root: PathBuf,
    roots: BTreeMap<String, String>,
}

impl PrefixResolver {
    pub fn new<P: AsRef<Path>>(workspace_root: P, roots: BTreeMap<String, String>) -> Self {
        let roots = roots
            .into_iter()
            .map(|(prefix, dir)| (prefix.trim_matches('/').to_string(), dir))
            .collect();
        Self {
            workspace_root: workspace_root.as_ref().to_path_buf(),
            roots,
        }
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }
}

impl ModuleResolver for PrefixResolver {
    fn resolve(&self, module_path: &str) -> Option<PathBuf> {
        let mut segments: Vec<&str> = module_path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        let file_name = format!("{}.js", segments.pop()?);

        for matched in (1..=segments.len()).rev() {
            let prefix = segments[..matched].join("/");
            if let Some(dir) = self.roots.get(&prefix) {
                let mut path = self.workspace_root.clone();
                path.extend(dir.split('/').filter(|s| !s.is_empty() && *s != "."));
                path.extend(&segments[matched..]);
                path.push(file_name);
                tracing::debug!(module = module_path, path = %path.display(), "resolved module");
                return Some(path);
            }
        }

        tracing::debug!(module = module_path, "no resource root for module");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PrefixResolver {
        let mut roots = BTreeMap::new();
        roots.insert("sap/bi/webi".to_string(), "./wise-wing/src".to_string());
        roots.insert(
            "sap/bi/webi/core/utils".to_string(),
            "./wise-core-utils/src/sap/bi/webi/core/utils".to_string(),
        );
        roots.insert("sap/bi/wrc".to_string(), "./wise-wrc/src".to_string());
        PrefixResolver::new("/work", roots)
    }

    #[test]
    fn test_longest_prefix_wins() {
        let path = resolver().resolve("sap/bi/webi/core/utils/ObjectUtils").unwrap();
        assert_eq!(
            path,
            PathBuf::from("/work/wise-core-utils/src/sap/bi/webi/core/utils/ObjectUtils.js")
        );
    }

    #[test]
    fn test_unmatched_segments_become_directories() {
        let path = resolver().resolve("sap/bi/webi/lib/constants/ChartIntentions").unwrap();
        assert_eq!(
            path,
            PathBuf::from("/work/wise-wing/src/lib/constants/ChartIntentions.js")
        );
    }

    #[test]
    fn test_unmapped_module() {
        assert!(resolver().resolve("sap/bi/smart/core/store/StoreRegistry").is_none());
        assert!(resolver().resolve("ObjectUtils").is_none());
        assert!(resolver().resolve("").is_none());
    }
}
