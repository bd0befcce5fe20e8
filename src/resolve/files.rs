//! Workspace discovery of helper and store files.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::config::DiscoveryConfig;
use crate::context::WordRole;

/// Helper and store files known in the workspace.
#[derive(Debug, Clone, Default)]
pub struct SymbolFileIndex {
    pub helpers: Vec<PathBuf>,
    pub stores: Vec<PathBuf>,
}

impl SymbolFileIndex {
    /// Walk `root` and collect files matching the configured helper/store globs.
    ///
    /// Globs are matched against the path relative to `root`. Each list is
    /// capped at `max_files`; results are sorted for deterministic lookups.
    pub fn discover<P: AsRef<Path>>(root: P, config: &DiscoveryConfig) -> anyhow::Result<Self> {
        let root = root.as_ref();
        let helper_glob = Glob::new(&config.helper_glob)?.compile_matcher();
        let store_glob = Glob::new(&config.store_glob)?.compile_matcher();
        let excluded = build_globset(&config.excluded_paths)?;

        let mut index = SymbolFileIndex::default();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| {
                let rel = e.path().strip_prefix(root).unwrap_or(e.path());
                let name = e.file_name().to_string_lossy();
                if e.file_type().is_dir() && (name.starts_with('.') && e.depth() > 0) {
                    return false;
                }
                !excluded.is_match(rel)
            })
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if helper_glob.is_match(rel) && index.helpers.len() < config.max_files {
                index.helpers.push(entry.path().to_path_buf());
            } else if store_glob.is_match(rel) && index.stores.len() < config.max_files {
                index.stores.push(entry.path().to_path_buf());
            }

            if index.helpers.len() >= config.max_files && index.stores.len() >= config.max_files {
                break;
            }
        }

        index.helpers.sort();
        index.stores.sort();
        tracing::info!(
            helpers = index.helpers.len(),
            stores = index.stores.len(),
            root = %root.display(),
            "discovered symbol files"
        );
        Ok(index)
    }

    /// Files registered for a role.
    pub fn files(&self, role: WordRole) -> &[PathBuf] {
        match role {
            WordRole::Helper => &self.helpers,
            WordRole::Store => &self.stores,
            WordRole::Plain => &[],
        }
    }

    /// Find the file for a stem, trying `{stem}{Suffix}.js` then `{stem}.{Suffix}.js`.
    ///
    /// Matching is a case-insensitive "path contains" test.
    pub fn find(&self, stem: &str, role: WordRole, suffix: &str) -> Option<&Path> {
        let files = self.files(role);
        let candidates = [
            format!("{}{}.js", stem, suffix).to_lowercase(),
            format!("{}.{}.js", stem, suffix).to_lowercase(),
        ];

        candidates.iter().find_map(|candidate| {
            files
                .iter()
                .find(|path| {
                    path.to_string_lossy()
                        .replace('\\', "/")
                        .to_lowercase()
                        .contains(candidate.as_str())
                })
                .map(PathBuf::as_path)
        })
    }

    pub fn len(&self) -> usize {
        self.helpers.len() + self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Shared, swappable file index.
///
/// Readers take a snapshot `Arc`; a refresh builds a complete new index and
/// replaces the pointer, so a reader never sees a half-updated list.
#[derive(Debug, Default)]
pub struct SharedFileIndex {
    current: RwLock<Arc<SymbolFileIndex>>,
}

impl SharedFileIndex {
    pub fn new(index: SymbolFileIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    pub fn snapshot(&self) -> Arc<SymbolFileIndex> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn replace(&self, index: SymbolFileIndex) {
        let index = Arc::new(index);
        match self.current.write() {
            Ok(mut guard) => *guard = index,
            Err(poisoned) => *poisoned.into_inner() = index,
        }
    }
}
