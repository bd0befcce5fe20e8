//! Completion requests: cursor context to member suggestions.
//!
//! ```text
//!  buffer + cursor
//!        │
//!        ▼
//!  previous word ──► CompletionTarget
//!                       │
//!      ┌────────────────┼──────────────────┬─────────────────┐
//!      ▼                ▼                  ▼                 ▼
//!  `this`          define variable     *Helper word       *Store word
//!  current tree    ModuleResolver      SymbolFileIndex    SymbolFileIndex
//!  members         file members        file members       store accessors
//!      └────────────────┴──────────────────┴─────────────────┘
//!                       │
//!                       ▼
//!               Vec<Suggestion> (sorted)
//! ```
//!
//! Each request parses the buffer once and at most one other file. Nothing
//! is cached between requests except the discovered helper/store file list.

mod suggestion;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::context::{find_previous_word, Position, WordClassifier, WordRole};
use crate::error::SourceError;
use crate::extract::{
    dependencies, members_with_policy, store_accessors, FunctionDescriptor, VisibilityPolicy,
};
use crate::resolve::{ModuleResolver, PrefixResolver, SharedFileIndex, SymbolFileIndex};
use crate::syntax::{parse, SyntaxTree};

pub use suggestion::{build_suggestions, snippet, Suggestion, LABEL_MARKER, MEMBER_DETAIL};

/// The word that refers to the current object.
pub const SELF_WORD: &str = "this";

/// What the word before the cursor refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionTarget {
    /// Members of the document being edited.
    CurrentDocument,
    /// A dependency bound in the module declaration, by module path.
    Module(String),
    /// A helper file, by stem.
    Helper(String),
    /// A store file, by stem.
    Store(String),
    Nothing,
}

/// Long-lived completion engine for one workspace.
pub struct CompletionService {
    config: Config,
    workspace_root: PathBuf,
    resolver: Box<dyn ModuleResolver>,
    classifier: WordClassifier,
    files: SharedFileIndex,
}

impl CompletionService {
    /// Build a service from a validated config. The file index starts empty;
    /// call [`CompletionService::refresh_files`] to populate it.
    pub fn new<P: AsRef<Path>>(config: Config, workspace_root: P) -> anyhow::Result<Self> {
        let workspace_root = workspace_root.as_ref().to_path_buf();
        let classifier =
            WordClassifier::new(&config.word_roles.store_suffix, &config.word_roles.helper_suffix)?;
        let resolver = PrefixResolver::new(&workspace_root, config.resource_roots.clone());

        Ok(Self {
            config,
            workspace_root,
            resolver: Box::new(resolver),
            classifier,
            files: SharedFileIndex::default(),
        })
    }

    /// Replace the module resolver.
    pub fn with_resolver(mut self, resolver: Box<dyn ModuleResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn classifier(&self) -> &WordClassifier {
        &self.classifier
    }

    pub fn files(&self) -> &SharedFileIndex {
        &self.files
    }

    /// Rescan the workspace and swap in the new helper/store list.
    ///
    /// Returns the number of files found. On error the previous list stays.
    pub fn refresh_files(&self) -> anyhow::Result<usize> {
        let index = SymbolFileIndex::discover(&self.workspace_root, &self.config.discovery)?;
        let count = index.len();
        self.files.replace(index);
        Ok(count)
    }

    /// Visibility for members of files other than the current one.
    fn public_policy(&self) -> VisibilityPolicy {
        VisibilityPolicy::new(false).with_ignored(self.config.visibility.ignored_members.clone())
    }

    fn own_policy(&self) -> VisibilityPolicy {
        VisibilityPolicy::new(true).with_ignored(self.config.visibility.ignored_members.clone())
    }

    /// Decide what `word` refers to in the document `tree`.
    pub fn target(&self, tree: &SyntaxTree, word: &str) -> CompletionTarget {
        if word == SELF_WORD {
            return CompletionTarget::CurrentDocument;
        }

        let define = dependencies(tree, &self.config.module_declaration);
        if let Some(path) = define.path_for(word) {
            return CompletionTarget::Module(path.to_string());
        }

        let stem = match self.classifier.base_name(word) {
            Some(stem) => stem.to_string(),
            None => return CompletionTarget::Nothing,
        };
        match self.classifier.classify(word) {
            WordRole::Helper => CompletionTarget::Helper(stem),
            WordRole::Store => CompletionTarget::Store(stem),
            WordRole::Plain => CompletionTarget::Nothing,
        }
    }

    /// Suggestions for the cursor position in `source`.
    ///
    /// Never fails: unreadable or unresolvable targets produce no suggestions.
    pub fn complete(&self, source: &str, position: Position) -> Vec<Suggestion> {
        let tree = match parse(source) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::debug!(error = %e, "cannot parse buffer");
                return Vec::new();
            }
        };

        let word = match find_previous_word(source, position) {
            Some(word) => word,
            None => {
                tracing::debug!(line = position.line, column = position.column, "no previous word");
                return Vec::new();
            }
        };

        let target = self.target(&tree, &word);
        tracing::debug!(word = %word, completion = ?target, "completion target");

        let descriptors = match self.descriptors(&tree, &target) {
            Ok(descriptors) => descriptors,
            Err(e) => {
                tracing::debug!(error = %e, completion = ?target, "completion target unavailable");
                Vec::new()
            }
        };
        build_suggestions(descriptors)
    }

    /// Member descriptors for a target.
    pub fn descriptors(
        &self,
        tree: &SyntaxTree,
        target: &CompletionTarget,
    ) -> Result<Vec<FunctionDescriptor>, SourceError> {
        match target {
            CompletionTarget::CurrentDocument => Ok(members_with_policy(tree, &self.own_policy())),
            CompletionTarget::Module(module_path) => match self.resolver.resolve(module_path) {
                Some(file) => {
                    let other = load_tree(&file)?;
                    Ok(members_with_policy(&other, &self.public_policy()))
                }
                None => Ok(Vec::new()),
            },
            CompletionTarget::Helper(stem) => match self.role_file(stem, WordRole::Helper) {
                Some(file) => {
                    let other = load_tree(&file)?;
                    Ok(members_with_policy(&other, &self.public_policy()))
                }
                None => Ok(Vec::new()),
            },
            CompletionTarget::Store(stem) => match self.role_file(stem, WordRole::Store) {
                Some(file) => {
                    let other = load_tree(&file)?;
                    Ok(store_accessors(&other).unwrap_or_default())
                }
                None => Ok(Vec::new()),
            },
            CompletionTarget::Nothing => Ok(Vec::new()),
        }
    }

    fn role_file(&self, stem: &str, role: WordRole) -> Option<PathBuf> {
        let suffix = self.classifier.suffix(role)?;
        let index = self.files.snapshot();
        let found = index.find(stem, role, suffix).map(Path::to_path_buf);
        if found.is_none() {
            tracing::debug!(stem, role = %role, known = index.files(role).len(), "no file for word");
        }
        found
    }
}

/// Read and parse one file.
pub fn load_tree(path: &Path) -> Result<SyntaxTree, SourceError> {
    let source = fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const UTILS: &str = r#"
sap.ui.define([], function () {
  var ObjectUtils = {};
  ObjectUtils.isEmpty = function (value) {};
  ObjectUtils._internal = function () {};
  ObjectUtils.init = function () {};
  return ObjectUtils;
});
"#;

    const TURN_TO_HELPER: &str = r#"
sap.ui.define([], function () {
  class TurnToHelper {
    turnTo(viewContext, target) {}
    _prepare() {}
  }
  return TurnToHelper;
});
"#;

    const DOCUMENT_STORE: &str = r#"
sap.ui.define(['x/AbstractStore'], function (AbstractStore) {
  return AbstractStore.extend('x.DocumentStore', {
    metadata: {
      properties: {
        keyElements: { defaultValue: ['viewContext'] },
        storeProperties: { defaultValue: [{ name: 'document' }] }
      }
    }
  });
});
"#;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn service() -> (TempDir, CompletionService) {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "core/src/utils/ObjectUtils.js", UTILS);
        write(root, "wing/src/helpers/TurnToHelper.js", TURN_TO_HELPER);
        write(root, "wing/src/stores/DocumentStore.js", DOCUMENT_STORE);

        let mut config = Config::default();
        config
            .resource_roots
            .insert("x/core".to_string(), "./core/src".to_string());
        let service = CompletionService::new(config, root).unwrap();
        assert_eq!(service.refresh_files().unwrap(), 2);
        (temp, service)
    }

    fn names(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_target_selection() {
        let (_temp, service) = service();
        let tree = parse("sap.ui.define(['x/core/utils/ObjectUtils'], function (ObjectUtils) {});").unwrap();

        assert_eq!(service.target(&tree, "this"), CompletionTarget::CurrentDocument);
        assert_eq!(
            service.target(&tree, "ObjectUtils"),
            CompletionTarget::Module("x/core/utils/ObjectUtils".to_string())
        );
        assert_eq!(
            service.target(&tree, "getTurnToHelper"),
            CompletionTarget::Helper("TurnTo".to_string())
        );
        assert_eq!(
            service.target(&tree, "documentStore"),
            CompletionTarget::Store("document".to_string())
        );
        assert_eq!(service.target(&tree, "value"), CompletionTarget::Nothing);
    }

    #[test]
    fn test_complete_this_includes_protected() {
        let (_temp, service) = service();
        let source = "X.prototype._helper = function (a) {};\nX.prototype.run = function () {};\nthis.";
        let suggestions = service.complete(source, Position::new(2, 5));
        assert_eq!(names(&suggestions), vec!["_helper", "run"]);
    }

    #[test]
    fn test_complete_module_variable() {
        let (_temp, service) = service();
        let source = "sap.ui.define(['x/core/utils/ObjectUtils'], function (ObjectUtils) {\n  ObjectUtils.is\n});";
        let suggestions = service.complete(source, Position::new(1, 16));
        assert_eq!(names(&suggestions), vec!["isEmpty"]);
        assert_eq!(suggestions[0].insert_text, "isEmpty(${1:value})");
    }

    #[test]
    fn test_complete_module_variable_in_unclosed_declaration() {
        let (_temp, service) = service();
        let source = "sap.ui.define(['x/core/utils/ObjectUtils'], function (ObjectUtils) {\n  ObjectUtils.";

        let tree = parse(source).unwrap();
        assert!(tree.has_errors());
        assert_eq!(
            service.target(&tree, "ObjectUtils"),
            CompletionTarget::Module("x/core/utils/ObjectUtils".to_string())
        );
        assert_eq!(names(&service.complete(source, Position::new(1, 14))), vec!["isEmpty"]);
    }

    #[test]
    fn test_complete_helper_word() {
        let (_temp, service) = service();
        let source = "var h = HelperRegistry.getTurnToHelper().";
        let suggestions = service.complete(source, Position::new(0, 41));
        assert_eq!(names(&suggestions), vec!["turnTo"]);
    }

    #[test]
    fn test_complete_store_word() {
        let (_temp, service) = service();
        let source = "documentStore.";
        let suggestions = service.complete(source, Position::new(0, 14));
        assert_eq!(
            names(&suggestions),
            vec!["getDocument", "registerDocument", "setDocument"]
        );
        assert_eq!(
            suggestions[2].insert_text,
            "setDocument(${1:viewContext}, ${2:document})"
        );
    }

    #[test]
    fn test_missing_files_yield_nothing() {
        let (_temp, service) = service();
        let source = "sap.ui.define(['x/core/utils/Gone'], function (Gone) {\n  Gone.\n  missingHelper.\n});";
        assert!(service.complete(source, Position::new(1, 7)).is_empty());
        assert!(service.complete(source, Position::new(2, 16)).is_empty());
        assert!(service.complete("", Position::new(0, 0)).is_empty());
    }

    #[test]
    fn test_custom_resolver() {
        struct Fixed(PathBuf);
        impl ModuleResolver for Fixed {
            fn resolve(&self, _module_path: &str) -> Option<PathBuf> {
                Some(self.0.clone())
            }
        }

        let (temp, service) = service();
        let service = service.with_resolver(Box::new(Fixed(
            temp.path().join("wing/src/helpers/TurnToHelper.js"),
        )));
        let source = "sap.ui.define(['any/Thing'], function (Thing) {\n  Thing.tu\n});";
        let suggestions = service.complete(source, Position::new(1, 10));
        assert_eq!(names(&suggestions), vec!["turnTo"]);
    }

    #[test]
    fn test_unreadable_module_is_a_read_error() {
        let (_temp, service) = service();
        let tree = parse("").unwrap();
        let err = service
            .descriptors(&tree, &CompletionTarget::Module("x/core/utils/Gone".to_string()))
            .unwrap_err();
        assert!(matches!(err, SourceError::Read { .. }));
    }

    #[test]
    fn test_ignored_members_from_config() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.visibility.ignored_members = vec!["render".to_string()];
        let service = CompletionService::new(config, temp.path()).unwrap();

        let source = "X.prototype.render = function () {};\nX.prototype.show = function () {};\nthis.";
        let suggestions = service.complete(source, Position::new(2, 5));
        assert_eq!(names(&suggestions), vec!["show"]);
    }
}
