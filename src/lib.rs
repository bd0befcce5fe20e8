//! Amdsense - completion engine for AMD-style JavaScript modules.
//!
//! Amdsense reads `sap.ui.define` modules, tolerating the half-typed code of
//! an editing session, and answers one question: which members can follow
//! the word before the cursor?
//!
//! # Architecture
//!
//! ```text
//!   source ──► syntax ──► extract ──► complete ──► report
//!                │            ▲           │
//!                │            │           ├── context  (word before cursor)
//!                ▼            │           └── resolve  (module path / file index)
//!            SyntaxTree ──────┘
//! ```
//!
//! - `syntax`: tree-sitter parse into an arena tree with a parent table
//! - `extract`: dependency, member and store accessor extraction
//! - `context`: previous-word lookup and word role classification
//! - `resolve`: module path to file mapping and helper/store discovery
//! - `complete`: the completion service and suggestion building
//! - `inspect`: whole-file symbol summaries
//! - `config`: YAML configuration schema
//! - `report`: output formatting (pretty, JSON)

pub mod cli;
pub mod complete;
pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod inspect;
pub mod report;
pub mod resolve;
pub mod syntax;

pub use complete::{CompletionService, CompletionTarget, Suggestion};
pub use config::Config;
pub use context::{classify, find_previous_word, Position, WordClassifier, WordRole};
pub use error::SourceError;
pub use extract::{
    dependencies, members, store_accessors, DefineDescriptor, FunctionDescriptor,
    ModuleDeclaration, VisibilityPolicy,
};
pub use inspect::{FileSymbols, Inspector};
pub use resolve::{ModuleResolver, PrefixResolver, SymbolFileIndex};
pub use syntax::{parse, NodeId, SyntaxTree, Traversal};
