//! Output formatting for amdsense results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for editor integrations and scripts

use colored::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::complete::Suggestion;
use crate::context::Position;
use crate::extract::FunctionDescriptor;
use crate::inspect::FileSymbols;
use crate::resolve::SymbolFileIndex;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pretty,
    Json,
}

impl std::str::FromStr for Format {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(Format::Pretty),
            "json" => Ok(Format::Json),
            other => anyhow::bail!("invalid format {:?}, must be 'pretty' or 'json'", other),
        }
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// Result of a `complete` run.
#[derive(Debug, Serialize)]
pub struct CompletionReport {
    pub version: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    /// Word the suggestions were resolved from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    pub suggestions: Vec<Suggestion>,
}

impl CompletionReport {
    pub fn new(file: &Path, position: Position, word: Option<String>, suggestions: Vec<Suggestion>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            file: display_path(file),
            line: position.line,
            column: position.column,
            word,
            suggestions,
        }
    }
}

/// Result of an `inspect` run.
#[derive(Debug, Serialize)]
pub struct InspectReport<'a> {
    pub version: String,
    pub files_scanned: usize,
    pub files: &'a [FileSymbols],
}

/// Result of a `files` run.
#[derive(Debug, Serialize)]
pub struct FilesReport {
    pub version: String,
    pub root: String,
    pub helpers: Vec<String>,
    pub stores: Vec<String>,
}

impl FilesReport {
    pub fn new(root: &Path, index: &SymbolFileIndex) -> Self {
        let relative = |paths: &[PathBuf]| -> Vec<String> {
            paths.iter().map(|p| relative_path(p, root)).collect()
        };
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            root: display_path(root),
            helpers: relative(index.helpers.as_slice()),
            stores: relative(index.stores.as_slice()),
        }
    }
}

pub fn write_json<T: Serialize>(report: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{}", json);
    Ok(())
}

pub fn inspect_report(files: &[FileSymbols]) -> InspectReport<'_> {
    InspectReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        files_scanned: files.len(),
        files,
    }
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Path relative to `base`, or the path itself outside of it.
pub fn relative_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .map(display_path)
        .unwrap_or_else(|_| display_path(path))
}

// =============================================================================
// Pretty Format
// =============================================================================

fn write_header() {
    println!();
    print!("  ");
    print!("{}", "amdsense".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();
}

/// Write completion results in pretty format.
pub fn write_completion_pretty(report: &CompletionReport) {
    write_header();

    print!("  {}", "File:   ".dimmed());
    println!("{}:{}:{}", report.file, report.line + 1, report.column + 1);
    print!("  {}", "Word:   ".dimmed());
    match &report.word {
        Some(word) => println!("{}", word.bold()),
        None => println!("{}", "(none)".dimmed()),
    }
    println!();

    if report.suggestions.is_empty() {
        println!("  {}", "No suggestions".yellow());
        println!();
        return;
    }

    println!("  {} ({}):", "Suggestions".bold(), report.suggestions.len());
    println!();
    for s in &report.suggestions {
        print!("    {:<32}", s.label.green());
        println!("{}", s.insert_text.dimmed());
    }
    println!();
}

/// Write inspection results in pretty format.
pub fn write_inspect_pretty(files: &[FileSymbols], base: &Path) {
    write_header();

    print!("  {}", "Scanned: ".dimmed());
    println!("{} file{}", files.len(), if files.len() == 1 { "" } else { "s" });
    println!();

    for file in files {
        print!("  {}", relative_path(&file.path, base).blue().bold());
        if file.recovered {
            print!("  {}", "(recovered from syntax errors)".yellow());
        }
        println!();

        if !file.dependencies.is_empty() {
            println!("    {}", "Dependencies:".bold());
            let count = file.dependencies.paths.len().max(file.dependencies.variables.len());
            for i in 0..count {
                let variable = file.dependencies.variables.get(i).map(String::as_str).unwrap_or("?");
                let path = file.dependencies.paths.get(i).map(String::as_str).unwrap_or("?");
                println!("      {:<24} {}", variable, path.dimmed());
            }
        }

        write_functions("Members:", &file.members);
        if let Some(accessors) = &file.store_accessors {
            write_functions("Store accessors:", accessors);
        }
        println!();
    }
}

fn write_functions(title: &str, functions: &[FunctionDescriptor]) {
    if functions.is_empty() {
        return;
    }
    println!("    {} ({})", title.bold(), functions.len());
    for f in functions {
        println!("      {}", f.signature());
    }
}

/// Write discovered helper and store files in pretty format.
pub fn write_files_pretty(report: &FilesReport) {
    write_header();

    print!("  {}", "Root: ".dimmed());
    println!("{}", report.root);
    println!();

    for (title, files) in [("Helpers", &report.helpers), ("Stores", &report.stores)] {
        println!("  {} ({}):", title.bold(), files.len());
        for file in files {
            println!("    {}", file.blue());
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("pretty".parse::<Format>().unwrap(), Format::Pretty);
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert!("sarif".parse::<Format>().is_err());
    }

    #[test]
    fn test_completion_report_json_shape() {
        let suggestions = vec![Suggestion::from_descriptor(&FunctionDescriptor::new(
            "isEmpty",
            vec!["value".to_string()],
        ))];
        let report = CompletionReport::new(
            Path::new("src/App.js"),
            Position::new(3, 8),
            Some("ObjectUtils".to_string()),
            suggestions,
        );

        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["file"], "src/App.js");
        assert_eq!(json["line"], 3);
        assert_eq!(json["word"], "ObjectUtils");
        assert_eq!(json["suggestions"][0]["label"], "★ isEmpty");
        assert_eq!(json["suggestions"][0]["insert_text"], "isEmpty(${1:value})");
    }

    #[test]
    fn test_completion_report_omits_missing_word() {
        let report = CompletionReport::new(Path::new("a.js"), Position::default(), None, vec![]);
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert!(json.get("word").is_none());
        assert_eq!(json["suggestions"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_files_report_relative_paths() {
        let index = SymbolFileIndex {
            helpers: vec![PathBuf::from("/work/src/AHelper.js")],
            stores: vec![PathBuf::from("/elsewhere/BStore.js")],
        };
        let report = FilesReport::new(Path::new("/work"), &index);
        assert_eq!(report.helpers, vec!["src/AHelper.js"]);
        assert_eq!(report.stores, vec!["/elsewhere/BStore.js"]);
    }
}
