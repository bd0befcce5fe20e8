//! Cursor context: which word precedes the cursor and what role it plays.
//!
//! Classification is surface-text only, so it works on any editing buffer
//! without a parse.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Heuristic role of a word, derived from its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordRole {
    Plain,
    Store,
    Helper,
}

impl WordRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            WordRole::Plain => "plain",
            WordRole::Store => "store",
            WordRole::Helper => "helper",
        }
    }
}

impl std::fmt::Display for WordRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A 0-based cursor position. `column` counts characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Suffix-based word classifier.
///
/// A word has a role when it ends with the role suffix, optionally followed
/// by `()`, and has a non-empty stem before it (`someStore`, `getDictionaryHelper()`).
#[derive(Debug, Clone)]
pub struct WordClassifier {
    store_suffix: String,
    helper_suffix: String,
    store: Regex,
    helper: Regex,
}

impl WordClassifier {
    pub fn new(store_suffix: &str, helper_suffix: &str) -> anyhow::Result<Self> {
        Ok(Self {
            store_suffix: store_suffix.to_string(),
            helper_suffix: helper_suffix.to_string(),
            store: role_regex(store_suffix)?,
            helper: role_regex(helper_suffix)?,
        })
    }

    pub fn classify(&self, word: &str) -> WordRole {
        if self.store.is_match(word) {
            WordRole::Store
        } else if self.helper.is_match(word) {
            WordRole::Helper
        } else {
            WordRole::Plain
        }
    }

    /// Stem used to look up the backing file: `getDictionaryHelper()` → `Dictionary`.
    pub fn base_name<'w>(&self, word: &'w str) -> Option<&'w str> {
        let regex = match self.classify(word) {
            WordRole::Store => &self.store,
            WordRole::Helper => &self.helper,
            WordRole::Plain => return None,
        };
        regex
            .captures(word)
            .and_then(|c| c.name("base"))
            .map(|m| m.as_str())
    }

    /// File-name suffix for a role (`Store`, `Helper`).
    pub fn suffix(&self, role: WordRole) -> Option<&str> {
        match role {
            WordRole::Store => Some(&self.store_suffix),
            WordRole::Helper => Some(&self.helper_suffix),
            WordRole::Plain => None,
        }
    }
}

impl Default for WordClassifier {
    fn default() -> Self {
        DEFAULT_CLASSIFIER.clone()
    }
}

fn role_regex(suffix: &str) -> anyhow::Result<Regex> {
    if suffix.is_empty() {
        anyhow::bail!("word role suffix must not be empty");
    }
    // The optional `get` is greedy, so `getFooHelper` yields `Foo` while
    // `getHelper` backtracks to the stem `get`.
    let pattern = format!(r"^(?:get)?(?P<base>[\w$]+?){}(?:\(\))?$", regex::escape(suffix));
    Ok(Regex::new(&pattern)?)
}

static DEFAULT_CLASSIFIER: Lazy<WordClassifier> = Lazy::new(|| {
    WordClassifier::new("Store", "Helper").expect("default role suffixes are valid")
});

/// Classify a word with the default `Store`/`Helper` suffixes.
pub fn classify(word: &str) -> WordRole {
    DEFAULT_CLASSIFIER.classify(word)
}

/// The word before the cursor together with its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousWord {
    pub word: Option<String>,
    pub role: WordRole,
}

impl PreviousWord {
    pub fn resolve(buffer: &str, cursor: Position, classifier: &WordClassifier) -> Self {
        let word = find_previous_word(buffer, cursor);
        let role = word
            .as_deref()
            .map(|w| classifier.classify(w))
            .unwrap_or(WordRole::Plain);
        Self { word, role }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Word touching `column` in `line`, including a word that ends exactly there.
pub fn word_at(line: &str, column: usize) -> Option<String> {
    let chars: Vec<char> = line.chars().collect();
    if column > chars.len() {
        return None;
    }

    let mut start = column;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = column;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }

    if start == end {
        None
    } else {
        Some(chars[start..end].iter().collect())
    }
}

/// Scan backwards from the cursor for the first word that differs from the
/// word under the cursor.
///
/// Looks at the cursor line and at most one line above it. Returns `None`
/// when no other word is found in that window.
pub fn find_previous_word(buffer: &str, cursor: Position) -> Option<String> {
    let lines: Vec<&str> = buffer.lines().collect();
    let cursor_line = lines.get(cursor.line).copied().unwrap_or("");
    let current = word_at(cursor_line, cursor.column);

    let mut line = cursor.line;
    let mut column = cursor.column.min(cursor_line.chars().count());

    loop {
        if column == 0 {
            if line == 0 || cursor.line - line >= 1 {
                return None;
            }
            line -= 1;
            column = lines.get(line).map(|l| l.chars().count()).unwrap_or(0);
            if column == 0 {
                return None;
            }
        }
        column -= 1;

        let text = lines.get(line).copied().unwrap_or("");
        if let Some(word) = word_at(text, column) {
            if Some(&word) != current.as_ref() {
                return Some(word);
            }
        }
    }
}
