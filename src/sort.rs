//! Alphanumeric ordering of page file names
//!
//! `page2.png` sorts before `page10.png`: numeric runs compare by value,
//! everything else case-insensitively. Decimal runs such as `01.5` are one
//! number, so an inserted page `01.5` lands between `01` and `02`.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::library::PageEntry;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.[0-9]+|[0-9]+|[^0-9]+").expect("token regex is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    /// Integer and fractional digits, leading zeros of the integer part
    /// and trailing zeros of the fraction removed
    Number { int: &'a str, frac: &'a str },
    Text(String),
}

impl Token<'_> {
    fn tag(&self) -> u8 {
        match self {
            Token::Number { .. } => 0,
            Token::Text(_) => 1,
        }
    }
}

impl Ord for Token<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Token::Number { int: a_int, frac: a_frac }, Token::Number { int: b_int, frac: b_frac }) => a_int
                .len()
                .cmp(&b_int.len())
                .then_with(|| a_int.cmp(b_int))
                .then_with(|| a_frac.cmp(b_frac)),
            (Token::Text(a), Token::Text(b)) => a.cmp(b),
            _ => self.tag().cmp(&other.tag()),
        }
    }
}

impl PartialOrd for Token<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn classify(run: &str) -> Token<'_> {
    if run.as_bytes()[0].is_ascii_digit() {
        let (int, frac) = run.split_once('.').unwrap_or((run, ""));
        Token::Number {
            int: int.trim_start_matches('0'),
            frac: frac.trim_end_matches('0'),
        }
    } else {
        Token::Text(run.to_lowercase())
    }
}

/// Splits a file name into its sort key.
///
/// The part after the last dot is the extension and becomes the final
/// token, unless it is all digits (`page.10`), in which case it stays part
/// of the stem.
fn sort_key(name: &str) -> Vec<Token<'_>> {
    let (stem, extension) = match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.bytes().all(|b| b.is_ascii_digit()) => (name, ""),
        Some((stem, ext)) => (stem, ext),
        None => (name, ""),
    };

    let mut tokens: Vec<Token<'_>> = TOKEN_RE.find_iter(stem).map(|m| classify(m.as_str())).collect();
    tokens.push(Token::Text(extension.to_lowercase()));
    tokens
}

/// Total order over file names; names with equal keys fall back to a
/// plain comparison so sorting twice never reorders anything.
pub fn compare_alphanumeric(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b)).then_with(|| a.cmp(b))
}

/// Sorts names in place in alphanumeric order
pub fn sort_alphanumeric<T: AsRef<str>>(names: &mut [T]) {
    names.sort_by(|a, b| compare_alphanumeric(a.as_ref(), b.as_ref()));
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Sorts paths by their file name, then by the full path
pub fn sort_paths(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| {
        compare_alphanumeric(&file_name_lossy(a), &file_name_lossy(b))
            .then_with(|| compare_alphanumeric(&a.to_string_lossy(), &b.to_string_lossy()))
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Alphanumeric file name
    #[default]
    Name,
    /// Plain string order of the file name
    NameLiteral,
    /// Alphanumeric full path
    Path,
    Size,
    LastModified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// How the pages of a directory are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FileSort {
    #[serde(default)]
    pub key: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

impl FileSort {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    pub fn compare(&self, a: &PageEntry, b: &PageEntry) -> Ordering {
        let by_name = || compare_alphanumeric(&a.name, &b.name);
        let ord = match self.key {
            SortKey::Name => by_name(),
            SortKey::NameLiteral => a.name.cmp(&b.name),
            SortKey::Path => compare_alphanumeric(&a.path.to_string_lossy(), &b.path.to_string_lossy()),
            SortKey::Size => a.bytes.cmp(&b.bytes).then_with(by_name),
            SortKey::LastModified => a.modified.cmp(&b.modified).then_with(by_name),
        };
        match self.order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    }

    pub fn sort(&self, entries: &mut [PageEntry]) {
        entries.sort_by(|a, b| self.compare(a, b));
    }
}
