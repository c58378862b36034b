//! Key path resolution against a nested dictionary.

use crate::dictionary::{
    Dictionary,
    TranslationValue,
};

/// Resolves a separator-delimited key path.
///
/// Walks the dictionary one segment at a time and returns whatever sits at
/// the terminal node. A miss is `None`, never an error:
///
/// - dictionary not loaded yet → `None` for every key
/// - empty key → `None`
/// - a segment that is absent → `None`
/// - a path that continues past a text or list leaf (`about.title.extra`) → `None`
#[must_use]
pub fn resolve<'a>(
    dictionary: Option<&'a Dictionary>,
    key: &str,
    separator: &str,
) -> Option<&'a TranslationValue> {
    let dictionary = dictionary?;
    let path = KeyPath::parse(key, separator)?;
    path.resolve(dictionary)
}

/// A parsed key path.
///
/// Parse once and reuse when the same key is looked up against several
/// dictionaries (e.g. checking every locale bundle).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    /// Non-empty segments, root first.
    segments: Vec<String>,
}

impl KeyPath {
    /// Splits `key` on `separator`.
    ///
    /// Returns `None` for an empty key, an empty separator, or any empty
    /// segment (`"a..b"`, `".a"`), since no dictionary entry can be addressed
    /// by them.
    #[must_use]
    pub fn parse(key: &str, separator: &str) -> Option<Self> {
        if key.is_empty() || separator.is_empty() {
            return None;
        }

        let segments: Vec<String> = key.split(separator).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }

        Some(Self { segments })
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolve against a loaded dictionary.
    #[must_use]
    pub fn resolve<'a>(&self, dictionary: &'a Dictionary) -> Option<&'a TranslationValue> {
        let (first, rest) = self.segments.split_first()?;
        let mut current = dictionary.get(first)?;

        for segment in rest {
            let TranslationValue::Table(table) = current else {
                return None;
            };
            current = table.get(segment)?;
        }

        Some(current)
    }

    /// Joins the segments back with `separator`.
    #[must_use]
    pub fn to_key(&self, separator: &str) -> String {
        self.segments.join(separator)
    }
}
