//! Translation dictionary definitions

use std::collections::{
    BTreeMap,
    BTreeSet,
};
use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;

/// A value stored at a key path.
///
/// The shape cannot be known from the key alone, so consumers coerce with
/// [`TranslationValue::as_text`], [`TranslationValue::as_list`],
/// [`TranslationValue::as_records`] or [`TranslationValue::as_table`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationValue {
    /// Plain string.
    Text(String),
    /// Ordered sequence of strings (e.g. bullet points).
    List(Vec<String>),
    /// Ordered sequence of nested values (e.g. one entry per job).
    Records(Vec<TranslationValue>),
    /// Nested mapping. A string-to-string mapping is a table of `Text` leaves.
    Table(BTreeMap<String, TranslationValue>),
}

impl TranslationValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_records(&self) -> Option<&[Self]> {
        match self {
            Self::Records(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_table(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Collects a table of text leaves into a plain string map.
    ///
    /// Non-text children are skipped. Returns `None` when the value is not a table.
    #[must_use]
    pub fn to_string_map(&self) -> Option<BTreeMap<String, String>> {
        self.as_table().map(|table| {
            table
                .iter()
                .filter_map(|(key, value)| value.as_text().map(|text| (key.clone(), text.to_string())))
                .collect()
        })
    }
}

/// String coercion used by the page components: text as-is, lists joined with
/// `,`, records and tables rendered as JSON.
impl fmt::Display for TranslationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::List(items) => f.write_str(&items.join(",")),
            Self::Records(_) | Self::Table(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

/// One locale's translations.
///
/// Built once per load and never mutated afterwards; a locale switch replaces
/// the whole dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    /// Top-level entries.
    entries: BTreeMap<String, TranslationValue>,
}

impl Dictionary {
    #[must_use]
    pub const fn new(entries: BTreeMap<String, TranslationValue>) -> Self {
        Self { entries }
    }

    /// Parse a dictionary from JSON text.
    ///
    /// # Errors
    /// Returns error if the text is not a JSON object of strings, string arrays
    /// and nested objects.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build a dictionary from an already parsed JSON value.
    ///
    /// # Errors
    /// Same shape rules as [`Dictionary::from_json_str`].
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Top-level entry by name.
    #[must_use]
    pub fn get(&self, segment: &str) -> Option<&TranslationValue> {
        self.entries.get(segment)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten into a map from leaf key path to value.
    ///
    /// Leaves are text values, string lists and records; sequences stay whole
    /// under their own key path. Empty tables contribute nothing.
    ///
    /// # Examples
    /// ```
    /// use portfolio_i18n::Dictionary;
    ///
    /// let dictionary = Dictionary::from_json_str(
    ///     r#"{"about": {"title": "About", "points": ["a", "b"]}}"#,
    /// )
    /// .unwrap_or_default();
    ///
    /// let flattened = dictionary.flatten(".");
    /// assert!(flattened.contains_key("about.title"));
    /// assert!(flattened.contains_key("about.points"));
    /// assert_eq!(flattened.len(), 2);
    /// ```
    #[must_use]
    pub fn flatten(&self, separator: &str) -> BTreeMap<String, &TranslationValue> {
        let mut result = BTreeMap::new();
        for (key, value) in &self.entries {
            flatten_value(value, separator, key, &mut result);
        }
        result
    }

    /// Sorted list of every leaf key path.
    #[must_use]
    pub fn key_paths(&self, separator: &str) -> Vec<String> {
        self.flatten(separator).into_keys().collect()
    }

    /// Leaf key paths present in `reference` but absent here.
    #[must_use]
    pub fn missing_keys(&self, reference: &Self, separator: &str) -> Vec<String> {
        let own: BTreeSet<String> = self.flatten(separator).into_keys().collect();
        reference.flatten(separator).into_keys().filter(|key| !own.contains(key)).collect()
    }
}

fn flatten_value<'a>(
    value: &'a TranslationValue,
    separator: &str,
    prefix: &str,
    result: &mut BTreeMap<String, &'a TranslationValue>,
) {
    match value {
        TranslationValue::Table(table) => {
            for (key, child) in table {
                let full_key = format!("{prefix}{separator}{key}");
                flatten_value(child, separator, &full_key, result);
            }
        }
        TranslationValue::Text(_) | TranslationValue::List(_) | TranslationValue::Records(_) => {
            result.insert(prefix.to_string(), value);
        }
    }
}
