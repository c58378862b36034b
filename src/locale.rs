//! Supported locale codes.

use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// A locale code the site can render in.
///
/// The set is closed: anything read from storage or configuration has to be
/// parsed through [`FromStr`] before it can become the active locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English
    #[default]
    En,
    /// Azerbaijani
    Az,
    /// Turkish
    Tr,
}

/// Error for a code outside the supported set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported locale code '{0}'")]
pub struct UnknownLocale(pub String);

impl Locale {
    /// Every supported locale, default first.
    pub const ALL: [Self; 3] = [Self::En, Self::Az, Self::Tr];

    /// Locale used before hydration and whenever a stored value is rejected.
    pub const DEFAULT: Self = Self::En;

    /// Short code (`en`, `az`, `tr`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Az => "az",
            Self::Tr => "tr",
        }
    }

    /// Value for the document-level `lang` attribute.
    #[must_use]
    pub const fn document_lang(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|locale| locale.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| UnknownLocale(s.to_string()))
    }
}
