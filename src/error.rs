//! Error types shared by the loader, persistence adapter and store.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::locale::Locale;

/// Failure to produce a dictionary for a locale.
#[derive(Error, Debug)]
pub enum LoadError {
    /// No bundle exists for the locale
    #[error("No translation bundle for '{locale}' at {}", path.display())]
    Missing { locale: Locale, path: PathBuf },

    /// Bundle exists but could not be read
    #[error("Failed to read translation bundle for '{locale}': {source}")]
    Io {
        locale: Locale,
        #[source]
        source: std::io::Error,
    },

    /// Bundle is not a valid dictionary
    #[error("Malformed translation bundle for '{locale}': {source}")]
    Malformed {
        locale: Locale,
        #[source]
        source: serde_json::Error,
    },

    /// Attempt exceeded the configured timeout
    #[error("Loading '{locale}' timed out after {after:?}")]
    TimedOut { locale: Locale, after: Duration },
}

impl LoadError {
    /// The locale the failed load was for.
    #[must_use]
    pub const fn locale(&self) -> Locale {
        match self {
            Self::Missing { locale, .. }
            | Self::Io { locale, .. }
            | Self::Malformed { locale, .. }
            | Self::TimedOut { locale, .. } => *locale,
        }
    }
}

/// Failure of the durable preference storage.
#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("Failed to access preference storage: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference storage is corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),

    #[error("Preference storage is unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a locale switch.
#[derive(Error, Debug)]
pub enum LocaleError {
    /// The locale is not in the configured supported set
    #[error("Locale '{0}' is not enabled")]
    Unsupported(Locale),

    /// The dictionary could not be loaded; the previous one is retained
    #[error(transparent)]
    Load(#[from] LoadError),
}
