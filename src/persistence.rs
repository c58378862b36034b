//! Durable storage of the preferred locale.
//!
//! The adapters store whatever code they are given. Validation against the
//! supported set happens in the store at hydration time, because a stored
//! value may predate a change of the supported set.

use std::path::{
    Path,
    PathBuf,
};
use std::sync::Mutex;

use serde_json::{
    Map,
    Value,
};

use crate::error::PreferenceError;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "portfolio-locale";

/// Read/write access to the single preferred-locale value.
pub trait PreferenceStore: Send + Sync {
    /// The stored code, or `None` if nothing was stored yet.
    fn read(&self) -> Result<Option<String>, PreferenceError>;

    /// Store `code`, replacing any previous value.
    fn write(&self, code: &str) -> Result<(), PreferenceError>;
}

/// In-process storage.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    /// Stored code
    value: Mutex<Option<String>>,
}

impl MemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds `code`.
    #[must_use]
    pub fn with_value(code: impl Into<String>) -> Self {
        Self { value: Mutex::new(Some(code.into())) }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn read(&self) -> Result<Option<String>, PreferenceError> {
        let value = self.value.lock().map_err(|e| PreferenceError::Unavailable(e.to_string()))?;
        Ok(value.clone())
    }

    fn write(&self, code: &str) -> Result<(), PreferenceError> {
        let mut value =
            self.value.lock().map_err(|e| PreferenceError::Unavailable(e.to_string()))?;
        *value = Some(code.to_string());
        Ok(())
    }
}

/// File-backed key-value storage.
///
/// The file is a flat JSON object, so several keys can share it the way they
/// would share an origin's local storage. Only the configured key is touched.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    /// JSON file path
    path: PathBuf,
    /// Key the locale is stored under
    key: String,
}

impl FilePreferences {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self { path: path.into(), key: key.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ストレージファイル全体を読み込む（存在しない場合は空）
    fn read_entries(&self) -> Result<Map<String, Value>, PreferenceError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        Ok(serde_json::from_str(&content)?)
    }
}

impl PreferenceStore for FilePreferences {
    fn read(&self) -> Result<Option<String>, PreferenceError> {
        let entries = self.read_entries()?;
        Ok(entries.get(&self.key).and_then(Value::as_str).map(str::to_string))
    }

    fn write(&self, code: &str) -> Result<(), PreferenceError> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(PreferenceError::Corrupted(e)) => {
                tracing::warn!(path = %self.path.display(), "Replacing corrupted preference storage: {e}");
                Map::new()
            }
            Err(e) => return Err(e),
        };

        entries.insert(self.key.clone(), Value::String(code.to_string()));

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, content)?;

        tracing::debug!(path = %self.path.display(), key = %self.key, code, "Stored locale preference");
        Ok(())
    }
}
