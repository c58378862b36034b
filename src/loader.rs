//! Dictionary loaders.
//!
//! A loader only produces data. Committing a loaded dictionary (and deciding
//! whether the result is still wanted) is the store's job.

use std::path::{
    Path,
    PathBuf,
};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::dictionary::Dictionary;
use crate::error::LoadError;
use crate::locale::Locale;

/// Asynchronously produces the dictionary for a locale.
///
/// Implementations must be idempotent: loading the same locale twice yields
/// equal dictionaries and has no other effect.
pub trait DictionaryLoader: Send + Sync {
    fn load(&self, locale: Locale) -> BoxFuture<'_, Result<Dictionary, LoadError>>;
}

/// Raw JSON of the bundles compiled into the crate.
const fn bundled_json(locale: Locale) -> &'static str {
    match locale {
        Locale::En => include_str!("../locales/en.json"),
        Locale::Az => include_str!("../locales/az.json"),
        Locale::Tr => include_str!("../locales/tr.json"),
    }
}

/// Parse the compiled-in bundle for `locale`.
///
/// # Errors
/// Returns [`LoadError::Malformed`] if the bundled JSON is not a dictionary.
pub fn bundled_dictionary(locale: Locale) -> Result<Dictionary, LoadError> {
    Dictionary::from_json_str(bundled_json(locale))
        .map_err(|source| LoadError::Malformed { locale, source })
}

/// Serves the bundles compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedLoader;

impl DictionaryLoader for EmbeddedLoader {
    fn load(&self, locale: Locale) -> BoxFuture<'_, Result<Dictionary, LoadError>> {
        futures::future::ready(bundled_dictionary(locale)).boxed()
    }
}

/// Reads `<dir>/<code>.json` from disk.
#[derive(Debug, Clone)]
pub struct FsLoader {
    /// Directory holding one JSON bundle per locale
    dir: PathBuf,
}

impl FsLoader {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the bundle for `locale`.
    #[must_use]
    pub fn bundle_path(&self, locale: Locale) -> PathBuf {
        self.dir.join(format!("{locale}.json"))
    }

    /// 単一ロケールのバンドルを読み込む
    async fn read_bundle(&self, locale: Locale) -> Result<Dictionary, LoadError> {
        let path = self.bundle_path(locale);
        tracing::debug!(path = %path.display(), %locale, "Reading translation bundle");

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LoadError::Missing { locale, path });
            }
            Err(source) => return Err(LoadError::Io { locale, source }),
        };

        Dictionary::from_json_str(&content).map_err(|source| LoadError::Malformed { locale, source })
    }
}

impl DictionaryLoader for FsLoader {
    fn load(&self, locale: Locale) -> BoxFuture<'_, Result<Dictionary, LoadError>> {
        self.read_bundle(locale).boxed()
    }
}

/// Timeout and retry policy applied around a loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadPolicy {
    /// Upper bound for a single attempt
    pub timeout: Duration,
    /// Extra attempts after a transient failure
    pub retries: u32,
}

impl Default for LoadPolicy {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(5), retries: 1 }
    }
}

impl LoadPolicy {
    /// Load `locale` under this policy.
    ///
    /// Timeouts and I/O failures are retried; a missing or malformed bundle
    /// will not change between attempts and fails immediately.
    ///
    /// # Errors
    /// The error of the last attempt.
    pub async fn load(
        self,
        loader: &dyn DictionaryLoader,
        locale: Locale,
    ) -> Result<Dictionary, LoadError> {
        let mut attempt = 0;
        loop {
            let result = match tokio::time::timeout(self.timeout, loader.load(locale)).await {
                Ok(result) => result,
                Err(_) => Err(LoadError::TimedOut { locale, after: self.timeout }),
            };

            match result {
                Err(error @ (LoadError::TimedOut { .. } | LoadError::Io { .. }))
                    if attempt < self.retries =>
                {
                    attempt += 1;
                    tracing::warn!(%locale, attempt, "Dictionary load failed, retrying: {error}");
                }
                other => return other,
            }
        }
    }
}
