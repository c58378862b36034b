//! Provider scope for consumers that cannot take the store as a parameter.
//!
//! Prefer passing [`LanguageContext`] explicitly. The task-local provider is
//! for deep call chains where threading it through is impractical.
//!
//! The context is task-local: tasks spawned inside a [`provide`] scope do not
//! inherit it and must be wrapped in their own scope.

use std::future::Future;

use thiserror::Error;

use crate::dictionary::TranslationValue;
use crate::error::LocaleError;
use crate::locale::Locale;
use crate::store::{
    LocaleStore,
    Snapshot,
    SwitchOutcome,
};

tokio::task_local! {
    /// Context installed by `provide`
    static CURRENT: LanguageContext;
}

/// Consuming the context without a provider is a wiring bug, not a data condition.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("use_language must be called within a language provider scope")]
    MissingProvider,
}

/// What UI code sees: the locale, the switch operation, lookups and the loading flag.
#[derive(Debug, Clone)]
pub struct LanguageContext {
    /// Backing store
    store: LocaleStore,
}

impl LanguageContext {
    #[must_use]
    pub const fn new(store: LocaleStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &LocaleStore {
        &self.store
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.store.locale()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    #[must_use]
    pub fn t(&self, key: &str) -> Option<TranslationValue> {
        self.store.t(key)
    }

    #[must_use]
    pub fn text(&self, key: &str, fallback: &str) -> String {
        self.store.text(key, fallback)
    }

    /// See [`LocaleStore::set_locale`].
    pub fn set_locale(
        &self,
        locale: Locale,
    ) -> impl Future<Output = Result<SwitchOutcome, LocaleError>> + Send + 'static {
        self.store.set_locale(locale)
    }
}

/// Run `future` with `context` installed.
pub async fn provide<F: Future>(context: LanguageContext, future: F) -> F::Output {
    CURRENT.scope(context, future).await
}

/// Run `f` with `context` installed.
pub fn provide_sync<R>(context: LanguageContext, f: impl FnOnce() -> R) -> R {
    CURRENT.sync_scope(context, f)
}

/// The context installed by the enclosing [`provide`] scope.
///
/// # Errors
/// [`ContextError::MissingProvider`] outside of any provider scope.
pub fn use_language() -> Result<LanguageContext, ContextError> {
    CURRENT.try_with(Clone::clone).map_err(|_| ContextError::MissingProvider)
}
