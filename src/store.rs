//! Locale store shared by every consumer of translated text.
//!
//! # State model
//!
//! The store owns one [`Snapshot`]: the selected locale, the dictionary that
//! is currently committed (and the locale it belongs to), a loading flag and
//! a generation counter. Every switch bumps the generation; a finished load
//! is committed only if its generation is still current, so a slow earlier
//! request can never overwrite a later one.
//!
//! Between a switch and its commit `locale` already names the new target
//! while `dictionary_locale` still names the old dictionary. `is_loading` is
//! set for exactly that window, so consumers can render a loading state or
//! keep showing the old, consistent pair.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::{
    ConfigError,
    I18nSettings,
};
use crate::dictionary::{
    Dictionary,
    TranslationValue,
};
use crate::error::LocaleError;
use crate::loader::{
    DictionaryLoader,
    EmbeddedLoader,
    FsLoader,
    LoadPolicy,
};
use crate::locale::Locale;
use crate::persistence::{
    MemoryPreferences,
    PreferenceStore,
};
use crate::resolver::resolve;

/// Callback receiving the document `lang` attribute value.
pub type DocumentLangHook = Box<dyn Fn(&str) + Send + Sync>;

/// Immutable view of the store state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Selected locale (target of the latest switch)
    locale: Locale,
    /// Locale of the committed dictionary
    dictionary_locale: Option<Locale>,
    /// Committed dictionary, `None` until the first load finishes
    dictionary: Option<Arc<Dictionary>>,
    /// Whether a switch is waiting for its dictionary
    is_loading: bool,
    /// Incremented by every switch
    generation: u64,
    /// Key path separator
    separator: Arc<str>,
}

impl Snapshot {
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    #[must_use]
    pub const fn dictionary_locale(&self) -> Option<Locale> {
        self.dictionary_locale
    }

    #[must_use]
    pub fn dictionary(&self) -> Option<&Dictionary> {
        self.dictionary.as_deref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// `true` when the committed dictionary belongs to the selected locale.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.dictionary_locale == Some(self.locale)
    }

    /// Look up `key` in the committed dictionary.
    ///
    /// `None` while nothing is loaded or when the key is absent.
    #[must_use]
    pub fn t(&self, key: &str) -> Option<&TranslationValue> {
        resolve(self.dictionary(), key, &self.separator)
    }

    /// `t(key)` coerced to a string, or `fallback` on a miss.
    #[must_use]
    pub fn text(&self, key: &str, fallback: &str) -> String {
        self.t(key).map_or_else(|| fallback.to_string(), ToString::to_string)
    }

    /// `t(key)` as a string list, if it is one.
    #[must_use]
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        self.t(key).and_then(TranslationValue::as_list).map(<[String]>::to_vec)
    }

    /// `t(key)` as a label table, if it is one.
    #[must_use]
    pub fn table(&self, key: &str) -> Option<BTreeMap<String, String>> {
        self.t(key).and_then(TranslationValue::to_string_map)
    }
}

/// Result of a switch that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The loaded dictionary became the active one.
    Committed,
    /// A newer switch started before this one finished; its result was dropped.
    Superseded,
}

/// State shared between clones of a [`LocaleStore`].
struct Shared {
    /// Locale used before hydration and as the last resort
    default_locale: Locale,
    /// Locales that may become active
    supported: Vec<Locale>,
    /// Timeout and retry policy for loads
    policy: LoadPolicy,
    /// Dictionary source
    loader: Arc<dyn DictionaryLoader>,
    /// Durable preference storage
    preferences: Arc<dyn PreferenceStore>,
    /// Current snapshot; receivers are the reactive dependents
    state: watch::Sender<Snapshot>,
    /// Optional document language side effect
    document_lang: Option<DocumentLangHook>,
}

/// Single source of truth for the active locale and dictionary.
///
/// Constructed once at start-up and passed to whoever needs it; clones share
/// the same state.
#[derive(Clone)]
pub struct LocaleStore {
    /// Shared state
    shared: Arc<Shared>,
}

impl std::fmt::Debug for LocaleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleStore")
            .field("default_locale", &self.shared.default_locale)
            .field("supported", &self.shared.supported)
            .field("policy", &self.shared.policy)
            .field("loader", &"<dyn DictionaryLoader>")
            .field("preferences", &"<dyn PreferenceStore>")
            .field("state", &*self.shared.state.borrow())
            .finish_non_exhaustive()
    }
}

/// Builder for [`LocaleStore`].
pub struct LocaleStoreBuilder {
    /// Settings to build from
    settings: I18nSettings,
    /// Loader override
    loader: Option<Arc<dyn DictionaryLoader>>,
    /// Preference storage override
    preferences: Option<Arc<dyn PreferenceStore>>,
    /// Document language callback
    document_lang: Option<DocumentLangHook>,
}

impl std::fmt::Debug for LocaleStoreBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleStoreBuilder")
            .field("settings", &self.settings)
            .field("loader", &self.loader.as_ref().map(|_| "<dyn DictionaryLoader>"))
            .field("preferences", &self.preferences.as_ref().map(|_| "<dyn PreferenceStore>"))
            .field("document_lang", &self.document_lang.as_ref().map(|_| "<hook>"))
            .finish()
    }
}

impl LocaleStoreBuilder {
    /// Use `loader` instead of the one derived from the settings.
    #[must_use]
    pub fn loader(mut self, loader: Arc<dyn DictionaryLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Use `preferences` instead of in-memory storage.
    #[must_use]
    pub fn preferences(mut self, preferences: Arc<dyn PreferenceStore>) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Call `hook` with the document language whenever the active locale is set.
    #[must_use]
    pub fn document_lang(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.document_lang = Some(Box::new(hook));
        self
    }

    /// Validate the settings and build the store.
    ///
    /// Without an explicit loader, bundles are read from `localesDir` if it is
    /// set and from the compiled-in bundles otherwise.
    ///
    /// # Errors
    /// [`ConfigError::ValidationErrors`] if the settings are invalid.
    pub fn build(self) -> Result<LocaleStore, ConfigError> {
        self.settings.validate().map_err(ConfigError::ValidationErrors)?;

        let loader: Arc<dyn DictionaryLoader> = match (self.loader, &self.settings.locales_dir) {
            (Some(loader), _) => loader,
            (None, Some(dir)) => Arc::new(FsLoader::new(dir)),
            (None, None) => Arc::new(EmbeddedLoader),
        };
        let preferences: Arc<dyn PreferenceStore> = match self.preferences {
            Some(preferences) => preferences,
            None => Arc::new(MemoryPreferences::new()),
        };

        let default_locale = self.settings.default_locale();
        let initial = Snapshot {
            locale: default_locale,
            dictionary_locale: None,
            dictionary: None,
            is_loading: true,
            generation: 0,
            separator: Arc::from(self.settings.key_separator.as_str()),
        };
        let (state, _) = watch::channel(initial);

        Ok(LocaleStore {
            shared: Arc::new(Shared {
                default_locale,
                supported: self.settings.supported(),
                policy: self.settings.load_policy(),
                loader,
                preferences,
                state,
                document_lang: self.document_lang,
            }),
        })
    }
}

impl LocaleStore {
    /// Start building a store from `settings`.
    #[must_use]
    pub fn builder(settings: I18nSettings) -> LocaleStoreBuilder {
        LocaleStoreBuilder { settings, loader: None, preferences: None, document_lang: None }
    }

    #[must_use]
    pub fn default_locale(&self) -> Locale {
        self.shared.default_locale
    }

    #[must_use]
    pub fn supported_locales(&self) -> &[Locale] {
        &self.shared.supported
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.state.subscribe()
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.shared.state.borrow().locale
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().is_loading
    }

    /// Look up `key` in the committed dictionary.
    #[must_use]
    pub fn t(&self, key: &str) -> Option<TranslationValue> {
        self.shared.state.borrow().t(key).cloned()
    }

    /// `t(key)` coerced to a string, or `fallback` on a miss.
    #[must_use]
    pub fn text(&self, key: &str, fallback: &str) -> String {
        self.shared.state.borrow().text(key, fallback)
    }

    /// Replace the default locale with the persisted preference, then load it.
    ///
    /// An absent, unknown or disabled stored code leaves the default in place.
    /// If the preferred locale fails to load, the default locale is loaded
    /// instead.
    ///
    /// # Errors
    /// [`LocaleError::Load`] if no dictionary could be loaded at all.
    pub async fn hydrate(&self) -> Result<SwitchOutcome, LocaleError> {
        let default = self.shared.default_locale;
        let preferred = self.preferred_locale();
        tracing::debug!(%preferred, "Hydrating locale store");

        let pending = PendingSwitch::new(self.clone(), preferred, self.begin(preferred), false);
        match pending.finish().await {
            Err(LocaleError::Load(error)) if preferred != default => {
                tracing::warn!(%preferred, %default, "Falling back to default locale: {error}");
                let pending = PendingSwitch::new(self.clone(), default, self.begin(default), false);
                pending.finish().await
            }
            other => other,
        }
    }

    /// Switch to `locale`.
    ///
    /// The selected locale, the persisted preference and the loading flag are
    /// updated before this returns; the returned future loads the dictionary
    /// and commits it if no newer switch happened in the meantime. The future
    /// does not borrow the store and can be spawned.
    ///
    /// On a load failure the previous dictionary and its locale stay active
    /// and the preference is rewritten to that locale. Dropping the future
    /// before it finishes (or aborting the task running it) reverts the
    /// switch the same way.
    ///
    /// # Errors
    /// - [`LocaleError::Unsupported`] if `locale` is not enabled (nothing changes)
    /// - [`LocaleError::Load`] if the dictionary could not be loaded
    pub fn set_locale(
        &self,
        locale: Locale,
    ) -> impl Future<Output = Result<SwitchOutcome, LocaleError>> + Send + 'static {
        let pending = self
            .begin_switch(locale)
            .map(|generation| PendingSwitch::new(self.clone(), locale, generation, true));
        async move { pending?.finish().await }
    }

    /// Switch to `locale` in the background.
    ///
    /// Must be called within a tokio runtime.
    pub fn request_locale(&self, locale: Locale) -> JoinHandle<Result<SwitchOutcome, LocaleError>> {
        tokio::spawn(self.set_locale(locale))
    }

    /// Wait until no switch is pending and return the resulting state.
    pub async fn loaded(&self) -> Snapshot {
        let mut receiver = self.subscribe();
        match receiver.wait_for(|snapshot| !snapshot.is_loading).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        }
    }

    /// Stored preference, validated against the supported set.
    fn preferred_locale(&self) -> Locale {
        let default = self.shared.default_locale;
        let stored = match self.shared.preferences.read() {
            Ok(Some(stored)) => stored,
            Ok(None) => return default,
            Err(e) => {
                tracing::warn!("Failed to read locale preference: {e}");
                return default;
            }
        };

        match stored.parse::<Locale>() {
            Ok(locale) if self.shared.supported.contains(&locale) => locale,
            Ok(locale) => {
                tracing::debug!(%locale, "Stored locale is not enabled, using default");
                default
            }
            Err(e) => {
                tracing::debug!("Ignoring stored locale: {e}");
                default
            }
        }
    }

    /// Validate, select and persist; returns the generation of the switch.
    fn begin_switch(&self, locale: Locale) -> Result<u64, LocaleError> {
        if !self.shared.supported.contains(&locale) {
            return Err(LocaleError::Unsupported(locale));
        }

        let generation = self.begin(locale);
        self.persist(locale);
        Ok(generation)
    }

    /// Select `locale`, raise the loading flag and start a new generation.
    fn begin(&self, locale: Locale) -> u64 {
        let mut generation = 0;
        self.shared.state.send_modify(|state| {
            state.generation += 1;
            state.locale = locale;
            state.is_loading = true;
            generation = state.generation;
        });
        tracing::debug!(%locale, generation, "Locale switch started");

        self.apply_document_lang(locale);
        generation
    }

    /// Load `locale` and commit the result if `generation` is still current.
    async fn load_and_commit(
        &self,
        locale: Locale,
        generation: u64,
        persist: bool,
    ) -> Result<SwitchOutcome, LocaleError> {
        let result = self.shared.policy.load(self.shared.loader.as_ref(), locale).await;

        match result {
            Ok(dictionary) => {
                let dictionary = Arc::new(dictionary);
                let committed = self.shared.state.send_if_modified(|state| {
                    if state.generation != generation {
                        return false;
                    }
                    state.dictionary = Some(dictionary);
                    state.dictionary_locale = Some(locale);
                    state.is_loading = false;
                    true
                });

                if committed {
                    tracing::debug!(%locale, generation, "Dictionary committed");
                    Ok(SwitchOutcome::Committed)
                } else {
                    tracing::debug!(%locale, generation, "Discarding stale dictionary");
                    Ok(SwitchOutcome::Superseded)
                }
            }
            Err(error) => {
                let Some(retained) = self.revert(generation) else {
                    tracing::debug!(%locale, generation, "Ignoring failure of stale load: {error}");
                    return Ok(SwitchOutcome::Superseded);
                };

                tracing::warn!(%locale, %retained, "Dictionary load failed, keeping previous locale: {error}");
                // hydration: the fallback switch (or the default already shown) sets the lang
                if persist {
                    self.persist(retained);
                    self.apply_document_lang(retained);
                }
                Err(LocaleError::Load(error))
            }
        }
    }

    /// Give up on `generation` if it is still pending.
    ///
    /// The locale goes back to the one of the committed dictionary (the
    /// default if nothing is loaded) and the loading flag is cleared. Returns
    /// that locale, or `None` when a newer switch owns the state.
    fn revert(&self, generation: u64) -> Option<Locale> {
        let default = self.shared.default_locale;
        let mut retained = None;
        self.shared.state.send_if_modified(|state| {
            if state.generation != generation || !state.is_loading {
                return false;
            }
            let previous = state.dictionary_locale.unwrap_or(default);
            state.locale = previous;
            state.is_loading = false;
            retained = Some(previous);
            true
        });
        retained
    }

    /// Write the preference; failures are logged and otherwise ignored.
    fn persist(&self, locale: Locale) {
        if let Err(e) = self.shared.preferences.write(locale.as_str()) {
            tracing::warn!(%locale, "Failed to persist locale preference: {e}");
        }
    }

    /// Run the document language hook, if any.
    fn apply_document_lang(&self, locale: Locale) {
        if let Some(hook) = &self.shared.document_lang {
            hook(locale.document_lang());
        }
    }
}

/// A started switch that has not committed or failed yet.
///
/// Dropped unfinished, it reverts its generation so the store never stays in
/// the loading state.
struct PendingSwitch {
    /// Store the switch belongs to
    store: LocaleStore,
    /// Target locale
    locale: Locale,
    /// Generation returned by `begin`
    generation: u64,
    /// Whether the preference follows the outcome (user switches only)
    persist: bool,
    /// Set once `load_and_commit` has returned
    settled: bool,
}

impl PendingSwitch {
    /// Wrap a generation that `begin` just started.
    const fn new(store: LocaleStore, locale: Locale, generation: u64, persist: bool) -> Self {
        Self { store, locale, generation, persist, settled: false }
    }

    /// Load and commit; the guard is disarmed once an outcome exists.
    async fn finish(mut self) -> Result<SwitchOutcome, LocaleError> {
        let outcome = self.store.load_and_commit(self.locale, self.generation, self.persist).await;
        self.settled = true;
        outcome
    }
}

impl Drop for PendingSwitch {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let Some(retained) = self.store.revert(self.generation) else {
            return;
        };

        tracing::debug!(locale = %self.locale, %retained, generation = self.generation, "Switch cancelled");
        if self.persist {
            self.store.persist(retained);
        }
        self.store.apply_document_lang(retained);
    }
}
