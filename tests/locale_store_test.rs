//! ロケールストアの結合テスト（ファイルからの読み込みと永続化を含む）

#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{
    Arc,
    Mutex,
};

use futures::FutureExt;
use futures::future::BoxFuture;
use googletest::prelude::*;
use portfolio_i18n::config::I18nSettings;
use portfolio_i18n::{
    Dictionary,
    DictionaryLoader,
    FilePreferences,
    FsLoader,
    LanguageContext,
    LoadError,
    Locale,
    LocaleError,
    LocaleStore,
    PreferenceStore,
    SwitchOutcome,
    provide,
    use_language,
};
use tempfile::TempDir;
use tokio::sync::Notify;

const STORAGE_KEY: &str = "portfolio-locale";

/// Reads bundles from disk, but only once the test releases the locale.
struct GatedFsLoader {
    inner: FsLoader,
    gates: Mutex<HashMap<Locale, Arc<Notify>>>,
}

impl GatedFsLoader {
    fn new(dir: &Path) -> Self {
        Self { inner: FsLoader::new(dir), gates: Mutex::new(HashMap::new()) }
    }

    fn release(&self, locale: Locale) {
        self.gate(locale).notify_one();
    }

    fn gate(&self, locale: Locale) -> Arc<Notify> {
        self.gates.lock().unwrap().entry(locale).or_default().clone()
    }
}

impl DictionaryLoader for GatedFsLoader {
    fn load(&self, locale: Locale) -> BoxFuture<'_, Result<Dictionary, LoadError>> {
        let gate = self.gate(locale);
        async move {
            gate.notified().await;
            self.inner.load(locale).await
        }
        .boxed()
    }
}

fn write_bundles(dir: &Path) {
    fs::write(
        dir.join("en.json"),
        r#"{"about": {"title": "About"}, "hero": {"phrases": ["Frontend", "Mobile"]}}"#,
    )
    .unwrap();
    fs::write(
        dir.join("az.json"),
        r#"{"about": {"title": "Haqqımda"}, "hero": {"phrases": ["Frontend", "Mobil"]}}"#,
    )
    .unwrap();
    fs::write(
        dir.join("tr.json"),
        r#"{"about": {"title": "Hakkımda"}, "hero": {"phrases": ["Frontend", "Mobil"]}}"#,
    )
    .unwrap();
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        write_bundles(dir.path());
        Self { dir }
    }

    fn preferences(&self) -> Arc<FilePreferences> {
        Arc::new(FilePreferences::new(self.dir.path().join("storage.json"), STORAGE_KEY))
    }

    fn settings(&self) -> I18nSettings {
        I18nSettings { locales_dir: Some(self.dir.path().to_path_buf()), ..I18nSettings::default() }
    }

    fn store(&self) -> LocaleStore {
        LocaleStore::builder(self.settings()).preferences(self.preferences()).build().unwrap()
    }
}

#[tokio::test]
async fn unsupported_preference_then_switch() {
    let fixture = Fixture::new();
    fixture.preferences().write("de").unwrap();
    let store = fixture.store();

    store.hydrate().await.unwrap();
    assert_eq!(store.locale(), Locale::En);

    let switch = store.set_locale(Locale::Tr);
    assert!(store.is_loading());
    assert_eq!(store.locale(), Locale::Tr);

    assert_eq!(switch.await.unwrap(), SwitchOutcome::Committed);
    assert!(!store.is_loading());
    assert_eq!(store.t("about.title").unwrap().to_string(), "Hakkımda");
    assert!(store.t("nonexistent.key").is_none());
}

#[tokio::test]
async fn empty_storage_hydrates_default() {
    let fixture = Fixture::new();
    let store = fixture.store();

    store.hydrate().await.unwrap();

    let snapshot = store.snapshot();
    assert_eq!(snapshot.locale(), Locale::En);
    assert!(snapshot.is_consistent());
    assert_eq!(snapshot.text("about.title", ""), "About");
    assert!(fixture.preferences().read().unwrap().is_none());
}

#[tokio::test]
async fn preference_survives_restart() {
    let fixture = Fixture::new();
    let first = fixture.store();
    first.hydrate().await.unwrap();
    first.set_locale(Locale::Az).await.unwrap();

    let second = fixture.store();
    second.hydrate().await.unwrap();

    assert_eq!(second.locale(), Locale::Az);
    assert_eq!(second.text("about.title", "About"), "Haqqımda");
}

#[tokio::test]
async fn latest_request_wins_regardless_of_completion_order() {
    let fixture = Fixture::new();
    let loader = Arc::new(GatedFsLoader::new(fixture.dir.path()));
    let store = LocaleStore::builder(fixture.settings())
        .loader(loader.clone())
        .preferences(fixture.preferences())
        .build()
        .unwrap();
    loader.release(Locale::En);
    store.hydrate().await.unwrap();

    let slow = store.request_locale(Locale::Az);
    let fast = store.request_locale(Locale::Tr);
    loader.release(Locale::Tr);
    assert_eq!(fast.await.unwrap().unwrap(), SwitchOutcome::Committed);
    loader.release(Locale::Az);
    assert_eq!(slow.await.unwrap().unwrap(), SwitchOutcome::Superseded);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.locale(), Locale::Tr);
    assert_eq!(snapshot.dictionary_locale(), Some(Locale::Tr));
    assert_eq!(snapshot.text("about.title", ""), "Hakkımda");
    assert_eq!(fixture.preferences().read().unwrap().as_deref(), Some("tr"));
}

#[tokio::test]
async fn aborted_request_restores_stored_preference() {
    let fixture = Fixture::new();
    let loader = Arc::new(GatedFsLoader::new(fixture.dir.path()));
    let store = LocaleStore::builder(fixture.settings())
        .loader(loader.clone())
        .preferences(fixture.preferences())
        .build()
        .unwrap();
    loader.release(Locale::En);
    store.hydrate().await.unwrap();

    let switch = store.request_locale(Locale::Az);
    assert_eq!(fixture.preferences().read().unwrap().as_deref(), Some("az"));
    switch.abort();
    assert!(switch.await.unwrap_err().is_cancelled());

    let snapshot = store.loaded().await;
    assert_that!(snapshot.locale(), eq(Locale::En));
    assert_that!(snapshot.is_consistent(), eq(true));
    assert_eq!(snapshot.text("about.title", ""), "About");
    assert_eq!(fixture.preferences().read().unwrap().as_deref(), Some("en"));
}

#[tokio::test]
async fn malformed_bundle_keeps_previous_dictionary() {
    let fixture = Fixture::new();
    fs::write(fixture.dir.path().join("az.json"), r#"{"about": 42}"#).unwrap();
    let store = fixture.store();
    store.hydrate().await.unwrap();

    let result = store.set_locale(Locale::Az).await;

    assert!(matches!(result, Err(LocaleError::Load(LoadError::Malformed { .. }))));
    let snapshot = store.snapshot();
    assert_that!(snapshot.locale(), eq(Locale::En));
    assert_that!(snapshot.is_loading(), eq(false));
    assert_eq!(snapshot.text("about.title", ""), "About");
    assert_eq!(fixture.preferences().read().unwrap().as_deref(), Some("en"));
}

#[tokio::test]
async fn missing_bundle_at_hydration_falls_back_to_default() {
    let fixture = Fixture::new();
    fs::remove_file(fixture.dir.path().join("tr.json")).unwrap();
    fixture.preferences().write("tr").unwrap();
    let store = fixture.store();

    store.hydrate().await.unwrap();

    assert_eq!(store.locale(), Locale::En);
    assert_eq!(store.snapshot().list("hero.phrases").unwrap(), vec!["Frontend", "Mobile"]);
}

#[tokio::test]
async fn components_share_one_store_through_provider() {
    let fixture = Fixture::new();
    let context = LanguageContext::new(fixture.store());
    context.store().hydrate().await.unwrap();
    let mut receiver = context.store().subscribe();

    provide(context, async {
        let header = use_language().unwrap();
        header.set_locale(Locale::Tr).await.unwrap();

        let about = use_language().unwrap();
        assert_eq!(about.text("about.title", "About"), "Hakkımda");
    })
    .await;

    assert!(receiver.has_changed().unwrap());
    assert_eq!(receiver.borrow_and_update().locale(), Locale::Tr);
    assert!(use_language().is_err());
}
