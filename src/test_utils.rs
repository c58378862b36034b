//! テスト用ユーティリティ
//!
//! 複数のテストモジュールで使用される共通のヘルパーを提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::collections::{
    HashMap,
    HashSet,
};
use std::path::PathBuf;
use std::sync::{
    Arc,
    Mutex,
};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::Notify;

use crate::config::I18nSettings;
use crate::dictionary::Dictionary;
use crate::error::LoadError;
use crate::loader::{
    DictionaryLoader,
    bundled_dictionary,
};
use crate::locale::Locale;
use crate::persistence::MemoryPreferences;
use crate::store::LocaleStore;

/// 読み込み完了のタイミングをテストから制御できるローダー
///
/// `gated` の場合、各ロケールの読み込みは [`GatedLoader::release`] が呼ばれるまで完了しない。
/// 結果は組み込みバンドル。
pub(crate) struct GatedLoader {
    /// 読み込みを待機させるか
    gated: bool,
    /// 失敗させるロケール
    failing: HashSet<Locale>,
    /// ロケールごとのゲート
    gates: Mutex<HashMap<Locale, Arc<Notify>>>,
    /// 呼び出し履歴
    calls: Mutex<Vec<Locale>>,
}

impl GatedLoader {
    /// 即座に完了するローダー
    pub(crate) fn open() -> Self {
        Self::new(false)
    }

    /// `release` まで完了しないローダー
    pub(crate) fn gated() -> Self {
        Self::new(true)
    }

    /// 失敗ロケールなしでローダーを作成する
    fn new(gated: bool) -> Self {
        Self {
            gated,
            failing: HashSet::new(),
            gates: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 指定したロケールの読み込みを失敗させる
    pub(crate) fn failing(mut self, locales: &[Locale]) -> Self {
        self.failing.extend(locales.iter().copied());
        self
    }

    /// 指定したロケールの読み込みを一件完了させる
    ///
    /// 読み込み開始前に呼んでもよい（許可は保持される）。
    pub(crate) fn release(&self, locale: Locale) {
        self.gate(locale).notify_one();
    }

    /// これまでに要求されたロケール
    pub(crate) fn calls(&self) -> Vec<Locale> {
        self.calls.lock().unwrap().clone()
    }

    /// ロケールのゲートを取得する（なければ作成）
    fn gate(&self, locale: Locale) -> Arc<Notify> {
        self.gates.lock().unwrap().entry(locale).or_default().clone()
    }
}

impl DictionaryLoader for GatedLoader {
    fn load(&self, locale: Locale) -> BoxFuture<'_, Result<Dictionary, LoadError>> {
        self.calls.lock().unwrap().push(locale);
        let gate = self.gated.then(|| self.gate(locale));
        let fail = self.failing.contains(&locale);

        async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            if fail {
                return Err(LoadError::Missing {
                    locale,
                    path: PathBuf::from(format!("{locale}.json")),
                });
            }
            bundled_dictionary(locale)
        }
        .boxed()
    }
}

/// デフォルト設定でストアを作成する
pub(crate) fn store_with(
    loader: Arc<dyn DictionaryLoader>,
    preferences: MemoryPreferences,
) -> LocaleStore {
    LocaleStore::builder(I18nSettings::default())
        .loader(loader)
        .preferences(Arc::new(preferences))
        .build()
        .unwrap()
}
