//! ルートディレクトリ単位の設定管理
//!
//! 設定ファイル・言語設定の保存先・ロケールストアの組み立てを一か所にまとめる。

use std::path::PathBuf;

use super::{
    ConfigError,
    I18nSettings,
    loader,
};
use crate::persistence::FilePreferences;
use crate::store::{
    LocaleStore,
    LocaleStoreBuilder,
};

/// 言語設定を保存するファイル名
pub const PREFERENCE_FILE_NAME: &str = ".portfolio-i18n.storage.json";

/// ルートディレクトリの設定を管理する
///
/// 検証済みの設定だけを保持する。
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 検証済みの設定
    settings: I18nSettings,

    /// 設定ファイルと言語設定ファイルを置くディレクトリ
    root: PathBuf,
}

impl ConfigManager {
    /// `root` の設定を読み込む
    ///
    /// `.portfolio-i18n.json` がなければデフォルト値を使う。
    /// `locales_dir` を指定した場合は設定ファイルの `localesDir` より優先する。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(
        root: impl Into<PathBuf>,
        locales_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let root = root.into();
        tracing::debug!("Loading settings for root: {:?}", root);

        let mut settings = loader::load_from_root(&root)?.unwrap_or_default();
        if let Some(dir) = locales_dir {
            tracing::debug!("Reading bundles from {:?}", dir);
            settings.locales_dir = Some(dir);
        }

        settings.validate().map_err(ConfigError::ValidationErrors)?;
        tracing::debug!("Settings loaded successfully: {:?}", settings);

        Ok(Self { settings, root })
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &I18nSettings {
        &self.settings
    }

    /// 言語設定ファイルのパス
    #[must_use]
    pub fn preference_path(&self) -> PathBuf {
        self.root.join(PREFERENCE_FILE_NAME)
    }

    /// ルートディレクトリに保存された言語設定
    #[must_use]
    pub fn preferences(&self) -> FilePreferences {
        FilePreferences::new(self.preference_path(), self.settings.storage_key.clone())
    }

    /// この設定でロケールストアを組み立てる
    ///
    /// ローダーは設定から決まる。言語設定の保存先は呼び出し側が選ぶ。
    #[must_use]
    pub fn store_builder(&self) -> LocaleStoreBuilder {
        LocaleStore::builder(self.settings.clone())
    }
}
