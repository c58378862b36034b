//! portfolio-i18n
//!
//! ポートフォリオサイト向けの多言語化 (i18n) ライブラリ
//!
//! - [`LocaleStore`]: 現在のロケールと辞書を保持し、切り替えを管理する
//! - [`DictionaryLoader`]: ロケールごとの翻訳辞書を非同期に読み込む
//! - [`resolver`]: ドット区切りのキーパスを辞書から解決する
//! - [`PreferenceStore`]: 選択されたロケールを永続化する

pub mod config;
pub mod contact;
pub mod context;
pub mod dictionary;
pub mod error;
pub mod keys;
pub mod loader;
pub mod locale;
pub mod persistence;
pub mod resolver;
pub mod store;

#[cfg(test)]
mod test_utils;

pub use context::{
    LanguageContext,
    provide,
    use_language,
};
pub use dictionary::{
    Dictionary,
    TranslationValue,
};
pub use error::{
    LoadError,
    LocaleError,
    PreferenceError,
};
pub use loader::{
    DictionaryLoader,
    EmbeddedLoader,
    FsLoader,
};
pub use locale::Locale;
pub use persistence::{
    FilePreferences,
    MemoryPreferences,
    PreferenceStore,
};
pub use store::{
    LocaleStore,
    Snapshot,
    SwitchOutcome,
};
