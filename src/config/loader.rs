//! 設定ファイルの読み込み関数

use std::path::Path;

use super::{
    ConfigError,
    I18nSettings,
};

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".portfolio-i18n.json";

/// ルートディレクトリから設定を読み込む
///
/// `.portfolio-i18n.json` ファイルを探して読み込む
///
/// # Arguments
/// * `root` - 設定ファイルを探すディレクトリ
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(ConfigError)`: ファイル読み込みまたはパースエラー
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub(super) fn load_from_root(root: &Path) -> Result<Option<I18nSettings>, ConfigError> {
    let config_path = root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let mut settings: I18nSettings = serde_json::from_str(&content)?;

    // 相対パスは設定ファイルの場所を基準に解決する
    if let Some(dir) = &settings.locales_dir
        && dir.is_relative()
    {
        settings.locales_dir = Some(root.join(dir));
    }

    Ok(Some(settings))
}
