use std::path::PathBuf;
use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::loader::LoadPolicy;
use crate::locale::Locale;
use crate::persistence::DEFAULT_STORAGE_KEY;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "supportedLocales[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// Locale used before hydration and when the stored preference is rejected.
    pub default_locale: String,

    /// Locales the UI offers. Must contain `default_locale`.
    pub supported_locales: Vec<String>,

    /// Key of the preferred locale in durable storage.
    pub storage_key: String,

    pub key_separator: String,

    /// Directory with `<code>.json` bundles.
    /// If unset, the bundles compiled into the binary are used.
    pub locales_dir: Option<PathBuf>,

    /// Upper bound for one dictionary load attempt.
    pub load_timeout_ms: u64,

    /// Extra attempts after a timed-out or failed read.
    pub load_retries: u32,
}

impl I18nSettings {
    /// # Errors
    /// - Required field is empty
    /// - Unknown locale code
    /// - Default locale not in the supported set
    /// - Zero timeout
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if self.storage_key.trim().is_empty() {
            errors.push(ValidationError::new(
                "storageKey",
                format!("The storage key cannot be empty. Example: \"{DEFAULT_STORAGE_KEY}\""),
            ));
        }

        if self.supported_locales.is_empty() {
            errors.push(ValidationError::new(
                "supportedLocales",
                "At least one locale is required. Example: [\"en\", \"az\", \"tr\"]",
            ));
        }

        for (index, code) in self.supported_locales.iter().enumerate() {
            if let Err(e) = code.parse::<Locale>() {
                errors.push(ValidationError::new(
                    format!("supportedLocales[{index}]"),
                    format!("{e}. Available: {}", available_codes()),
                ));
            }
        }

        match self.default_locale.parse::<Locale>() {
            Err(e) => {
                errors.push(ValidationError::new(
                    "defaultLocale",
                    format!("{e}. Available: {}", available_codes()),
                ));
            }
            Ok(default) if !self.supported().contains(&default) => {
                errors.push(ValidationError::new(
                    "defaultLocale",
                    format!("'{default}' must also be listed in 'supportedLocales'"),
                ));
            }
            Ok(_) => {}
        }

        if self.load_timeout_ms == 0 {
            errors.push(ValidationError::new(
                "loadTimeoutMs",
                "The timeout must be greater than zero",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Default locale; falls back to [`Locale::DEFAULT`] if the code is invalid.
    #[must_use]
    pub fn default_locale(&self) -> Locale {
        self.default_locale.parse().unwrap_or(Locale::DEFAULT)
    }

    /// Supported locales in configured order; invalid codes and duplicates are skipped.
    #[must_use]
    pub fn supported(&self) -> Vec<Locale> {
        let mut locales = Vec::new();
        for locale in self.supported_locales.iter().filter_map(|code| code.parse::<Locale>().ok()) {
            if !locales.contains(&locale) {
                locales.push(locale);
            }
        }
        locales
    }

    #[must_use]
    pub const fn load_policy(&self) -> LoadPolicy {
        LoadPolicy { timeout: Duration::from_millis(self.load_timeout_ms), retries: self.load_retries }
    }
}

/// Comma separated list of every known code, for error messages.
fn available_codes() -> String {
    Locale::ALL.iter().map(|locale| locale.as_str()).collect::<Vec<_>>().join(", ")
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            default_locale: Locale::DEFAULT.to_string(),
            supported_locales: Locale::ALL.iter().map(ToString::to_string).collect(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            key_separator: ".".to_string(),
            locales_dir: None,
            load_timeout_ms: 5000,
            load_retries: 1,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = I18nSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"defaultLocale": "az", "loadRetries": 0}"#;

        let settings: I18nSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_locale, eq("az"));
        assert_that!(settings.load_retries, eq(0));
        assert_that!(settings.key_separator, eq("."));
        assert_that!(settings.supported_locales, len(eq(3)));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let json = "{}";

        let settings: I18nSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_locale, eq("en"));
        assert_that!(settings.supported_locales, elements_are![eq("en"), eq("az"), eq("tr")]);
        assert_that!(settings.storage_key, eq("portfolio-locale"));
        assert_that!(settings.locales_dir, none());
        assert_that!(settings.load_timeout_ms, eq(5000));
    }

    #[rstest]
    fn validate_invalid_key_separator_empty() {
        let settings = I18nSettings { key_separator: String::new(), ..I18nSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("keySeparator")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_storage_key_blank() {
        let settings = I18nSettings { storage_key: "  ".to_string(), ..I18nSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("storageKey")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    fn validate_unknown_supported_locale() {
        let settings = I18nSettings {
            supported_locales: vec!["en".to_string(), "de".to_string()],
            ..I18nSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("supportedLocales[1]")),
                field!(ValidationError.message, contains_substring("'de'")),
                field!(ValidationError.message, contains_substring("en, az, tr"))
            ]])
        );
    }

    #[rstest]
    fn validate_default_not_supported() {
        let settings = I18nSettings {
            default_locale: "tr".to_string(),
            supported_locales: vec!["en".to_string(), "az".to_string()],
            ..I18nSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("defaultLocale")),
                field!(ValidationError.message, contains_substring("supportedLocales"))
            ]])
        );
    }

    #[rstest]
    fn validate_empty_supported_set() {
        let settings = I18nSettings { supported_locales: vec![], ..I18nSettings::default() };

        let errors = settings.validate().unwrap_err();

        // empty set also makes the default unsupported
        assert_that!(errors, len(eq(2)));
        assert_that!(errors[0].field_path, eq("supportedLocales"));
        assert_that!(errors[1].field_path, eq("defaultLocale"));
    }

    #[rstest]
    fn validate_zero_timeout() {
        let settings = I18nSettings { load_timeout_ms: 0, ..I18nSettings::default() };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![field!(ValidationError.field_path, eq("loadTimeoutMs"))])
        );
    }

    #[rstest]
    fn supported_skips_duplicates_and_unknown_codes() {
        let settings = I18nSettings {
            supported_locales: vec!["tr".into(), "xx".into(), "TR".into(), "en".into()],
            ..I18nSettings::default()
        };

        assert_that!(settings.supported(), elements_are![eq(&Locale::Tr), eq(&Locale::En)]);
    }

    #[rstest]
    fn load_policy_from_settings() {
        let settings = I18nSettings { load_timeout_ms: 250, load_retries: 3, ..I18nSettings::default() };

        let policy = settings.load_policy();

        assert_that!(policy.timeout, eq(Duration::from_millis(250)));
        assert_that!(policy.retries, eq(3));
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = I18nSettings {
            key_separator: String::new(),
            load_timeout_ms: 0,
            ..I18nSettings::default()
        };

        let validation_result = settings.validate();
        let errors = validation_result.unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. keySeparator"));
        assert_that!(error_message, contains_substring("cannot be empty"));
        assert_that!(error_message, contains_substring("2. loadTimeoutMs"));
    }
}
