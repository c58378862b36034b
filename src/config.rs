//! Settings for the locale store.
/// Config file loader
mod loader;
/// Configuration manager
mod manager;
/// Configuration types and settings
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::{
    ConfigManager,
    PREFERENCE_FILE_NAME,
};
pub use types::{
    ConfigError,
    I18nSettings,
    ValidationError,
};
