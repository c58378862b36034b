//! Command-line front end for the locale store.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{
    Parser,
    Subcommand,
};
use portfolio_i18n::config::{
    ConfigError,
    ConfigManager,
    I18nSettings,
};
use portfolio_i18n::{
    DictionaryLoader,
    EmbeddedLoader,
    FsLoader,
    LoadError,
    Locale,
    LocaleError,
    MemoryPreferences,
    PreferenceError,
    PreferenceStore,
    TranslationValue,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Look up translations and manage the stored locale preference.
#[derive(Parser, Debug)]
#[command(name = "portfolio-i18n", version, disable_help_subcommand = true)]
struct Cli {
    /// Directory holding `.portfolio-i18n.json` and the preference file.
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    root: PathBuf,
    /// Read `<code>.json` bundles from this directory instead of the built-in ones.
    #[arg(long, global = true, value_name = "DIR")]
    locales: Option<PathBuf>,
    /// Action to run.
    #[command(subcommand)]
    command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Print the translation for a key.
    Get {
        /// Key path, e.g. `projects.title`.
        key: String,
        /// Locale to look in (defaults to the stored preference). Fails if its
        /// bundle cannot be loaded.
        #[arg(long)]
        locale: Option<Locale>,
    },
    /// Switch to a locale and store it as the preference.
    Set {
        /// Locale code.
        locale: Locale,
    },
    /// List keys missing from each locale relative to the default one.
    Check,
}

/// Failures surfaced to the user.
#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Locale(#[from] LocaleError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Preference(#[from] PreferenceError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            let _ = writeln!(std::io::stderr(), "error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Run the selected subcommand.
async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let config = ConfigManager::load_settings(cli.root, cli.locales)?;

    match cli.command {
        Command::Get { key, locale } => get(&config, &key, locale).await,
        Command::Set { locale } => set(&config, locale).await,
        Command::Check => check(config.get_settings()).await,
    }
}

/// `get`: resolve one key without touching the stored preference.
async fn get(config: &ConfigManager, key: &str, locale: Option<Locale>) -> Result<ExitCode, CliError> {
    let (locale, value) = lookup(config, key, locale).await?;

    let mut stdout = std::io::stdout().lock();
    match value {
        Some(value) => {
            writeln!(stdout, "{value}")?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            tracing::debug!(key, %locale, "Key not found");
            writeln!(std::io::stderr(), "{key}: not found in '{locale}'")?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Resolve `key` in `locale`, or in the stored preference when none is given.
///
/// An explicit locale is loaded as is; only the stored preference falls back
/// to the default locale.
async fn lookup(
    config: &ConfigManager,
    key: &str,
    locale: Option<Locale>,
) -> Result<(Locale, Option<TranslationValue>), CliError> {
    let stored = config.preferences().read()?;
    let seed = stored.map_or_else(MemoryPreferences::new, MemoryPreferences::with_value);
    let store = config.store_builder().preferences(Arc::new(seed)).build()?;

    match locale {
        Some(locale) => store.set_locale(locale).await?,
        None => store.hydrate().await?,
    };
    Ok((store.locale(), store.t(key)))
}

/// `set`: switch and persist.
async fn set(config: &ConfigManager, locale: Locale) -> Result<ExitCode, CliError> {
    let store = config.store_builder().preferences(Arc::new(config.preferences())).build()?;
    store.hydrate().await?;
    let outcome = store.set_locale(locale).await?;
    tracing::debug!(?outcome, "Switch finished");

    writeln!(std::io::stdout().lock(), "{}", store.locale())?;
    Ok(ExitCode::SUCCESS)
}

/// `check`: report keys missing relative to the default locale.
async fn check(settings: &I18nSettings) -> Result<ExitCode, CliError> {
    let loader: Arc<dyn DictionaryLoader> = match &settings.locales_dir {
        Some(dir) => Arc::new(FsLoader::new(dir)),
        None => Arc::new(EmbeddedLoader),
    };
    let policy = settings.load_policy();
    let default = settings.default_locale();
    let reference = policy.load(loader.as_ref(), default).await?;

    let mut stdout = std::io::stdout().lock();
    let mut complete = true;
    for locale in settings.supported().into_iter().filter(|l| *l != default) {
        let dictionary = policy.load(loader.as_ref(), locale).await?;
        let missing = dictionary.missing_keys(&reference, &settings.key_separator);
        if missing.is_empty() {
            writeln!(stdout, "{locale}: ok")?;
            continue;
        }

        complete = false;
        writeln!(stdout, "{locale}: {} missing", missing.len())?;
        for key in missing {
            writeln!(stdout, "  {key}")?;
        }
    }

    Ok(if complete { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
