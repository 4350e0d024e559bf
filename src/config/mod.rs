//!
//! _Config builder_
//!
//! Helps build the configuration for a sync run, either in code or from a
//! TOML file.
//!

pub mod routing;

use normpath::PathExt;
use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

use crate::config::routing::RoutingConfig;

/// Default request timeout for a single translation call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default placeholder marker, `__name__` style values are never translated
pub const DEFAULT_PLACEHOLDER_MARKER: &str = "__";

/// Errors raised while assembling the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Input path may be malformed or does not exist
    #[error("locales directory `{path}` is malformed: {source}")]
    InvalidLocalesDir {
        /// Path as given
        path: PathBuf,
        /// Underlying io error
        #[source]
        source: io::Error,
    },
    /// The api key variable for the selected provider is unset or empty
    #[error("{0} environment variable not set")]
    MissingApiKey(&'static str),
    /// A config or routing file could not be read
    #[error("could not read `{path}`: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying io error
        #[source]
        source: io::Error,
    },
    /// The TOML config file is not valid
    #[error("could not parse `{path}`: {source}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Parser error
        #[source]
        source: toml::de::Error,
    },
    /// The routing file has no `locales: [...]` entry
    #[error("could not find locales array in `{0}`")]
    MissingLocales(PathBuf),
    /// Neither explicit targets nor a routing file were configured
    #[error("no target locales configured")]
    NoTargets,
    /// Every request would time out immediately
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
    /// Pattern used to read the routing file failed to compile
    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

/// Providers available for translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    ///DeepL Cloud Translation
    #[default]
    DEEPL,
    ///Google Cloud Translation
    GOOGLE,
    ///LibreTranslate Translations
    LIBRETRANSLATE,
}

impl TranslationProvider {
    /// Environment variable holding the api key for this provider
    pub fn api_key_var(&self) -> &'static str {
        match self {
            TranslationProvider::DEEPL => "DEEPL_API_KEY",
            TranslationProvider::GOOGLE => "GOOGLE_API_KEY",
            TranslationProvider::LIBRETRANSLATE => "LIBRE_TRANSLATE_API_KEY",
        }
    }
}

/// How locale files are laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleLayout {
    /// `<dir>/<locale>.json`
    #[default]
    Flat,
    /// `<dir>/<locale>/<namespace>.json`
    Namespaced,
}

/// Configuration of one sync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    ///Path pointing to where the locales are located
    pub locales_dir: PathBuf,
    ///Source language
    pub source_locale: String,
    ///Languages to translate
    pub target_locales: Vec<String>,
    ///Translation provider
    pub provider: TranslationProvider,
    ///File layout of the locales directory
    pub layout: LocaleLayout,
    ///Values starting and ending with this marker are copied untranslated
    pub placeholder_marker: String,
    ///Timeout of a single provider request
    pub timeout: Duration,
    ///Overrides the provider endpoint, eg: a self hosted LibreTranslate
    pub api_url: Option<String>,
    ///Write the source text for keys whose translation failed.
    ///Default: false, failed keys stay missing and are retried on the next run
    pub fill_failed_with_source: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Return the defaults for the config
    pub fn new() -> Self {
        Self {
            locales_dir: "".into(),
            source_locale: "en".to_string(),
            target_locales: vec![],
            provider: TranslationProvider::DEEPL,
            layout: LocaleLayout::Flat,
            placeholder_marker: DEFAULT_PLACEHOLDER_MARKER.to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_url: None,
            fill_failed_with_source: false,
        }
    }

    /// Path to directory where the locales are located
    pub fn locales_directory<P: AsRef<Path>>(&mut self, p: P) -> &mut Self {
        self.locales_dir = p.as_ref().to_path_buf();
        self
    }

    /// Language to translate from
    pub fn source_lang<S: Into<String>>(&mut self, lang: S) -> &mut Self {
        self.source_locale = lang.into();
        self
    }

    ///Language to translate to
    pub fn add_target_lang<S: Into<String>>(&mut self, lang: S) -> &mut Self {
        self.target_locales.push(lang.into());
        self
    }

    ///Languages to translate to -- add many
    pub fn add_target_langs<S: Into<String>>(&mut self, langs: Vec<S>) -> &mut Self {
        self.target_locales
            .extend(langs.into_iter().map(|s| s.into()));
        self
    }

    ///Take source and target languages from a parsed routing file
    pub fn routing(&mut self, routing: &RoutingConfig) -> &mut Self {
        self.source_locale = routing.default_locale.clone();
        self.target_locales = routing.target_locales();
        self
    }

    ///Provider to use
    pub fn translation_provider(&mut self, provider: TranslationProvider) -> &mut Self {
        self.provider = provider;
        self
    }

    ///Flat or namespaced locale files
    pub fn layout(&mut self, layout: LocaleLayout) -> &mut Self {
        self.layout = layout;
        self
    }

    ///Marker wrapping values that must not be translated
    pub fn placeholder_marker<S: Into<String>>(&mut self, marker: S) -> &mut Self {
        self.placeholder_marker = marker.into();
        self
    }

    ///Timeout of a single provider request
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    ///Custom provider endpoint
    pub fn api_url<S: Into<String>>(&mut self, url: S) -> &mut Self {
        self.api_url = Some(url.into());
        self
    }

    ///Write the source text when a translation fails
    pub fn fill_failed_with_source(&mut self, fill: bool) -> &mut Self {
        self.fill_failed_with_source = fill;
        self
    }

    /// Build the config, normalizing the locales directory. A zero timeout is rejected.
    pub fn build(&self) -> Result<Self, ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        let normalized =
            self.locales_dir
                .normalize()
                .map_err(|source| ConfigError::InvalidLocalesDir {
                    path: self.locales_dir.clone(),
                    source,
                })?;

        Ok(Config {
            locales_dir: normalized.into_path_buf(),
            ..self.clone()
        })
    }

    /// Load a config from a TOML file.
    ///
    /// Relative paths inside the file are resolved against the file's directory.
    ///
    /// ```toml
    /// locales_dir = "src/messages"
    /// routing_file = "src/i18n/routing.ts"
    /// provider = "deepl"
    /// layout = "flat"
    /// timeout_secs = 10
    /// ```
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        file.into_config(base)
    }
}

/// On-disk shape of the TOML config
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    locales_dir: Option<PathBuf>,
    routing_file: Option<PathBuf>,
    source_locale: Option<String>,
    target_locales: Vec<String>,
    provider: Option<TranslationProvider>,
    layout: Option<LocaleLayout>,
    placeholder_marker: Option<String>,
    timeout_secs: Option<u64>,
    api_url: Option<String>,
    fill_failed_with_source: Option<bool>,
}

impl ConfigFile {
    fn into_config(self, base: &Path) -> Result<Config, ConfigError> {
        let mut cfg = Config::new();

        if let Some(dir) = self.locales_dir {
            cfg.locales_directory(base.join(dir));
        }

        if let Some(routing_file) = self.routing_file {
            let routing = RoutingConfig::from_file(base.join(routing_file))?;
            cfg.routing(&routing);
        }

        if let Some(source) = self.source_locale {
            cfg.source_lang(source);
        }
        if !self.target_locales.is_empty() {
            cfg.target_locales = self.target_locales;
        }
        if cfg.target_locales.is_empty() {
            return Err(ConfigError::NoTargets);
        }

        if let Some(provider) = self.provider {
            cfg.translation_provider(provider);
        }
        if let Some(layout) = self.layout {
            cfg.layout(layout);
        }
        if let Some(marker) = self.placeholder_marker {
            cfg.placeholder_marker(marker);
        }
        if let Some(secs) = self.timeout_secs {
            cfg.timeout(Duration::from_secs(secs));
        }
        if let Some(url) = self.api_url {
            cfg.api_url(url);
        }
        if let Some(fill) = self.fill_failed_with_source {
            cfg.fill_failed_with_source(fill);
        }

        cfg.build()
    }
}
