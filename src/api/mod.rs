//! Translation providers.
//!
//! [`Translator`] is the seam between the reconciler and the network. The
//! [`ProviderClient`] implementation talks to DeepL, Google Cloud Translation or
//! LibreTranslate, one blocking request per text.

use std::{env, fmt, time::Duration};

use log::{debug, error};
use thiserror::Error;
use ureq::Agent;

use crate::config::{Config, ConfigError, TranslationProvider};
use crate::utils::languages::{provider_lang_code, source_lang_code};

mod deepl_translate;
mod google_translate;
mod libre_translate;

/// Failure of a single provider call
#[derive(Error, Debug)]
pub enum TranslateError {
    /// Network, timeout or body decoding failure
    #[error(transparent)]
    Transport(#[from] ureq::Error),
    /// Provider answered with a non 2xx status
    #[error("provider returned status {status}: {body}")]
    Status {
        /// Http status code
        status: u16,
        /// Response body, as far as it could be read
        body: String,
    },
    /// Provider answered without any translation
    #[error("provider returned no translation")]
    EmptyResponse,
}

/// Something that turns text of one language into another
pub trait Translator {
    /// Translate `text`. Language codes are the ones returned by
    /// [`Translator::source_lang_code`] and [`Translator::target_lang_code`].
    fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError>;

    /// Provider code for a source locale, `None` when unsupported
    fn source_lang_code(&self, locale: &str) -> Option<String> {
        Some(locale.to_string())
    }

    /// Provider code for a target locale, `None` when unsupported
    fn target_lang_code(&self, locale: &str) -> Option<String> {
        Some(locale.to_string())
    }
}

/// Result of [`translate_text`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// Provider returned a translation
    Translated(String),
    /// Blank or placeholder text, copied without calling the provider
    Preserved(String),
    /// Provider failed, holds the original text
    Failed(String),
}

impl TranslationOutcome {
    /// The translated text, or the original one when nothing was translated
    pub fn into_text(self) -> String {
        match self {
            TranslationOutcome::Translated(text)
            | TranslationOutcome::Preserved(text)
            | TranslationOutcome::Failed(text) => text,
        }
    }
}

/// `true` when `text` both starts and ends with `marker`, eg: `__USERNAME__`
pub fn is_placeholder(text: &str, marker: &str) -> bool {
    !marker.is_empty() && text.starts_with(marker) && text.ends_with(marker)
}

/// Translate one text.
///
/// Blank text and placeholders never reach the provider. Provider errors are
/// logged and reported as [`TranslationOutcome::Failed`], they are never raised.
pub fn translate_text(
    translator: &dyn Translator,
    text: &str,
    source_lang: &str,
    target_lang: &str,
    placeholder_marker: &str,
) -> TranslationOutcome {
    if text.trim().is_empty() || is_placeholder(text, placeholder_marker) {
        debug!("Not translating `{text}`");
        return TranslationOutcome::Preserved(text.to_string());
    }

    match translator.translate(text, source_lang, target_lang) {
        Ok(translated) if !translated.trim().is_empty() => {
            TranslationOutcome::Translated(translated)
        }
        Ok(_) => {
            error!("      Translation error: {}", TranslateError::EmptyResponse);
            TranslationOutcome::Failed(text.to_string())
        }
        Err(e) => {
            error!("      Translation error: {e}");
            TranslationOutcome::Failed(text.to_string())
        }
    }
}

/// Translate one text, falling back to the original text on any failure
pub fn translate(
    translator: &dyn Translator,
    text: &str,
    source_lang: &str,
    target_lang: &str,
    placeholder_marker: &str,
) -> String {
    translate_text(translator, text, source_lang, target_lang, placeholder_marker).into_text()
}

/// Http client for the configured [`TranslationProvider`]
#[derive(Clone)]
pub struct ProviderClient {
    provider: TranslationProvider,
    api_key: String,
    api_url: Option<String>,
    agent: Agent,
}

impl fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderClient")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl ProviderClient {
    /// Client with an explicit key. Every request times out after `timeout`.
    pub fn new<S: Into<String>>(
        provider: TranslationProvider,
        api_key: S,
        timeout: Duration,
    ) -> Self {
        let agent_config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();

        Self {
            provider,
            api_key: api_key.into(),
            api_url: None,
            agent: Agent::new_with_config(agent_config),
        }
    }

    /// Send requests to `url` instead of the provider's public endpoint
    pub fn with_api_url<S: Into<String>>(mut self, url: S) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Client for `config`, reading the api key from the environment (and `.env`)
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_key_lookup(config, |var| env::var(var).ok())
    }

    /// Client for `config`, `lookup` maps the api key variable to its value
    pub(crate) fn from_key_lookup<F>(config: &Config, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = config.provider.api_key_var();
        let api_key = lookup(var)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey(var))?;

        let client = Self::new(config.provider, api_key, config.timeout);
        Ok(match &config.api_url {
            Some(url) => client.with_api_url(url.clone()),
            None => client,
        })
    }

    /// Selected provider
    pub fn provider(&self) -> TranslationProvider {
        self.provider
    }
}

impl Translator for ProviderClient {
    fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError> {
        let api_url = self.api_url.as_deref();
        match self.provider {
            TranslationProvider::DEEPL => deepl_translate::translate_v2(
                &self.agent,
                api_url,
                &self.api_key,
                text,
                source_lang,
                target_lang,
            ),
            TranslationProvider::GOOGLE => google_translate::translate_v2(
                &self.agent,
                api_url,
                &self.api_key,
                text,
                source_lang,
                target_lang,
            ),
            TranslationProvider::LIBRETRANSLATE => libre_translate::translate_v1(
                &self.agent,
                api_url,
                &self.api_key,
                text,
                source_lang,
                target_lang,
            ),
        }
    }

    fn source_lang_code(&self, locale: &str) -> Option<String> {
        source_lang_code(&self.provider, locale).ok()
    }

    fn target_lang_code(&self, locale: &str) -> Option<String> {
        provider_lang_code(&self.provider, locale).ok()
    }
}

/// Reads the error body of a failed response
fn status_error(response: &mut ureq::http::Response<ureq::Body>) -> TranslateError {
    TranslateError::Status {
        status: response.status().as_u16(),
        body: response.body_mut().read_to_string().unwrap_or_default(),
    }
}
