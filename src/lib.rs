#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(test, deny(warnings))]

//! # i18n-keysync
//!
//! The `i18n-keysync` crate fills the keys that are missing from translated
//! JSON locale files by sending the source text to a machine translation api.
//!
//!## Features
//! - Only keys that are absent or empty in a target file are translated, existing
//!   translations are never touched.
//! - Nested dictionaries are diffed and merged key by key.
//! - Placeholders like `__LINK__` are copied untranslated.
//! - A failed translation never aborts the run, the key is simply retried on the
//!   next run.
//! - Flat (`messages/de.json`) or namespaced (`messages/de/common.json`) layouts.
//!
//! ```text
//! ├── src
//! │   ├── i18n
//! │   │   └── routing.ts
//! │   └── messages
//! │       ├── de.json
//! │       ├── en.json
//! │       └── ru.json
//! ```
//!
//! # Current support
//!  - DeepL
//!  - Google Cloud Translation
//!  - LibreTranslate (public or self hosted through `api_url`)
//!
//! # Usage
//!
//! The api key is read from the environment, a `.env` file in the working
//! directory is loaded first:
//!
//!- **DEEPL_API_KEY = "xyz"** (keys ending in `:fx` use the free endpoint)
//!- **GOOGLE_API_KEY = "xyz"**
//!- **LIBRE_TRANSLATE_API_KEY = "xyz"**
//!
//! ```rust,no_run
//!use i18n_keysync::{
//!    LocaleSync,
//!    config::{Config, TranslationProvider, routing::RoutingConfig},
//!};
//!
//!fn main() -> Result<(), Box<dyn std::error::Error>> {
//!    env_logger::init();
//!
//!    let routing = RoutingConfig::from_file("src/i18n/routing.ts")?;
//!    let cfg = Config::new()
//!        .locales_directory("src/messages")
//!        .routing(&routing)
//!        .translation_provider(TranslationProvider::DEEPL)
//!        .build()?;
//!
//!    let report = LocaleSync::sync(cfg)?;
//!    println!("{} translations", report.total_translations);
//!    Ok(())
//!}
//! ```

use std::path::PathBuf;

use log::{debug, info, warn};
use serde_json::Value;
use thiserror::Error;

use crate::{
    api::{ProviderClient, TranslationOutcome, Translator, translate_text},
    config::{Config, ConfigError, LocaleLayout},
    i18n::{LocaleDictionary, diff, merge_one},
    utils::{
        list_namespaces, load_target_file, locale_file_path, read_locale_file, write_locale_file,
    },
};

pub mod api;
pub mod config;
pub mod i18n;
mod report;
mod utils;

pub use report::{LocaleReport, LocaleStatus, SyncReport};
pub use utils::LocaleFileError;

/// Errors that stop a sync run
#[derive(Error, Debug)]
pub enum SyncError {
    /// Configuration is incomplete, nothing was touched
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Source locale file or directory does not exist, nothing was touched
    #[error("source locale `{0}` not found")]
    SourceMissing(PathBuf),
    /// The provider cannot translate from the source language
    #[error("source language `{0}` is not supported by the translation provider")]
    UnsupportedSourceLanguage(String),
    /// A locale file could not be read or written
    #[error(transparent)]
    LocaleFile(#[from] LocaleFileError),
}

/// Entry point of a sync run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocaleSync {}

impl LocaleSync {
    /// Fill the missing keys of every target locale.
    ///
    /// The api key of the selected provider is read from the environment,
    /// see the crate docs.
    ///
    /// Target languages are processed one after the other and every file is
    /// saved once at the end of its pass. Files saved before a failing write
    /// stay saved.
    pub fn sync(config: Config) -> Result<SyncReport, SyncError> {
        Self::sync_with_client(&config, ProviderClient::from_config)
    }

    /// The client is built before any file is read
    fn sync_with_client<F>(config: &Config, client: F) -> Result<SyncReport, SyncError>
    where
        F: FnOnce(&Config) -> Result<ProviderClient, ConfigError>,
    {
        let client = client(config)?;
        Self::sync_with(config, &client)
    }

    /// Same as [`LocaleSync::sync`] with any [`Translator`]
    pub fn sync_with(
        config: &Config,
        translator: &dyn Translator,
    ) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();

        info!("Starting auto-translation...");
        info!("   Source locale: {}", config.source_locale);

        if config.target_locales.is_empty() {
            warn!("   No target locales found (only the source locale configured)");
            return Ok(report);
        }
        info!("   Target locales: {}", config.target_locales.join(", "));

        let sources = load_sources(config)?;
        let source_lang = translator
            .source_lang_code(&config.source_locale)
            .ok_or_else(|| SyncError::UnsupportedSourceLanguage(config.source_locale.clone()))?;

        let pass = Pass {
            config,
            translator,
            source_lang: &source_lang,
        };

        for target_locale in &config.target_locales {
            if *target_locale == config.source_locale {
                debug!("Skipping the source locale {target_locale}");
                continue;
            }

            let Some(target_lang) = translator.target_lang_code(target_locale) else {
                warn!("   {target_locale}: Skip - not supported by the translation provider");
                report.push(
                    LocaleReport {
                        locale: target_locale.clone(),
                        namespace: None,
                        status: LocaleStatus::Unsupported,
                    },
                    0,
                );
                continue;
            };

            for (namespace, source_data) in &sources {
                let (status, written) =
                    pass.run(source_data, target_locale, &target_lang, namespace.as_deref())?;
                report.push(
                    LocaleReport {
                        locale: target_locale.clone(),
                        namespace: namespace.clone(),
                        status,
                    },
                    written,
                );
            }
        }

        info!("Translation complete!");
        info!("   Total translations: {}", report.total_translations);
        if report.failed() > 0 {
            warn!("   Failed translations: {}", report.failed());
        }

        Ok(report)
    }
}

/// Source dictionaries keyed by namespace, `None` for the flat layout
fn load_sources(config: &Config) -> Result<Vec<(Option<String>, LocaleDictionary)>, SyncError> {
    let namespaces: Vec<Option<String>> = match config.layout {
        LocaleLayout::Flat => vec![None],
        LocaleLayout::Namespaced => {
            let dir = config.locales_dir.join(&config.source_locale);
            if !dir.is_dir() {
                return Err(SyncError::SourceMissing(dir));
            }
            let namespaces = list_namespaces(&config.locales_dir, &config.source_locale)
                .map_err(|source| LocaleFileError::Io {
                    path: dir.clone(),
                    source,
                })?;
            if namespaces.is_empty() {
                return Err(SyncError::SourceMissing(dir));
            }
            namespaces.into_iter().map(Some).collect()
        }
    };

    namespaces
        .into_iter()
        .map(|namespace| {
            let path =
                locale_file_path(&config.locales_dir, &config.source_locale, namespace.as_deref());
            if !path.is_file() {
                return Err(SyncError::SourceMissing(path));
            }

            let data = read_locale_file(&path)?;
            info!("Processing: {} ({} top level keys)", path.display(), data.len());
            Ok((namespace, data))
        })
        .collect()
}

/// Shared state of one run
struct Pass<'a> {
    config: &'a Config,
    translator: &'a dyn Translator,
    source_lang: &'a str,
}

impl Pass<'_> {
    /// load -> diff -> (translate -> merge)* -> save, for one target file.
    ///
    /// Returns the status and the number of keys written.
    fn run(
        &self,
        source: &LocaleDictionary,
        target_locale: &str,
        target_lang: &str,
        namespace: Option<&str>,
    ) -> Result<(LocaleStatus, usize), SyncError> {
        let label = match namespace {
            Some(ns) => format!("{target_locale}/{ns}"),
            None => target_locale.to_string(),
        };
        let path = locale_file_path(&self.config.locales_dir, target_locale, namespace);

        let mut target = load_target_file(&path);
        let missing = diff(source, &target);

        if missing.is_empty() {
            info!("   {label}: All keys present");
            return Ok((LocaleStatus::UpToDate, 0));
        }

        info!("   {label}: Translating {} missing keys", missing.len());

        let (mut translated, mut preserved, mut failed, mut written) = (0, 0, 0, 0);

        for record in &missing {
            let value = match &record.value {
                Value::String(text) => match translate_text(
                    self.translator,
                    text,
                    self.source_lang,
                    target_lang,
                    &self.config.placeholder_marker,
                ) {
                    TranslationOutcome::Translated(text) => {
                        translated += 1;
                        Value::String(text)
                    }
                    TranslationOutcome::Preserved(text) => {
                        preserved += 1;
                        Value::String(text)
                    }
                    TranslationOutcome::Failed(original) => {
                        failed += 1;
                        if !self.config.fill_failed_with_source {
                            warn!("      ✗ {}", record.path);
                            continue;
                        }
                        Value::String(original)
                    }
                },
                //numbers and booleans are not text
                other => {
                    preserved += 1;
                    other.clone()
                }
            };

            merge_one(&mut target, record, value);
            written += 1;
            info!("      ✓ {}", record.path);
        }

        write_locale_file(&path, &target)?;
        info!("   {label}: Saved translations");

        Ok((
            LocaleStatus::Updated {
                translated,
                preserved,
                failed,
            },
            written,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::TranslateError, config::TranslationProvider};
    use serde_json::json;
    use std::{
        cell::RefCell,
        collections::{HashMap, HashSet},
        fs,
        path::Path,
    };

    /// Dictionary backed translator, unknown words become `<LANG>:<text>`
    #[derive(Default)]
    struct Stub {
        words: HashMap<&'static str, &'static str>,
        failing: HashSet<&'static str>,
        unsupported: Vec<&'static str>,
        calls: RefCell<Vec<String>>,
    }

    impl Translator for Stub {
        fn translate(&self, text: &str, _: &str, target: &str) -> Result<String, TranslateError> {
            self.calls.borrow_mut().push(text.to_string());
            if self.failing.contains(text) {
                return Err(TranslateError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            Ok(self
                .words
                .get(text)
                .map(|w| w.to_string())
                .unwrap_or_else(|| format!("{target}:{text}")))
        }

        fn target_lang_code(&self, locale: &str) -> Option<String> {
            (!self.unsupported.iter().any(|u| *u == locale)).then(|| locale.to_uppercase())
        }
    }

    fn write_json(path: &Path, value: Value) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn config(dir: &Path, targets: Vec<&str>) -> Config {
        Config::new()
            .locales_directory(dir)
            .source_lang("de")
            .add_target_langs(targets)
            .build()
            .unwrap()
    }

    #[test]
    fn nested_merge_keeps_existing_translation() {
        let dir = tempfile::tempdir().unwrap();
        write_json(&dir.path().join("de.json"), json!({"a": {"b": "hello", "c": "world"}}));
        write_json(&dir.path().join("en.json"), json!({"a": {"b": "bonjour"}}));

        let stub = Stub {
            words: HashMap::from([("world", "MONDE")]),
            ..Default::default()
        };
        let report = LocaleSync::sync_with(&config(dir.path(), vec!["en"]), &stub).unwrap();

        assert_eq!(
            read_json(&dir.path().join("en.json")),
            json!({"a": {"b": "bonjour", "c": "MONDE"}})
        );
        assert_eq!(*stub.calls.borrow(), vec!["world"]);
        assert_eq!(report.total_translations, 1);
        assert_eq!(
            report.locale("en").unwrap().status,
            LocaleStatus::Updated {
                translated: 1,
                preserved: 0,
                failed: 0
            }
        );
    }

    #[test]
    fn rerun_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_json(
            &dir.path().join("de.json"),
            json!({"nav": {"home": "Start", "about": "Über uns"}, "title": "Titel", "empty": ""}),
        );
        let cfg = config(dir.path(), vec!["en", "ru"]);
        let stub = Stub::default();

        let first = LocaleSync::sync_with(&cfg, &stub).unwrap();
        assert_eq!(first.total_translations, 6);
        let en_first = fs::read_to_string(dir.path().join("en.json")).unwrap();
        let ru_first = fs::read_to_string(dir.path().join("ru.json")).unwrap();
        let calls = stub.calls.borrow().len();

        let report = LocaleSync::sync_with(&cfg, &stub).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("en.json")).unwrap(), en_first);
        assert_eq!(fs::read_to_string(dir.path().join("ru.json")).unwrap(), ru_first);
        assert_eq!(stub.calls.borrow().len(), calls);
        assert_eq!(report.total_translations, 0);
        assert!(report.locales.iter().all(|l| l.status == LocaleStatus::UpToDate));
    }

    #[test]
    fn every_source_key_is_filled() {
        let dir = tempfile::tempdir().unwrap();
        let source = json!({
            "auth": {"login": {"title": "Anmelden", "button": "Los"}, "logout": "Abmelden"},
            "errors": {"notFound": "Nicht gefunden"},
            "footer": "Fußzeile"
        });
        write_json(&dir.path().join("de.json"), source.clone());
        write_json(&dir.path().join("fr.json"), json!({"footer": "Pied de page"}));

        LocaleSync::sync_with(&config(dir.path(), vec!["fr"]), &Stub::default()).unwrap();

        let target = read_json(&dir.path().join("fr.json"));
        assert!(diff(source.as_object().unwrap(), target.as_object().unwrap()).is_empty());
        assert_eq!(target["footer"], json!("Pied de page"));
        assert_eq!(target["auth"]["login"]["title"], json!("FR:Anmelden"));
        assert_eq!(target["errors"]["notFound"], json!("FR:Nicht gefunden"));
    }

    #[test]
    fn placeholders_and_scalars_skip_the_provider() {
        let dir = tempfile::tempdir().unwrap();
        write_json(
            &dir.path().join("de.json"),
            json!({"link": "__LINK__", "blank": "  ", "limit": 3, "beta": true}),
        );
        let stub = Stub::default();

        let report = LocaleSync::sync_with(&config(dir.path(), vec!["en"]), &stub).unwrap();

        assert!(stub.calls.borrow().is_empty());
        assert_eq!(
            read_json(&dir.path().join("en.json")),
            json!({"link": "__LINK__", "blank": "  ", "limit": 3, "beta": true})
        );
        assert_eq!(
            report.locale("en").unwrap().status,
            LocaleStatus::Updated {
                translated: 0,
                preserved: 4,
                failed: 0
            }
        );
    }

    #[test]
    fn failed_key_stays_missing_and_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        write_json(&dir.path().join("de.json"), json!({"a": "kaputt", "b": "heil"}));
        let cfg = config(dir.path(), vec!["en"]);

        let flaky = Stub {
            failing: HashSet::from(["kaputt"]),
            ..Default::default()
        };
        let report = LocaleSync::sync_with(&cfg, &flaky).unwrap();

        assert_eq!(read_json(&dir.path().join("en.json")), json!({"b": "EN:heil"}));
        assert_eq!(report.failed(), 1);
        assert_eq!(report.total_translations, 1);

        let healthy = Stub::default();
        LocaleSync::sync_with(&cfg, &healthy).unwrap();

        assert_eq!(*healthy.calls.borrow(), vec!["kaputt"]);
        assert_eq!(
            read_json(&dir.path().join("en.json")),
            json!({"b": "EN:heil", "a": "EN:kaputt"})
        );
    }

    #[test]
    fn failed_key_filled_with_source_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        write_json(&dir.path().join("de.json"), json!({"a": "kaputt"}));
        let mut cfg = config(dir.path(), vec!["en"]);
        cfg.fill_failed_with_source = true;

        let flaky = Stub {
            failing: HashSet::from(["kaputt"]),
            ..Default::default()
        };
        let report = LocaleSync::sync_with(&cfg, &flaky).unwrap();

        assert_eq!(read_json(&dir.path().join("en.json")), json!({"a": "kaputt"}));
        assert_eq!(report.total_translations, 1);
        assert_eq!(report.failed(), 1);
    }

    #[test]
    fn empty_target_value_is_retranslated() {
        let dir = tempfile::tempdir().unwrap();
        write_json(&dir.path().join("de.json"), json!({"a": "eins", "b": "zwei"}));
        write_json(&dir.path().join("en.json"), json!({"a": "", "b": "two"}));

        LocaleSync::sync_with(&config(dir.path(), vec!["en"]), &Stub::default()).unwrap();

        assert_eq!(
            read_json(&dir.path().join("en.json")),
            json!({"a": "EN:eins", "b": "two"})
        );
    }

    #[test]
    fn unsupported_language_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_json(&dir.path().join("de.json"), json!({"a": "eins"}));
        let stub = Stub {
            unsupported: vec!["tlh"],
            ..Default::default()
        };

        let report =
            LocaleSync::sync_with(&config(dir.path(), vec!["tlh", "de", "en"]), &stub).unwrap();

        assert!(!dir.path().join("tlh.json").exists());
        assert!(dir.path().join("en.json").exists());
        assert_eq!(report.locales.len(), 2);
        assert_eq!(report.locales[0].status, LocaleStatus::Unsupported);
        assert_eq!(report.locales[1].locale, "en");
    }

    #[test]
    fn corrupt_target_starts_over() {
        let dir = tempfile::tempdir().unwrap();
        write_json(&dir.path().join("de.json"), json!({"a": "eins"}));
        fs::write(dir.path().join("en.json"), "{\"a\": ").unwrap();

        LocaleSync::sync_with(&config(dir.path(), vec!["en"]), &Stub::default()).unwrap();

        assert_eq!(read_json(&dir.path().join("en.json")), json!({"a": "EN:eins"}));
    }

    #[test]
    fn namespaced_layout() {
        let dir = tempfile::tempdir().unwrap();
        write_json(&dir.path().join("de/common.json"), json!({"ok": "OK", "cancel": "Abbrechen"}));
        write_json(&dir.path().join("de/home.json"), json!({"hero": {"title": "Willkommen"}}));
        write_json(&dir.path().join("en/common.json"), json!({"ok": "OK"}));

        let mut cfg = config(dir.path(), vec!["en"]);
        cfg.layout = LocaleLayout::Namespaced;
        let report = LocaleSync::sync_with(&cfg, &Stub::default()).unwrap();

        assert_eq!(
            read_json(&dir.path().join("en/common.json")),
            json!({"ok": "OK", "cancel": "EN:Abbrechen"})
        );
        assert_eq!(
            read_json(&dir.path().join("en/home.json")),
            json!({"hero": {"title": "EN:Willkommen"}})
        );
        let namespaces: Vec<_> = report
            .locales
            .iter()
            .map(|l| l.namespace.as_deref())
            .collect();
        assert_eq!(namespaces, vec![Some("common"), Some("home")]);
        assert_eq!(report.total_translations, 2);
    }

    #[test]
    fn missing_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();

        let res = LocaleSync::sync_with(&config(dir.path(), vec!["en"]), &Stub::default());

        assert!(matches!(res, Err(SyncError::SourceMissing(_))));
        assert!(!dir.path().join("en.json").exists());

        let mut cfg = config(dir.path(), vec!["en"]);
        cfg.layout = LocaleLayout::Namespaced;
        let res = LocaleSync::sync_with(&cfg, &Stub::default());
        assert!(matches!(res, Err(SyncError::SourceMissing(_))));
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_json(&dir.path().join("de.json"), json!({"a": "eins"}));
        let mut cfg = config(dir.path(), vec!["en"]);
        cfg.provider = TranslationProvider::LIBRETRANSLATE;

        let res = LocaleSync::sync_with_client(&cfg, |cfg| {
            ProviderClient::from_key_lookup(cfg, |_| None)
        });

        assert!(matches!(
            res,
            Err(SyncError::Config(ConfigError::MissingApiKey("LIBRE_TRANSLATE_API_KEY")))
        ));
        assert!(!dir.path().join("en.json").exists());
    }
}
