use std::{env, process::ExitCode};

use i18n_keysync::{
    LocaleSync, SyncError,
    config::{Config, TranslationProvider, routing::RoutingConfig},
};
use log::error;

const LOCALES_DIR: &str = "src/messages";
const ROUTING_FILE: &str = "src/i18n/routing.ts";

/// `keysync [config.toml]`
///
/// Without a config file the locales are read from a next-intl routing file and
/// translated with DeepL.
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<i18n_keysync::SyncReport, SyncError> {
    let cfg = match env::args().nth(1) {
        Some(path) => Config::from_toml_file(path)?,
        None => {
            let routing = RoutingConfig::from_file(ROUTING_FILE)?;
            Config::new()
                .locales_directory(LOCALES_DIR)
                .routing(&routing)
                .translation_provider(TranslationProvider::DEEPL)
                .build()?
        }
    };

    LocaleSync::sync(cfg)
}
