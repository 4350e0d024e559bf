//! Reads the supported locales out of a routing source file, eg: a next-intl
//! `routing.ts`:
//!
//! ```text
//! export const routing = defineRouting({
//!   locales: ['de', 'en', 'ru'],
//!   defaultLocale: 'de'
//! });
//! ```

use std::{fs, path::Path};

use regex::Regex;

use super::ConfigError;

/// Used when the routing file has no `defaultLocale`
pub const FALLBACK_DEFAULT_LOCALE: &str = "de";

const LOCALES_PATTERN: &str = r"locales\s*:\s*\[([^\]]+)\]";
const LOCALE_ITEM_PATTERN: &str = r#"['"]([A-Za-z]{2,3}(?:-[A-Za-z0-9]+)*)['"]"#;
const DEFAULT_LOCALE_PATTERN: &str =
    r#"defaultLocale\s*:\s*['"]([A-Za-z]{2,3}(?:-[A-Za-z0-9]+)*)['"]"#;

/// Locales declared by a routing file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    /// Every declared locale, in declaration order
    pub locales: Vec<String>,
    /// The source language
    pub default_locale: String,
}

impl RoutingConfig {
    /// Read and parse a routing file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content).and_then(|routing| {
            routing.ok_or_else(|| ConfigError::MissingLocales(path.to_path_buf()))
        })
    }

    /// Parse routing source text. `Ok(None)` when no locales array is present.
    pub fn parse(content: &str) -> Result<Option<Self>, ConfigError> {
        let locales_re = Regex::new(LOCALES_PATTERN)?;
        let item_re = Regex::new(LOCALE_ITEM_PATTERN)?;
        let default_re = Regex::new(DEFAULT_LOCALE_PATTERN)?;

        let Some(array) = locales_re.captures(content) else {
            return Ok(None);
        };

        let locales = item_re
            .captures_iter(&array[1])
            .map(|c| c[1].to_string())
            .collect();

        let default_locale = default_re
            .captures(content)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| FALLBACK_DEFAULT_LOCALE.to_string());

        Ok(Some(Self {
            locales,
            default_locale,
        }))
    }

    /// All locales except the default one
    pub fn target_locales(&self) -> Vec<String> {
        self.locales
            .iter()
            .filter(|l| **l != self.default_locale)
            .cloned()
            .collect()
    }
}
