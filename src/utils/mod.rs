use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::warn;
use serde_json::Value;
use thiserror::Error;

use crate::i18n::LocaleDictionary;

pub mod languages;

/// Errors while reading or writing a locale file
#[derive(Error, Debug)]
pub enum LocaleFileError {
    /// File could not be read, created or written
    #[error("io error on `{path}`: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying io error
        #[source]
        source: io::Error,
    },
    /// File content is not valid JSON
    #[error("invalid json in `{path}`: {source}")]
    Json {
        /// File that failed
        path: PathBuf,
        /// Parser error
        #[source]
        source: serde_json::Error,
    },
    /// File is valid JSON but the top level is not an object
    #[error("`{0}` does not contain a json object")]
    NotAnObject(PathBuf),
}

/// `<dir>/<locale>.json` or `<dir>/<locale>/<namespace>.json`
pub fn locale_file_path(locales_dir: &Path, locale: &str, namespace: Option<&str>) -> PathBuf {
    match namespace {
        Some(ns) => locales_dir.join(locale).join(format!("{ns}.json")),
        None => locales_dir.join(format!("{locale}.json")),
    }
}

/// Namespaces are the json files inside the source locale directory, sorted by name
pub fn list_namespaces(locales_dir: &Path, source_locale: &str) -> io::Result<Vec<String>> {
    let mut namespaces = Vec::new();

    for entry in fs::read_dir(locales_dir.join(source_locale))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                namespaces.push(stem.to_string());
            }
        }
    }

    namespaces.sort();
    Ok(namespaces)
}

/// Read a locale file, failing on anything but a json object
pub fn read_locale_file(path: &Path) -> Result<LocaleDictionary, LocaleFileError> {
    let content = fs::read_to_string(path).map_err(|source| LocaleFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(LocaleFileError::NotAnObject(path.to_path_buf())),
        Err(source) => Err(LocaleFileError::Json {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read a target locale file. A missing or corrupt file is an empty dictionary.
pub fn load_target_file(path: &Path) -> LocaleDictionary {
    if !path.exists() {
        return LocaleDictionary::new();
    }

    read_locale_file(path).unwrap_or_else(|e| {
        warn!("{e}, starting from an empty dictionary");
        LocaleDictionary::new()
    })
}

/// Write a locale file as indented json, keeping non-ascii text as is.
///
/// Parent directories are created when missing.
pub fn write_locale_file(path: &Path, data: &LocaleDictionary) -> Result<(), LocaleFileError> {
    let io_err = |source: io::Error| LocaleFileError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, data).map_err(|source| LocaleFileError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)
}
