use crate::{
    classify::Classifier,
    entry::EntryKind,
    errors::{FileOperation, IoError},
    extensions::ExtensionTable,
};
use indexmap::IndexMap;
use miette::Diagnostic;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "sprout.toml";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("I/O error within config domain")]
    #[diagnostic(code(sprout::config::io))]
    Io(#[from] IoError),

    #[error("Unable to parse toml file at '{path}': {source}")]
    #[diagnostic(code(sprout::config::parse_toml), help("Review toml file"))]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Classification settings read from `sprout.toml`.
///
/// ```toml
/// extensions = [".js", ".rs"]
/// extra_extensions = [".proto"]
///
/// [overrides]
/// "Dockerfile" = "file"
/// "v1.0" = "folder"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Replaces the built-in extension table when present.
    pub extensions: Option<Vec<String>>,
    #[serde(default)]
    pub extra_extensions: Vec<String>,
    #[serde(default)]
    pub overrides: IndexMap<String, EntryKind>,
}
impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::ReadConfig, path.to_path_buf(), error))?;

        toml::from_str(&content).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `explicit` if given, else `sprout.toml` in `directory` if it exists,
    /// else the defaults.
    pub fn discover(explicit: Option<&Path>, directory: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            log::debug!("loading config from: {}", path.display());
            return Self::from_file(path);
        }

        match directory.map(|dir| dir.join(CONFIG_FILE_NAME)) {
            Some(candidate) if candidate.is_file() => {
                log::debug!("loading config from: {}", candidate.display());
                Self::from_file(candidate)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn classifier(&self) -> Classifier {
        let mut table = match &self.extensions {
            Some(extensions) => {
                let mut table = ExtensionTable::new();
                table.extend(extensions);
                table
            }
            None => ExtensionTable::default(),
        };
        table.extend(&self.extra_extensions);

        Classifier::new(table, self.overrides.clone())
    }
}
