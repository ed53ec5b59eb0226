//! User configuration
//!
//! A small TOML file (`~/.alxconfig` by default) of string values grouped in
//! sections:
//!
//! ```toml
//! [user]
//! email = "me@example.com"
//! ```
//!
//! Only the command-line layer reads it; normalization and generation never do.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name under the home directory
pub const DEFAULT_FILE_NAME: &str = ".alxconfig";

/// Errors from reading, writing or addressing the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read or written
    #[error("io error at {path}: {source}")]
    Io {
        /// Configuration path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File exists but is not a valid configuration
    #[error("invalid configuration file {path}: {source}")]
    Parse {
        /// Configuration path
        path: PathBuf,
        /// TOML error
        #[source]
        source: toml::de::Error,
    },

    /// Configuration could not be serialized
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// `section.key` argument without a section
    #[error("key does not contain a section: {0}")]
    MissingSection(String),

    /// `section.key` argument without a variable name
    #[error("key does not contain a variable name: {0}")]
    MissingVariable(String),

    /// No home directory to put the default file in
    #[error("could not determine the home directory")]
    NoHomeDir,
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A `section.key` address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigKey {
    /// Section name
    pub section: String,
    /// Variable name
    pub key: String,
}

impl std::str::FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut parts = raw.split('.');
        let (Some(section), Some(key), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ConfigError::MissingSection(raw.to_string()));
        };
        if section.is_empty() {
            return Err(ConfigError::MissingSection(raw.to_string()));
        }
        if key.is_empty() {
            return Err(ConfigError::MissingVariable(raw.to_string()));
        }
        Ok(Self {
            section: section.to_string(),
            key: key.to_string(),
        })
    }
}

type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// Sectioned string settings backed by a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserConfig {
    path: PathBuf,
    sections: Sections,
}

impl UserConfig {
    /// Location of the default configuration file
    ///
    /// # Errors
    /// `ConfigError::NoHomeDir` if the home directory is unknown
    pub fn default_path() -> ConfigResult<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_FILE_NAME))
            .ok_or(ConfigError::NoHomeDir)
    }

    /// Load the default configuration file
    ///
    /// # Errors
    /// Same as [`UserConfig::load`]
    pub fn load_default() -> ConfigResult<Self> {
        Self::load(Self::default_path()?)
    }

    /// Load a configuration file, creating an empty one if it is missing
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be created or read
    /// - `ConfigError::Parse` if the content is not valid
    pub fn load(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();

        if !path.exists() {
            tracing::debug!("creating empty configuration at {}", path.display());
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| ConfigError::io_error(parent, e))?;
            }
            fs::write(&path, "").map_err(|e| ConfigError::io_error(&path, e))?;
        }

        let contents = fs::read_to_string(&path).map_err(|e| ConfigError::io_error(&path, e))?;
        let sections: Sections = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path, sections })
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the configuration back to its file
    ///
    /// # Errors
    /// - `ConfigError::Serialize` if serialization fails
    /// - `ConfigError::Io` if the file cannot be written
    pub fn save(&self) -> ConfigResult<()> {
        let contents = toml::to_string(&self.sections)?;
        fs::write(&self.path, contents).map_err(|e| ConfigError::io_error(&self.path, e))
    }

    /// Set a value and save; an empty value removes the key
    ///
    /// # Errors
    /// Any error from [`UserConfig::save`]
    pub fn set(&mut self, section: &str, key: &str, value: &str) -> ConfigResult<()> {
        let entries = self.sections.entry(section.to_string()).or_default();
        if value.is_empty() {
            entries.remove(key);
        } else {
            entries.insert(key.to_string(), value.to_string());
        }
        self.save()
    }

    /// Look up a value
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section)?.get(key).map(String::as_str)
    }

    /// Look up a value with a fallback
    #[must_use]
    pub fn get_or<'a>(&'a self, section: &str, key: &str, default: &'a str) -> &'a str {
        self.get(section, key).unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_section_keys() {
        let key: ConfigKey = "user.email".parse().unwrap();
        assert_eq!(key.section, "user");
        assert_eq!(key.key, "email");

        assert!(matches!("email".parse::<ConfigKey>(), Err(ConfigError::MissingSection(_))));
        assert!(matches!("a.b.c".parse::<ConfigKey>(), Err(ConfigError::MissingSection(_))));
        assert!(matches!(".email".parse::<ConfigKey>(), Err(ConfigError::MissingSection(_))));
        assert!(matches!("user.".parse::<ConfigKey>(), Err(ConfigError::MissingVariable(_))));
    }

    #[test]
    fn key_error_messages() {
        let err = "user.".parse::<ConfigKey>().unwrap_err();
        assert_eq!(err.to_string(), "key does not contain a variable name: user.");
    }
}
