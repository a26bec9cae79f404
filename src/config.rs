use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GauthError, Result};
use crate::utils::validate_digits;

const KEYCHAIN_FILE_NAME: &str = ".gauth";
const SETTINGS_DIR_NAME: &str = "gauth";
const SETTINGS_FILE_NAME: &str = "config.toml";
pub const DEFAULT_DIGITS: u32 = 6;

/// Optional user settings, read from `<config dir>/gauth/config.toml`.
///
/// ```toml
/// keychain = "/home/me/secrets/gauth"
/// digits = 8
/// ```
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub keychain: Option<PathBuf>,
    pub digits: Option<u32>,
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    /// A missing settings file yields the defaults.
    pub fn load(path: &Path) -> Result<Settings> {
        let config_error = |reason: String| GauthError::Config {
            path: path.to_path_buf(),
            reason,
        };

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Settings::default()),
            Err(err) => return Err(config_error(err.to_string())),
        };

        let settings: Settings = toml::from_str(&contents).map_err(|e| config_error(e.to_string()))?;
        if let Some(digits) = settings.digits {
            validate_digits(digits)?;
        }
        Ok(settings)
    }

    pub fn default_digits(&self) -> u32 {
        self.digits.unwrap_or(DEFAULT_DIGITS)
    }

    /// `--keychain` wins over the settings file, which wins over `$HOME/.gauth`.
    pub fn resolve_keychain(&self, flag: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = flag.or(self.keychain.as_deref()) {
            return Ok(path.to_path_buf());
        }
        dirs::home_dir()
            .map(|home| home.join(KEYCHAIN_FILE_NAME))
            .ok_or_else(|| GauthError::Usage(String::from("unable to find home directory")))
    }
}

/// The single operation one invocation performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Add {
        name: String,
        digits: u32,
        hotp: bool,
        key: Option<String>,
    },
    List,
    Get {
        name: String,
    },
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub keychain: PathBuf,
    pub operation: Operation,
}
