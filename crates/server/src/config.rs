use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::info;

const DEFAULT_PORT: &str = "3000";
const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_RESUME_FILE: &str = "resume.pdf";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// Directory static assets are served from.
    pub public_dir: PathBuf,
    /// Plain file name of the PDF inside `public_dir`.
    pub resume_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            resume_file: DEFAULT_RESUME_FILE.to_string(),
        }
    }
}

impl Config {
    /// Reads `FOLIO_PORT`, `FOLIO_PUBLIC_DIR` and `FOLIO_RESUME_FILE`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`load`](Config::load) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let resume_file: String = try_load(&lookup, "FOLIO_RESUME_FILE", DEFAULT_RESUME_FILE)?;
        if !is_plain_file_name(&resume_file) {
            return Err(ConfigError::InvalidValue {
                key: "FOLIO_RESUME_FILE".into(),
                value: resume_file,
                reason: "must be a bare file name".into(),
            });
        }
        Ok(Self {
            port: try_load(&lookup, "FOLIO_PORT", DEFAULT_PORT)?,
            public_dir: try_load(&lookup, "FOLIO_PUBLIC_DIR", DEFAULT_PUBLIC_DIR)?,
            resume_file,
        })
    }

    pub fn resume_path(&self) -> PathBuf {
        self.public_dir.join(&self.resume_file)
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    match value.parse() {
        Ok(parsed) => Ok(parsed),
        Err(e) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            reason: e.to_string(),
            value,
        }),
    }
}

/// No separators or parent references. Only visible ASCII and spaces, minus
/// quotes, so the name fits a quoted `Content-Disposition` header value.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| matches!(c, ' '..='~') && !matches!(c, '/' | '\\' | '"'))
}
