//! Concrete [`ConfigSource`](super::ConfigSource) implementations.
//!
//! Provides file-based sources (YAML, JSON, TOML) gated by feature flags,
//! the [`builtin::BuiltinSource`] used when no file is present, and the
//! [`parse_config_str`] helper for format-specific deserialization.

pub mod builtin;
pub mod file_source;

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::config::model::Config;
use crate::config::ConfigSource;
use crate::error::RelayError;
use file_source::FileSource;

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, RelayError> {
    let parse_err = |source: Box<dyn std::error::Error + Send + Sync>| RelayError::ConfigParse {
        path: path_display.to_string(),
        source,
    };

    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| parse_err(Box::new(e))),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| parse_err(Box::new(e))),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| parse_err(Box::new(e))),

        other => Err(RelayError::UnsupportedFormat(other.to_string())),
    }
}

/// Pick a [`FileSource`] for `path` from its extension.
pub fn file_source_for(path: &Path) -> Result<Box<dyn ConfigSource>, RelayError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let path = path.to_path_buf();

    let source = match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => FileSource::new(path, "yaml", |content| {
            serde_yml::from_str::<Config>(content).map_err(Into::into)
        }),

        #[cfg(feature = "json")]
        "json" => FileSource::new(path, "json", |content| {
            serde_json::from_str::<Config>(content).map_err(Into::into)
        }),

        #[cfg(feature = "toml")]
        "toml" => FileSource::new(path, "toml", |content| {
            toml::from_str::<Config>(content).map_err(Into::into)
        }),

        other => return Err(RelayError::UnsupportedFormat(other.to_string())),
    };

    Ok(Box::new(source))
}

/// Compute a lowercase hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}
