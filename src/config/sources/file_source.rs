//! Generic async file-based config source with SHA256 change detection.
//!
//! [`FileSource`] implements [`ConfigSource`] for any file format by
//! accepting a deserialization function at construction time. It reads
//! the file through Tokio, validates the result, and hashes the raw
//! content for version tracking.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::sha256_hex;
use crate::config::model::Config;
use crate::config::validation::validate;
use crate::config::{ConfigSource, ConfigVersion};
use crate::error::RelayError;

type Deserializer = fn(&str) -> Result<Config, Box<dyn std::error::Error + Send + Sync>>;

pub struct FileSource {
    path: PathBuf,
    name: &'static str,
    deserialize: Deserializer,
}

impl FileSource {
    #[must_use]
    pub fn new(path: PathBuf, name: &'static str, deserialize: Deserializer) -> Self {
        Self {
            path,
            name,
            deserialize,
        }
    }

    async fn read_content(&self) -> Result<String, RelayError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RelayError::ConfigFileNotFound {
                    path: self.path.clone(),
                }
            } else {
                RelayError::Io(e)
            }
        })
    }
}

#[async_trait]
impl ConfigSource for FileSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    async fn load(&self) -> Result<(Config, ConfigVersion), RelayError> {
        let content = self.read_content().await?;

        let config = (self.deserialize)(&content).map_err(|e| RelayError::ConfigParse {
            path: self.path.display().to_string(),
            source: e,
        })?;

        if let Err(errors) = validate(&config) {
            return Err(RelayError::ConfigValidation { errors });
        }

        Ok((config, ConfigVersion::Hash(sha256_hex(content.as_bytes()))))
    }

    async fn has_changed(&self, current: &ConfigVersion) -> Result<bool, RelayError> {
        let content = self.read_content().await?;
        let hash = sha256_hex(content.as_bytes());
        Ok(*current != ConfigVersion::Hash(hash))
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn detects_content_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.json");
        std::fs::write(&path, r#"{"server": {"timeout": 3000}}"#).unwrap();

        let source = crate::config::sources::file_source_for(&path).unwrap();
        let (config, version) = source.load().await.unwrap();
        assert_eq!(config.server.timeout, 3000);
        assert!(!source.has_changed(&version).await.unwrap());

        std::fs::write(&path, r#"{"server": {"timeout": 4000}}"#).unwrap();
        assert!(source.has_changed(&version).await.unwrap());
    }

    #[tokio::test]
    async fn missing_file_is_reported_with_path() {
        let path = std::path::Path::new("/nonexistent/relay.json");
        let source = crate::config::sources::file_source_for(path).unwrap();
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, RelayError::ConfigFileNotFound { .. }));
    }

    #[tokio::test]
    async fn invalid_values_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.json");
        std::fs::write(&path, r#"{"mock": {"lat": 123.0, "lon": 0.0, "city": "Nowhere"}}"#)
            .unwrap();

        let source = crate::config::sources::file_source_for(&path).unwrap();
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, RelayError::ConfigValidation { .. }));
    }
}
