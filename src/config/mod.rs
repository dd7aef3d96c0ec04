//! Configuration loading, validation, and hot-reloading.
//!
//! Defines the [`ConfigSource`] trait for pluggable config backends and
//! the [`ConfigVersion`] enum for change detection. Submodules provide
//! the data model, validation, CLI/env overrides, and the concrete
//! sources (built-in defaults or a YAML/JSON/TOML file).
//!
//! Precedence, lowest first: built-in defaults, config file, then
//! environment variables and flags (see [`overrides::Overrides`]).

pub mod model;
pub mod overrides;
pub mod sources;
pub mod validation;

use std::path::Path;

use async_trait::async_trait;

use crate::error::RelayError;
use model::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigVersion {
    Hash(String),
}

impl ConfigVersion {
    /// First eight hex characters, for display.
    #[must_use]
    pub fn short(&self) -> &str {
        match self {
            Self::Hash(h) => h.get(..8).unwrap_or(h),
        }
    }
}

// async_trait is required here because ConfigSource is used as Box<dyn ConfigSource>
// and native async fn in traits does not support dyn dispatch.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn load(&self) -> Result<(Config, ConfigVersion), RelayError>;
    async fn has_changed(&self, current: &ConfigVersion) -> Result<bool, RelayError>;

    /// Whether polling this source can ever observe a change.
    fn watchable(&self) -> bool {
        true
    }

    /// File backing this source, if any.
    fn path(&self) -> Option<&Path> {
        None
    }
}
