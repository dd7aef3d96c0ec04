//! Config source used when no config file is found: the compiled-in
//! defaults, never changing.

use async_trait::async_trait;

use super::sha256_hex;
use crate::config::model::Config;
use crate::config::{ConfigSource, ConfigVersion};
use crate::error::RelayError;

#[derive(Debug, Default)]
pub struct BuiltinSource;

#[async_trait]
impl ConfigSource for BuiltinSource {
    fn name(&self) -> &'static str {
        "builtin"
    }

    async fn load(&self) -> Result<(Config, ConfigVersion), RelayError> {
        Ok((
            Config::default(),
            ConfigVersion::Hash(sha256_hex(b"builtin")),
        ))
    }

    async fn has_changed(&self, _current: &ConfigVersion) -> Result<bool, RelayError> {
        Ok(false)
    }

    fn watchable(&self) -> bool {
        false
    }
}
