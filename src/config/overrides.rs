//! Environment and command-line overrides layered on top of the loaded
//! config.
//!
//! Applied after every load, including hot reloads, so a key supplied
//! through `SWIFTLY_API_KEY` survives edits to the config file.

use std::path::PathBuf;

use super::model::Config;
use super::validation::validate;
use super::{ConfigSource, ConfigVersion};
use crate::error::RelayError;

#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub swiftly_api_key: Option<String>,
    pub weathermap_api_key: Option<String>,
    pub tomtom_api_key: Option<String>,
    pub default_lat: Option<f64>,
    pub default_lon: Option<f64>,
    pub default_city: Option<String>,
    pub static_root: Option<PathBuf>,
    pub timeout: Option<u64>,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        let keys = [
            (&mut config.upstreams.swiftly.api_key, &self.swiftly_api_key),
            (&mut config.upstreams.weather.api_key, &self.weathermap_api_key),
            (&mut config.upstreams.tomtom.api_key, &self.tomtom_api_key),
        ];
        for (slot, value) in keys {
            if let Some(key) = value.as_ref().filter(|k| !k.is_empty()) {
                *slot = Some(key.clone());
            }
        }

        if let Some(lat) = self.default_lat {
            config.mock.lat = lat;
        }
        if let Some(lon) = self.default_lon {
            config.mock.lon = lon;
        }
        if let Some(city) = &self.default_city {
            config.mock.city.clone_from(city);
        }
        if let Some(root) = &self.static_root {
            config.server.static_root.clone_from(root);
        }
        if let Some(timeout) = self.timeout {
            config.server.timeout = timeout;
        }
    }
}

/// Load from `source`, layer `overrides` on top, and validate the result.
pub async fn load_effective(
    source: &dyn ConfigSource,
    overrides: &Overrides,
) -> Result<(Config, ConfigVersion), RelayError> {
    let (mut config, version) = source.load().await?;
    overrides.apply(&mut config);
    validate(&config).map_err(|errors| RelayError::ConfigValidation { errors })?;
    Ok((config, version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::sources::builtin::BuiltinSource;

    #[test]
    fn only_present_values_override() {
        let mut config = Config::default();
        config.upstreams.tomtom.api_key = Some("from-file".into());

        let overrides = Overrides {
            swiftly_api_key: Some("from-env".into()),
            tomtom_api_key: Some(String::new()),
            default_city: Some("Pasadena".into()),
            ..Overrides::default()
        };
        overrides.apply(&mut config);

        assert_eq!(config.upstreams.swiftly.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.upstreams.tomtom.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.upstreams.weather.api_key, None);
        assert_eq!(config.mock.city, "Pasadena");
        assert_eq!(config.mock.lat, crate::config::model::DEFAULT_LAT);
    }

    #[tokio::test]
    async fn overrides_are_validated_after_apply() {
        let overrides = Overrides {
            default_lat: Some(123.0),
            ..Overrides::default()
        };
        let err = load_effective(&BuiltinSource, &overrides).await.unwrap_err();
        assert!(err.to_string().contains("mock.lat"), "{err}");
    }

    #[tokio::test]
    async fn builtin_with_env_key() {
        let overrides = Overrides {
            weathermap_api_key: Some("wkey".into()),
            ..Overrides::default()
        };
        let (config, _) = load_effective(&BuiltinSource, &overrides).await.unwrap();
        assert_eq!(config.upstreams.weather.credential(), Some("wkey"));
        assert_eq!(config.upstreams.swiftly.credential(), None);
    }
}
