//! `transit-relay init`: generate a starter configuration file.
//!
//! Creates a YAML, JSON, or TOML config file with either minimal
//! or fully documented templates. Templates never contain API keys;
//! those come from the environment.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::RelayError;

pub fn execute(args: &InitArgs) -> Result<(), RelayError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("transit-relay.{}", args.format.extension())));

    if output.exists() {
        return Err(RelayError::FileExists { path: output });
    }

    std::fs::write(&output, template(&args.format, args.full))?;
    println!("Created {}", output.display());
    println!("Set SWIFTLY_API_KEY, WEATHERMAP_API_KEY and TOMTOM_API_KEY before starting.");
    Ok(())
}

#[must_use]
pub const fn template(format: &ConfigFormat, full: bool) -> &'static str {
    match (format, full) {
        (ConfigFormat::Yaml, false) => YAML_MINIMAL,
        (ConfigFormat::Yaml, true) => YAML_FULL,
        (ConfigFormat::Json, false) => JSON_MINIMAL,
        (ConfigFormat::Json, true) => JSON_FULL,
        (ConfigFormat::Toml, false) => TOML_MINIMAL,
        (ConfigFormat::Toml, true) => TOML_FULL,
    }
}

const YAML_MINIMAL: &str = r#"# transit-relay config
# API keys are read from SWIFTLY_API_KEY, WEATHERMAP_API_KEY and TOMTOM_API_KEY.

server:
  static_root: "."

mock:
  lat: 34.0522
  lon: -118.2437
  city: "Los Angeles"
"#;

const YAML_FULL: &str = r#"# transit-relay config
#
# All values shown are defaults. An upstream section only needs the
# fields it changes. Keys are best left to the environment
# (SWIFTLY_API_KEY, WEATHERMAP_API_KEY, TOMTOM_API_KEY), which always
# win over values written here. Never put a key in a file that sits
# inside static_root.

server:
  static_root: "."             # Directory served for non-API paths
  timeout: 10000               # Upstream timeout in ms

# Location used by fallback payloads when an upstream fails
mock:
  lat: 34.0522
  lon: -118.2437
  city: "Los Angeles"

upstreams:
  # /api/swiftly/<rest>
  swiftly:
    base_url: "https://api.goswift.ly/real-time"
    auth: { in: header, name: "Authorization" }  # Key sent as this request header
    strip_prefix: "real-time/" # Removed once from <rest> so it is not doubled
    # timeout: 5000            # Per-upstream override

  # /api/weather/<rest> and /api/metro/<rest>
  weather:
    base_url: "https://api.openweathermap.org/data/2.5"
    auth: { in: query, name: "appid" }  # Key appended as this query parameter
    query:
      units: "imperial"        # Added to every call

  # /api/tomtom/<rest> and /api/openai/<rest>
  tomtom:
    base_url: "https://api.tomtom.com/traffic/services/4"
    auth: { in: query, name: "key" }
"#;

const JSON_MINIMAL: &str = r#"{
  "server": {
    "static_root": "."
  },
  "mock": {
    "lat": 34.0522,
    "lon": -118.2437,
    "city": "Los Angeles"
  }
}
"#;

const JSON_FULL: &str = r#"{
  "server": {
    "static_root": ".",
    "timeout": 10000
  },
  "mock": {
    "lat": 34.0522,
    "lon": -118.2437,
    "city": "Los Angeles"
  },
  "upstreams": {
    "swiftly": {
      "base_url": "https://api.goswift.ly/real-time",
      "auth": { "in": "header", "name": "Authorization" },
      "strip_prefix": "real-time/"
    },
    "weather": {
      "base_url": "https://api.openweathermap.org/data/2.5",
      "auth": { "in": "query", "name": "appid" },
      "query": { "units": "imperial" }
    },
    "tomtom": {
      "base_url": "https://api.tomtom.com/traffic/services/4",
      "auth": { "in": "query", "name": "key" }
    }
  }
}
"#;

const TOML_MINIMAL: &str = r#"# transit-relay config
# API keys are read from SWIFTLY_API_KEY, WEATHERMAP_API_KEY and TOMTOM_API_KEY.

[server]
static_root = "."

[mock]
lat = 34.0522
lon = -118.2437
city = "Los Angeles"
"#;

const TOML_FULL: &str = r#"# transit-relay config
#
# All values shown are defaults. An upstream table only needs the keys
# it changes. API keys are best left to the environment
# (SWIFTLY_API_KEY, WEATHERMAP_API_KEY, TOMTOM_API_KEY).

[server]
static_root = "."       # Directory served for non-API paths
timeout = 10000         # Upstream timeout in ms

[mock]
lat = 34.0522
lon = -118.2437
city = "Los Angeles"

[upstreams.swiftly]
base_url = "https://api.goswift.ly/real-time"
auth = { in = "header", name = "Authorization" }
strip_prefix = "real-time/"
# timeout = 5000

[upstreams.weather]
base_url = "https://api.openweathermap.org/data/2.5"
auth = { in = "query", name = "appid" }
query = { units = "imperial" }

[upstreams.tomtom]
base_url = "https://api.tomtom.com/traffic/services/4"
auth = { in = "query", name = "key" }
"#;
