//! Serde data structures for the relay configuration file.
//!
//! Contains [`Config`] (the root), [`ServerConfig`], [`MockLocation`],
//! [`Upstreams`], and [`UpstreamConfig`]. Unknown fields are rejected
//! everywhere for strict parsing. Every
//! section has a default, so an empty file (or no file at all) yields a
//! working relay pointed at the public APIs without credentials.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_UPSTREAM_BODY: usize = 8 * 1024 * 1024;
pub const DEFAULT_LAT: f64 = 34.0522;
pub const DEFAULT_LON: f64 = -118.2437;
pub const DEFAULT_CITY: &str = "Los Angeles";

const fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

const fn default_max_upstream_body() -> usize {
    DEFAULT_MAX_UPSTREAM_BODY
}

fn default_static_root() -> PathBuf {
    PathBuf::from(".")
}

fn is_default_timeout(v: &u64) -> bool {
    *v == default_timeout()
}

fn is_default_max_upstream_body(v: &usize) -> bool {
    *v == default_max_upstream_body()
}

fn is_default_static_root(v: &PathBuf) -> bool {
    *v == default_static_root()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub mock: MockLocation,

    #[serde(default)]
    pub upstreams: Upstreams,
}

impl Config {
    #[must_use]
    pub fn upstream(&self, kind: UpstreamKind) -> &UpstreamConfig {
        match kind {
            UpstreamKind::Swiftly => &self.upstreams.swiftly,
            UpstreamKind::Weather => &self.upstreams.weather,
            UpstreamKind::Tomtom => &self.upstreams.tomtom,
        }
    }

    /// Effective outbound timeout for one upstream, in milliseconds.
    #[must_use]
    pub fn timeout_for(&self, kind: UpstreamKind) -> u64 {
        self.upstream(kind).timeout.unwrap_or(self.server.timeout)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Directory served for every non-API path.
    #[serde(
        default = "default_static_root",
        skip_serializing_if = "is_default_static_root"
    )]
    pub static_root: PathBuf,

    /// Default upstream timeout in milliseconds.
    #[serde(
        default = "default_timeout",
        skip_serializing_if = "is_default_timeout"
    )]
    pub timeout: u64,

    /// Largest upstream response body relayed, in bytes. Anything bigger
    /// is treated as a failed call.
    #[serde(
        default = "default_max_upstream_body",
        skip_serializing_if = "is_default_max_upstream_body"
    )]
    pub max_upstream_body: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            static_root: default_static_root(),
            timeout: default_timeout(),
            max_upstream_body: default_max_upstream_body(),
        }
    }
}

/// Location substituted into fallback payloads.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MockLocation {
    pub lat: f64,
    pub lon: f64,
    pub city: String,
}

impl Default for MockLocation {
    fn default() -> Self {
        Self {
            lat: DEFAULT_LAT,
            lon: DEFAULT_LON,
            city: DEFAULT_CITY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamKind {
    Swiftly,
    Weather,
    Tomtom,
}

impl UpstreamKind {
    pub const ALL: [Self; 3] = [Self::Swiftly, Self::Weather, Self::Tomtom];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Swiftly => "swiftly",
            Self::Weather => "weather",
            Self::Tomtom => "tomtom",
        }
    }
}

impl std::fmt::Display for UpstreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three upstream sections. A section present in the file only
/// needs the fields it changes; everything else keeps the built-in value
/// for that upstream.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Upstreams {
    #[serde(
        default = "UpstreamConfig::swiftly",
        deserialize_with = "swiftly_section"
    )]
    pub swiftly: UpstreamConfig,

    #[serde(
        default = "UpstreamConfig::weather",
        deserialize_with = "weather_section"
    )]
    pub weather: UpstreamConfig,

    #[serde(
        default = "UpstreamConfig::tomtom",
        deserialize_with = "tomtom_section"
    )]
    pub tomtom: UpstreamConfig,
}

impl Default for Upstreams {
    fn default() -> Self {
        Self {
            swiftly: UpstreamConfig::swiftly(),
            weather: UpstreamConfig::weather(),
            tomtom: UpstreamConfig::tomtom(),
        }
    }
}

/// Where the API key goes on the outbound request.
///
/// Written as `{ in: header, name: Authorization }` or
/// `{ in: query, name: appid }`, which reads the same in YAML, JSON and TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(
    tag = "in",
    content = "name",
    rename_all = "lowercase",
    deny_unknown_fields
)]
pub enum Credential {
    /// Sent as the value of the named request header.
    Header(String),
    /// Appended as the named query parameter.
    Query(String),
}

#[derive(Clone, PartialEq, Serialize)]
pub struct UpstreamConfig {
    pub base_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    pub auth: Credential,

    /// Leading path segment the base URL already ends with; removed once
    /// from the incoming path so it is not doubled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_prefix: Option<String>,

    /// Fixed query parameters added to every call.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub query: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// An upstream section as written in a file. Absent fields fall back to
/// the built-in [`UpstreamConfig`] for that upstream.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct UpstreamSection {
    base_url: Option<String>,
    api_key: Option<String>,
    auth: Option<Credential>,
    /// An empty string turns the built-in prefix off.
    strip_prefix: Option<String>,
    /// Replaces the built-in table when present.
    query: Option<BTreeMap<String, String>>,
    timeout: Option<u64>,
}

impl UpstreamSection {
    fn over(self, mut base: UpstreamConfig) -> UpstreamConfig {
        if let Some(base_url) = self.base_url {
            base.base_url = base_url;
        }
        if self.api_key.is_some() {
            base.api_key = self.api_key;
        }
        if let Some(auth) = self.auth {
            base.auth = auth;
        }
        if let Some(prefix) = self.strip_prefix {
            base.strip_prefix = (!prefix.is_empty()).then_some(prefix);
        }
        if let Some(query) = self.query {
            base.query = query;
        }
        if self.timeout.is_some() {
            base.timeout = self.timeout;
        }
        base
    }
}

fn swiftly_section<'de, D: Deserializer<'de>>(d: D) -> Result<UpstreamConfig, D::Error> {
    UpstreamSection::deserialize(d).map(|s| s.over(UpstreamConfig::swiftly()))
}

fn weather_section<'de, D: Deserializer<'de>>(d: D) -> Result<UpstreamConfig, D::Error> {
    UpstreamSection::deserialize(d).map(|s| s.over(UpstreamConfig::weather()))
}

fn tomtom_section<'de, D: Deserializer<'de>>(d: D) -> Result<UpstreamConfig, D::Error> {
    UpstreamSection::deserialize(d).map(|s| s.over(UpstreamConfig::tomtom()))
}

// Hand-written so the API key never reaches a log line.
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("auth", &self.auth)
            .field("strip_prefix", &self.strip_prefix)
            .field("query", &self.query)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl UpstreamConfig {
    #[must_use]
    pub fn swiftly() -> Self {
        Self {
            base_url: "https://api.goswift.ly/real-time".into(),
            api_key: None,
            auth: Credential::Header("Authorization".into()),
            strip_prefix: Some("real-time/".into()),
            query: BTreeMap::new(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn weather() -> Self {
        Self {
            base_url: "https://api.openweathermap.org/data/2.5".into(),
            api_key: None,
            auth: Credential::Query("appid".into()),
            strip_prefix: None,
            query: BTreeMap::from([("units".to_string(), "imperial".to_string())]),
            timeout: None,
        }
    }

    #[must_use]
    pub fn tomtom() -> Self {
        Self {
            base_url: "https://api.tomtom.com/traffic/services/4".into(),
            api_key: None,
            auth: Credential::Query("key".into()),
            strip_prefix: None,
            query: BTreeMap::new(),
            timeout: None,
        }
    }

    /// The configured key, treating an empty string as absent.
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}
