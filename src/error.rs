//! Unified error types for the relay.
//!
//! Defines [`RelayError`] (the main crate error enum) and
//! [`ValidationError`] for config validation failures. Upstream call
//! failures never surface here: the proxy swallows them and serves the
//! fallback payload instead. What does surface is startup, config, and
//! CLI trouble, plus the rare internal failure that becomes a 500.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub section: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}.{}: {}", self.section, self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RelayError {
    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid upstream URL '{url}': {source}")]
    UpstreamUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to build HTTP message: {0}")]
    HttpBuild(#[from] axum::http::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File already exists: {}", path.display())]
    FileExists { path: PathBuf },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "internal error while handling request");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal server error: {self}"),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display_includes_suggestion() {
        let err = ValidationError {
            section: "upstreams.weather".into(),
            field: "base_url".into(),
            message: "'ftp://x' uses unsupported scheme 'ftp'".into(),
            suggestion: Some("use http or https".into()),
        };
        assert_eq!(
            err.to_string(),
            "  upstreams.weather.base_url: 'ftp://x' uses unsupported scheme 'ftp' (use http or https)"
        );
    }

    #[test]
    fn config_validation_lists_every_error() {
        let make = |field: &str| ValidationError {
            section: "mock".into(),
            field: field.into(),
            message: "bad".into(),
            suggestion: None,
        };
        let err = RelayError::ConfigValidation {
            errors: vec![make("lat"), make("lon")],
        };
        let text = err.to_string();
        assert!(text.contains("mock.lat: bad"));
        assert!(text.contains("mock.lon: bad"));
    }
}
