//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for values that
//! would make the relay misbehave at request time: malformed upstream
//! base URLs, zero timeouts, bad credential names, and fallback
//! coordinates outside the globe. Returns a list of [`ValidationError`]
//! values with per-field suggestions.

use axum::http::HeaderName;
use url::Url;

use super::model::{Config, Credential, UpstreamConfig, UpstreamKind};
use crate::error::ValidationError;

/// Validate an upstream base URL. Returns `Ok(())` or a human-readable error.
pub fn validate_base_url(url: &str) -> Result<(), String> {
    let parsed = Url::parse(url).map_err(|_| format!("'{url}' is not a valid URL"))?;
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(format!(
            "unsupported scheme '{scheme}' (expected http or https)"
        ));
    }
    if parsed.query().is_some() {
        return Err("base URL must not carry a query string".into());
    }
    Ok(())
}

fn validate_coordinate(value: f64, limit: f64) -> Result<(), String> {
    if !value.is_finite() || value.abs() > limit {
        return Err(format!("{value} is outside [-{limit}, {limit}]"));
    }
    Ok(())
}

fn validate_upstream(kind: UpstreamKind, upstream: &UpstreamConfig, errors: &mut Vec<ValidationError>) {
    let section = format!("upstreams.{kind}");
    let mut push = |field: &str, message: String, suggestion: Option<String>| {
        errors.push(ValidationError {
            section: section.clone(),
            field: field.into(),
            message,
            suggestion,
        });
    };

    if let Err(msg) = validate_base_url(&upstream.base_url) {
        let suggestion = msg
            .contains("query string")
            .then(|| "move fixed parameters to the 'query' table".to_string());
        push("base_url", msg, suggestion);
    }

    match &upstream.auth {
        Credential::Header(name) => {
            if name.parse::<HeaderName>().is_err() {
                push("auth.name", format!("'{name}' is not a valid header name"), None);
            }
        }
        Credential::Query(name) => {
            if name.is_empty() {
                push("auth.name", "query parameter name cannot be empty".into(), None);
            }
        }
    }

    if let Some(prefix) = &upstream.strip_prefix {
        if prefix.starts_with('/') {
            push(
                "strip_prefix",
                "prefix is matched after the route segment and cannot start with '/'".into(),
                Some(format!("did you mean '{}'?", prefix.trim_start_matches('/'))),
            );
        }
    }

    if upstream.timeout == Some(0) {
        push("timeout", "timeout must be greater than zero".into(), None);
    }
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.timeout == 0 {
        errors.push(ValidationError {
            section: "server".into(),
            field: "timeout".into(),
            message: "timeout must be greater than zero".into(),
            suggestion: Some("the relay default is 10000 ms".into()),
        });
    }

    if config.server.max_upstream_body == 0 {
        errors.push(ValidationError {
            section: "server".into(),
            field: "max_upstream_body".into(),
            message: "upstream body limit must be greater than zero".into(),
            suggestion: Some("the relay default is 8388608 bytes (8 MiB)".into()),
        });
    }

    if config.server.static_root.as_os_str().is_empty() {
        errors.push(ValidationError {
            section: "server".into(),
            field: "static_root".into(),
            message: "static root cannot be empty".into(),
            suggestion: Some("use '.' for the working directory".into()),
        });
    }

    for (field, value, limit) in [("lat", config.mock.lat, 90.0), ("lon", config.mock.lon, 180.0)] {
        if let Err(message) = validate_coordinate(value, limit) {
            errors.push(ValidationError {
                section: "mock".into(),
                field: field.into(),
                message,
                suggestion: None,
            });
        }
    }

    if config.mock.city.trim().is_empty() {
        errors.push(ValidationError {
            section: "mock".into(),
            field: "city".into(),
            message: "city cannot be empty".into(),
            suggestion: None,
        });
    }

    for kind in UpstreamKind::ALL {
        validate_upstream(kind, config.upstream(kind), &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let mut lines = vec![format!(
        "  fallback location: {} ({}, {})",
        config.mock.city, config.mock.lat, config.mock.lon
    )];
    lines.push(format!(
        "  static root: {}\n",
        config.server.static_root.display()
    ));

    for kind in UpstreamKind::ALL {
        let upstream = config.upstream(kind);
        let credential = match &upstream.auth {
            Credential::Header(name) => format!("header {name}"),
            Credential::Query(name) => format!("query {name}="),
        };
        let key_state = if upstream.credential().is_some() {
            "set"
        } else {
            "not set"
        };
        lines.push(format!("  {kind}  -> {}", upstream.base_url));
        lines.push(format!("    credential: {credential} (key {key_state})"));
        lines.push(format!("    timeout: {}ms", config.timeout_for(kind)));
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}
