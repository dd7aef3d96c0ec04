//! Outbound request headers and the relay's response envelope.
//!
//! [`build_upstream_headers`] produces the fixed identity headers plus
//! the credential header when the upstream takes its key that way. The
//! key value is marked sensitive so it is masked in `Debug` output.
//! [`relay_response`] wraps a body for the caller; only the content type
//! crosses over from the upstream, nothing else.

use axum::body::Body;
use axum::http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;
use bytes::Bytes;

use crate::config::model::{Credential, UpstreamConfig};
use crate::error::RelayError;

pub const RELAY_USER_AGENT: &str = "LA-Transit-App/1.0";
pub const RELAY_SOURCE: &str = "x-relay-source";
pub const CORRELATION_ID: &str = "x-correlation-id";

/// Where the body of an API response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Upstream,
    Fallback,
}

impl Source {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upstream => "upstream",
            Self::Fallback => "fallback",
        }
    }
}

pub fn build_upstream_headers(upstream: &UpstreamConfig) -> Result<HeaderMap, RelayError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(RELAY_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let (Credential::Header(name), Some(key)) = (&upstream.auth, upstream.credential()) {
        let name: HeaderName = name.parse().map_err(|e| RelayError::HttpRequest {
            source: Box::new(e),
        })?;
        let mut value = HeaderValue::from_str(key).map_err(|e| RelayError::HttpRequest {
            source: Box::new(e),
        })?;
        value.set_sensitive(true);
        headers.insert(name, value);
    }

    Ok(headers)
}

pub fn relay_response(
    content_type: HeaderValue,
    body: Bytes,
    source: Source,
    correlation_id: &str,
) -> Result<Response, RelayError> {
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(RELAY_SOURCE, source.as_str())
        .header(CORRELATION_ID, correlation_id)
        .body(Body::from(body))?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_credential_is_attached_and_sensitive() {
        let mut upstream = UpstreamConfig::swiftly();
        upstream.api_key = Some("swiftly-key".into());

        let headers = build_upstream_headers(&upstream).unwrap();
        let auth = headers.get("authorization").unwrap();
        assert_eq!(auth, "swiftly-key");
        assert!(auth.is_sensitive());
        assert_eq!(headers.get(USER_AGENT).unwrap(), RELAY_USER_AGENT);
    }

    #[test]
    fn query_credential_adds_no_header() {
        let mut upstream = UpstreamConfig::weather();
        upstream.api_key = Some("owm-key".into());

        let headers = build_upstream_headers(&upstream).unwrap();
        assert_eq!(headers.len(), 2);
        assert!(headers.values().all(|v| v != "owm-key"));
    }

    #[test]
    fn missing_key_skips_credential_header() {
        let headers = build_upstream_headers(&UpstreamConfig::swiftly()).unwrap();
        assert!(headers.get("authorization").is_none());
    }

    #[test]
    fn key_with_newline_is_rejected() {
        let mut upstream = UpstreamConfig::swiftly();
        upstream.api_key = Some("bad\nkey".into());
        assert!(build_upstream_headers(&upstream).is_err());
    }

    #[test]
    fn response_carries_source_marker() {
        let response = relay_response(
            HeaderValue::from_static("application/json"),
            Bytes::from_static(b"{}"),
            Source::Fallback,
            "cid-1",
        )
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(RELAY_SOURCE).unwrap(), "fallback");
        assert_eq!(response.headers().get(CORRELATION_ID).unwrap(), "cid-1");
    }
}
