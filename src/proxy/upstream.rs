//! Upstream adapter: URL shaping, credential injection, and the
//! outbound call.
//!
//! [`build_request`] turns the trailing API path and client query into
//! the upstream URL. [`fetch`] performs the GET and reports every way it
//! can go wrong as an [`UpstreamFailure`]; the caller decides what to do
//! with it (the handler always substitutes the fallback payload).

use std::time::Duration;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use url::Url;

use super::headers::build_upstream_headers;
use crate::config::model::{Credential, UpstreamConfig};
use crate::error::RelayError;
use crate::server::HttpClient;

const REDACTED: &str = "REDACTED";

#[derive(Debug)]
pub struct UpstreamRequest {
    pub url: Url,
    pub headers: HeaderMap,
    /// Query parameter holding the key, if the key went into the URL.
    secret_param: Option<String>,
}

impl UpstreamRequest {
    /// The target URL with any credential query value masked, for logs.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        let Some(param) = &self.secret_param else {
            return self.url.to_string();
        };

        let pairs: Vec<(String, String)> = self
            .url
            .query_pairs()
            .map(|(k, v)| {
                let value = if k == param.as_str() {
                    REDACTED.to_string()
                } else {
                    v.into_owned()
                };
                (k.into_owned(), value)
            })
            .collect();

        let mut shown = self.url.clone();
        shown.query_pairs_mut().clear().extend_pairs(pairs);
        shown.to_string()
    }
}

#[derive(Debug)]
pub struct UpstreamResponse {
    pub content_type: HeaderValue,
    pub body: Bytes,
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamFailure {
    #[error("could not build request: {0}")]
    Request(#[from] RelayError),

    #[error("upstream returned {0}")]
    Status(StatusCode),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("body read error: {0}")]
    Body(String),

    #[error("response body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Join `base_url` and the trailing path, then merge the client query,
/// the fixed extra parameters, and the query credential into one query
/// string.
pub fn build_request(
    upstream: &UpstreamConfig,
    rest: &str,
    query: Option<&str>,
) -> Result<UpstreamRequest, RelayError> {
    let rest = upstream
        .strip_prefix
        .as_deref()
        .and_then(|prefix| rest.strip_prefix(prefix))
        .unwrap_or(rest);

    let mut raw = format!("{}/{}", upstream.base_url.trim_end_matches('/'), rest);
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        raw.push('?');
        raw.push_str(q);
    }

    let mut url = Url::parse(&raw).map_err(|source| RelayError::UpstreamUrl {
        url: upstream.base_url.clone(),
        source,
    })?;

    let key_pair = match (&upstream.auth, upstream.credential()) {
        (Credential::Query(param), Some(key)) => Some((param.as_str(), key)),
        _ => None,
    };

    if !upstream.query.is_empty() || key_pair.is_some() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in &upstream.query {
            pairs.append_pair(name, value);
        }
        if let Some((name, value)) = key_pair {
            pairs.append_pair(name, value);
        }
    }

    Ok(UpstreamRequest {
        url,
        headers: build_upstream_headers(upstream)?,
        secret_param: key_pair.map(|(name, _)| name.to_string()),
    })
}

/// GET the upstream, buffering at most `max_body` bytes of its response.
pub async fn fetch(
    client: &HttpClient,
    request: UpstreamRequest,
    timeout: Duration,
    max_body: usize,
) -> Result<UpstreamResponse, UpstreamFailure> {
    let mut builder = hyper::Request::builder()
        .method(Method::GET)
        .uri(request.url.as_str());
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    let outbound = builder
        .body(Full::new(Bytes::new()))
        .map_err(|e| UpstreamFailure::Request(RelayError::HttpBuild(e)))?;

    let call = async {
        let response = client
            .request(outbound)
            .await
            .map_err(|e| UpstreamFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamFailure::Status(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));

        let body = Limited::new(response.into_body(), max_body)
            .collect()
            .await
            .map_err(|e| {
                if e.is::<LengthLimitError>() {
                    UpstreamFailure::TooLarge { limit: max_body }
                } else {
                    UpstreamFailure::Body(e.to_string())
                }
            })?
            .to_bytes();

        Ok::<_, UpstreamFailure>(UpstreamResponse { content_type, body })
    };

    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| UpstreamFailure::Timeout(timeout))?
}
