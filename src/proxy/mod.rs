//! Request dispatch for everything except `/health`.
//!
//! [`relay_handler`] is the Axum fallback. It classifies the path
//! ([`routing`]), serves static files, rejects unknown API prefixes, and
//! relays known ones through the upstream adapter ([`upstream`]). Any
//! upstream failure is logged and answered with the canned document
//! from [`fallback`], still with status 200.

pub mod fallback;
pub mod headers;
pub mod routing;
pub mod upstream;

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::error::RelayError;
use crate::server::AppState;
use crate::static_files;
use headers::Source;
use routing::{ApiRoute, Dispatch};

pub async fn relay_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
) -> Result<Response, RelayError> {
    let uri = request.uri().clone();
    let path = uri.path();

    match routing::classify(path) {
        Dispatch::Static => {
            let config = state.snapshot().await;
            Ok(static_files::serve(
                &config.server.static_root,
                state.config_file.as_deref(),
                request,
            )
            .await)
        }
        Dispatch::UnknownApi(rest) => {
            state.stats.rejected.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(client = %addr.ip(), path = %path, "unknown API endpoint");
            Ok((
                StatusCode::NOT_FOUND,
                format!("API endpoint not found: {rest}"),
            )
                .into_response())
        }
        Dispatch::Api(route) => {
            let correlation_id = request
                .headers()
                .get(headers::CORRELATION_ID)
                .and_then(|v| v.to_str().ok())
                .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

            tracing::info!(
                correlation_id = %correlation_id,
                client = %addr.ip(),
                method = %request.method(),
                upstream = %route.upstream,
                segment = route.segment,
                "API request received"
            );

            relay_api(&state, route, uri.query(), &correlation_id).await
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
async fn relay_api(
    state: &AppState,
    route: ApiRoute<'_>,
    query: Option<&str>,
    correlation_id: &str,
) -> Result<Response, RelayError> {
    let config = state.snapshot().await;
    let kind = route.upstream;
    let upstream_config = config.upstream(kind);
    let timeout = Duration::from_millis(config.timeout_for(kind));

    let start = Instant::now();
    let outcome = match upstream::build_request(upstream_config, route.rest, query) {
        Ok(request) => {
            tracing::debug!(
                correlation_id = %correlation_id,
                url = %request.redacted_url(),
                "calling upstream"
            );
            upstream::fetch(
                &state.http_client,
                request,
                timeout,
                config.server.max_upstream_body,
            )
            .await
        }
        Err(e) => Err(upstream::UpstreamFailure::from(e)),
    };
    let latency_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(response) => {
            state.stats.proxied.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                correlation_id = %correlation_id,
                upstream = %kind,
                bytes = response.body.len(),
                latency_ms,
                "upstream responded"
            );
            headers::relay_response(
                response.content_type,
                response.body,
                Source::Upstream,
                correlation_id,
            )
        }
        Err(failure) => {
            state.stats.fallbacks.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                correlation_id = %correlation_id,
                upstream = %kind,
                error = %failure,
                latency_ms,
                "upstream failed, serving fallback payload"
            );
            let payload = fallback::payload(kind, &config.mock, fallback::unix_now());
            headers::relay_response(
                HeaderValue::from_static("application/json"),
                serde_json::to_vec(&payload)?.into(),
                Source::Fallback,
                correlation_id,
            )
        }
    }
}
