//! `GET /health` endpoint handler.
//!
//! Returns a [`HealthResponse`] JSON payload containing the server
//! version, uptime, config source metadata, per-upstream credential
//! presence, and cumulative request statistics. Keys are never included.

use std::collections::BTreeMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::config::model::UpstreamKind;
use crate::server::AppState;

pub mod build {
    pub const GIT_SHORT: &str = env!("TRANSIT_RELAY_GIT_SHORT");
    pub const PROFILE: &str = env!("TRANSIT_RELAY_BUILD_PROFILE");
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub build: String,
    pub uptime_seconds: u64,
    pub config: ConfigHealth,
    pub upstreams: BTreeMap<String, UpstreamHealth>,
    pub stats: StatsResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigHealth {
    pub source: String,
    pub version: String,
    pub loaded_ago_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpstreamHealth {
    pub base_url: String,
    pub credential_configured: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub proxied: u64,
    pub fallbacks: u64,
    pub rejected: u64,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (config, source_name, version, loaded_ago) = {
        let loaded = state.config.read().await;
        (
            Arc::clone(&loaded.config),
            loaded.source_name.clone(),
            loaded.version.short().to_string(),
            loaded.loaded_at.elapsed().as_secs(),
        )
    };

    let upstreams = UpstreamKind::ALL
        .iter()
        .map(|&kind| {
            let upstream = config.upstream(kind);
            (
                kind.as_str().to_string(),
                UpstreamHealth {
                    base_url: upstream.base_url.clone(),
                    credential_configured: upstream.credential().is_some(),
                },
            )
        })
        .collect();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build: format!("{} ({})", build::GIT_SHORT, build::PROFILE),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        config: ConfigHealth {
            source: source_name,
            version,
            loaded_ago_seconds: loaded_ago,
        },
        upstreams,
        stats: StatsResponse {
            proxied: state.stats.proxied.load(Ordering::Relaxed),
            fallbacks: state.stats.fallbacks.load(Ordering::Relaxed),
            rejected: state.stats.rejected.load(Ordering::Relaxed),
        },
    })
}
