//! `transit-relay run`: start the relay server.
//!
//! Loads configuration (explicit file, auto-detected file, or built-in
//! defaults), layers environment and flag overrides on top, starts the
//! Axum HTTP server with graceful shutdown, and spawns a background
//! refresh loop when the source is a file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cli::RunArgs;
use crate::config::model::UpstreamKind;
use crate::config::overrides::{load_effective, Overrides};
use crate::config::sources::{self, builtin::BuiltinSource};
use crate::config::ConfigSource;
use crate::error::RelayError;
use crate::logging;
use crate::server::{self, AppState, LoadedConfig};

const AUTO_DETECT: [&str; 4] = [
    "transit-relay.yaml",
    "transit-relay.yml",
    "transit-relay.json",
    "transit-relay.toml",
];

pub async fn execute(args: RunArgs) -> Result<(), RelayError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let source = resolve_source(args.config.as_deref()).await?;
    let overrides = args.overrides();
    let (config, version) = load_effective(source.as_ref(), &overrides).await?;

    for kind in UpstreamKind::ALL {
        let upstream = config.upstream(kind);
        if upstream.credential().is_none() {
            tracing::warn!(
                upstream = %kind,
                "no API key configured, requests will be sent without a credential"
            );
        }
    }

    let config_file = match source.path() {
        Some(path) => Some(tokio::fs::canonicalize(path).await?),
        None => None,
    };

    let static_root = config.server.static_root.clone();
    let state = Arc::new(
        AppState::new(
            LoadedConfig::new(config, version, source.name()),
            server::build_http_client(),
        )
        .with_config_file(config_file),
    );

    // Dropping shutdown_tx closes the channel and stops the refresh loop
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let refresh_handle = if source.watchable() {
        let refresh_state = Arc::clone(&state);
        let poll_interval = args.poll_interval.max(1);
        Some(tokio::spawn(async move {
            config_refresh_loop(refresh_state, source, overrides, poll_interval, shutdown_rx).await;
        }))
    } else {
        None
    };

    let router = server::build_router(state, args.max_body);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        static_root = %static_root.display(),
        "transit-relay started"
    );

    let graceful_shutdown = async move {
        server::shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    };

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(graceful_shutdown)
    .await?;

    if let Some(handle) = refresh_handle {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "config refresh task failed");
        }
    }

    tracing::info!("transit-relay stopped");
    Ok(())
}

async fn resolve_source(explicit: Option<&Path>) -> Result<Box<dyn ConfigSource>, RelayError> {
    if let Some(path) = explicit {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(RelayError::ConfigFileNotFound {
                path: path.to_path_buf(),
            });
        }
        return sources::file_source_for(path);
    }

    for name in AUTO_DETECT {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return sources::file_source_for(&path);
        }
    }

    tracing::info!("no config file found, using built-in defaults and environment");
    Ok(Box::new(BuiltinSource))
}

async fn config_refresh_loop(
    state: Arc<AppState>,
    source: Box<dyn ConfigSource>,
    overrides: Overrides,
    interval_secs: u64,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await; // Skip first immediate tick

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = shutdown.changed() => {
                tracing::debug!("config refresh loop shutting down");
                return;
            }
        }

        let current_version = state.config.read().await.version.clone();

        match source.has_changed(&current_version).await {
            Ok(true) => {
                tracing::info!(source = source.name(), "config change detected, reloading");
                match load_effective(source.as_ref(), &overrides).await {
                    Ok((config, version)) => {
                        let short = version.short().to_string();
                        let mut loaded = state.config.write().await;
                        loaded.config = Arc::new(config);
                        loaded.version = version;
                        loaded.loaded_at = Instant::now();
                        drop(loaded);
                        tracing::info!(version = %short, "config reloaded");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "config reload failed, keeping current config");
                    }
                }
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(error = %e, "config change check failed");
            }
        }
    }
}
