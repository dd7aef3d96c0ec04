//! `transit-relay health`: check the health of a running instance.
//!
//! Sends a `GET /health` request to the specified URL and displays
//! the response as formatted text or raw JSON.

use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};

use crate::cli::HealthArgs;
use crate::error::RelayError;
use crate::health::HealthResponse;
use crate::server;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

fn request_error(e: impl std::error::Error + Send + Sync + 'static) -> RelayError {
    RelayError::HttpRequest {
        source: Box::new(e),
    }
}

/// GET `<base>/health` and return the raw body of a 2xx answer.
async fn fetch_health(base: &str) -> Result<Bytes, RelayError> {
    let uri: hyper::Uri = format!("{}/health", base.trim_end_matches('/'))
        .parse()
        .map_err(|e: http::uri::InvalidUri| RelayError::UriParse {
            source: Box::new(e),
        })?;

    let request = hyper::Request::get(uri)
        .body(Full::new(Bytes::new()))
        .map_err(request_error)?;

    let response = tokio::time::timeout(
        HEALTH_TIMEOUT,
        server::build_http_client().request(request),
    )
    .await
    .map_err(|_| RelayError::HttpRequest {
        source: format!("health check timed out after {}s", HEALTH_TIMEOUT.as_secs()).into(),
    })?
    .map_err(request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(RelayError::HealthCheckFailed(status));
    }

    Ok(response
        .into_body()
        .collect()
        .await
        .map_err(request_error)?
        .to_bytes())
}

pub async fn execute(args: HealthArgs) -> Result<(), RelayError> {
    let body = fetch_health(&args.url).await?;

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    match serde_json::from_slice::<HealthResponse>(&body) {
        Ok(health) => {
            let uptime = format_uptime(health.uptime_seconds);
            println!("\u{2713} transit-relay is healthy ({})", args.url);
            println!("  version:        {} [{}]", health.version, health.build);
            println!("  uptime:         {uptime}");
            println!("  config source:  {}", health.config.source);
            println!(
                "  config version: {} (loaded {}s ago)",
                health.config.version, health.config.loaded_ago_seconds
            );
            for (name, upstream) in &health.upstreams {
                let key = if upstream.credential_configured {
                    "key set"
                } else {
                    "no key"
                };
                println!("  {name:<14}  {} ({key})", upstream.base_url);
            }
            println!(
                "  requests:       {} proxied, {} fallback, {} rejected",
                health.stats.proxied, health.stats.fallbacks, health.stats.rejected
            );
        }
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{}", String::from_utf8_lossy(&body));
        }
    }

    Ok(())
}

fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::format_uptime;

    #[test]
    fn uptime_formats() {
        assert_eq!(format_uptime(42), "42s");
        assert_eq!(format_uptime(125), "2m 5s");
        assert_eq!(format_uptime(3_725), "1h 2m 5s");
    }
}
