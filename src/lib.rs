//! Transit relay: a local HTTP relay for a transit dashboard.
//!
//! It serves the dashboard's static files and relays `/api/*` calls to
//! three third-party services (Swiftly vehicle positions, OpenWeatherMap,
//! TomTom traffic), attaching API keys server-side so they never reach the
//! browser. When an upstream fails for any reason the caller still gets a
//! 200 with a plausible canned document, marked by `x-relay-source`.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, init, validate, health).
//! - [`config`] -- Configuration loading, validation, overrides, and hot-reloading
//!   via the [`ConfigSource`](config::ConfigSource) trait.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`health`] -- `GET /health` endpoint handler returning runtime diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`middleware`] -- CORS headers and the `OPTIONS` short-circuit.
//! - [`proxy`] -- Path classification, upstream calls with credential
//!   injection, and fallback payloads.
//! - [`server`] -- Axum server setup, shared application state, HTTP client, and
//!   graceful shutdown.
//! - [`static_files`] -- Static file serving for non-API paths.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `file-backends` | All file format backends |
//! | `full` | All features |

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod proxy;
pub mod server;
pub mod static_files;
