//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, init, validate, health), and their associated
//! argument structs. Running with no subcommand starts the relay with the
//! top-level flags. Every flag has an environment variable equivalent for
//! container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::overrides::Overrides;

#[derive(Parser)]
#[command(
    name = "transit-relay",
    version,
    about = "Local relay for transit, weather and traffic APIs",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        transit-relay                          Serve ./ on port 8002\n  \
        transit-relay init                     Create a starter config\n  \
        transit-relay run -c relay.yaml        Start with a specific config"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay server (default)
    Run(Box<RunArgs>),

    /// Generate a starter config file
    Init(InitArgs),

    /// Validate a config file without starting
    Validate(ValidateArgs),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args, Debug, Clone)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        transit-relay run                                 Auto-detect config\n  \
        transit-relay run -c relay.yaml                   Specific config file\n  \
        transit-relay run -p 8080 --root ./public --pretty  Local dev mode")]
pub struct RunArgs {
    /// Config file path (.yaml, .json, .toml)
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 8002)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Directory served for non-API paths
    #[arg(short, long, env = "STATIC_ROOT")]
    pub root: Option<PathBuf>,

    // -- Credentials --
    /// Swiftly API key (sent as the Authorization header)
    #[arg(
        long,
        env = "SWIFTLY_API_KEY",
        hide_env_values = true,
        help_heading = "Credentials"
    )]
    pub swiftly_api_key: Option<String>,

    /// OpenWeatherMap API key (sent as `appid`)
    #[arg(
        long,
        env = "WEATHERMAP_API_KEY",
        hide_env_values = true,
        help_heading = "Credentials"
    )]
    pub weathermap_api_key: Option<String>,

    /// TomTom API key (sent as `key`)
    #[arg(
        long,
        env = "TOMTOM_API_KEY",
        hide_env_values = true,
        help_heading = "Credentials"
    )]
    pub tomtom_api_key: Option<String>,

    // -- Mock location --
    /// Latitude used by fallback payloads
    #[arg(
        long,
        env = "DEFAULT_LAT",
        allow_negative_numbers = true,
        help_heading = "Mock location"
    )]
    pub default_lat: Option<f64>,

    /// Longitude used by fallback payloads
    #[arg(
        long,
        env = "DEFAULT_LON",
        allow_negative_numbers = true,
        help_heading = "Mock location"
    )]
    pub default_lon: Option<f64>,

    /// City name used by the weather fallback
    #[arg(long, env = "DEFAULT_CITY", help_heading = "Mock location")]
    pub default_city: Option<String>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Upstream timeout in milliseconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_MS", help_heading = "Tuning")]
    pub timeout: Option<u64>,

    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 1_048_576,
        help_heading = "Tuning"
    )]
    pub max_body: usize,

    /// Config file refresh interval in seconds
    #[arg(
        long,
        env = "POLL_INTERVAL_SECS",
        default_value_t = 30,
        help_heading = "Tuning"
    )]
    pub poll_interval: u64,
}

impl RunArgs {
    /// Flag and environment values that sit on top of the loaded config.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            swiftly_api_key: self.swiftly_api_key.clone(),
            weathermap_api_key: self.weathermap_api_key.clone(),
            tomtom_api_key: self.tomtom_api_key.clone(),
            default_lat: self.default_lat,
            default_lon: self.default_lon,
            default_city: self.default_city.clone(),
            static_root: self.root.clone(),
            timeout: self.timeout,
        }
    }
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        transit-relay init                           Quick start config (yaml)\n  \
        transit-relay init --full                    Every option, commented\n  \
        transit-relay init -f toml -o relay.toml     TOML format")]
pub struct InitArgs {
    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub format: ConfigFormat,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Include full documentation as comments
    #[arg(long)]
    pub full: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = "transit-relay.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:8002")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_runs_with_defaults() {
        let cli = Cli::try_parse_from(["transit-relay"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.max_body, 1_048_576);
        assert!(cli.run.config.is_none());
    }

    #[test]
    fn negative_longitude_parses() {
        let cli = Cli::try_parse_from([
            "transit-relay",
            "run",
            "--default-lat",
            "40.7",
            "--default-lon",
            "-74.0",
        ])
        .unwrap();
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run subcommand");
        };
        let overrides = args.overrides();
        assert_eq!(overrides.default_lat, Some(40.7));
        assert_eq!(overrides.default_lon, Some(-74.0));
    }

    #[test]
    fn init_defaults_to_yaml() {
        let cli = Cli::try_parse_from(["transit-relay", "init"]).unwrap();
        let Some(Commands::Init(args)) = cli.command else {
            panic!("expected init subcommand");
        };
        assert_eq!(args.format.extension(), "yaml");
        assert!(!args.full);
    }
}
