//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// beatglow - audio-reactive MQTT lighting engine
#[derive(Parser, Debug)]
#[command(
    name = "beatglow",
    author,
    version,
    about = "Audio-reactive MQTT lighting engine",
    long_about = "Listens to the microphone, detects beats and their dominant \n\
                  frequency, and drives configured MQTT lights in real time: \n\
                  reactive colour cycling or timed flashes, per-device frequency \n\
                  ranges and rate limits."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "BEATGLOW_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "BEATGLOW_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the audio-to-lights pipeline
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "config.toml", env = "BEATGLOW_CONFIG")]
    pub config: PathBuf,

    /// Override MQTT broker host from configuration
    #[arg(long, env = "MQTT_HOST")]
    pub host: Option<String>,

    /// Override MQTT broker port from configuration
    #[arg(long, env = "MQTT_PORT")]
    pub port: Option<u16>,

    /// Run duration in seconds (0 = until interrupted)
    #[arg(long, default_value = "0", env = "BEATGLOW_DURATION")]
    pub duration: u64,

    /// Log device commands instead of publishing to the broker
    #[arg(long)]
    pub dry_run: bool,

    /// Beat event channel capacity
    #[arg(long, default_value = "32", env = "BEATGLOW_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "BEATGLOW_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show per-device frequency ranges
    #[arg(long)]
    pub ranges: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}
