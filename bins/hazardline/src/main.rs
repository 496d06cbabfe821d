//! hazardline - nearby disaster reports, weather alerts and earthquakes
//!
//! Builds one feed from the community posts store, the weather service and
//! the earthquake catalogue, filtered to a home location and radius.

use clap::{Parser, Subcommand, ValueEnum};
use hazardline_core::config::Config;
use hazardline_core::error::exit_codes;
use hazardline_telemetry::TelemetryConfig;
use owo_colors::OwoColorize;
use std::process::ExitCode;

mod commands;
mod render;

use commands::{config as config_cmd, distance, feed, resolve};

/// Nearby disaster feed
#[derive(Parser)]
#[command(name = "hazardline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    /// Path to hazardline.toml (default: search the current directory)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable
    Text,
    /// JSON with camelCase keys
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Compact,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the feed around the resolved origin
    Feed(feed::FeedArgs),

    /// Great-circle distance in miles between two points
    Distance(distance::DistanceArgs),

    /// Show which origin and radius a feed would use
    Resolve(resolve::ResolveArgs),

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref());

    let logging = match &config {
        Ok(c) => c.schema.logging.clone(),
        Err(_) => Default::default(),
    };
    let telemetry = TelemetryConfig {
        log_level: if cli.verbose {
            "debug".to_string()
        } else {
            logging.level
        },
        json: match cli.log_format {
            Some(LogFormat::Json) => true,
            Some(LogFormat::Compact) => false,
            None => logging.json,
        },
        ..TelemetryConfig::default()
    };
    if let Err(e) = hazardline_telemetry::init_with_config(telemetry) {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => return exit_with(&e.into(), cli.format),
    };

    let result = match cli.command {
        Commands::Feed(args) => feed::run(&config, args, cli.format).await,
        Commands::Distance(args) => distance::run(args, cli.format),
        Commands::Resolve(args) => resolve::run(&config, args, cli.format).await,
        Commands::Config => config_cmd::run(&config, cli.format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => exit_with(&e, cli.format),
    }
}

/// Report an error and map it to an exit code. Coded errors keep their own
/// code; anything else is a plain failure. In JSON mode coded errors are
/// written to stderr as a report object.
fn exit_with(err: &anyhow::Error, format: OutputFormat) -> ExitCode {
    let code = match err.downcast_ref::<hazardline_core::Error>() {
        Some(coded) => {
            match format {
                OutputFormat::Json => match serde_json::to_string(&coded.to_report()) {
                    Ok(json) => eprintln!("{}", json),
                    Err(_) => hazardline_cli::output::Status::report(coded),
                },
                OutputFormat::Text => hazardline_cli::output::Status::report(coded),
            }
            coded.exit_code()
        }
        None => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            exit_codes::FAILURE
        }
    };
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
