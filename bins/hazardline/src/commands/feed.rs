//! `hazardline feed`

use super::{http_client, load_profile, print_json, OriginArgs};
use crate::render;
use crate::OutputFormat;
use anyhow::Result;
use clap::Args;
use hazardline_cli::output::{format_duration, Status};
use hazardline_cli::progress;
use hazardline_core::config::Config;
use hazardline_core::Error;
use hazardline_feed::{DisasterType, FeedView, HttpFeedService};
use hazardline_telemetry::metrics;
use std::time::Instant;

/// Arguments for `feed`
#[derive(Args, Debug)]
pub struct FeedArgs {
    #[command(flatten)]
    pub origin: OriginArgs,

    /// dashboard (5 per section), list (everything) or map (only plottable)
    #[arg(long, default_value = "dashboard")]
    pub view: FeedView,

    /// Only community reports of these types (repeatable)
    #[arg(long = "category", value_name = "TYPE")]
    pub categories: Vec<DisasterType>,

    /// Print collected metrics to stderr afterwards
    #[arg(long)]
    pub metrics: bool,
}

/// Build and print the feed. Exits with "feed unavailable" when every
/// source failed, after printing the (empty) feed.
pub async fn run(config: &Config, args: FeedArgs, format: OutputFormat) -> Result<()> {
    let client = http_client(config, args.origin.token.as_deref())?;
    let profile = load_profile(&client, config).await;
    let query = args.origin.query();

    let service = HttpFeedService::from_client(client, &config.schema.feed);

    let spinner = progress::spinner("Fetching reports, alerts and earthquakes...");
    let start = Instant::now();
    let feed = service
        .get_feed_view(profile.as_ref(), query.as_ref(), args.view, &args.categories)
        .await;
    progress::finish(&spinner);

    match format {
        OutputFormat::Json => print_json(&feed)?,
        OutputFormat::Text => {
            render::feed(&feed);
            if !feed.unavailable {
                println!();
                Status::success(&format!("Built in {}", format_duration(start.elapsed())));
            }
        }
    }

    if args.metrics {
        eprintln!("{}", serde_json::to_string_pretty(&metrics().export_json())?);
    }

    if feed.unavailable {
        return Err(Error::feed_unavailable().into());
    }
    Ok(())
}
