//! `hazardline resolve`

use super::{http_client, load_profile, print_json, OriginArgs};
use crate::OutputFormat;
use anyhow::Result;
use clap::Args;
use hazardline_cli::output::Status;
use hazardline_core::config::Config;
use hazardline_feed::location::{resolve, OriginSource};
use hazardline_feed::RadiusBounds;

/// Arguments for `resolve`
#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub origin: OriginArgs,
}

/// Print the origin a feed run would use, without fetching anything
/// beyond the profile.
pub async fn run(config: &Config, args: ResolveArgs, format: OutputFormat) -> Result<()> {
    let client = http_client(config, args.origin.token.as_deref())?;
    let profile = load_profile(&client, config).await;
    let query = args.origin.query();
    let bounds = RadiusBounds::from(&config.schema.feed);

    let origin = resolve(profile.as_ref(), query.as_ref(), &bounds);

    if format == OutputFormat::Json {
        return print_json(&origin);
    }

    Status::header("Origin");
    match origin.coordinate {
        Some(c) => {
            let from = match origin.source {
                OriginSource::Profile => "profile",
                OriginSource::QueryOverride => "query override",
            };
            println!("  location  {:.4}, {:.4} ({})", c.latitude, c.longitude, from);
        }
        None => println!("  location  none (feed is not filtered)"),
    }
    println!(
        "  radius    {} mi (allowed {}-{})",
        origin.radius_miles, bounds.min, bounds.max
    );
    Ok(())
}
