//! `hazardline distance`

use super::print_json;
use crate::OutputFormat;
use anyhow::Result;
use clap::Args;
use hazardline_core::Error;
use hazardline_feed::compute_distance;
use hazardline_geo::{Coordinate, MILES_PER_KM};
use serde::Serialize;

/// Arguments for `distance`
#[derive(Args, Debug)]
pub struct DistanceArgs {
    /// Latitude of the first point
    #[arg(allow_negative_numbers = true)]
    pub lat1: f64,
    /// Longitude of the first point
    #[arg(allow_negative_numbers = true)]
    pub lng1: f64,
    /// Latitude of the second point
    #[arg(allow_negative_numbers = true)]
    pub lat2: f64,
    /// Longitude of the second point
    #[arg(allow_negative_numbers = true)]
    pub lng2: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DistanceReport {
    from: Coordinate,
    to: Coordinate,
    miles: f64,
    kilometres: f64,
}

pub fn run(args: DistanceArgs, format: OutputFormat) -> Result<()> {
    let from = Coordinate::new(args.lat1, args.lng1);
    let to = Coordinate::new(args.lat2, args.lng2);

    let miles =
        compute_distance(&from, &to).map_err(|e| Error::invalid_coordinate(e.to_string()))?;

    match format {
        OutputFormat::Json => print_json(&DistanceReport {
            from,
            to,
            miles,
            kilometres: miles / MILES_PER_KM,
        }),
        OutputFormat::Text => {
            println!("{:.4} mi", miles);
            Ok(())
        }
    }
}
