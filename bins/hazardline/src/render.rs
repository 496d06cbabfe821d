//! Text rendering of a feed

use chrono::Utc;
use hazardline_cli::output::{format_age, format_count, format_distance, Status};
use hazardline_feed::{Feed, FilteredRecord, OriginSource, Severity};
use owo_colors::OwoColorize;

/// Print both sections of a feed
pub fn feed(feed: &Feed) {
    match feed.origin.coordinate {
        Some(c) => {
            let from = match feed.origin.source {
                OriginSource::Profile => "home",
                OriginSource::QueryOverride => "override",
            };
            Status::info(&format!(
                "Within {} mi of {:.3}, {:.3} ({}), {} view",
                feed.origin.radius_miles, c.latitude, c.longitude, from, feed.view
            ));
        }
        None => Status::warning("No location set, showing everything. Set [profile] or pass --lat/--lng"),
    }

    if feed.unavailable {
        Status::error("Feed temporarily unavailable");
    } else if !feed.failed_sources.is_empty() {
        let names: Vec<&str> = feed.failed_sources.iter().map(|k| k.as_str()).collect();
        Status::warning(&format!("Some sources failed: {}", names.join(", ")));
    }

    section("Community reports", &feed.community_reports);
    section("Alerts & news", &feed.alerts_and_news);
}

fn section(title: &str, records: &[FilteredRecord]) {
    Status::header(&format!(
        "{} ({})",
        title,
        format_count(records.len(), "item", "items")
    ));
    if records.is_empty() {
        println!("  {}", "nothing nearby".dimmed());
        return;
    }

    let now = Utc::now();
    for item in records {
        let r = &item.record;
        let distance = item
            .distance_miles
            .map(format_distance)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} {} {}",
            severity_tag(r.severity),
            r.title.bold(),
            format!("[{}]", r.category).cyan()
        );
        println!(
            "    {}  {}  {}",
            r.source_label.dimmed(),
            format_age(r.occurred_at, now).dimmed(),
            distance.dimmed()
        );
        if let Some(link) = &r.external_link {
            println!("    {}", link.underline());
        }
    }
}

fn severity_tag(severity: Option<Severity>) -> String {
    match severity {
        Some(Severity::Extreme) => "●".red().bold().to_string(),
        Some(Severity::Severe) => "●".red().to_string(),
        Some(Severity::Moderate) => "●".yellow().to_string(),
        Some(Severity::Minor) => "●".green().to_string(),
        Some(Severity::Unknown) | None => "○".dimmed().to_string(),
    }
}
