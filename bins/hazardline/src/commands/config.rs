//! `hazardline config`

use super::print_json;
use crate::OutputFormat;
use anyhow::Result;
use hazardline_cli::output::Status;
use hazardline_core::config::Config;
use serde_json::json;

pub fn run(config: &Config, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&json!({
            "path": config.path,
            "settings": config.schema,
        })),
        OutputFormat::Text => {
            match &config.path {
                Some(path) => Status::info(&format!("Loaded from {}", path)),
                None => Status::info("No config file found, using defaults"),
            }
            println!();
            print!("{}", toml::to_string_pretty(&config.schema)?);
            Ok(())
        }
    }
}
