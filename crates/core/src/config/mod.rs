//! Configuration loading and schema definitions
//!
//! Settings come from `hazardline.toml` (or `--config`), then `HAZARDLINE_*`
//! environment variables.

mod loader;
mod schema;

pub use loader::{
    Config, ENV_EARTHQUAKES_URL, ENV_POSTS_URL, ENV_PROFILE_URL, ENV_TIMEOUT_SECS, ENV_WEATHER_URL,
};
pub use schema::*;
