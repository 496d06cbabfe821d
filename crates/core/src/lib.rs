//! Core utilities shared by the hazardline crates
//!
//! - **Error handling**: coded errors with context and recovery suggestions
//! - **Configuration**: TOML configuration with environment overrides and validation
//!
//! # Example
//!
//! ```rust,no_run
//! use hazardline_core::config::Config;
//!
//! let config = Config::load(None).expect("config");
//! println!("default radius: {} mi", config.schema.feed.default_radius_miles);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema, FeedConfig, SourcesConfig};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
}
