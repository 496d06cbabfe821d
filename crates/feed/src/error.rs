//! Error types for the feed pipeline
//!
//! None of these abort a feed run. Adapter failures become empty results,
//! invalid overrides are ignored and records with bad coordinates are dropped.

use crate::record::SourceKind;
use hazardline_geo::GeoError;
use std::fmt;
use thiserror::Error;

/// Result type alias for feed operations
pub type FeedResult<T> = std::result::Result<T, FeedError>;

/// Feed pipeline errors
#[derive(Error, Debug)]
pub enum FeedError {
    /// An adapter could not reach or read its upstream
    #[error("{kind} source fetch failed: {message}")]
    SourceFetchFailure {
        /// Which adapter failed
        kind: SourceKind,
        /// Upstream error text
        message: String,
    },

    /// A radius override that does not parse or is out of bounds
    #[error("invalid radius override '{raw}': {reason}")]
    InvalidRadiusOverride {
        /// The value as supplied
        raw: String,
        /// Why it was rejected
        reason: String,
    },

    /// A coordinate that fails validation
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] GeoError),

    /// One upstream element that did not match its wire shape. The rest
    /// of the source is kept.
    #[error("malformed {kind} record at index {index}: {message}")]
    Malformed {
        /// Which adapter read it
        kind: SourceKind,
        /// Position in the upstream collection
        index: usize,
        /// Decode error text
        message: String,
    },
}

impl FeedError {
    /// Wrap an upstream error as a fetch failure for `kind`
    pub fn source_fetch(kind: SourceKind, err: impl fmt::Display) -> Self {
        Self::SourceFetchFailure {
            kind,
            message: err.to_string(),
        }
    }

    /// Build a malformed-record error for element `index` of `kind`
    pub fn malformed(kind: SourceKind, index: usize, err: impl fmt::Display) -> Self {
        Self::Malformed {
            kind,
            index,
            message: err.to_string(),
        }
    }

    /// Build an invalid radius override error
    pub fn invalid_radius(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRadiusOverride {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Numeric code, in the same scheme as `hazardline_geo::GeoErrorCode`
    pub fn code(&self) -> u32 {
        match self {
            Self::SourceFetchFailure { .. } => 20001,
            Self::InvalidRadiusOverride { .. } => 20002,
            Self::InvalidCoordinate(_) => 20003,
            Self::Malformed { .. } => 20004,
        }
    }
}
