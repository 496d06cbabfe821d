//! Community posts store
//!
//! The store is asked for every post. Radius filtering never happens
//! upstream; `hazardline-feed` does it.

use super::Decoded;
use crate::client::HazardClient;
use crate::error::ApiResult;
use serde::{Deserialize, Deserializer, Serialize};

/// Posts API interface
#[derive(Clone)]
pub struct PostsApi {
    client: HazardClient,
}

impl PostsApi {
    /// Create a new posts API interface
    pub(crate) fn new(client: HazardClient) -> Self {
        Self { client }
    }

    /// Fetch every post. Posts that do not match [`PostDto`] are returned
    /// as rejected rather than failing the call.
    ///
    /// GET {posts_url}
    pub async fn list(&self) -> ApiResult<Decoded<PostDto>> {
        let envelope: PostsEnvelope = self.client.get_url(&self.client.config().posts_url).await?;
        Ok(envelope.into_posts())
    }
}

/// The store answers either with a bare array or wrapped in `{ "data": [...] }`.
/// Any other body, such as `{ "error": "..." }`, is a decode error.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PostsEnvelope {
    /// `[ {...}, ... ]`
    List(Vec<serde_json::Value>),
    /// `{ "success": true, "data": [ ... ] }`
    Wrapped {
        /// The raw posts
        data: Vec<serde_json::Value>,
    },
}

impl PostsEnvelope {
    /// Unwrap and decode each post on its own
    pub fn into_posts(self) -> Decoded<PostDto> {
        match self {
            PostsEnvelope::List(raw) | PostsEnvelope::Wrapped { data: raw } => {
                Decoded::from_values(raw)
            }
        }
    }
}

/// A user-submitted disaster report as stored upstream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostDto {
    /// Document ID (`_id` in the store)
    #[serde(alias = "_id", deserialize_with = "document_id")]
    pub id: String,
    /// Headline
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// Body text
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Disaster type as entered by the reporter
    #[serde(default, rename = "disasterType", alias = "disaster_type", alias = "type")]
    pub disaster_type: Option<String>,
    /// Stored point (GeoJSON, WKT or `{lat, lng}`)
    #[serde(default)]
    pub location: serde_json::Value,
    /// Creation time, RFC 3339
    #[serde(default, rename = "createdAt", alias = "created_at")]
    pub created_at: Option<String>,
    /// Origin label for reposted official alerts
    #[serde(default)]
    pub source: Option<String>,
    /// Link back to the original alert, if any
    #[serde(default, alias = "url", alias = "sourceUrl")]
    pub link: Option<String>,
    /// Free-text severity, if the reporter gave one
    #[serde(default)]
    pub severity: Option<String>,
}

// Document stores hand IDs back as strings, numbers or `{"$oid": ".."}`.
fn document_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Object(ref map) => map
            .get("$oid")
            .and_then(serde_json::Value::as_str)
            .map(String::from)
            .ok_or_else(|| serde::de::Error::custom("object id without $oid")),
        other => Err(serde::de::Error::custom(format!("unsupported id: {other}"))),
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
