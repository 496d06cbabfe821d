//! User profile store

use crate::client::HazardClient;
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};

/// Profile API interface
#[derive(Clone)]
pub struct ProfileApi {
    client: HazardClient,
}

impl ProfileApi {
    /// Create a new profile API interface
    pub(crate) fn new(client: HazardClient) -> Self {
        Self { client }
    }

    /// Fetch the profile belonging to the configured token
    ///
    /// GET {profile_url} with `Authorization: Bearer <token>`
    pub async fn me(&self) -> ApiResult<ProfileDto> {
        let token = self
            .client
            .config()
            .token
            .clone()
            .ok_or_else(|| ApiError::MissingCredential("profile".into()))?;
        self.fetch(&token).await
    }

    /// Fetch the profile belonging to an explicit token
    pub async fn fetch(&self, token: &str) -> ApiResult<ProfileDto> {
        let envelope: ProfileEnvelope = self
            .client
            .get_url_authorized(&self.client.config().profile_url, token)
            .await?;
        Ok(envelope.into_profile())
    }
}

/// The store answers either with the profile or wrapped in `{ "user": {...} }`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProfileEnvelope {
    /// `{ "user": { ... } }`
    Wrapped {
        /// The profile
        user: ProfileDto,
    },
    /// `{ ... }`
    Bare(ProfileDto),
}

impl ProfileEnvelope {
    /// Unwrap to the profile
    pub fn into_profile(self) -> ProfileDto {
        match self {
            ProfileEnvelope::Wrapped { user } | ProfileEnvelope::Bare(user) => user,
        }
    }
}

/// The location-related part of a user profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileDto {
    /// User ID
    #[serde(default, alias = "_id", alias = "userId")]
    pub id: Option<serde_json::Value>,
    /// Role (`user`, `ngo`, `moderator`, `admin`)
    #[serde(default)]
    pub role: Option<String>,
    /// Stored home point; `(0, 0)` means not set
    #[serde(default)]
    pub location: serde_json::Value,
    /// Alert radius in miles; sometimes stored as a string
    #[serde(default, rename = "alertRadius", alias = "radius", alias = "alert_radius")]
    pub alert_radius: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_profile() {
        let json = r#"{"user": {"_id": "u1", "role": "ngo",
            "location": {"type": "Point", "coordinates": [-75.0, 40.0]},
            "alertRadius": 25}}"#;
        let profile = serde_json::from_str::<ProfileEnvelope>(json)
            .unwrap()
            .into_profile();
        assert_eq!(profile.role.as_deref(), Some("ngo"));
        assert_eq!(profile.alert_radius, Some(serde_json::json!(25)));
    }

    #[test]
    fn test_bare_profile_without_location() {
        let json = r#"{"userId": "u2", "radius": "40"}"#;
        let profile = serde_json::from_str::<ProfileEnvelope>(json)
            .unwrap()
            .into_profile();
        assert!(profile.location.is_null());
        assert_eq!(profile.alert_radius, Some(serde_json::json!("40")));
    }

    #[tokio::test]
    async fn test_me_without_token_is_missing_credential() {
        let client = HazardClient::with_config(crate::ClientConfig::default()).unwrap();
        let err = client.profile().me().await.unwrap_err();
        assert!(matches!(err, ApiError::MissingCredential(_)));
    }
}
