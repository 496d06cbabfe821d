//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{EarthquakesApi, PostsApi, ProfileApi, WeatherApi};
use crate::error::{ApiError, ApiResult, ErrorContext};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Longest error body echoed into an error message
const MAX_ERROR_BODY: usize = 512;

/// HTTP client shared by every upstream collaborator.
///
/// Each request gets a correlation ID and the configured timeout. There is
/// no retry: a failed request is reported once and the caller decides what
/// an empty result means.
#[derive(Clone)]
pub struct HazardClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl HazardClient {
    /// Create a new client with configuration from `hazardline.toml` and the environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        // Both feeds serve GeoJSON; the posts store serves plain JSON.
        default_headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/geo+json, application/json"),
        );
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ApiError::config("user_agent is not a valid header value"))?;
        default_headers.insert(USER_AGENT, agent);

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access the community posts store
    #[must_use]
    pub fn posts(&self) -> PostsApi {
        PostsApi::new(self.clone())
    }

    /// Access the user profile store
    #[must_use]
    pub fn profile(&self) -> ProfileApi {
        ProfileApi::new(self.clone())
    }

    /// Access the weather alerts feed
    #[must_use]
    pub fn weather(&self) -> WeatherApi {
        WeatherApi::new(self.clone())
    }

    /// Access the earthquake feed
    #[must_use]
    pub fn earthquakes(&self) -> EarthquakesApi {
        EarthquakesApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP methods
    // -------------------------------------------------------------------------

    /// Perform a GET request to an absolute URL
    #[instrument(skip(self), fields(request_id))]
    pub async fn get_url<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        self.execute(Method::GET, url, None).await
    }

    /// Perform an authenticated GET request to an absolute URL
    #[instrument(skip(self, token), fields(request_id))]
    pub async fn get_url_authorized<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
    ) -> ApiResult<T> {
        self.execute(Method::GET, url, Some(token)).await
    }


    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());
        let ctx = ErrorContext {
            request_id: Some(request_id.clone()),
            endpoint: url.to_string(),
            method: method.to_string(),
        };

        let mut request = self
            .inner
            .request(method, url)
            .header(X_REQUEST_ID, &request_id);

        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let start = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!(%ctx, "Request timed out");
                return Err(ApiError::Timeout(self.config.timeout));
            }
            Err(e) => {
                warn!(%ctx, error = %e, "Request failed");
                return Err(ApiError::Request(e));
            }
        };

        let result = self.handle_response(response).await;
        debug!(
            %ctx,
            elapsed_ms = start.elapsed().as_millis(),
            ok = result.is_ok(),
            "Request finished"
        );
        result
    }

    /// Handle HTTP response and deserialize
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await.map_err(ApiError::Request)?;
            serde_json::from_slice(&body).map_err(ApiError::Json)
        } else {
            let mut message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            if message.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| message.is_char_boundary(*i))
                    .unwrap_or(0);
                message.truncate(cut);
            }
            Err(ApiError::api_response(status.as_u16(), message))
        }
    }
}
