//! REST client.
//!
//! [`ApiClient`] is cheap to clone: the underlying `reqwest::Client` shares
//! its connection pool. A client carries at most one bearer token, attached
//! to every request; signing in produces a new client with
//! [`ApiClient::with_token`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use wattdesk_app::ports::Payload;
use wattdesk_domain::id::RecordId;
use wattdesk_domain::stats::DeviceStats;
use wattdesk_domain::user::{Credentials, TokenPair, User};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::resource::Resource;

/// A list response: either a bare array or a paginated envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Paginated { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            Self::Paginated { results } => results,
            Self::Bare(items) => items,
        }
    }
}

#[derive(Deserialize)]
struct AccessToken {
    access: String,
}

/// Client for the remote REST and GraphQL endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    pub(crate) graphql_url: Arc<str>,
    token: Option<Arc<str>>,
}

impl ApiClient {
    /// Build an unauthenticated client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`] if the HTTP client cannot be built
    /// (for instance when no TLS backend is available).
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ApiError::Request)?;
        Ok(Self {
            http,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            graphql_url: Arc::from(config.graphql_url.as_str()),
            token: None,
        })
    }

    /// The same client, authenticated with `token`.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(Arc::from(token.into()));
        self
    }

    /// The bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{path}", self.base_url);
        self.authorize(self.http.request(method, url))
    }

    pub(crate) fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(ApiError::Request)?;
        let response = check_response(response).await?;
        response.json().await.map_err(ApiError::Request)
    }

    async fn send_empty(builder: RequestBuilder) -> Result<(), ApiError> {
        let response = builder.send().await.map_err(ApiError::Request)?;
        check_response(response).await?;
        Ok(())
    }

    /// List every record of `resource`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] on a non-success answer and
    /// [`ApiError::Request`] when no usable response arrives.
    #[tracing::instrument(skip(self))]
    pub async fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>, ApiError> {
        let envelope: ListEnvelope<T> =
            Self::send(self.request(Method::GET, &resource.collection_path())).await?;
        Ok(envelope.into_items())
    }

    /// Fetch one record.
    ///
    /// # Errors
    ///
    /// Same as [`list`](Self::list).
    #[tracing::instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, resource: Resource, id: &RecordId) -> Result<T, ApiError> {
        Self::send(self.request(Method::GET, &resource.item_path(id))).await
    }

    /// Create a record. The answer body is not read.
    ///
    /// # Errors
    ///
    /// Same as [`list`](Self::list).
    #[tracing::instrument(skip(self, payload))]
    pub async fn create(&self, resource: Resource, payload: &Payload) -> Result<(), ApiError> {
        Self::send_empty(
            self.request(Method::POST, &resource.collection_path())
                .json(payload),
        )
        .await
    }

    /// Partially update a record. The answer body is not read.
    ///
    /// # Errors
    ///
    /// Same as [`list`](Self::list).
    #[tracing::instrument(skip(self, payload))]
    pub async fn update(
        &self,
        resource: Resource,
        id: &RecordId,
        payload: &Payload,
    ) -> Result<(), ApiError> {
        Self::send_empty(
            self.request(Method::PATCH, &resource.item_path(id))
                .json(payload),
        )
        .await
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Same as [`list`](Self::list).
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, resource: Resource, id: &RecordId) -> Result<(), ApiError> {
        Self::send_empty(self.request(Method::DELETE, &resource.item_path(id))).await
    }

    /// Device counts by status.
    ///
    /// # Errors
    ///
    /// Same as [`list`](Self::list).
    pub async fn device_stats(&self) -> Result<DeviceStats, ApiError> {
        Self::send(self.request(Method::GET, "devices/stats/")).await
    }

    /// The signed-in user.
    ///
    /// # Errors
    ///
    /// Same as [`list`](Self::list).
    pub async fn me(&self) -> Result<User, ApiError> {
        Self::send(self.request(Method::GET, "users/me/")).await
    }

    /// Exchange credentials for an access/refresh token pair.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] when the credentials are rejected.
    #[tracing::instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        Self::send(self.request(Method::POST, "auth/token/").json(credentials)).await
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] when the refresh token is rejected.
    pub async fn refresh_token(&self, refresh: &str) -> Result<String, ApiError> {
        let body = serde_json::json!({ "refresh": refresh });
        let token: AccessToken =
            Self::send(self.request(Method::POST, "auth/token/refresh/").json(&body)).await?;
        Ok(token.access)
    }

    /// Check that `token` is still accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] when the token is invalid or expired.
    pub async fn verify_token(&self, token: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "token": token });
        Self::send_empty(self.request(Method::POST, "auth/token/verify/").json(&body)).await
    }
}

/// Pass success responses through; turn anything else into
/// [`ApiError::Status`] with whatever detail the body offers.
pub(crate) async fn check_response(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail = extract_detail(&body);
    tracing::debug!(status = status.as_u16(), ?detail, "request rejected");
    Err(ApiError::Status {
        status: status.as_u16(),
        detail,
    })
}

/// Human-readable detail of an error body: `detail`, then `error`, then
/// field errors flattened as `field: message`.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    for key in ["detail", "error"] {
        if let Some(Value::String(text)) = object.get(key) {
            return Some(text.clone());
        }
    }
    let fields: Vec<String> = object
        .iter()
        .filter_map(|(field, messages)| {
            let text = match messages {
                Value::String(text) => text.clone(),
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(" "),
                _ => return None,
            };
            (!text.is_empty()).then(|| format!("{field}: {text}"))
        })
        .collect();
    (!fields.is_empty()).then(|| fields.join("; "))
}
