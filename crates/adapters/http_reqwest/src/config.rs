//! Remote service configuration.

use serde::Deserialize;

/// Where the remote service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// REST base URL, without the trailing collection path.
    pub base_url: String,
    /// GraphQL endpoint URL.
    pub graphql_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            graphql_url: "http://localhost:8000/graphql/".to_string(),
            timeout_secs: 10,
        }
    }
}
