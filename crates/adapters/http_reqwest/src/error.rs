//! HTTP adapter error types.

use wattdesk_domain::error::{GraphQlError, HttpError, WattdeskError};

/// Errors specific to the HTTP adapter.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No usable response: connection, timeout or body decoding failed.
    #[error("request failed")]
    Request(#[source] reqwest::Error),

    /// The REST API answered with a non-success status.
    #[error("HTTP {status}")]
    Status { status: u16, detail: Option<String> },

    /// The GraphQL endpoint answered with a non-success status.
    #[error("GraphQL request failed ({status})")]
    GraphQlStatus { status: u16 },

    /// The GraphQL endpoint reported errors in a success response.
    #[error("{message}")]
    GraphQl { message: String },

    /// The GraphQL response had neither data nor errors.
    #[error("GraphQL response contained no data")]
    MissingData,

    /// The token file could not be read or written.
    #[error("token file error")]
    TokenFile(#[source] std::io::Error),
}

impl From<ApiError> for WattdeskError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Request(inner) => Self::transport(inner),
            ApiError::Status { status, detail } => HttpError { status, detail }.into(),
            ApiError::GraphQlStatus { status } => HttpError {
                status,
                detail: Some(format!("GraphQL request failed ({status})")),
            }
            .into(),
            ApiError::GraphQl { message } => GraphQlError { message }.into(),
            other @ ApiError::MissingData => GraphQlError {
                message: other.to_string(),
            }
            .into(),
            ApiError::TokenFile(inner) => Self::transport(inner),
        }
    }
}
