//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`WattdeskError`] via `#[from]`. Nothing here is fatal: view models turn
//! every variant into one human-readable line with
//! [`WattdeskError::user_message`].

/// Top-level error crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum WattdeskError {
    /// Input rejected client-side before any network call.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// No usable response (connection refused, timeout, undecodable body).
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered with a non-success status.
    #[error("http error")]
    Http(#[from] HttpError),

    /// The GraphQL endpoint answered 200 with an error list.
    #[error("graphql error")]
    GraphQl(#[from] GraphQlError),

    /// The record source does not offer this operation.
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
}

impl WattdeskError {
    /// Wrap any transport-level failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }

    /// One human-readable line, preferring server-supplied detail over
    /// generic descriptions.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Transport(err) => format!("Network error: {err}"),
            Self::Http(err) => err
                .detail
                .clone()
                .unwrap_or_else(|| format!("Request failed with status {}", err.status)),
            Self::GraphQl(err) => err.message.clone(),
            Self::Unsupported(op) => format!("This page does not support {op}"),
        }
    }
}

/// Client-side validation failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A required input was left empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A numeric input could not be parsed.
    #[error("{field} must be a number")]
    NotANumber { field: String },

    /// A numeric input is below its configured minimum.
    #[error("{field} must be at least {min}")]
    BelowMinimum { field: String, min: f64 },

    /// A form value was written for a key the form does not have.
    #[error("unknown form field {key:?}")]
    UnknownField { key: String },

    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Non-success HTTP answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("HTTP {status}")]
pub struct HttpError {
    /// Response status code.
    pub status: u16,
    /// Structured detail extracted from the response body, if any.
    pub detail: Option<String>,
}

/// Error reported inside a GraphQL response body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct GraphQlError {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_prefer_server_detail_for_http_errors() {
        let err: WattdeskError = HttpError {
            status: 403,
            detail: Some("You do not have permission to perform this action.".to_string()),
        }
        .into();
        assert_eq!(
            err.user_message(),
            "You do not have permission to perform this action."
        );
    }

    #[test]
    fn should_fall_back_to_status_when_detail_missing() {
        let err: WattdeskError = HttpError {
            status: 502,
            detail: None,
        }
        .into();
        assert_eq!(err.user_message(), "Request failed with status 502");
    }

    #[test]
    fn should_use_graphql_message_verbatim() {
        let err: WattdeskError = GraphQlError {
            message: "User is not authenticated".to_string(),
        }
        .into();
        assert_eq!(err.user_message(), "User is not authenticated");
    }

    #[test]
    fn should_describe_transport_failures() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = WattdeskError::transport(io);
        assert_eq!(err.user_message(), "Network error: connection refused");
    }

    #[test]
    fn should_render_validation_errors_for_users() {
        let err: WattdeskError = ValidationError::Required {
            field: "Name".to_string(),
        }
        .into();
        assert_eq!(err.user_message(), "Name is required");
        assert_eq!(
            ValidationError::PasswordMismatch.to_string(),
            "Passwords do not match"
        );
    }
}
