//! Error types and the HTTP status classifier.

use serde::Deserialize;
use thiserror::Error;

use crate::http::Response;

/// Result alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors raised while talking to the tenant API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The bearer token was missing, expired or revoked.
    #[error("Login again. The stored token for this tenant was rejected (401)")]
    Unauthorized,
    /// The token is valid but lacks the entitlement for the operation.
    #[error(
        "forbidden: the API client or user is not entitled to manage {resource} (403); run the command with --entitlements to list what it needs"
    )]
    Forbidden {
        /// Resource label.
        resource: &'static str,
    },
    /// The server rejected the request body or parameters.
    #[error("bad request: {message_id}: {description}")]
    BadRequest {
        /// Server message identifier, e.g. `CSIAH0001E`.
        message_id: String,
        /// Server message description.
        description: String,
    },
    /// The addressed resource does not exist.
    #[error("{resource} not found")]
    NotFound {
        /// Resource label.
        resource: &'static str,
    },
    /// Any other non-success status.
    #[error("request failed with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body as text.
        body: String,
    },
    /// The request never produced a response.
    #[error("{method} {url} failed")]
    Transport {
        /// HTTP method.
        method: &'static str,
        /// Target URL.
        url: String,
        /// Underlying transport error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A response body did not match the expected shape.
    #[error("failed to decode {resource} response")]
    Decode {
        /// Resource label.
        resource: &'static str,
        /// Source serde error.
        source: serde_json::Error,
    },
    /// A typed payload could not be turned into a request body.
    #[error("failed to encode {resource} request")]
    Encode {
        /// Resource label.
        resource: &'static str,
        /// Source serde error.
        source: serde_json::Error,
    },
    /// The tenant or a derived endpoint was not a usable URL.
    #[error("invalid URL '{input}'")]
    InvalidUrl {
        /// Offending input.
        input: String,
        /// Parse failure.
        source: url::ParseError,
    },
    /// The tenant URL cannot carry a path.
    #[error("URL '{url}' cannot be used as an API base")]
    InvalidBase {
        /// Offending URL.
        url: String,
    },
    /// The server accepted a create but did not return an identifier.
    #[error("created {resource} but the response carried no identifier")]
    MissingIdentifier {
        /// Resource label.
        resource: &'static str,
    },
    /// The operation does not exist for this resource.
    #[error("{operation} is not supported for {resource}")]
    Unsupported {
        /// Operation name.
        operation: &'static str,
        /// Resource label.
        resource: &'static str,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerMessage {
    message_id: Option<String>,
    message_description: Option<String>,
    // SCIM endpoints report errors as {"status": "...", "detail": "..."}.
    scim_type: Option<String>,
    detail: Option<String>,
}

/// Map a non-success response to an [`ApiError`].
#[must_use]
pub fn classify(response: &Response, resource: &'static str) -> ApiError {
    match response.status {
        401 => ApiError::Unauthorized,
        403 => ApiError::Forbidden { resource },
        404 => ApiError::NotFound { resource },
        400 => {
            let body = response.text();
            match serde_json::from_slice::<ServerMessage>(&response.body) {
                Ok(message) => ApiError::BadRequest {
                    message_id: message
                        .message_id
                        .or(message.scim_type)
                        .unwrap_or_else(|| "400".to_string()),
                    description: message
                        .message_description
                        .or(message.detail)
                        .unwrap_or_else(|| body.trim().to_string()),
                },
                Err(_) => ApiError::BadRequest {
                    message_id: "400".to_string(),
                    description: body.trim().to_string(),
                },
            }
        }
        status => ApiError::Status {
            status,
            body: response.text().trim().to_string(),
        },
    }
}
