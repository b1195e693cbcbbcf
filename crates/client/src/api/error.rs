//! Error types for the backend API client.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the backend API.
///
/// The structured variants carry the human-readable server message, the HTTP
/// status, and the raw JSON body for inspection. Nothing here is retried;
/// retry is always a deliberate user action.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad credentials or an expired/invalid token.
    #[error("authentication failed: {message}")]
    Authentication {
        message: String,
        status: u16,
        body: serde_json::Value,
    },

    /// The authenticated user's role does not permit the operation.
    #[error("permission denied: {message}")]
    Authorization {
        message: String,
        status: u16,
        body: serde_json::Value,
    },

    /// The backend rejected a malformed entity payload.
    #[error("invalid request: {message}")]
    Validation {
        message: String,
        status: u16,
        body: serde_json::Value,
    },

    /// No resource at the requested path.
    #[error("not found: {message}")]
    NotFound {
        message: String,
        status: u16,
        body: serde_json::Value,
    },

    /// The backend failed internally (5xx).
    #[error("server error: {message}")]
    Server {
        message: String,
        status: u16,
        body: serde_json::Value,
    },

    /// Transport failure: the backend was never reached, or the connection
    /// broke mid-request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the JSON we expected.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Error body shape used by the backend.
///
/// Auth/permission middleware answers with `msg`; resource routes answer
/// with `message`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
}

impl ApiError {
    /// Classify a non-success response.
    ///
    /// `auth_endpoint` distinguishes a 400 from the login/register endpoints
    /// (bad credentials) from a 400 on an entity route (validation failure).
    #[must_use]
    pub fn from_response(status: StatusCode, body: serde_json::Value, auth_endpoint: bool) -> Self {
        let message = server_message(&body, status);
        let code = status.as_u16();

        match status {
            StatusCode::UNAUTHORIZED => Self::Authentication {
                message,
                status: code,
                body,
            },
            StatusCode::BAD_REQUEST if auth_endpoint => Self::Authentication {
                message,
                status: code,
                body,
            },
            StatusCode::BAD_REQUEST => Self::Validation {
                message,
                status: code,
                body,
            },
            StatusCode::FORBIDDEN => Self::Authorization {
                message,
                status: code,
                body,
            },
            StatusCode::NOT_FOUND => Self::NotFound {
                message,
                status: code,
                body,
            },
            _ => Self::Server {
                message,
                status: code,
                body,
            },
        }
    }

    /// The HTTP status, when the backend answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. }
            | Self::Authorization { status, .. }
            | Self::Validation { status, .. }
            | Self::NotFound { status, .. }
            | Self::Server { status, .. } => Some(*status),
            Self::Http(_) | Self::Parse(_) => None,
        }
    }
}

/// Extract the server's message from an error body.
fn server_message(body: &serde_json::Value, status: StatusCode) -> String {
    serde_json::from_value::<ErrorBody>(body.clone())
        .ok()
        .and_then(|parsed| parsed.msg.or(parsed.message))
        .unwrap_or_else(|| format!("request failed with status {status}"))
}
