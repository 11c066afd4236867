//! HTTP error mapping to RFC 9457 Problem Details.

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::Error;

/// RFC 9457 Problem Details body.
#[derive(Debug, Serialize)]
pub struct Problem {
    /// URI reference identifying the problem type.
    #[serde(rename = "type")]
    pub type_uri: String,
    /// Short summary of the problem type.
    pub title: String,
    pub status: u16,
    /// Explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Status code as an [`axum::http::StatusCode`].
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(self)).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

impl From<Error> for Problem {
    fn from(error: Error) -> Self {
        match error {
            Error::Domain(e) => {
                Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(e.to_string())
            }
            Error::Json(e) => Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "Invalid Payload")
                .with_detail(e.to_string()),
            Error::Unauthorized => Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized")
                .with_detail("invalid webhook passphrase"),
            Error::Database(msg) | Error::Connection(msg) => {
                Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Storage Error").with_detail(msg)
            }
            other => Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                .with_detail(other.to_string()),
        }
    }
}

/// Map a failure to read the request body. Oversized bodies are 413.
#[must_use]
pub fn from_body_rejection(rejection: BytesRejection) -> Problem {
    let status = rejection.status();
    let title = if status == StatusCode::PAYLOAD_TOO_LARGE {
        "Payload Too Large"
    } else {
        "Bad Request"
    };
    Problem::new(status, title).with_detail(rejection.body_text())
}
