//! Error handling.

use axum::{
    extract::rejection::JsonRejection,
    http::header,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use thiserror::Error;
use tracing::{event, Level};

/// Water quality analysis server error type
///
/// This type encapsulates the various errors that may occur.
/// Each variant may result in a different API error response.
#[derive(Debug, Error)]
pub enum HydroscopeError {
    /// Error reading the dataset file
    #[error("failed to read dataset file")]
    DatasetIo(#[from] std::io::Error),

    /// Error parsing the dataset file as CSV
    #[error("failed to parse dataset file as CSV")]
    DatasetCsv(#[from] csv::Error),

    /// A required column is absent from the dataset header
    #[error("dataset is missing required column {name}")]
    DatasetColumnMissing { name: &'static str },

    /// Error deserialising JSON request data
    #[error("request data is not valid")]
    RequestDataJsonRejection(#[from] JsonRejection),

    /// Error validating request data (single error)
    #[error("request data is not valid")]
    RequestDataValidationSingle(#[from] validator::ValidationError),

    /// Error validating request data (multiple errors)
    #[error("request data is not valid")]
    RequestDataValidation(#[from] validator::ValidationErrors),

    /// Error sending a request to the narrative service
    #[error("failed to contact the narrative service")]
    UpstreamRequest(#[from] reqwest::Error),

    /// The narrative service returned a non-success status
    #[error("narrative service returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The narrative service returned a response with no usable candidate
    /// text
    #[error("narrative service response contained no candidate text")]
    UpstreamEmpty,

    /// Error rendering the PDF report
    #[error("failed to render PDF report: {detail}")]
    ReportRender { detail: String },
}

impl IntoResponse for HydroscopeError {
    /// Convert from a `HydroscopeError` into an [axum::response::Response].
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}

/// Body of error response
///
/// Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorBody {
    /// Main error message
    message: String,

    /// Optional list of causes
    #[serde(skip_serializing_if = "Option::is_none")]
    caused_by: Option<Vec<String>>,
}

impl ErrorBody {
    /// Return a new ErrorBody
    ///
    /// # Arguments
    ///
    /// * `error`: The error that occurred
    fn new<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        let message = error.to_string();
        let mut caused_by = None;
        let mut current = error.source();
        while let Some(source) = current {
            let mut causes: Vec<String> = caused_by.unwrap_or_default();
            causes.push(source.to_string());
            caused_by = Some(causes);
            current = source.source();
        }
        // Remove duplicate entries.
        if let Some(caused_by) = caused_by.as_mut() {
            caused_by.dedup()
        }
        ErrorBody { message, caused_by }
    }
}

/// A response to send in error cases
///
/// Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorResponse {
    /// HTTP status of the response
    #[serde(skip)]
    status: StatusCode,

    /// Response body
    error: ErrorBody,
}

impl ErrorResponse {
    /// Return a new ErrorResponse
    ///
    /// # Arguments
    ///
    /// * `status`: HTTP status of the response
    /// * `error`: The error that occurred. This will be formatted into a suitable `ErrorBody`
    fn new<E>(status: StatusCode, error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        ErrorResponse {
            status,
            error: ErrorBody::new(error),
        }
    }

    /// Return a 400 bad request ErrorResponse
    fn bad_request<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// Return a 502 bad gateway ErrorResponse
    fn bad_gateway<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::BAD_GATEWAY, error)
    }

    /// Return a 500 internal server error ErrorResponse
    fn internal_server_error<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl From<HydroscopeError> for ErrorResponse {
    /// Convert from a `HydroscopeError` into an `ErrorResponse`.
    fn from(error: HydroscopeError) -> Self {
        let response = match &error {
            // Bad request
            HydroscopeError::RequestDataJsonRejection(_)
            | HydroscopeError::RequestDataValidationSingle(_)
            | HydroscopeError::RequestDataValidation(_) => Self::bad_request(&error),

            // Upstream failures. A non-success upstream status is forwarded
            // as-is where it maps to a valid status code.
            HydroscopeError::UpstreamStatus { status, body: _ } => {
                let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
                Self::new(status, &error)
            }
            HydroscopeError::UpstreamRequest(_) | HydroscopeError::UpstreamEmpty => {
                Self::bad_gateway(&error)
            }

            // Internal server error. The dataset variants can only occur at
            // startup but are mapped for completeness.
            HydroscopeError::DatasetIo(_)
            | HydroscopeError::DatasetCsv(_)
            | HydroscopeError::DatasetColumnMissing { name: _ }
            | HydroscopeError::ReportRender { detail: _ } => Self::internal_server_error(&error),
        };

        // Log server errors.
        if response.status.is_server_error() {
            event!(Level::ERROR, "{}", error.to_string());
            let mut current = error.source();
            while let Some(source) = current {
                event!(Level::ERROR, "Caused by: {}", source.to_string());
                current = source.source();
            }
        }

        response
    }
}

impl IntoResponse for ErrorResponse {
    /// Convert from an `ErrorResponse` into an `axum::response::Response`.
    ///
    /// Renders the response as JSON.
    fn into_response(self) -> Response {
        let json_body = serde_json::to_string_pretty(&self);
        match json_body {
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialise error response: {}", err),
            )
                .into_response(),
            Ok(json_body) => (
                self.status,
                [(&header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string())],
                json_body,
            )
                .into_response(),
        }
    }
}
