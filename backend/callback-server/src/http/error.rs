use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    message: String,
    code: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: ErrorDetail {
                message: self.message,
                code: format!("{}", self.status.as_u16()),
            },
        });
        (self.status, body).into_response()
    }
}

/// A gateway callback whose payload could not be read. Never surfaced to the
/// gateway; the receiver turns it into a fallback redirect.
#[derive(Debug, thiserror::Error)]
pub enum CallbackPayloadError {
    #[error("Failed to read callback body: {0}")]
    Body(String),
    #[error("Malformed multipart callback: {0}")]
    Multipart(String),
}
