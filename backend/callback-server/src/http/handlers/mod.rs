pub mod health;
pub mod transactions;

use axum::http::{StatusCode, Uri};

use crate::http::error::HttpError;

pub async fn not_found(uri: Uri) -> HttpError {
    HttpError {
        status: StatusCode::NOT_FOUND,
        message: format!("No route for {}", uri.path()),
    }
}
