use axum::{routing::get, Router};

use super::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        // PayU posts server-to-server and may also bounce the browser with a GET
        .route(
            "/transaction/success",
            get(handlers::transactions::success_redirect)
                .post(handlers::transactions::success_callback),
        )
        .route(
            "/transaction/failure",
            get(handlers::transactions::failure_redirect)
                .post(handlers::transactions::failure_callback),
        )
        .fallback(handlers::not_found)
        .with_state(state)
}
