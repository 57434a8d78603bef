use axum::Json;
use serde_json::{json, Value};

/// Liveness only; downstream services are not checked.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
