use axum::Json;
use serde_json::{json, Value};

/// GET /hello
/// Fixed acknowledgment payload, used as a liveness probe.
pub async fn hello_handler() -> Json<Value> {
    Json(json!({
        "hello": "there"
    }))
}
