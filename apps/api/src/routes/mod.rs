pub mod candidates;
pub mod health;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/hello", get(health::hello_handler))
        .route("/candidates.html", get(candidates::candidates_handler))
        .with_state(state)
}
