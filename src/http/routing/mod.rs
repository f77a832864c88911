pub mod todos;

use axum::{http::StatusCode, routing::get, Router};

use crate::http::types::ApiError;

/// Wraps the todo routes with a liveness probe and a JSON 404 for unknown paths.
pub fn app(todo_routes: Router) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(todo_routes)
        .fallback(unknown_route)
}

async fn unknown_route() -> ApiError {
    ApiError { status: StatusCode::NOT_FOUND, message: "no such route".into() }
}
