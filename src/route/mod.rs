use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub mod edge;
pub mod hook;

pub fn route() -> Router<AppState> {
    Router::new()
        .route(api::path::HOOK_OBJECT_CREATED, post(hook::object_created))
        .route("/{*key}", get(edge::serve))
}
