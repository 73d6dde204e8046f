use axum::{
    extract::{Path, State},
    response::Response,
};
use tracing::{debug, warn};

use crate::edge::{EdgeRequest, Outcome};
use crate::error::AppError;
use crate::result::Result;
use crate::service::origin;
use crate::AppState;

pub async fn serve(State(state): State<AppState>, Path(key): Path<String>) -> Result<Response> {
    if !storage::validate_key(&key) {
        warn!(key = key.as_str(), "rejected key");
        return Err(AppError::InvalidKey(key));
    }

    let req = EdgeRequest {
        key,
        container: state.config.origin.container.clone(),
        channel: state.config.origin.channel.clone(),
    };
    match state.edge.dispatch(req).await {
        Outcome::Respond(res) => Ok(res),
        Outcome::Forward(req) => {
            debug!(key = req.key.as_str(), "pass through to origin");
            origin::fetch(state.store.as_ref(), &req).await
        }
    }
}
