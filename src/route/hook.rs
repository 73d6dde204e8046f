use axum::{extract::State, Json};
use http::StatusCode;
use tracing::{error, info};

use api::event::ObjectCreated;

use crate::result::Result;
use crate::service::ingest;
use crate::AppState;

/// Object-created notifications from the recording container. Any failure
/// answers 500 so the sender redelivers the whole batch.
pub async fn object_created(
    State(state): State<AppState>,
    Json(notification): Json<ObjectCreated>,
) -> Result<StatusCode> {
    let count = ingest::ingest(
        state.store.as_ref(),
        state.live.as_ref(),
        &notification,
        &state.config.origin.pointer_key,
    )
    .await
    .inspect_err(|e| error!("object created notification: {}", e))?;

    info!(
        records = notification.records.len(),
        ingested = count,
        "object created notification handled"
    );
    Ok(StatusCode::NO_CONTENT)
}
