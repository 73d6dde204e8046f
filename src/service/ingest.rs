use api::event::{ObjectCreated, ObjectCreatedRecord};
use api::path::RECORDING_STARTED;
use api::recording::{LatestRecording, RecordingSession};
use storage::{join_key, recording_prefix, ObjectStore};
use tracing::{debug, error, info};

use crate::error::EdgeError;
use crate::live::LiveState;

const POINTER_CONTENT_TYPE: &str = "application/json";

/// Derive the pointer record from one freshly written session record and
/// store it at `pointer_key` next to it.
///
/// Only the session record and the live state at call time go in, so
/// running it again for a redelivered notification writes the same pointer.
pub async fn ingest_record(
    store: &dyn ObjectStore,
    live: &dyn LiveState,
    record: &ObjectCreatedRecord,
    pointer_key: &str,
) -> Result<LatestRecording, EdgeError> {
    let object = store.get(&record.key, &record.container).await?;
    let session: RecordingSession = serde_json::from_str(object.text()?)?;

    let absolute_path = join_key(recording_prefix(&record.key), &session.media.hls.path);
    // same identity the read side compares against, whatever the state
    let stream_id = live
        .active_stream(session.channel.id())
        .await?
        .stream_id
        .unwrap_or_default();

    let pointer = LatestRecording::new(session, absolute_path, stream_id);
    store
        .put(
            pointer_key,
            &record.container,
            serde_json::to_string(&pointer)?,
            POINTER_CONTENT_TYPE,
        )
        .await?;

    info!(
        container = record.container.as_str(),
        key = record.key.as_str(),
        path = pointer.hls().path.as_str(),
        stream_id = pointer.stream_id.as_str(),
        "latest recording pointer updated"
    );
    Ok(pointer)
}

/// Ingest every recording-start record of a notification, in order.
/// Returns how many were ingested; the first failure aborts the batch so
/// the sender redelivers it.
pub async fn ingest(
    store: &dyn ObjectStore,
    live: &dyn LiveState,
    notification: &ObjectCreated,
    pointer_key: &str,
) -> Result<usize, EdgeError> {
    let mut ingested = 0;
    for record in notification.records.iter() {
        if !record.key.ends_with(RECORDING_STARTED) {
            debug!(key = record.key.as_str(), "not a recording-start record, skipped");
            continue;
        }
        if let Err(e) = ingest_record(store, live, record, pointer_key).await {
            error!(
                container = record.container.as_str(),
                key = record.key.as_str(),
                "ingest recording-start record: {}",
                e
            );
            return Err(e);
        }
        ingested += 1;
    }
    Ok(ingested)
}
