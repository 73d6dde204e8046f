use std::sync::Arc;

use api::recording::{Hls, LatestRecording};
use api::response::{ActiveStream, RecordingMetadata};
use async_trait::async_trait;
use http::StatusCode;
use storage::ObjectStore;
use tracing::{debug, error};

use crate::config::Origin;
use crate::edge::{build_response, EdgeHandler, EdgeRequest, Outcome, ResponseOptions};
use crate::error::EdgeError;
use crate::live::LiveState;

/// Written by the recorder into every rendition playlist
pub const TOTAL_SECS_TAG: &str = "EXT-X-TWITCH-TOTAL-SECS:";

const MAX_AGE: u32 = 1;

/// Value of the first total-duration tag that carries a value.
///
/// The value is read like a lenient integer parse: leading whitespace and
/// one sign are skipped, digits are taken up to the first non-digit. No
/// digits means no duration.
pub fn total_secs(playlist: &str) -> Option<i64> {
    let value = playlist.lines().find_map(|line| {
        let idx = line.find(TOTAL_SECS_TAG)?;
        let rest = &line[idx + TOTAL_SECS_TAG.len()..];
        (!rest.is_empty()).then_some(rest)
    })?;
    leading_integer(value)
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let n: i64 = s[..end].parse().ok()?;
    Some(if negative { -n } else { n })
}

/// On-demand fields belong to the broadcast the control plane names as
/// active, and to nothing else. The state is not consulted, same as on
/// ingestion.
fn is_current_stream(pointer: &LatestRecording, stream: &ActiveStream) -> bool {
    matches!(stream.stream_id.as_deref(), Some(id) if !id.is_empty() && id == pointer.stream_id)
}

/// Duration is a convenience for players that cannot measure an open
/// playlist themselves. Every failure just leaves it out.
async fn playlist_duration(store: &dyn ObjectStore, hls: &Hls, container: &str) -> Option<i64> {
    let Some(key) = hls.top_rendition_key() else {
        debug!("pointer has no renditions, skipping duration");
        return None;
    };
    match store.get(&key, container).await {
        Ok(object) => object.text().ok().and_then(total_secs),
        Err(e) => {
            debug!(key = key.as_str(), "duration lookup failed: {}", e);
            None
        }
    }
}

/// `Ok(None)` means no session has been ingested yet
pub async fn latest_recording(
    store: &dyn ObjectStore,
    live: &dyn LiveState,
    req: &EdgeRequest,
) -> Result<Option<RecordingMetadata>, EdgeError> {
    let object = match store.get(&req.key, &req.container).await {
        Ok(object) => object,
        Err(e) if e.is_not_found() => {
            debug!(key = req.key.as_str(), "pointer not written yet");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let pointer: LatestRecording = serde_json::from_str(object.text()?)?;

    let stream = live.active_stream(&req.channel).await?;
    let is_channel_live = stream.is_live();
    let mut metadata = RecordingMetadata {
        is_channel_live,
        live_playback_url: if is_channel_live {
            stream.playback_url.clone()
        } else {
            None
        },
        ..Default::default()
    };

    if is_current_stream(&pointer, &stream) {
        let hls = pointer.hls();
        metadata.master_key = Some(hls.master_key());
        metadata.recording_started_at = Some(pointer.session.recording_started_at.clone());
        metadata.playlist_duration = playlist_duration(store, hls, &req.container).await;
    } else {
        debug!(
            recorded = pointer.stream_id.as_str(),
            active = ?stream.stream_id,
            "pointer belongs to another stream"
        );
    }

    Ok(Some(metadata))
}

/// Answers pointer requests with a client summary of the latest recording
#[derive(Debug)]
pub struct MetadataRead {
    store: Arc<dyn ObjectStore>,
    live: Arc<dyn LiveState>,
    pointer_key: String,
}

impl MetadataRead {
    pub fn new(store: Arc<dyn ObjectStore>, live: Arc<dyn LiveState>, origin: &Origin) -> Self {
        Self {
            store,
            live,
            pointer_key: origin.pointer_key.clone(),
        }
    }
}

#[async_trait]
impl EdgeHandler for MetadataRead {
    fn name(&self) -> &'static str {
        "metadata-read"
    }

    fn matches(&self, key: &str) -> bool {
        key == self.pointer_key
    }

    async fn handle(&self, req: EdgeRequest) -> Outcome {
        let body = match latest_recording(self.store.as_ref(), self.live.as_ref(), &req).await {
            Ok(metadata) => serde_json::to_vec(&metadata).map_err(EdgeError::from),
            Err(e) => Err(e),
        };
        let res = match body {
            Ok(body) => build_response(
                StatusCode::OK,
                ResponseOptions::max_age(MAX_AGE)
                    .body(body)
                    .content_type("application/json"),
            ),
            Err(e) => {
                error!(
                    key = req.key.as_str(),
                    container = req.container.as_str(),
                    "latest recording metadata: {}",
                    e
                );
                build_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ResponseOptions::max_age(MAX_AGE),
                )
            }
        };
        Outcome::Respond(res)
    }
}
