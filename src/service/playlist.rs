use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http::StatusCode;
use storage::ObjectStore;
use tracing::{debug, error};

use crate::config::{Freshness, Origin};
use crate::edge::{build_response, EdgeHandler, EdgeRequest, Outcome, ResponseOptions};
use crate::error::EdgeError;
use crate::live::LiveState;

pub const ENDLIST: &str = "#EXT-X-ENDLIST";
pub const CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub body: Vec<u8>,
    pub max_age: u32,
}

/// Max-age for a playlist written `elapsed_ms` ago, or `None` once the
/// write window has passed and only the control plane can tell whether
/// another write is coming.
///
/// Inside the window the playlist is cached until the next expected
/// write, never longer than one update interval.
pub fn window_max_age(elapsed_ms: i64, freshness: &Freshness) -> Option<u32> {
    if elapsed_ms >= freshness.window_ms() as i64 {
        return None;
    }
    let update_delay_ms = freshness.update_delay_ms as i64;
    let remaining_ms = (update_delay_ms - elapsed_ms).max(0);
    let max_age = (remaining_ms / 1000).min(update_delay_ms / 1000);
    Some(max_age as u32)
}

/// Drop the first end-of-stream marker and the whitespace it leaves behind
pub fn strip_endlist(playlist: &str) -> String {
    playlist.replacen(ENDLIST, "", 1).trim().to_string()
}

pub async fn rendition_playlist(
    store: &dyn ObjectStore,
    live: &dyn LiveState,
    req: &EdgeRequest,
    freshness: &Freshness,
    now: DateTime<Utc>,
) -> Result<Verdict, EdgeError> {
    let object = store.get(&req.key, &req.container).await?;
    let elapsed_ms = now
        .signed_duration_since(object.last_modified.unwrap_or_default())
        .num_milliseconds();

    if let Some(max_age) = window_max_age(elapsed_ms, freshness) {
        debug!(key = req.key.as_str(), elapsed_ms, max_age, "playlist recently written");
        return Ok(Verdict {
            body: strip_endlist(object.text()?).into_bytes(),
            max_age,
        });
    }

    let stream = live.active_stream(&req.channel).await?;
    if stream.is_live() {
        // the recorder may be late with the next write
        debug!(key = req.key.as_str(), elapsed_ms, "playlist stale while channel live");
        Ok(Verdict {
            body: strip_endlist(object.text()?).into_bytes(),
            max_age: 0,
        })
    } else {
        debug!(key = req.key.as_str(), elapsed_ms, "playlist final");
        Ok(Verdict {
            body: object.body,
            max_age: freshness.max_ttl,
        })
    }
}

/// Serves rendition playlists with the end-of-stream marker hidden while
/// the recording may still grow.
#[derive(Debug)]
pub struct PlaylistFreshness {
    store: Arc<dyn ObjectStore>,
    live: Arc<dyn LiveState>,
    suffix: String,
    freshness: Freshness,
}

impl PlaylistFreshness {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        live: Arc<dyn LiveState>,
        origin: &Origin,
        freshness: &Freshness,
    ) -> Self {
        Self {
            store,
            live,
            suffix: origin.playlist_suffix.clone(),
            freshness: freshness.clone(),
        }
    }
}

#[async_trait]
impl EdgeHandler for PlaylistFreshness {
    fn name(&self) -> &'static str {
        "playlist-freshness"
    }

    fn matches(&self, key: &str) -> bool {
        key.ends_with(&self.suffix)
    }

    async fn handle(&self, req: EdgeRequest) -> Outcome {
        let res = match rendition_playlist(
            self.store.as_ref(),
            self.live.as_ref(),
            &req,
            &self.freshness,
            Utc::now(),
        )
        .await
        {
            Ok(verdict) => build_response(
                StatusCode::OK,
                ResponseOptions::max_age(verdict.max_age)
                    .body(verdict.body)
                    .content_type(CONTENT_TYPE),
            ),
            Err(e) => {
                error!(
                    key = req.key.as_str(),
                    container = req.container.as_str(),
                    "rendition playlist: {}",
                    e
                );
                build_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ResponseOptions::max_age(0),
                )
            }
        };
        Outcome::Respond(res)
    }
}
