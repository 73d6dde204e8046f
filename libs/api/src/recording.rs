use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Recording-start metadata written by the recorder once per session,
/// at `<prefix>/events/recording-started.json`.
///
/// Fields this service does not interpret are kept in `extra` so a
/// pointer written from the record carries them through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingSession {
    #[serde(flatten)]
    pub channel: Channel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_id: Option<String>,
    pub recording_started_at: String,
    pub media: Media,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Channel identity under whichever field name the record used, so a
/// record is written back under the same name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "channel_arn")]
    Arn(String),
    #[serde(rename = "channel_id")]
    Id(String),
}

impl Channel {
    pub fn id(&self) -> &str {
        match self {
            Channel::Arn(id) | Channel::Id(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub hls: Hls,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hls {
    /// Media directory, relative to the session prefix in a session record
    /// and absolute within the container in a pointer record
    pub path: String,
    /// Master playlist filename
    pub playlist: String,
    /// Ordered best-first
    #[serde(default)]
    pub renditions: Vec<Rendition>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rendition {
    pub path: String,
    pub playlist: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Hls {
    pub fn master_key(&self) -> String {
        format!("{}/{}", self.path, self.playlist)
    }

    /// Key of the first (highest) rendition playlist, if the session has any
    pub fn top_rendition_key(&self) -> Option<String> {
        self.renditions
            .first()
            .map(|r| format!("{}/{}/{}", self.path, r.path, r.playlist))
    }
}

/// The "latest pointer": the most recent session of a channel, with an
/// absolute media path and the stream that was live when it was ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestRecording {
    #[serde(flatten)]
    pub session: RecordingSession,
    /// Empty when nothing was broadcasting at ingestion time
    #[serde(rename = "streamId", default)]
    pub stream_id: String,
}

impl LatestRecording {
    pub fn new(mut session: RecordingSession, absolute_path: String, stream_id: String) -> Self {
        session.media.hls.path = absolute_path;
        Self { session, stream_id }
    }

    pub fn hls(&self) -> &Hls {
        &self.session.media.hls
    }
}
