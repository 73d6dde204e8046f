use serde::{Deserialize, Serialize};

/// Body of `GET /recording-started-latest.json`
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordingMetadata {
    pub is_channel_live: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_playback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_started_at: Option<String>,
    /// Total seconds of the top rendition, when the playlist advertises it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_duration: Option<i64>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum StreamState {
    Live,
    #[default]
    Offline,
}

/// What the control plane reports for a channel's active stream
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveStream {
    pub state: StreamState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback_url: Option<String>,
}

impl ActiveStream {
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn is_live(&self) -> bool {
        self.state == StreamState::Live
    }
}

// The subset of the live777 `/api/streams/` listing this service reads.

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    pub id: String,
    pub publish: PubSub,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PubSub {
    pub sessions: Vec<Session>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub state: RTCPeerConnectionState,
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RTCPeerConnectionState {
    #[default]
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}
