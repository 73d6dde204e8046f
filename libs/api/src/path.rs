/// Well-known key of the pointer record, at the container root
pub const LATEST_RECORDING: &str = "recording-started-latest.json";
/// Filename the recorder uses for per-session recording-start records
pub const RECORDING_STARTED: &str = "recording-started.json";
/// Filename of every rendition playlist
pub const RENDITION_PLAYLIST: &str = "playlist.m3u8";
/// Everything in a session key before this marker is the session prefix
pub const SESSION_BOUNDARY: &str = "/events";

pub const HOOK_OBJECT_CREATED: &str = "/hooks/object-created";

/// live777 stream listing
pub const LIVE777_STREAMS: &str = "/api/streams/";

/// Control-plane resource of a channel's active stream
pub fn channel_stream(channel: &str) -> String {
    format!("/channels/{}/stream", channel)
}

pub fn whep(stream: &str) -> String {
    format!("/whep/{}", stream)
}
