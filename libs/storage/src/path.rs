use api::path::SESSION_BOUNDARY;

/// Prefix of a session-scoped key: everything before the first session
/// boundary marker, or the whole key when it has none.
pub fn recording_prefix(key: &str) -> &str {
    match key.find(SESSION_BOUNDARY) {
        Some(idx) => &key[..idx],
        None => key,
    }
}

pub fn join_key(prefix: &str, relative: &str) -> String {
    format!("{}/{}", prefix, relative)
}

/// Keys taken from request paths must stay inside the container
pub fn validate_key(key: &str) -> bool {
    !key.is_empty() && !key.contains("..") && !key.starts_with('/')
}
