//! In-memory stand-ins for the object store and the control plane

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use api::response::{ActiveStream, StreamState};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use storage::{ObjectStore, StoreError, StoredObject};

use crate::error::EdgeError;
use crate::live::LiveState;

#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    content_types: Mutex<HashMap<(String, String), String>>,
    broken: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn insert(
        &self,
        container: &str,
        key: &str,
        body: &str,
        last_modified: impl Into<Option<DateTime<Utc>>>,
    ) {
        self.objects.lock().unwrap().insert(
            (container.to_string(), key.to_string()),
            StoredObject {
                body: body.as_bytes().to_vec(),
                last_modified: last_modified.into(),
            },
        );
    }

    /// Reads and writes of `key` fail with a transport error from now on
    pub fn break_key(&self, key: &str) {
        self.broken.lock().unwrap().insert(key.to_string());
    }

    pub fn text(&self, container: &str, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(&(container.to_string(), key.to_string()))
            .map(|o| String::from_utf8(o.body.clone()).unwrap())
    }

    /// Content type of the last `put` of `key`
    pub fn content_type(&self, container: &str, key: &str) -> Option<String> {
        self.content_types
            .lock()
            .unwrap()
            .get(&(container.to_string(), key.to_string()))
            .cloned()
    }

    fn check(&self, key: &str) -> Result<(), StoreError> {
        if self.broken.lock().unwrap().contains(key) {
            return Err(StoreError::Transport(anyhow::anyhow!("connection reset")));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get(&self, key: &str, container: &str) -> Result<StoredObject, StoreError> {
        self.check(key)?;
        self.objects
            .lock()
            .unwrap()
            .get(&(container.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                container: container.to_string(),
                key: key.to_string(),
            })
    }

    async fn put(
        &self,
        key: &str,
        container: &str,
        body: String,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.check(key)?;
        self.content_types.lock().unwrap().insert(
            (container.to_string(), key.to_string()),
            content_type.to_string(),
        );
        self.objects.lock().unwrap().insert(
            (container.to_string(), key.to_string()),
            StoredObject {
                body: body.into_bytes(),
                last_modified: Some(Utc::now()),
            },
        );
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeLive {
    stream: Mutex<Option<ActiveStream>>,
    calls: AtomicUsize,
}

impl FakeLive {
    pub fn offline() -> Self {
        Self {
            stream: Mutex::new(Some(ActiveStream::offline())),
            ..Default::default()
        }
    }

    pub fn live(stream_id: &str) -> Self {
        let live = Self::offline();
        live.set_live(stream_id);
        live
    }

    /// Reports `stream` as is
    pub fn fixed(stream: ActiveStream) -> Self {
        Self {
            stream: Mutex::new(Some(stream)),
            ..Default::default()
        }
    }

    /// Every query fails
    pub fn broken() -> Self {
        Self::default()
    }

    pub fn set_live(&self, stream_id: &str) {
        *self.stream.lock().unwrap() = Some(ActiveStream {
            state: StreamState::Live,
            stream_id: Some(stream_id.to_string()),
            playback_url: Some(format!("https://live.example.com/{stream_id}.m3u8")),
        });
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LiveState for FakeLive {
    async fn active_stream(&self, _channel: &str) -> Result<ActiveStream, EdgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.stream
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| EdgeError::Transport(anyhow::anyhow!("control plane unreachable")))
    }
}
