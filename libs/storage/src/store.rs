use std::collections::HashMap;
use std::fmt::Debug;
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use opendal::{ErrorKind, Metadata, Operator};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object {container}/{key} not found")]
    NotFound { container: String, key: String },
    #[error("container {0} is not configured")]
    UnknownContainer(String),
    #[error("storage transport: {0}")]
    Transport(#[source] anyhow::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    /// `None` when the backend does not track modification times
    pub last_modified: Option<DateTime<Utc>>,
}

impl StoredObject {
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }
}

/// Get/put access to named containers. No conditional writes: `put`
/// overwrites whatever is there.
#[async_trait]
pub trait ObjectStore: Debug + Send + Sync {
    /// Body and modification time of one and the same write
    async fn get(&self, key: &str, container: &str) -> Result<StoredObject, StoreError>;

    /// `content_type` is dropped by backends that do not store one
    async fn put(
        &self,
        key: &str,
        container: &str,
        body: String,
        content_type: &str,
    ) -> Result<(), StoreError>;
}

/// Attempts at reading a body between two identical stats
const READ_ATTEMPTS: usize = 3;

/// What identifies one write of an object
#[derive(Debug, Clone, PartialEq, Eq)]
struct Version {
    last_modified: Option<DateTime<Utc>>,
    etag: Option<String>,
    content_length: u64,
}

impl From<Metadata> for Version {
    fn from(metadata: Metadata) -> Self {
        Self {
            last_modified: metadata
                .last_modified()
                .map(|t| DateTime::<Utc>::from(SystemTime::from(t))),
            etag: metadata.etag().map(str::to_string),
            content_length: metadata.content_length(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpendalStore {
    containers: HashMap<String, Operator>,
}

impl OpendalStore {
    pub fn new(containers: HashMap<String, Operator>) -> Self {
        Self { containers }
    }

    fn operator(&self, container: &str) -> Result<&Operator, StoreError> {
        self.containers
            .get(container)
            .ok_or_else(|| StoreError::UnknownContainer(container.to_string()))
    }
}

fn classify(err: opendal::Error, key: &str, container: &str) -> StoreError {
    if err.kind() == ErrorKind::NotFound {
        StoreError::NotFound {
            container: container.to_string(),
            key: key.to_string(),
        }
    } else {
        StoreError::Transport(err.into())
    }
}

impl OpendalStore {
    async fn version(
        &self,
        operator: &Operator,
        key: &str,
        container: &str,
    ) -> Result<Version, StoreError> {
        operator
            .stat(key)
            .await
            .map(Version::from)
            .map_err(|e| classify(e, key, container))
    }
}

#[async_trait]
impl ObjectStore for OpendalStore {
    /// A stat on each side of the read. The playlist may be rewritten in
    /// between, in which case the read is repeated; after the last attempt
    /// the later stat wins.
    async fn get(&self, key: &str, container: &str) -> Result<StoredObject, StoreError> {
        let operator = self.operator(container)?;
        let mut before = self.version(operator, key, container).await?;
        let mut attempt = 1;
        loop {
            let body = operator
                .read(key)
                .await
                .map_err(|e| classify(e, key, container))?;
            let after = self.version(operator, key, container).await?;
            if after == before || attempt == READ_ATTEMPTS {
                tracing::trace!(key, container, size = body.len(), attempt, "object read");
                return Ok(StoredObject {
                    body: body.to_vec(),
                    last_modified: after.last_modified,
                });
            }
            tracing::debug!(key, container, attempt, "object rewritten during read");
            before = after;
            attempt += 1;
        }
    }

    async fn put(
        &self,
        key: &str,
        container: &str,
        body: String,
        content_type: &str,
    ) -> Result<(), StoreError> {
        let operator = self.operator(container)?;
        let mut write = operator.write_with(key, body);
        if operator.info().full_capability().write_with_content_type {
            write = write.content_type(content_type);
        }
        write.await.map_err(|e| classify(e, key, container))?;
        tracing::debug!(key, container, content_type, "object written");
        Ok(())
    }
}
