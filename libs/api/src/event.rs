use serde::{Deserialize, Serialize};

/// Notification delivered (at least once) when objects are created in a
/// container. Delivery retries are the sender's business.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ObjectCreated {
    #[serde(default)]
    pub records: Vec<ObjectCreatedRecord>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ObjectCreatedRecord {
    pub container: String,
    pub key: String,
}

impl ObjectCreated {
    pub fn single(container: &str, key: &str) -> Self {
        Self {
            records: vec![ObjectCreatedRecord {
                container: container.to_string(),
                key: key.to_string(),
            }],
        }
    }
}
