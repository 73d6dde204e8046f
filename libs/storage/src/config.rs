use serde::{Deserialize, Serialize};

/// Backend of one named container
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Directory on the local filesystem
    Fs {
        #[serde(default = "default_fs_root")]
        root: String,
    },
    /// Process memory, lost on restart. Handy for local runs.
    Memory,
    /// S3 or an S3-compatible service (MinIO, OSS, R2, ...)
    S3 {
        bucket: String,
        /// Prefix inside the bucket that the container maps to
        #[serde(default = "default_s3_root")]
        root: String,
        #[serde(default)]
        region: Option<String>,
        #[serde(default)]
        endpoint: Option<String>,
        #[serde(default)]
        access_key_id: Option<String>,
        #[serde(default)]
        secret_access_key: Option<String>,
        /// Skip loading credentials from the environment and ~/.aws
        #[serde(default)]
        disable_config_load: bool,
        #[serde(default)]
        enable_virtual_host_style: bool,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Fs {
            root: default_fs_root(),
        }
    }
}

fn default_fs_root() -> String {
    "./vod".to_string()
}

fn default_s3_root() -> String {
    "/".to_string()
}
