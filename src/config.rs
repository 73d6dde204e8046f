use std::{collections::HashMap, env, fs, net::SocketAddr, str::FromStr};

use serde::{Deserialize, Serialize};
use storage::StorageConfig;

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub http: Http,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default)]
    pub freshness: Freshness,
    #[serde(default)]
    pub control_plane: ControlPlane,
    /// Named containers, e.g. `[storage.vod]`
    #[serde(default = "default_storage")]
    pub storage: HashMap<String, StorageConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Http {
    #[serde(default = "default_http_listen")]
    pub listen: SocketAddr,
    #[serde(default)]
    pub cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Log {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// What the edge fronts: one channel recorded into one container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Origin {
    #[serde(default)]
    pub channel: String,
    #[serde(default = "default_container")]
    pub container: String,
    #[serde(default = "default_pointer_key")]
    pub pointer_key: String,
    #[serde(default = "default_playlist_suffix")]
    pub playlist_suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Freshness {
    /// Recorder cadence for rewriting rendition playlists
    #[serde(default = "default_update_delay_ms")]
    pub update_delay_ms: u64,
    /// Slack for the write to land after the cadence tick
    #[serde(default = "default_write_buffer_ms")]
    pub write_buffer_ms: u64,
    /// Max-age for finalized playlists, the CDN's maximum TTL
    #[serde(default = "default_max_ttl")]
    pub max_ttl: u32,
}

impl Freshness {
    pub fn window_ms(&self) -> u64 {
        self.update_delay_ms + self.write_buffer_ms
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlPlane {
    #[serde(flatten)]
    pub backend: ControlPlaneBackend,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ControlPlaneBackend {
    /// `GET {url}/channels/{channel}/stream`, 404 when not broadcasting
    Http {
        url: String,
        #[serde(default)]
        token: Option<String>,
    },
    /// A live777 node: channels are live777 streams
    Live777 {
        url: String,
        #[serde(default)]
        token: Option<String>,
        /// Public base URL players use for WHEP playback
        playback_base: String,
    },
}

fn default_http_listen() -> SocketAddr {
    SocketAddr::from_str(&format!(
        "0.0.0.0:{}",
        env::var("PORT").unwrap_or(String::from("8080"))
    ))
    .expect("invalid listen address")
}

impl Default for Http {
    fn default() -> Self {
        Self {
            listen: default_http_listen(),
            cors: Default::default(),
        }
    }
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    env::var("LOG_LEVEL").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug".to_string()
        } else {
            "info".to_string()
        }
    })
}

impl Default for Origin {
    fn default() -> Self {
        Self {
            channel: Default::default(),
            container: default_container(),
            pointer_key: default_pointer_key(),
            playlist_suffix: default_playlist_suffix(),
        }
    }
}

fn default_container() -> String {
    "vod".to_string()
}

fn default_pointer_key() -> String {
    api::path::LATEST_RECORDING.to_string()
}

fn default_playlist_suffix() -> String {
    format!("/{}", api::path::RENDITION_PLAYLIST)
}

impl Default for Freshness {
    fn default() -> Self {
        Self {
            update_delay_ms: default_update_delay_ms(),
            write_buffer_ms: default_write_buffer_ms(),
            max_ttl: default_max_ttl(),
        }
    }
}

fn default_update_delay_ms() -> u64 {
    30_000
}

fn default_write_buffer_ms() -> u64 {
    2_000
}

fn default_max_ttl() -> u32 {
    31_536_000
}

impl Default for ControlPlane {
    fn default() -> Self {
        Self {
            backend: ControlPlaneBackend::Http {
                url: "http://127.0.0.1:8900".to_string(),
                token: None,
            },
            connect_timeout_ms: default_connect_timeout_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_connect_timeout_ms() -> u64 {
    500
}

fn default_timeout_ms() -> u64 {
    2_000
}

fn default_storage() -> HashMap<String, StorageConfig> {
    HashMap::from([(default_container(), StorageConfig::default())])
}

impl Config {
    pub fn parse(path: Option<String>) -> Self {
        let result = fs::read_to_string(path.unwrap_or(String::from("livevod.toml")))
            .or(fs::read_to_string("/etc/livevod/livevod.toml"))
            .unwrap_or("".to_string());
        let cfg: Self = toml::from_str(result.as_str()).expect("config parse error");
        match cfg.validate() {
            Ok(_) => cfg,
            Err(err) => panic!("config validate [{}]", err),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.origin.channel.is_empty() {
            return Err(anyhow::anyhow!("origin.channel must be set"));
        }

        if !self.storage.contains_key(&self.origin.container) {
            return Err(anyhow::anyhow!(
                "origin.container '{}' has no [storage.{}] table",
                self.origin.container,
                self.origin.container
            ));
        }

        if self.freshness.update_delay_ms < 1000 {
            return Err(anyhow::anyhow!(
                "freshness.update_delay_ms must be at least one second"
            ));
        }

        Ok(())
    }
}
