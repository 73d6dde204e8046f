use std::collections::HashMap;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use api::response::{ActiveStream, StreamState};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use http::StatusCode;
use livevod::config::{Config, ControlPlaneBackend};
use storage::StorageConfig;
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const CHANNEL: &str = "arn:aws:ivs:us-west-2:123:channel/abc";

pub async fn shutdown_signal() {
    std::future::pending::<()>().await
}

async fn listen() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// Answers `GET /channels/{channel}/stream` like the broadcast control plane
#[derive(Clone, Default)]
pub struct ControlPlane {
    active: Arc<Mutex<Option<String>>>,
}

impl ControlPlane {
    pub fn set_live(&self, stream_id: &str) {
        *self.active.lock().unwrap() = Some(stream_id.to_string());
    }

    pub fn set_offline(&self) {
        *self.active.lock().unwrap() = None;
    }

    async fn spawn(&self) -> SocketAddr {
        let app = Router::new()
            .route(&api::path::channel_stream("{channel}"), get(active_stream))
            .with_state(self.clone());
        let (listener, addr) = listen().await;
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        addr
    }
}

async fn active_stream(
    State(control): State<ControlPlane>,
    Path(channel): Path<String>,
) -> Response {
    if channel != CHANNEL {
        return StatusCode::NOT_FOUND.into_response();
    }
    match control.active.lock().unwrap().clone() {
        Some(id) => Json(ActiveStream {
            state: StreamState::Live,
            playback_url: Some(format!("https://live.example.com/{id}.m3u8")),
            stream_id: Some(id),
        })
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// A running edge over a filesystem container
pub struct Harness {
    pub addr: SocketAddr,
    pub control: ControlPlane,
    pub client: reqwest::Client,
    root: TempDir,
}

impl Harness {
    pub async fn start() -> Self {
        let control = ControlPlane::default();
        let control_addr = control.spawn().await;
        let root = TempDir::new().unwrap();

        let mut cfg = Config::default();
        cfg.origin.channel = CHANNEL.to_string();
        cfg.storage = HashMap::from([(
            cfg.origin.container.clone(),
            StorageConfig::Fs {
                root: root.path().to_string_lossy().into_owned(),
            },
        )]);
        cfg.control_plane.backend = ControlPlaneBackend::Http {
            url: format!("http://{control_addr}"),
            token: None,
        };
        cfg.validate().unwrap();

        let (listener, addr) = listen().await;
        tokio::spawn(livevod::serve(cfg, listener, shutdown_signal()));

        Self {
            addr,
            control,
            client: reqwest::Client::new(),
            root,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.path().join(key)
    }

    /// Write an object as if the recorder wrote it `age` ago
    pub fn write(&self, key: &str, body: &str, age: Duration) {
        let path = self.path(key);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, body).unwrap();
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(SystemTime::now() - age)
            .unwrap();
    }

    pub fn read(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path(key)).ok()
    }
}
