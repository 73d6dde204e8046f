use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use api::response::{ActiveStream, RTCPeerConnectionState, StreamState};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, trace, warn};

use crate::config::{ControlPlane, ControlPlaneBackend};
use crate::error::EdgeError;

/// Query side of the live-broadcast control plane.
///
/// "Nothing is broadcasting" is an answer, not an error: implementations
/// return [`ActiveStream::offline`] for it.
#[async_trait]
pub trait LiveState: Debug + Send + Sync {
    async fn active_stream(&self, channel: &str) -> Result<ActiveStream, EdgeError>;
}

pub fn http_client(cfg: &ControlPlane) -> anyhow::Result<Client> {
    Ok(Client::builder()
        .connect_timeout(Duration::from_millis(cfg.connect_timeout_ms))
        .timeout(Duration::from_millis(cfg.timeout_ms))
        .build()?)
}

pub fn create_live_state(cfg: &ControlPlane, client: Client) -> Arc<dyn LiveState> {
    match cfg.backend.clone() {
        ControlPlaneBackend::Http { url, token } => {
            Arc::new(HttpControlPlane::new(client, url, token))
        }
        ControlPlaneBackend::Live777 {
            url,
            token,
            playback_base,
        } => Arc::new(Live777ControlPlane::new(client, url, token, playback_base)),
    }
}

#[derive(Debug, Clone)]
pub struct HttpControlPlane {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HttpControlPlane {
    pub fn new(client: Client, url: String, token: Option<String>) -> Self {
        Self { client, url, token }
    }

    /// Channel identities may be ARNs, so each part is its own encoded segment
    fn stream_url(&self, channel: &str) -> Result<Url, EdgeError> {
        let mut url = Url::parse(&self.url).map_err(EdgeError::transport)?;
        url.path_segments_mut()
            .map_err(|_| EdgeError::Transport(anyhow::anyhow!("{} cannot be a base", self.url)))?
            .pop_if_empty()
            .extend(&["channels", channel, "stream"]);
        Ok(url)
    }
}

#[async_trait]
impl LiveState for HttpControlPlane {
    async fn active_stream(&self, channel: &str) -> Result<ActiveStream, EdgeError> {
        let url = self.stream_url(channel)?;
        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(EdgeError::transport)?;
        let status = response.status();
        trace!(%url, ?status, "control plane response");

        if status == StatusCode::NOT_FOUND {
            debug!(channel, "channel not broadcasting");
            return Ok(ActiveStream::offline());
        }

        let body = response.text().await.map_err(EdgeError::transport)?;
        if !status.is_success() {
            warn!(%url, ?status, body, "control plane error");
            return Err(EdgeError::Transport(anyhow::anyhow!(
                "control plane status {}",
                status
            )));
        }

        Ok(serde_json::from_str::<ActiveStream>(&body)?)
    }
}

/// Reads channel state from a live777 node's stream listing. The stream is
/// live while its first publisher is connected, and that publisher's
/// session id identifies the broadcast.
#[derive(Debug, Clone)]
pub struct Live777ControlPlane {
    client: Client,
    url: String,
    token: Option<String>,
    playback_base: String,
}

impl Live777ControlPlane {
    pub fn new(client: Client, url: String, token: Option<String>, playback_base: String) -> Self {
        Self {
            client,
            url,
            token,
            playback_base,
        }
    }
}

#[async_trait]
impl LiveState for Live777ControlPlane {
    async fn active_stream(&self, channel: &str) -> Result<ActiveStream, EdgeError> {
        let url = format!("{}{}", self.url, api::path::LIVE777_STREAMS);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(EdgeError::transport)?;
        let status = response.status();
        let body = response.text().await.map_err(EdgeError::transport)?;
        if !status.is_success() {
            warn!(url, ?status, body, "live777 streams error");
            return Err(EdgeError::Transport(anyhow::anyhow!(
                "live777 status {}",
                status
            )));
        }

        let streams = serde_json::from_str::<Vec<api::response::Stream>>(&body)?;
        let publisher = streams
            .into_iter()
            .find(|s| s.id == channel)
            .and_then(|s| s.publish.sessions.into_iter().next());

        Ok(match publisher {
            Some(session) if session.state == RTCPeerConnectionState::Connected => ActiveStream {
                state: StreamState::Live,
                stream_id: Some(session.id),
                playback_url: Some(format!(
                    "{}{}",
                    self.playback_base.trim_end_matches('/'),
                    api::path::whep(channel)
                )),
            },
            Some(session) => {
                debug!(channel, state = ?session.state, "publisher not connected");
                ActiveStream::offline()
            }
            None => ActiveStream::offline(),
        })
    }
}
