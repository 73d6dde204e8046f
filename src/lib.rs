use std::{future::Future, sync::Arc};

use axum::{extract::Request, middleware, Router};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span};

use storage::{ObjectStore, OpendalStore};

use crate::config::Config;
use crate::edge::Edge;
use crate::live::LiveState;
use crate::service::{metadata::MetadataRead, playlist::PlaylistFreshness};

pub mod config;
pub mod edge;
pub mod error;
pub mod live;
pub mod log;
mod result;
mod route;
pub mod service;

#[cfg(test)]
mod testing;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ObjectStore>,
    pub live: Arc<dyn LiveState>,
    pub edge: Arc<Edge>,
}

impl AppState {
    /// Pointer reads are answered before playlist rewrites
    pub fn new(config: Config, store: Arc<dyn ObjectStore>, live: Arc<dyn LiveState>) -> Self {
        let edge = Edge::new()
            .handler(MetadataRead::new(store.clone(), live.clone(), &config.origin))
            .handler(PlaylistFreshness::new(
                store.clone(),
                live.clone(),
                &config.origin,
                &config.freshness,
            ));
        Self {
            config,
            store,
            live,
            edge: Arc::new(edge),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let cors = if state.config.http.cors {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    route::route()
        .layer(cors)
        .with_state(state)
        .layer(middleware::from_fn(http_log::print_request_response))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let span = info_span!(
                    "http_request",
                    uri = ?request.uri(),
                    method = ?request.method(),
                    span_id = tracing::field::Empty,
                );
                span.record(
                    "span_id",
                    span.id().unwrap_or(tracing::Id::from_u64(42)).into_u64(),
                );
                span
            }),
        )
}

pub async fn serve<F>(cfg: Config, listener: TcpListener, signal: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Server listening on {}", listener.local_addr()?);

    let operators = storage::init_operators(&cfg.storage).await?;
    let store: Arc<dyn ObjectStore> = Arc::new(OpendalStore::new(operators));

    let client = live::http_client(&cfg.control_plane)?;
    let live = live::create_live_state(&cfg.control_plane, client);
    info!(
        channel = cfg.origin.channel.as_str(),
        container = cfg.origin.container.as_str(),
        "edge ready"
    );

    axum::serve(listener, app(AppState::new(cfg, store, live)))
        .with_graceful_shutdown(signal)
        .await?;
    Ok(())
}
