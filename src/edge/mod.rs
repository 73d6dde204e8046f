//! Origin-request interception.
//!
//! Every `GET` is turned into an [`EdgeRequest`] and offered to the
//! registered [`EdgeHandler`]s in order. A handler either answers the
//! request itself or hands a (possibly rewritten) request on towards the
//! origin. Requests nobody answers are fetched from the origin unchanged.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use tracing::trace;

pub mod response;

pub use response::{build_response, ResponseOptions};

/// An object request as the origin sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRequest {
    pub key: String,
    pub container: String,
    pub channel: String,
}

pub enum Outcome {
    Respond(Response),
    Forward(EdgeRequest),
}

#[async_trait]
pub trait EdgeHandler: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, key: &str) -> bool;

    async fn handle(&self, req: EdgeRequest) -> Outcome;
}

#[derive(Debug, Clone, Default)]
pub struct Edge {
    handlers: Vec<Arc<dyn EdgeHandler>>,
}

impl Edge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler<H>(mut self, handler: H) -> Self
    where
        H: EdgeHandler + 'static,
    {
        self.handlers.push(Arc::new(handler));
        self
    }

    pub async fn dispatch(&self, mut req: EdgeRequest) -> Outcome {
        for handler in self.handlers.iter() {
            if !handler.matches(&req.key) {
                continue;
            }
            trace!(
                handler = handler.name(),
                key = req.key.as_str(),
                "edge handler matched"
            );
            match handler.handle(req).await {
                Outcome::Respond(res) => return Outcome::Respond(res),
                Outcome::Forward(next) => req = next,
            }
        }
        Outcome::Forward(req)
    }
}
