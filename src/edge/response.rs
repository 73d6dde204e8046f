use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http::header::{CACHE_CONTROL, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, StatusCode};

pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

#[derive(Debug, Clone, Default)]
pub struct ResponseOptions {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    /// Seconds; `None` leaves the cache directive out
    pub max_age: Option<u32>,
    /// Takes precedence over `max_age`
    pub no_cache: bool,
}

impl ResponseOptions {
    pub fn max_age(max_age: u32) -> Self {
        Self {
            max_age: Some(max_age),
            ..Default::default()
        }
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

pub fn cache_control(max_age: Option<u32>, no_cache: bool) -> Option<String> {
    if no_cache {
        Some("no-cache".to_string())
    } else {
        max_age.map(|n| format!("max-age={}", n))
    }
}

/// One content-type header, plus a cache-control header when the options
/// ask for one
pub fn build_response(status: StatusCode, options: ResponseOptions) -> Response {
    let mut headers = HeaderMap::new();
    let content_type = options
        .content_type
        .as_deref()
        .and_then(|v| HeaderValue::from_str(v).ok())
        .unwrap_or(HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    headers.insert(CONTENT_TYPE, content_type);

    if let Some(value) = cache_control(options.max_age, options.no_cache)
        .and_then(|v| HeaderValue::from_str(&v).ok())
    {
        headers.insert(CACHE_CONTROL, value);
    }

    (status, headers, Body::from(options.body)).into_response()
}
