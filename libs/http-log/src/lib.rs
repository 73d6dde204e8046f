use std::time::Instant;

use axum::extract::Request;
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{error, info, warn};

/// Edge responses are judged by their cache directive as much as by their
/// status, so both are logged for every request.
pub async fn print_request_response(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let res = next.run(req).await;

    let duration = start.elapsed().as_millis();
    let status = res.status().as_u16();
    let cache = cache_directive(res.headers());

    if res.status().is_server_error() {
        error!("[{} {}] [{}] [{}] {}ms", method, uri, status, cache, duration);
    } else if res.status().is_client_error() || duration > 500 {
        warn!("[{} {}] [{}] [{}] {}ms", method, uri, status, cache, duration);
    } else {
        info!("[{} {}] [{}] [{}] {}ms", method, uri, status, cache, duration);
    }

    res
}

fn cache_directive(headers: &HeaderMap) -> &str {
    headers
        .get(header::CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}
