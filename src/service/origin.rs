use axum::response::Response;
use http::StatusCode;
use storage::ObjectStore;

use crate::edge::{build_response, EdgeRequest, ResponseOptions};
use crate::error::AppError;
use crate::result::Result;

/// Serve an object as stored. No cache directive: caching of plain
/// objects is left to the CDN's default policy.
pub async fn fetch(store: &dyn ObjectStore, req: &EdgeRequest) -> Result<Response> {
    let object = match store.get(&req.key, &req.container).await {
        Ok(object) => object,
        Err(e) if e.is_not_found() => return Err(AppError::ResourceNotFound),
        Err(e) => return Err(e.into()),
    };
    let mime = mime_guess::from_path(&req.key).first_or_octet_stream();
    Ok(build_response(
        StatusCode::OK,
        ResponseOptions::default()
            .body(object.body)
            .content_type(mime.as_ref()),
    ))
}
