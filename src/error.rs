use axum::response::{IntoResponse, Response};
use http::StatusCode;
use storage::StoreError;

/// Failures of the edge services.
///
/// `NotFound` is expected on the read path (the pointer is not written
/// yet) and fatal on ingestion. `Transport` and `Parse` are real faults.
#[derive(Debug, thiserror::Error)]
pub enum EdgeError {
    #[error("{container}/{key} not found")]
    NotFound { container: String, key: String },
    #[error("transport: {0}")]
    Transport(#[source] anyhow::Error),
    #[error("parse: {0}")]
    Parse(String),
}

impl EdgeError {
    pub fn transport<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        EdgeError::Transport(err.into())
    }

    pub fn parse<T>(t: T) -> Self
    where
        T: ToString,
    {
        EdgeError::Parse(t.to_string())
    }
}

impl From<StoreError> for EdgeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { container, key } => EdgeError::NotFound { container, key },
            StoreError::Transport(err) => EdgeError::Transport(err),
            other @ StoreError::UnknownContainer(_) => EdgeError::Transport(other.into()),
        }
    }
}

impl From<serde_json::Error> for EdgeError {
    fn from(err: serde_json::Error) -> Self {
        EdgeError::parse(err)
    }
}

impl From<std::str::Utf8Error> for EdgeError {
    fn from(err: std::str::Utf8Error) -> Self {
        EdgeError::parse(err)
    }
}

#[derive(Debug)]
pub enum AppError {
    InvalidKey(String),
    ResourceNotFound,
    InternalServerError(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidKey(key) => {
                (StatusCode::BAD_REQUEST, format!("invalid key: {key}")).into_response()
            }
            AppError::ResourceNotFound => {
                (StatusCode::NOT_FOUND, "resource not exists".to_string()).into_response()
            }
            AppError::InternalServerError(err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError::InternalServerError(err.into())
    }
}
