use std::{io::ErrorKind, sync::Arc};

use axum::{
    extract::State as AxumState,
    http::{
        header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::{error::AppError, state::State};

const PDF_CACHE_CONTROL: &str = "public, max-age=3600";

/// `GET /api/pdf`: the resume, displayed inline by the browser.
pub async fn resume_handler(AxumState(state): AxumState<Arc<State>>) -> Result<Response, AppError> {
    let path = state.resume_path();

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(AppError::NotFound { path }),
        Err(e) => return Err(e.into()),
    };
    debug!(path = %path.display(), bytes = bytes.len(), "serving PDF");

    let disposition =
        HeaderValue::from_str(&format!("inline; filename=\"{}\"", state.config.resume_file))?;

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (CONTENT_DISPOSITION, disposition),
            (CACHE_CONTROL, HeaderValue::from_static(PDF_CACHE_CONTROL)),
        ],
        bytes,
    )
        .into_response())
}
