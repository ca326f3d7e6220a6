use std::path::PathBuf;

use axum::{
    http::{header::InvalidHeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("PDF file not found")]
    NotFound { path: PathBuf },

    #[error("Error serving PDF")]
    Io(#[from] std::io::Error),

    #[error("Error serving PDF")]
    Header(#[from] InvalidHeaderValue),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound { path } => {
                warn!(path = %path.display(), "PDF file not found");
                StatusCode::NOT_FOUND
            }
            AppError::Io(e) => {
                error!("Error serving PDF: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Header(e) => {
                error!("Error building PDF headers: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let response = AppError::NotFound {
            path: PathBuf::from("public/resume.pdf"),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn io_maps_to_500_with_generic_message() {
        let err = AppError::from(std::io::Error::other("disk on fire"));
        assert_eq!(err.to_string(), "Error serving PDF");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
