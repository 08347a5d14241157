pub mod aggregate;
pub mod upload;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shared::ErrorResponse;

use crate::inference::InferenceError;
use crate::media::MediaError;

pub use aggregate::{Verdict, aggregate};
pub use upload::{MediaKind, UploadClassifier};

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unreadable media: {0}")]
    Media(#[from] MediaError),
    #[error("Classification failed: {0}")]
    Inference(#[from] InferenceError),
    #[error("Classification task failed: {0}")]
    Blocking(String),
}

impl ResponseError for ClassifyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ClassifyError::Media(_) | ClassifyError::Inference(InferenceError::Preprocessing(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
