//! Error kinds shared by the three handlers.
//!
//! Every failure here is terminal for its invocation: the handler converts it
//! into a JSON error response on the spot and nothing is retried or rethrown.
//! The distinction that matters to callers is 400 versus 500.

use lambda_http::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Unparseable body, missing field, or invalid multipart boundary.
    #[error("{0}")]
    MalformedInput(String),

    /// Uploaded filename has an extension outside the image allow-list.
    #[error("{0}")]
    UnsupportedMediaType(String),

    /// Remote URL fetch failed: transport error or non-success status.
    #[error("failed to fetch URL: {0}")]
    UpstreamFetch(String),

    #[error("upload error: {0}")]
    StorageWrite(String),

    #[error("table read error: {0}")]
    StorageRead(String),

    #[error("image analysis error: {0}")]
    Analysis(String),

    #[error("failed to encode response: {0}")]
    Serialization(String),
}

impl AppError {
    /// Caller-input problems map to 400; everything else is a 500.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedInput(_) | AppError::UnsupportedMediaType(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::UpstreamFetch(_)
            | AppError::StorageWrite(_)
            | AppError::StorageRead(_)
            | AppError::Analysis(_)
            | AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_input_problems_are_bad_requests() {
        assert_eq!(
            AppError::MalformedInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UnsupportedMediaType("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn everything_else_is_internal() {
        for err in [
            AppError::UpstreamFetch("x".into()),
            AppError::StorageWrite("x".into()),
            AppError::StorageRead("x".into()),
            AppError::Analysis("x".into()),
            AppError::Serialization("x".into()),
        ] {
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
