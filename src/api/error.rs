use std::fmt::{Display, Formatter};

use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::output::ErrorReport;
use crate::ScanError;

/// Status code plus the message sent back as `{"error": ...}`
#[derive(Debug)]
pub struct ApiError(pub StatusCode, pub String);

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.1, self.0)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.0
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.0).json(ErrorReport::new(self.1.clone()))
    }
}

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::InvalidInput(_) | ScanError::InvalidPortRange(_) => {
                Self(StatusCode::BAD_REQUEST, err.to_string())
            }
            // The scan request itself was fine, so the failure travels in the payload
            ScanError::ResolutionError { .. } => Self(StatusCode::OK, err.to_string()),
            _ => Self(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        }
    }
}
