use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("error resolving the requested path")]
    Resolve(#[source] std::io::Error),
    #[error("error loading the directory")]
    Listing(#[source] std::io::Error),
    #[error("error loading the file")]
    FileAccess(#[source] std::io::Error),
    #[error("error encoding the response")]
    Encode(#[from] serde_json::Error),
    #[error("filesystem operation timed out")]
    Timeout,
    #[error("internal error")]
    Internal,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid session")]
    InvalidSession,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::InvalidSession => StatusCode::FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            // Failed auth redirects back to the login page, never an error body.
            AppError::InvalidCredentials | AppError::InvalidSession => HttpResponse::Found()
                .insert_header((header::LOCATION, "/"))
                .finish(),
            // Display strings above are static; OS error detail stays in the
            // source chain and never reaches the client.
            _ => HttpResponse::build(self.status_code()).json(serde_json::json!({
                "error": self.to_string()
            })),
        }
    }
}
