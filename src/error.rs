//! Error types for the bookshelf server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    api::{MessageResponse, ResponseStatus},
    models::BookId,
};

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Book name is missing")]
    MissingName,

    #[error("readPage is greater than pageCount")]
    PageOverflow,

    #[error("Book not found: {0}")]
    NotFound(BookId),

    #[error("Inserted book {0} could not be retrieved")]
    InsertFailure(BookId),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Catalog operation an error occurred in. Drives the response message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    List,
    Get,
    Update,
    Delete,
}

impl Operation {
    fn failure_prefix(&self) -> &'static str {
        match self {
            Operation::Add => "Gagal menambahkan buku",
            Operation::List => "Gagal menampilkan buku",
            Operation::Get => "Gagal menampilkan buku",
            Operation::Update => "Gagal memperbarui buku",
            Operation::Delete => "Buku gagal dihapus",
        }
    }
}

/// An [`AppError`] tagged with the operation that produced it
#[derive(Debug)]
pub struct ApiError {
    pub operation: Operation,
    pub error: AppError,
}

impl ApiError {
    pub fn new(operation: Operation, error: AppError) -> Self {
        Self { operation, error }
    }

    /// HTTP status and client-facing message
    pub fn status_and_message(&self) -> (StatusCode, String) {
        let prefix = self.operation.failure_prefix();
        match &self.error {
            AppError::MissingName => (
                StatusCode::BAD_REQUEST,
                format!("{}. Mohon isi nama buku", prefix),
            ),
            AppError::PageOverflow => (
                StatusCode::BAD_REQUEST,
                format!("{}. readPage tidak boleh lebih besar dari pageCount", prefix),
            ),
            AppError::NotFound(_) if self.operation == Operation::Get => {
                (StatusCode::NOT_FOUND, "Buku tidak ditemukan".to_string())
            }
            AppError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                format!("{}. Id tidak ditemukan", prefix),
            ),
            AppError::InvalidPayload(_) => (
                StatusCode::BAD_REQUEST,
                format!("{}. Payload tidak valid", prefix),
            ),
            AppError::InsertFailure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Buku gagal ditambahkan".to_string(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Terjadi kegagalan pada server kami".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let envelope_status = if status.is_server_error() {
            tracing::error!("{:?} failed: {}", self.operation, self.error);
            ResponseStatus::Error
        } else {
            tracing::debug!("{:?} rejected: {}", self.operation, self.error);
            ResponseStatus::Fail
        };

        let body = Json(MessageResponse {
            status: envelope_status,
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for HTTP handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Attach the current operation to a core result
pub trait OperationContext<T> {
    fn during(self, operation: Operation) -> ApiResult<T>;
}

impl<T> OperationContext<T> for AppResult<T> {
    fn during(self, operation: Operation) -> ApiResult<T> {
        self.map_err(|error| ApiError::new(operation, error))
    }
}
