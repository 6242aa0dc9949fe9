//! Book (catalog) endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiResult, AppError, Operation, OperationContext},
    models::book::{Book, BookFilter, BookId, BookPayload, BookQuery, BookSummary},
    AppState,
};

use super::{ApiResponse, MessageResponse};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookIdData {
    pub book_id: BookId,
}

#[derive(Serialize, ToSchema)]
pub struct BookData {
    pub book: Book,
}

#[derive(Serialize, ToSchema)]
pub struct BooksData {
    pub books: Vec<BookSummary>,
}

fn accept_payload(
    operation: Operation,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> ApiResult<BookPayload> {
    payload
        .map(|Json(payload)| payload)
        .map_err(|rejection| ApiError::new(operation, AppError::InvalidPayload(rejection.body_text())))
}

/// An id the router could not decode names no book: it is replaced by one
/// that matches nothing, so the catalog reports it as not found.
fn accept_id(path: Result<Path<BookId>, PathRejection>) -> BookId {
    match path {
        Ok(Path(id)) => id,
        Err(rejection) => {
            tracing::debug!("Undecodable book id: {}", rejection.body_text());
            BookId::from(String::new())
        }
    }
}

/// Add a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book added", body = ApiResponse<BookIdData>),
        (status = 400, description = "Missing name, readPage greater than pageCount or malformed body", body = MessageResponse),
        (status = 500, description = "Book could not be stored", body = MessageResponse)
    )
)]
pub async fn add_book(
    State(state): State<AppState>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<BookIdData>>)> {
    let payload = accept_payload(Operation::Add, payload)?;
    let book_id = state.services.catalog.add_book(payload).during(Operation::Add)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(BookIdData { book_id }).with_message("Buku berhasil ditambahkan")),
    ))
}

/// List books, optionally filtered
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books in insertion order", body = ApiResponse<BooksData>)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<BooksData>>> {
    let Query(pairs) = query.map_err(|rejection| {
        ApiError::new(Operation::List, AppError::InvalidPayload(rejection.body_text()))
    })?;
    let filter = BookFilter::from(&BookQuery::from_pairs(pairs));
    let books = state.services.catalog.list_books(&filter).during(Operation::List)?;

    Ok(Json(ApiResponse::success(BooksData { books })))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = ApiResponse<BookData>),
        (status = 404, description = "Book not found", body = MessageResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    path: Result<Path<BookId>, PathRejection>,
) -> ApiResult<Json<ApiResponse<BookData>>> {
    let id = accept_id(path);
    let book = state.services.catalog.get_book(&id).during(Operation::Get)?;
    Ok(Json(ApiResponse::success(BookData { book })))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 400, description = "Missing name, readPage greater than pageCount or malformed body", body = MessageResponse),
        (status = 404, description = "Book not found", body = MessageResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    path: Result<Path<BookId>, PathRejection>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let id = accept_id(path);
    let payload = accept_payload(Operation::Update, payload)?;
    state
        .services
        .catalog
        .update_book(&id, payload)
        .during(Operation::Update)?;

    Ok(Json(MessageResponse::success("Buku berhasil diperbarui")))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = MessageResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    path: Result<Path<BookId>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let id = accept_id(path);
    state.services.catalog.delete_book(&id).during(Operation::Delete)?;
    Ok(Json(MessageResponse::success("Buku berhasil dihapus")))
}
