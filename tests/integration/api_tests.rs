//! API integration tests, driving the router in-process

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{create_router, AppState};

fn app() -> Router {
    create_router(AppState::new())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, body)
}

fn full_book(name: &str, page_count: u32, read_page: u32, reading: bool) -> Value {
    json!({
        "name": name,
        "year": 2010,
        "author": "John Doe",
        "summary": "Lorem ipsum dolor sit amet",
        "publisher": "Dicoding Indonesia",
        "pageCount": page_count,
        "readPage": read_page,
        "reading": reading
    })
}

async fn add(app: &Router, body: Value) -> String {
    let (status, body) = send(app, Method::POST, "/books", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["bookId"].as_str().expect("No book ID").to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_reports_book_count() {
    let app = app();
    add(&app, full_book("One", 10, 1, false)).await;

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["books"], 1);
}

#[tokio::test]
async fn test_add_finished_book() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(full_book("Lord of the Rings", 200, 200, false)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil ditambahkan");
    let id = body["data"]["bookId"].as_str().expect("No book ID");
    assert_eq!(id.len(), 32);

    let (status, body) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let book = &body["data"]["book"];
    assert_eq!(book["id"], id);
    assert_eq!(book["name"], "Lord of the Rings");
    assert_eq!(book["year"], 2010);
    assert_eq!(book["author"], "John Doe");
    assert_eq!(book["publisher"], "Dicoding Indonesia");
    assert_eq!(book["pageCount"], 200);
    assert_eq!(book["readPage"], 200);
    assert_eq!(book["finished"], true);
    assert_eq!(book["reading"], false);
    assert!(book["insertedAt"].is_string());
    assert_eq!(book["insertedAt"], book["updatedAt"]);
}

#[tokio::test]
async fn test_add_without_name() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "pageCount": 100, "readPage": 100 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Gagal menambahkan buku. Mohon isi nama buku");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_add_with_page_overflow() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/books", Some(full_book("X", 100, 150, false))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "Gagal menambahkan buku. readPage tidak boleh lebih besar dari pageCount"
    );

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(body["data"]["books"], json!([]));
}

#[tokio::test]
async fn test_add_malformed_body() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({ "name": "Negative", "pageCount": -1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Gagal menambahkan buku. Payload tidak valid");
}

#[tokio::test]
async fn test_list_projection_and_filters() {
    let app = app();
    add(&app, full_book("Kisah Dua Kota", 100, 10, true)).await;
    add(&app, full_book("Buku Kedua", 100, 100, false)).await;
    add(&app, full_book("Tiga", 50, 50, true)).await;

    let (status, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let books = body["data"]["books"].as_array().expect("books is not an array");
    assert_eq!(books.len(), 3);
    assert_eq!(books[0]["name"], "Kisah Dua Kota");
    assert_eq!(books[0]["publisher"], "Dicoding Indonesia");
    assert!(books[0]["id"].is_string());
    assert!(books[0].get("pageCount").is_none());

    let names = |body: &Value| -> Vec<String> {
        body["data"]["books"]
            .as_array()
            .expect("books is not an array")
            .iter()
            .map(|b| b["name"].as_str().unwrap_or_default().to_string())
            .collect()
    };

    let (_, body) = send(&app, Method::GET, "/books?name=DUA&reading=true", None).await;
    assert_eq!(names(&body), vec!["Kisah Dua Kota"]);

    let (_, body) = send(&app, Method::GET, "/books?finished=1", None).await;
    assert_eq!(names(&body), vec!["Buku Kedua", "Tiga"]);

    let (_, body) = send(&app, Method::GET, "/books?reading=0", None).await;
    assert_eq!(names(&body), vec!["Buku Kedua"]);

    let (status, body) = send(&app, Method::GET, "/books?reading=maybe", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(names(&body).is_empty());
}

#[tokio::test]
async fn test_get_unknown_book() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/books/xxxxx", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Buku tidak ditemukan");
}

#[tokio::test]
async fn test_update_book() {
    let app = app();
    let id = add(&app, full_book("Draft", 100, 10, true)).await;
    let (_, before) = send(&app, Method::GET, &format!("/books/{}", id), None).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", id),
        Some(full_book("Final", 120, 120, false)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil diperbarui");

    let (_, after) = send(&app, Method::GET, &format!("/books/{}", id), None).await;
    let (before, after) = (&before["data"]["book"], &after["data"]["book"]);
    assert_eq!(after["id"], before["id"]);
    assert_eq!(after["insertedAt"], before["insertedAt"]);
    assert_eq!(after["name"], "Final");
    assert_eq!(after["pageCount"], 120);
    assert_eq!(after["finished"], true);
    assert_eq!(after["reading"], false);
}

#[tokio::test]
async fn test_update_failures() {
    let app = app();
    let id = add(&app, full_book("Draft", 100, 10, true)).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", id),
        Some(json!({ "pageCount": 10, "readPage": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Gagal memperbarui buku. Mohon isi nama buku");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/books/{}", id),
        Some(full_book("Draft", 10, 11, true)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Gagal memperbarui buku. readPage tidak boleh lebih besar dari pageCount"
    );

    let (status, body) = send(
        &app,
        Method::PUT,
        "/books/xxxxx",
        Some(full_book("Valid", 10, 1, false)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Gagal memperbarui buku. Id tidak ditemukan");

    // Validation is reported before the missing id
    let (status, _) = send(&app, Method::PUT, "/books/xxxxx", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_book_twice() {
    let app = app();
    let id = add(&app, full_book("Temp", 10, 0, false)).await;

    let (status, body) = send(&app, Method::DELETE, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Buku berhasil dihapus");

    let (status, body) = send(&app, Method::DELETE, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Buku gagal dihapus. Id tidak ditemukan");
}

#[tokio::test]
async fn test_openapi_document() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/books"].is_object());
    assert!(body["paths"]["/books/{id}"].is_object());
}

#[tokio::test]
async fn test_list_repeated_query_key_keeps_last_value() {
    let app = app();
    add(&app, full_book("Sedang Dibaca", 100, 10, true)).await;
    add(&app, full_book("Belum Dibaca", 100, 0, false)).await;

    let (status, body) = send(&app, Method::GET, "/books?reading=true&reading=false", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let books = body["data"]["books"].as_array().expect("books is not an array");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["name"], "Belum Dibaca");
}

#[tokio::test]
async fn test_undecodable_id_is_not_found() {
    let app = app();
    add(&app, full_book("Ada", 10, 1, false)).await;

    let (status, body) = send(&app, Method::GET, "/books/%FF", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Buku tidak ditemukan");

    let (status, body) = send(&app, Method::PUT, "/books/%FF", Some(full_book("Valid", 10, 1, false))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Gagal memperbarui buku. Id tidak ditemukan");

    // Validation still comes before the id lookup
    let (status, body) = send(&app, Method::PUT, "/books/%FF", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Gagal memperbarui buku. Mohon isi nama buku");

    let (status, body) = send(&app, Method::DELETE, "/books/%FF", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Buku gagal dihapus. Id tidak ditemukan");

    let (_, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(body["books"], 1);
}
