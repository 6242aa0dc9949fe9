//! Book (catalog record) model and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

/// Opaque record identifier: a v4 UUID in its 32-character simple form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub const LENGTH: usize = 32;

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BookId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Full book record as stored in the catalog and returned by `GET /books/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    /// Derived from `read_page == page_count` on every write
    pub finished: bool,
    pub reading: bool,
    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Build a new record from a validated draft
    pub fn create(id: BookId, draft: BookDraft, now: DateTime<Utc>) -> Self {
        let finished = draft.is_finished();
        Self {
            id,
            name: draft.name,
            year: draft.year,
            author: draft.author,
            summary: draft.summary,
            publisher: draft.publisher,
            page_count: draft.page_count,
            read_page: draft.read_page,
            finished,
            reading: draft.reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Replace every mutable field. `id` and `inserted_at` are left untouched.
    pub fn apply(&mut self, draft: BookDraft, now: DateTime<Utc>) {
        self.finished = draft.is_finished();
        self.name = draft.name;
        self.year = draft.year;
        self.author = draft.author;
        self.summary = draft.summary;
        self.publisher = draft.publisher;
        self.page_count = draft.page_count;
        self.read_page = draft.read_page;
        self.reading = draft.reading;
        self.updated_at = now;
    }
}

/// Short book representation for lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: BookId,
    pub name: String,
    pub publisher: Option<String>,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Create / update request body.
///
/// Server-managed keys (`id`, `finished`, `insertedAt`, `updatedAt`) are
/// ignored if a client sends them.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_page_progress"))]
pub struct BookPayload {
    #[validate(
        required(message = "Book name is required"),
        length(min = 1, message = "Book name must not be empty")
    )]
    pub name: Option<String>,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub read_page: u32,
    #[serde(default)]
    pub reading: bool,
}

fn validate_page_progress(payload: &BookPayload) -> Result<(), ValidationError> {
    if payload.read_page > payload.page_count {
        let mut error = ValidationError::new("page_overflow");
        error.message = Some("readPage must not exceed pageCount".into());
        return Err(error);
    }
    Ok(())
}

impl BookPayload {
    /// Validate the payload and turn it into a draft ready to be written.
    ///
    /// A missing name is reported before a page overflow.
    pub fn into_draft(self) -> AppResult<BookDraft> {
        if let Err(errors) = self.validate() {
            if errors.errors().contains_key("name") {
                return Err(AppError::MissingName);
            }
            return Err(AppError::PageOverflow);
        }

        let name = self.name.ok_or(AppError::MissingName)?;
        Ok(BookDraft {
            name,
            year: self.year,
            author: self.author,
            summary: self.summary,
            publisher: self.publisher,
            page_count: self.page_count,
            read_page: self.read_page,
            reading: self.reading,
        })
    }
}

/// Validated mutable fields of a book
#[derive(Debug, Clone, PartialEq)]
pub struct BookDraft {
    pub name: String,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

impl BookDraft {
    fn is_finished(&self) -> bool {
        self.read_page == self.page_count
    }
}

/// Book list query parameters (API). Values are kept as raw strings and
/// parsed into a [`BookFilter`].
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the book name
    pub name: Option<String>,
    /// `true`/`1` or `false`/`0`
    pub reading: Option<String>,
    /// `true`/`1` or `false`/`0`
    pub finished: Option<String>,
}

impl BookQuery {
    /// Build from raw query pairs. A repeated key keeps its last value and
    /// unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "name" => query.name = Some(value),
                "reading" => query.reading = Some(value),
                "finished" => query.finished = Some(value),
                _ => {}
            }
        }
        query
    }
}

/// Boolean filter parsed from a query value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagFilter {
    Is(bool),
    /// Unrecognized value: no record can match
    Never,
}

impl FlagFilter {
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim();
        if value == "1" || value.eq_ignore_ascii_case("true") {
            FlagFilter::Is(true)
        } else if value == "0" || value.eq_ignore_ascii_case("false") {
            FlagFilter::Is(false)
        } else {
            FlagFilter::Never
        }
    }

    pub fn matches(&self, value: bool) -> bool {
        match self {
            FlagFilter::Is(expected) => *expected == value,
            FlagFilter::Never => false,
        }
    }
}

/// Predicates narrowing a book listing. Absent predicates match everything;
/// present ones are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    name: Option<String>,
    reading: Option<FlagFilter>,
    finished: Option<FlagFilter>,
}

impl BookFilter {
    pub fn name(mut self, needle: &str) -> Self {
        self.name = Some(needle.to_lowercase());
        self
    }

    pub fn reading(mut self, reading: bool) -> Self {
        self.reading = Some(FlagFilter::Is(reading));
        self
    }

    pub fn finished(mut self, finished: bool) -> Self {
        self.finished = Some(FlagFilter::Is(finished));
        self
    }

    pub fn matches(&self, book: &Book) -> bool {
        if let Some(ref needle) = self.name {
            if !book.name.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(reading) = self.reading {
            if !reading.matches(book.reading) {
                return false;
            }
        }
        if let Some(finished) = self.finished {
            if !finished.matches(book.finished) {
                return false;
            }
        }
        true
    }
}

impl From<&BookQuery> for BookFilter {
    fn from(query: &BookQuery) -> Self {
        Self {
            name: query.name.as_deref().map(str::to_lowercase),
            reading: query.reading.as_deref().map(FlagFilter::parse),
            finished: query.finished.as_deref().map(FlagFilter::parse),
        }
    }
}
