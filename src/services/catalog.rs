//! Catalog management service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFilter, BookId, BookPayload, BookSummary},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Validate and append a new book, returning its generated id
    pub fn add_book(&self, payload: BookPayload) -> AppResult<BookId> {
        let draft = payload.into_draft()?;
        let book = Book::create(BookId::generate(), draft, Utc::now());

        let id = self.repository.books.insert(book)?;
        if !self.repository.books.contains(&id)? {
            return Err(AppError::InsertFailure(id));
        }

        tracing::info!("Book added: id={}", id);
        Ok(id)
    }

    /// List books matching the filter
    pub fn list_books(&self, filter: &BookFilter) -> AppResult<Vec<BookSummary>> {
        let books = self.repository.books.list(filter)?;
        tracing::debug!("Listed {} books with {:?}", books.len(), filter);
        Ok(books)
    }

    /// Get book by ID with full details
    pub fn get_book(&self, id: &BookId) -> AppResult<Book> {
        self.repository
            .books
            .get(id)?
            .ok_or_else(|| AppError::NotFound(id.clone()))
    }

    /// Replace the mutable fields of an existing book.
    /// The payload is validated before the id is looked up.
    pub fn update_book(&self, id: &BookId, payload: BookPayload) -> AppResult<()> {
        let draft = payload.into_draft()?;
        let now = Utc::now();

        if !self.repository.books.update(id, |book| book.apply(draft, now))? {
            return Err(AppError::NotFound(id.clone()));
        }

        tracing::info!("Book updated: id={}", id);
        Ok(())
    }

    /// Delete a book
    pub fn delete_book(&self, id: &BookId) -> AppResult<()> {
        match self.repository.books.remove(id)? {
            Some(_) => {
                tracing::info!("Book deleted: id={}", id);
                Ok(())
            }
            None => Err(AppError::NotFound(id.clone())),
        }
    }

    /// Number of books in the catalog
    pub fn count_books(&self) -> AppResult<usize> {
        self.repository.books.count()
    }
}
