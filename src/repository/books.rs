//! In-memory books repository

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFilter, BookId, BookSummary},
};

/// Ordered book store. Iteration follows insertion order.
///
/// Every method takes the lock exactly once and never holds it across an
/// `.await`. Clones share the same store.
#[derive(Clone, Default)]
pub struct BooksRepository {
    books: Arc<RwLock<IndexMap<BookId, Book>>>,
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, IndexMap<BookId, Book>>> {
        self.books
            .read()
            .map_err(|_| AppError::Internal("book store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, IndexMap<BookId, Book>>> {
        self.books
            .write()
            .map_err(|_| AppError::Internal("book store lock poisoned".to_string()))
    }

    /// Append a book at the end of the sequence and return its id.
    ///
    /// A fresh id is drawn if the proposed one collides with a live record.
    pub fn insert(&self, mut book: Book) -> AppResult<BookId> {
        let mut books = self.write()?;
        while books.contains_key(&book.id) {
            tracing::warn!("Book id collision on {}, regenerating", book.id);
            book.id = BookId::generate();
        }
        let id = book.id.clone();
        books.insert(id.clone(), book);
        Ok(id)
    }

    /// Project matching books to summaries, in insertion order
    pub fn list(&self, filter: &BookFilter) -> AppResult<Vec<BookSummary>> {
        let books = self.read()?;
        Ok(books
            .values()
            .filter(|book| filter.matches(book))
            .map(BookSummary::from)
            .collect())
    }

    pub fn get(&self, id: &BookId) -> AppResult<Option<Book>> {
        Ok(self.read()?.get(id).cloned())
    }

    pub fn contains(&self, id: &BookId) -> AppResult<bool> {
        Ok(self.read()?.contains_key(id))
    }

    /// Mutate a book in place. Returns `false` when no book has this id.
    pub fn update<F>(&self, id: &BookId, apply: F) -> AppResult<bool>
    where
        F: FnOnce(&mut Book),
    {
        let mut books = self.write()?;
        match books.get_mut(id) {
            Some(book) => {
                apply(book);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a book, keeping the relative order of the others
    pub fn remove(&self, id: &BookId) -> AppResult<Option<Book>> {
        Ok(self.write()?.shift_remove(id))
    }

    pub fn count(&self) -> AppResult<usize> {
        Ok(self.read()?.len())
    }
}
