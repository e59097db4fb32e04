use crate::domain::book::{Book, BookDraft};
use crate::domain::repository::BookRepository;
use anyhow::Result;
use std::sync::Arc;

pub struct CatalogService<R: BookRepository> {
    repository: Arc<R>,
}

impl<R: BookRepository> CatalogService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn list_books(&self) -> Result<Vec<Book>> {
        self.repository.list().await
    }

    pub async fn first_book(&self) -> Result<Book> {
        self.repository.first().await
    }

    pub async fn create_book(&self, draft: BookDraft) -> Result<()> {
        self.repository.insert(&draft).await
    }

    pub async fn update_book(&self, id: i64, draft: BookDraft) -> Result<()> {
        self.repository.update(id, &draft).await
    }

    // The sequence is pulled back to MAX(id) after every delete, so the next
    // insert reuses the highest freed id.
    pub async fn delete_book(&self, id: i64) -> Result<()> {
        self.repository.delete(id).await?;
        self.repository.resync_sequence().await
    }
}
