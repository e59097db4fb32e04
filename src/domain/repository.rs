use crate::domain::book::{Book, BookDraft};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Book>>;
    async fn first(&self) -> Result<Book>;
    async fn count(&self) -> Result<i64>;
    async fn insert(&self, draft: &BookDraft) -> Result<()>;
    async fn update(&self, id: i64, draft: &BookDraft) -> Result<()>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn resync_sequence(&self) -> Result<()>;
}
