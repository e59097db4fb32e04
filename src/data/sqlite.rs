use crate::domain::book::{Book, BookDraft};
use crate::domain::repository::BookRepository;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::debug;

// AUTOINCREMENT keeps the id watermark in sqlite_sequence, which is what
// resync_sequence rewrites after deletes.
const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    titol TEXT NOT NULL,
    autor TEXT NOT NULL,
    prestatge TEXT NOT NULL,
    posicio TEXT NOT NULL,
    habitacio TEXT NOT NULL,
    tipus TEXT NOT NULL,
    editorial TEXT NOT NULL,
    idioma TEXT NOT NULL,
    notes TEXT NOT NULL
)";

const ALL_COLUMNS: &str =
    "SELECT id, titol, autor, prestatge, posicio, habitacio, tipus, editorial, idioma, notes FROM books";

#[derive(Clone)]
pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        debug!(database_url, "Connected to database");
        Ok(Self::new(pool))
    }

    // Idempotent; runs on every startup.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn list(&self) -> Result<Vec<Book>> {
        // No ORDER BY: rows come back in storage order.
        let books = sqlx::query_as::<_, Book>(ALL_COLUMNS)
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn first(&self) -> Result<Book> {
        // LIMIT 1 without an ordering key: "first" is whatever the engine
        // returns. An empty table is an error here, not an empty result.
        let book = sqlx::query_as::<_, Book>(&format!("{ALL_COLUMNS} LIMIT 1"))
            .fetch_one(&self.pool)
            .await?;
        Ok(book)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert(&self, draft: &BookDraft) -> Result<()> {
        sqlx::query(
            "INSERT INTO books (titol, autor, prestatge, posicio, habitacio, tipus, editorial, idioma, notes)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&draft.titol)
        .bind(&draft.autor)
        .bind(&draft.prestatge)
        .bind(&draft.posicio)
        .bind(&draft.habitacio)
        .bind(&draft.tipus)
        .bind(&draft.editorial)
        .bind(&draft.idioma)
        .bind(&draft.notes)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, id: i64, draft: &BookDraft) -> Result<()> {
        // Zero rows affected (unknown id) is silent success.
        sqlx::query(
            "UPDATE books SET titol = ?, autor = ?, prestatge = ?, posicio = ?, habitacio = ?,
             tipus = ?, editorial = ?, idioma = ?, notes = ? WHERE id = ?",
        )
        .bind(&draft.titol)
        .bind(&draft.autor)
        .bind(&draft.prestatge)
        .bind(&draft.posicio)
        .bind(&draft.habitacio)
        .bind(&draft.tipus)
        .bind(&draft.editorial)
        .bind(&draft.idioma)
        .bind(&draft.notes)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn resync_sequence(&self) -> Result<()> {
        let max_id: Option<i64> = sqlx::query_scalar("SELECT MAX(id) FROM books")
            .fetch_one(&self.pool)
            .await?;
        match max_id {
            Some(max_id) => {
                sqlx::query("UPDATE sqlite_sequence SET seq = ? WHERE name = 'books'")
                    .bind(max_id)
                    .execute(&self.pool)
                    .await?;
            }
            // MAX(id) over an empty table is NULL; drop the sequence row to
            // reset the counter rather than storing NULL.
            None => {
                sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'books'")
                    .execute(&self.pool)
                    .await?;
            }
        }
        Ok(())
    }
}
