use crate::application::auth::AuthService;
use crate::application::catalog::CatalogService;
use crate::data::sqlite::SqliteBookRepository;
use crate::domain::book::BookDraft;
use crate::domain::error::DomainError;
use actix_web::{HttpResponse, ResponseError, web};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, instrument, warn};

pub struct AppState {
    pub catalog: CatalogService<SqliteBookRepository>,
    pub auth: AuthService,
}

// Clients get the status text only; the underlying cause stays in the log.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Database error: {0}")]
    Database(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            ApiError::Unauthorized(_) => actix_web::http::StatusCode::UNAUTHORIZED,
            ApiError::Database(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            ApiError::Unauthorized(msg) => {
                warn!(error = %msg, status = %status, "Unauthorized")
            }
            ApiError::Database(msg) => {
                error!(error = %msg, status = %status, "Database error")
            }
        }

        let body = ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        };
        HttpResponse::build(status).json(body)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::InvalidCredentials) => ApiError::Unauthorized(err.to_string()),
            None => ApiError::Database(err.to_string()),
        }
    }
}

// Handlers

pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Hello World")
}

#[instrument(skip(state))]
pub async fn list_books(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let books = state.catalog.list_books().await.map_err(|e| {
        error!(error = %e, "Failed to list books");
        ApiError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(books))
}

#[instrument(skip(state))]
pub async fn first_book(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    // An empty catalog lands here too: no row to scan is a server error,
    // same as the query failing.
    let book = state.catalog.first_book().await.map_err(|e| {
        error!(error = %e, "Failed to fetch first book");
        ApiError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(book))
}

#[instrument(skip(state, draft), fields(titol = %draft.titol))]
pub async fn create_book(
    state: web::Data<AppState>,
    draft: web::Json<BookDraft>,
) -> Result<HttpResponse, ApiError> {
    state.catalog.create_book(draft.into_inner()).await.map_err(|e| {
        error!(error = %e, "Failed to create book");
        ApiError::from(e)
    })?;
    Ok(HttpResponse::Created().finish())
}

#[instrument(skip(state, draft), fields(book_id = %*path))]
pub async fn update_book(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    draft: web::Json<BookDraft>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    state
        .catalog
        .update_book(id, draft.into_inner())
        .await
        .map_err(|e| {
            error!(book_id = id, error = %e, "Failed to update book");
            ApiError::from(e)
        })?;
    Ok(HttpResponse::Ok().finish())
}

#[instrument(skip(state), fields(book_id = %*path))]
pub async fn delete_book(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    state.catalog.delete_book(id).await.map_err(|e| {
        error!(book_id = id, error = %e, "Failed to delete book");
        ApiError::from(e)
    })?;
    Ok(HttpResponse::Ok().finish())
}
