use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};
use biblioteca_api::application::auth::AuthService;
use biblioteca_api::application::catalog::CatalogService;
use biblioteca_api::application::importer;
use biblioteca_api::data::sqlite::SqliteBookRepository;
use biblioteca_api::infrastructure::config::Config;
use biblioteca_api::infrastructure::logging::init_logging;
use biblioteca_api::presentation::auth::login;
use biblioteca_api::presentation::handlers::{
    AppState, create_book, delete_book, first_book, index, list_books, update_book,
};
use biblioteca_api::presentation::middleware::{RequestLogMiddleware, TokenGuard};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let config = Config::from_env()?;
    info!(port = config.port, "Configuration loaded");

    let repository = SqliteBookRepository::connect(&config.database_url).await?;
    repository.init_schema().await?;
    info!("Database schema ready");

    // One-time seeding, guarded by the empty-table check inside. Any import
    // error aborts startup; rows inserted before the failure remain.
    let imported = importer::seed_if_empty(&repository, Path::new(importer::SEED_FILE)).await?;
    if imported > 0 {
        info!(rows = imported, "Seeded catalog from {}", importer::SEED_FILE);
    }

    let catalog = CatalogService::new(Arc::new(repository));
    let auth = AuthService::new(&config);
    let state = web::Data::new(AppState { catalog, auth });

    let auth_token = config.auth_token.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            // Registration is inside-out: requests pass through the request
            // log, then CORS, then the JSON default header, then the token
            // gate, before routing.
            .wrap(TokenGuard::new(auth_token.clone()))
            .wrap(DefaultHeaders::new().add((header::CONTENT_TYPE, "application/json")))
            .wrap(Cors::permissive())
            .wrap(RequestLogMiddleware)
            .route("/", web::get().to(index))
            .route("/books", web::get().to(list_books))
            .route("/books/first", web::get().to(first_book))
            .route("/books", web::post().to(create_book))
            .route("/books/{id}", web::put().to(update_book))
            .route("/books/{id}", web::delete().to(delete_book))
            .route("/login", web::post().to(login))
    });

    let bind_addr = ("0.0.0.0", config.port);
    info!(address = %format!("{}:{}", bind_addr.0, bind_addr.1), "Starting HTTP server");
    server.bind(bind_addr)?.run().await?;

    Ok(())
}
