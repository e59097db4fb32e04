use actix_cors::Cors;
use actix_web::http::{StatusCode, header};
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, test, web};
use biblioteca_api::application::auth::AuthService;
use biblioteca_api::application::catalog::CatalogService;
use biblioteca_api::data::sqlite::SqliteBookRepository;
use biblioteca_api::domain::book::{Book, BookDraft};
use biblioteca_api::infrastructure::config::Config;
use biblioteca_api::presentation::auth::login;
use biblioteca_api::presentation::handlers::{
    AppState, create_book, delete_book, first_book, index, list_books, update_book,
};
use biblioteca_api::presentation::middleware::TokenGuard;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

const TOKEN: &str = "test-secret-token";

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        auth_token: TOKEN.to_string(),
        login_email: "admin@example.com".to_string(),
        login_password: "obrete-sesam".to_string(),
    }
}

macro_rules! setup_test {
    () => {{
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let repository = SqliteBookRepository::new(pool);
        repository.init_schema().await.unwrap();

        let config = test_config();
        let catalog = CatalogService::new(Arc::new(repository));
        let auth = AuthService::new(&config);
        let state = web::Data::new(AppState { catalog, auth });

        test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(TokenGuard::new(config.auth_token.clone()))
                .wrap(DefaultHeaders::new().add((header::CONTENT_TYPE, "application/json")))
                .wrap(Cors::permissive())
                .route("/", web::get().to(index))
                .route("/books", web::get().to(list_books))
                .route("/books/first", web::get().to(first_book))
                .route("/books", web::post().to(create_book))
                .route("/books/{id}", web::put().to(update_book))
                .route("/books/{id}", web::delete().to(delete_book))
                .route("/login", web::post().to(login)),
        )
        .await
    }};
}

fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {TOKEN}"))
}

fn draft(titol: &str, autor: &str) -> BookDraft {
    BookDraft {
        titol: titol.to_string(),
        autor: autor.to_string(),
        ..Default::default()
    }
}

#[actix_web::test]
async fn greeting_is_plain_text() {
    let app = setup_test!();

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body, "Hello World");
}

#[actix_web::test]
async fn list_on_empty_catalog_is_an_empty_array() {
    let app = setup_test!();

    let req = test::TestRequest::get().uri("/books").to_request();
    let books: Vec<Book> = test::call_and_read_body_json(&app, req).await;
    assert!(books.is_empty());
}

#[actix_web::test]
async fn created_book_shows_up_in_list_with_assigned_id() {
    let app = setup_test!();

    let req = test::TestRequest::post()
        .uri("/books")
        .insert_header(bearer())
        .set_json(draft("Dune", "Herbert"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri("/books").to_request();
    let books: Vec<Book> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, 1);
    assert_eq!(books[0].titol, "Dune");
    assert_eq!(books[0].autor, "Herbert");
    // Fields absent from the payload decode as empty strings.
    assert_eq!(books[0].prestatge, "");
    assert_eq!(books[0].notes, "");
}

#[actix_web::test]
async fn update_replaces_fields_and_keeps_the_id() {
    let app = setup_test!();

    let req = test::TestRequest::post()
        .uri("/books")
        .insert_header(bearer())
        .set_json(draft("Dune", "Herbert"))
        .to_request();
    test::call_service(&app, req).await;

    let updated = BookDraft {
        titol: "Dune Messiah".to_string(),
        autor: "Frank Herbert".to_string(),
        prestatge: "A2".to_string(),
        idioma: "Anglès".to_string(),
        ..Default::default()
    };
    let req = test::TestRequest::put()
        .uri("/books/1")
        .insert_header(bearer())
        .set_json(&updated)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/books").to_request();
    let books: Vec<Book> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, 1);
    assert_eq!(books[0].titol, "Dune Messiah");
    assert_eq!(books[0].autor, "Frank Herbert");
    assert_eq!(books[0].prestatge, "A2");
    assert_eq!(books[0].idioma, "Anglès");
}

#[actix_web::test]
async fn update_of_unknown_id_succeeds_with_no_effect() {
    let app = setup_test!();

    let req = test::TestRequest::put()
        .uri("/books/99")
        .insert_header(bearer())
        .set_json(draft("Ghost", "Nobody"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/books").to_request();
    let books: Vec<Book> = test::call_and_read_body_json(&app, req).await;
    assert!(books.is_empty());
}

#[actix_web::test]
async fn deleted_book_disappears_and_a_second_delete_still_succeeds() {
    let app = setup_test!();

    let req = test::TestRequest::post()
        .uri("/books")
        .insert_header(bearer())
        .set_json(draft("Dune", "Herbert"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete()
        .uri("/books/1")
        .insert_header(bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/books").to_request();
    let books: Vec<Book> = test::call_and_read_body_json(&app, req).await;
    assert!(books.is_empty());

    // No existence check: deleting the same id again is still a success.
    let req = test::TestRequest::delete()
        .uri("/books/1")
        .insert_header(bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn deleting_the_max_id_makes_the_next_insert_reuse_it() {
    let app = setup_test!();

    for (t, a) in [("Dune", "Herbert"), ("Fundació", "Asimov")] {
        let req = test::TestRequest::post()
            .uri("/books")
            .insert_header(bearer())
            .set_json(draft(t, a))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::delete()
        .uri("/books/2")
        .insert_header(bearer())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/books")
        .insert_header(bearer())
        .set_json(draft("Neuromàntic", "Gibson"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/books").to_request();
    let books: Vec<Book> = test::call_and_read_body_json(&app, req).await;
    let mut ids: Vec<i64> = books.iter().map(|b| b.id).collect();
    ids.sort();
    assert_eq!(ids, vec![1, 2]);
    assert!(books.iter().any(|b| b.id == 2 && b.titol == "Neuromàntic"));
}

#[actix_web::test]
async fn emptying_the_catalog_resets_the_sequence() {
    let app = setup_test!();

    let req = test::TestRequest::post()
        .uri("/books")
        .insert_header(bearer())
        .set_json(draft("Dune", "Herbert"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete()
        .uri("/books/1")
        .insert_header(bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/books")
        .insert_header(bearer())
        .set_json(draft("Solaris", "Lem"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/books").to_request();
    let books: Vec<Book> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, 1);
}

#[actix_web::test]
async fn malformed_json_on_create_is_rejected_without_mutation() {
    let app = setup_test!();

    let req = test::TestRequest::post()
        .uri("/books")
        .insert_header(bearer())
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/books").to_request();
    let books: Vec<Book> = test::call_and_read_body_json(&app, req).await;
    assert!(books.is_empty());
}

#[actix_web::test]
async fn malformed_json_on_update_is_rejected_without_mutation() {
    let app = setup_test!();

    let req = test::TestRequest::post()
        .uri("/books")
        .insert_header(bearer())
        .set_json(draft("Dune", "Herbert"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::put()
        .uri("/books/1")
        .insert_header(bearer())
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("titol=broken")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/books").to_request();
    let books: Vec<Book> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(books[0].titol, "Dune");
}

#[actix_web::test]
async fn first_book_returns_a_row_from_the_catalog() {
    let app = setup_test!();

    for (t, a) in [("Dune", "Herbert"), ("Fundació", "Asimov")] {
        let req = test::TestRequest::post()
            .uri("/books")
            .insert_header(bearer())
            .set_json(draft(t, a))
            .to_request();
        test::call_service(&app, req).await;
    }

    // No ordering key is defined, so only membership is asserted.
    let req = test::TestRequest::get().uri("/books/first").to_request();
    let book: Book = test::call_and_read_body_json(&app, req).await;
    assert!(["Dune", "Fundació"].contains(&book.titol.as_str()));
}

#[actix_web::test]
async fn first_book_on_empty_catalog_is_a_server_error() {
    let app = setup_test!();

    let req = test::TestRequest::get().uri("/books/first").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // Generic status text only, no error detail.
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Internal Server Error");
}
