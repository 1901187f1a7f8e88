use actix_files::Files;
use actix_web::web;

pub mod auth;
pub mod books;
pub mod pages;

/// Route table. Shared between `main` and the test harness so both serve
/// exactly the same app. The static file service goes last so the API and
/// the gated pages win over the catch-all.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/books", web::get().to(books::list))
        .route("/books", web::post().to(books::create))
        .route("/books/clear", web::post().to(books::clear))
        .route("/books/{id}", web::get().to(books::get))
        .route("/books/{id}", web::put().to(books::update))
        .route("/books/{id}", web::delete().to(books::delete))
        .route("/buy", web::post().to(books::buy))
        .route("/register", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login))
        .route("/logout", web::post().to(auth::logout))
        .route("/buy.html", web::get().to(pages::buy_page))
        .route("/manage.html", web::get().to(pages::manage_page))
        .service(Files::new("/", "public").index_file("index.html"));
}
