pub mod api;
pub mod pages;
pub mod session;

use std::sync::Arc;

use actix_web::web;
use sea_orm::DatabaseConnection;
use tera::Tera;

use crate::core::{TextGenerator, TranscriptSource};
use crate::error::{Error, Result};
use crate::service::auth::AuthService;
use crate::service::blog::BlogService;

const MAX_JSON_PAYLOAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub blogs: BlogService,
    pub auth: AuthService,
    pub transcripts: Arc<dyn TranscriptSource>,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        transcripts: Arc<dyn TranscriptSource>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            blogs: BlogService::new(db.clone()),
            auth: AuthService::new(db),
            transcripts,
            generator,
        }
    }
}

/// Templates are compiled into the binary; there is no template directory
/// to ship next to it.
pub fn templates() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("home.html", include_str!("../../templates/home.html")),
        ("index.html", include_str!("../../templates/index.html")),
        ("login.html", include_str!("../../templates/login.html")),
        ("signup.html", include_str!("../../templates/signup.html")),
        ("blog_list.html", include_str!("../../templates/blog_list.html")),
        (
            "blog_details.html",
            include_str!("../../templates/blog_details.html"),
        ),
    ])?;
    Ok(tera)
}

/// Malformed JSON gets the same `{"error": ...}` body as every other
/// client error instead of the framework default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_PAYLOAD)
        .error_handler(|err, _req| Error::validation(err.to_string()).into())
}

/// Builds the full app (state, templates, session middleware, routes)
/// inside `actix_web::test::init_service`.
#[cfg(test)]
#[macro_export]
macro_rules! init_test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state.clone()))
                .app_data(actix_web::web::Data::new($crate::web::templates().unwrap()))
                .app_data($crate::web::json_config())
                .wrap(actix_session::SessionMiddleware::new(
                    actix_session::storage::CookieSessionStore::default(),
                    actix_web::cookie::Key::generate(),
                ))
                .configure($crate::web::routes),
        )
    };
}


pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(pages::home))
        .route("/index", web::get().to(pages::index))
        .route("/login", web::get().to(pages::login_page))
        .route("/login", web::post().to(pages::login))
        .route("/signup", web::get().to(pages::signup_page))
        .route("/signup", web::post().to(pages::signup))
        .route("/logout", web::post().to(pages::logout))
        .service(
            web::resource("/generate-blog")
                .route(web::post().to(api::generate_blog))
                .default_service(web::route().to(api::method_not_allowed)),
        )
        .route("/blog-list", web::get().to(pages::blog_list))
        .route("/blog-details/{id}", web::get().to(pages::blog_details))
        .route("/delete-blog/{id}/", web::delete().to(api::delete_blog));
}
