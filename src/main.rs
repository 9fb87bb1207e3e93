mod config;
mod core;
mod db;
mod error;
mod service;
mod web;

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use clap::Parser;

use crate::config::AppConfig;
use crate::core::{ContentGenerator, TranscriptResolver};
use crate::error::Result;

#[derive(Parser)]
#[command(name = "blogify")]
#[command(about = "AI blog generator for YouTube videos")]
#[command(version = "0.1.0")]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Override the DATABASE_URL environment variable
    #[arg(long)]
    database_url: Option<String>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let app_config = AppConfig::from_env()?;

    let database_url = cli
        .database_url
        .unwrap_or_else(|| app_config.database_url.clone());
    let db = db::connect(&database_url).await?;
    db::init_schema(&db).await?;

    let resolver = TranscriptResolver::new(app_config.transcript.clone())?;
    let generator = ContentGenerator::new(app_config.generator.clone());
    let state = web::AppState::new(db, Arc::new(resolver), Arc::new(generator));
    let tera = web::templates()?;
    let session_key = session_key(app_config.session_secret.as_deref());

    log::info!("listening on http://{}:{}", cli.host, cli.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    // Local deployments serve plain http.
                    .cookie_secure(false)
                    .build(),
            )
            .app_data(actix_web::web::Data::new(state.clone()))
            .app_data(actix_web::web::Data::new(tera.clone()))
            .app_data(web::json_config())
            .configure(web::routes)
    })
    .bind((cli.host.as_str(), cli.port))?
    .run()
    .await?;

    Ok(())
}

fn session_key(secret: Option<&str>) -> Key {
    match secret {
        // Config has already enforced the minimum secret length.
        Some(secret) => Key::derive_from(secret.as_bytes()),
        None => Key::generate(),
    }
}
