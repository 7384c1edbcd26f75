use actix_web::middleware::{Logger, NormalizePath, from_fn};
use actix_web::web::Data;
use actix_web::{App, HttpResponse, HttpServer, Responder, get};
use anyhow::Context;

mod api;
mod auth;
mod backend;
mod config;
mod dashboard;
mod docs;
mod error;
mod forms;
mod model;
mod models;
mod receipt;
mod routes;
mod state;
mod utils;

use config::Config;

use crate::auth::middleware::session_middleware;
use crate::docs::ApiDoc;
use crate::state::AppState;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Login landing. A signed-in visitor never gets here: the session guard
/// sends them to `/dashboard`.
#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "data": { "login": "/auth/login", "docs": "/swagger-ui/" }
    }))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(backend = %config.backend_url, "Server starting...");

    let server_addr = config.server_addr.clone();
    let state = Data::new(AppState::new(config.clone()));

    HttpServer::new(move || {
        App::new()
            .wrap(from_fn(session_middleware))
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(state.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, config.clone()))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {server_addr}"))?
    .run()
    .await
    .context("server error")
}
