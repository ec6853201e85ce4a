//! # Cyberwatch API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    config.log_summary();

    // Uploaded images are served from disk; the directory must exist
    // before the static file service mounts it.
    tokio::fs::create_dir_all(&config.uploads.dir).await?;

    let state = AppState::new(&config).await;

    tracing::info!(
        "Starting Cyberwatch API Server on {}:{}",
        config.host,
        config.port
    );

    let server_state = state.clone();
    let upload_dir = config.uploads.dir.clone();
    let cors_origins = config.cors_allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::cors::cors(&cors_origins))
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(server_state.clone()))
            .configure(handlers::configure_routes)
            .service(actix_files::Files::new("/uploads", &upload_dir))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    tracing::info!("Server stopped, shutting down");
    shutdown(state).await;

    Ok(())
}

#[cfg(feature = "postgres")]
async fn shutdown(state: AppState) {
    let AppState {
        accounts, posts, db, ..
    } = state;
    // The services hold the repositories, which share the pool.
    drop((accounts, posts));

    let Some(db) = db else {
        return;
    };
    match std::sync::Arc::try_unwrap(db) {
        Ok(db) => {
            if let Err(e) = db.close().await {
                tracing::error!("Failed to close database connections: {}", e);
            }
        }
        Err(_) => tracing::warn!("Database connections still shared at shutdown"),
    }
}

#[cfg(not(feature = "postgres"))]
async fn shutdown(_state: AppState) {}
