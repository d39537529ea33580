//! Bucket Gateway
//!
//! Small HTTP service in front of an S3 bucket built on Actix-Web.
//! Lists the objects under `images/` and `data/` with their public URLs and
//! accepts single-file uploads stored under timestamped keys.

use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use anyhow::Context;
use tracing::info;
use tracing_actix_web::TracingLogger;
use std::sync::Arc;

mod api;
mod config;
mod domain;
mod gallery;
mod storage;

use crate::config::Settings;
use crate::gallery::Gallery;
use crate::storage::S3Store;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Settings,
    pub gallery: Gallery,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bucket_gateway=info".parse()?)
                .add_directive("actix_web=info".parse()?)
        )
        .json()
        .init();

    let settings = Settings::load().context("Failed to load configuration")?;
    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);

    info!(
        "Starting Bucket Gateway v{} on {}",
        env!("CARGO_PKG_VERSION"),
        bind_addr
    );

    let store = S3Store::connect(&settings.storage)
        .await
        .context("Failed to initialize S3 client")?;
    let base_url = settings.storage.public_base_url();
    info!(bucket = %store.bucket(), base_url = %base_url, "Serving bucket");

    let workers = settings.server.workers.unwrap_or_else(|| num_cpus::get() * 2);

    // Create shared application state
    let app_state = web::Data::new(AppState {
        gallery: Gallery::new(Arc::new(store), base_url),
        settings,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .wrap(
                middleware::DefaultHeaders::new()
                    .add(("X-Service", "bucket-gateway"))
                    .add(("X-Version", env!("CARGO_PKG_VERSION")))
            )
            .configure(api::configure_routes)
    })
    .workers(workers)
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .run()
    .await?;

    Ok(())
}
