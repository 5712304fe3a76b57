#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for civic risk aggregation and outbreak prediction.
//!
//! Serves the per-area risk summary for the map, on-demand outbreak
//! predictions for a single area, and the raw record listings. Records
//! are loaded from a JSON file into a [`MemoryStore`] at startup; outbreak
//! predictions are delegated to an external model run as a child process.

mod handlers;

pub mod config;
pub mod outbreak;

use std::fmt::Display;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use civic_risk_predictor::Predictor;
use civic_risk_store::RecordStore;
use civic_risk_store::memory::MemoryStore;

pub use config::ServerConfig;

/// Failure detail shown to clients outside development.
const GENERIC_ERROR: &str = "Internal server error";

/// Shared application state.
pub struct AppState {
    /// Read-only source of civic records.
    pub store: Arc<dyn RecordStore>,
    /// Outbreak model.
    pub predictor: Arc<dyn Predictor>,
    /// Deployment environment name (`APP_ENV`).
    pub environment: String,
}

impl AppState {
    /// Whether failure details may be returned to clients.
    #[must_use]
    pub fn exposes_errors(&self) -> bool {
        self.environment.eq_ignore_ascii_case(config::DEVELOPMENT)
    }

    /// The text placed in a failure response's `error` field.
    #[must_use]
    pub fn error_detail(&self, err: &dyn Display) -> String {
        if self.exposes_errors() {
            err.to_string()
        } else {
            GENERIC_ERROR.to_string()
        }
    }
}

/// Registers the API root and every `/api` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::root)).service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/health-incidents", web::get().to(handlers::health_incidents))
            .route(
                "/sanitation-complaints",
                web::get().to(handlers::sanitation_complaints),
            )
            .route(
                "/environmental-data",
                web::get().to(handlers::environmental_data),
            )
            .route("/area-summary", web::get().to(handlers::area_summary))
            .route("/outbreak-risk", web::get().to(handlers::outbreak_risk)),
    );
}

/// Starts the civic risk API server with configuration from the
/// environment.
///
/// Initializes logging, then delegates to [`serve`]. The caller is
/// responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the record file cannot be loaded
/// or the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    serve(ServerConfig::from_env()).await
}

/// Loads the record store, builds the predictor, and runs the HTTP server
/// until it is shut down.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the record file cannot be loaded
/// or the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let store = MemoryStore::load(&config.data_path)
        .await
        .map_err(std::io::Error::other)?;

    log::info!(
        "Using predictor: {} {}",
        config.predictor_command,
        config.predictor_args.join(" ")
    );
    let predictor = config.predictor();

    let state = web::Data::new(AppState {
        store: Arc::new(store),
        predictor: Arc::new(predictor),
        environment: config.environment.clone(),
    });

    let ServerConfig {
        bind_addr,
        port,
        frontend_url,
        environment,
        ..
    } = config;

    log::info!("Starting server on {bind_addr}:{port} ({environment})");

    HttpServer::new(move || {
        let cors = frontend_url.as_deref().map_or_else(Cors::permissive, |origin| {
            Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header()
                .supports_credentials()
        });

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
            .default_service(web::to(handlers::not_found))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
