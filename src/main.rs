//! Yardgate Server - Warehouse Check-in System
//!
//! A REST API server for warehouse gate and dock management.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yardgate_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::{
        announcer::{Announcer, AudioSink, CommandAudioSink},
        monitor::spawn_monitor,
        Services,
    },
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("yardgate_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Yardgate Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository.clone(), &config);

    // Start the public monitor when enabled
    let announcer = if config.monitor.enabled {
        let sink: Arc<dyn AudioSink> = Arc::new(CommandAudioSink::new(&config.monitor));
        let announcer = Announcer::spawn(sink, config.monitor.clone());
        spawn_monitor(
            repository,
            announcer.clone(),
            config.monitor.poll_interval_secs,
        );
        tracing::info!("Public monitor started");
        Some(announcer)
    } else {
        None
    };

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        announcer,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Slots
        .route("/slots", get(api::slots::available_slots))
        // Bookings (driver kiosk, unauthenticated)
        .route("/bookings", post(api::drivers::create_booking))
        .route("/bookings/search", get(api::drivers::search_booking))
        .route("/bookings/:code", get(api::drivers::find_booking))
        // Walk-in arrivals
        .route("/arrivals", post(api::drivers::create_arrival))
        // Driver lifecycle
        .route("/drivers", get(api::drivers::list_drivers))
        .route("/drivers/:id", get(api::drivers::get_driver))
        .route("/drivers/:id/confirm-arrival", post(api::drivers::confirm_arrival))
        .route("/drivers/:id/verify", post(api::drivers::verify_driver))
        .route("/drivers/:id/reject", post(api::drivers::reject_driver))
        .route("/drivers/:id/call", post(api::drivers::call_driver))
        .route("/drivers/:id/recall", post(api::drivers::recall_driver))
        .route("/drivers/:id/start-loading", post(api::drivers::start_loading))
        .route("/drivers/:id/complete", post(api::drivers::complete_visit))
        // Gates
        .route("/gates", get(api::gates::list_gates))
        .route("/gates/:gate_id", get(api::gates::get_gate))
        .route("/gates/:gate_id", put(api::gates::save_gate))
        .route("/gates/:gate_id", delete(api::gates::delete_gate))
        // Public monitor
        .route("/monitor/unlock", post(api::monitor::unlock_audio))
        // Statistics
        .route("/stats", get(api::stats::get_stats))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
