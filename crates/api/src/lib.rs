//! # PeerSlot API
//!
//! The API crate provides the web server for the PeerSlot peer matching
//! service. It exposes RESTful endpoints for accounts, availability slots,
//! peer browsing, and match requests.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Provide cross-cutting concerns like authentication and error handling
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for authentication, logging, and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::Router;
use eyre::Result;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// This struct encapsulates dependencies that are shared across the
/// application, such as the database connection pool and the session
/// settings the auth layer needs.
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,

    /// Lifetime of newly opened sessions, in days
    pub session_ttl_days: i64,
}

/// Starts the API server with the provided configuration and database connection
///
/// This function initializes the application, sets up logging, configures routes,
/// and starts the HTTP server.
///
/// # Arguments
///
/// * `config` - API configuration including host, port, and other settings
/// * `db_pool` - PostgreSQL connection pool for database operations
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let state = Arc::new(ApiState {
        db_pool,
        session_ttl_days: config.session_ttl_days,
    });

    // Build the application router with all routes
    let app = Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Account and session endpoints
        .merge(routes::auth::routes())
        // Own-availability endpoints
        .merge(routes::slot::routes())
        // Peer browsing endpoints
        .merge(routes::peer::routes())
        // Match request endpoints
        .merge(routes::match_request::routes())
        // Attach shared state to all routes
        .with_state(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<axum::http::HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(axum::error_handling::HandleErrorLayer::new(
                |_: tower::BoxError| async { axum::http::StatusCode::REQUEST_TIMEOUT },
            ))
            .timeout(std::time::Duration::from_secs(config.request_timeout))
            .into_inner(),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
