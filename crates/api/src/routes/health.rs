use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::ApiState;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    database: String,
}

#[derive(Serialize)]
struct VersionResponse {
    version: String,
}

async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.db_pool).await {
        Ok(_) => "ok",
        Err(_) => "unreachable",
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        database: database.to_string(),
    })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
}
