use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/match-requests",
            get(handlers::match_request::incoming_requests),
        )
        .route(
            "/api/match-requests",
            post(handlers::match_request::create_match_request),
        )
        .route(
            "/api/match-requests/:id/accept",
            post(handlers::match_request::accept_request),
        )
        .route(
            "/api/match-requests/:id/reject",
            post(handlers::match_request::reject_request),
        )
        .route(
            "/api/match-requests/:id/cancel",
            post(handlers::match_request::cancel_request),
        )
}
