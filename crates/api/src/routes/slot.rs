use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/slots", get(handlers::slot::list_own_slots))
        .route("/api/slots", post(handlers::slot::create_slot))
        .route("/api/slots/stats", get(handlers::slot::slot_stats))
        .route("/api/slots/rules", get(handlers::slot::slot_rules))
        .route("/api/slots/:id", put(handlers::slot::update_slot))
        .route("/api/slots/:id", delete(handlers::slot::delete_slot))
}
