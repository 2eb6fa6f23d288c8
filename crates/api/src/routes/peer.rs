use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/peers/slots", get(handlers::peer::browse_open_slots))
        .route("/api/peers/:id/slots", get(handlers::peer::peer_slots))
}
