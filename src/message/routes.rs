use axum::{
    Router,
    routing::{get, patch, post},
};

use super::handlers;
use crate::utils::types::Pool;

pub fn get_routes() -> Router<Pool> {
    Router::new()
        .route("/merchants/{id}/messages", post(handlers::send_message))
        .route("/messages", get(handlers::get_messages))
        .route("/messages/unread-count", get(handlers::unread_count))
        .route("/messages/{id}/read", patch(handlers::mark_read))
}
