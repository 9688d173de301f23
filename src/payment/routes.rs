use axum::{
    Router,
    routing::{get, post},
};

use super::handlers;
use crate::utils::types::Pool;

pub fn get_routes() -> Router<Pool> {
    Router::new()
        .route("/payments/verify", post(handlers::verify_payment))
        .route("/payments/{id}", get(handlers::get_payment))
        .route("/payments/{id}/checkout", post(handlers::start_checkout))
        .route("/payments/{id}/confirm", post(handlers::confirm_payment))
        .route("/payments/{id}/cancel", post(handlers::cancel_payment))
}
