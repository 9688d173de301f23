use axum::{
    Router,
    routing::{get, patch, post},
};

use super::handlers;
use crate::utils::types::Pool;

pub fn get_routes() -> Router<Pool> {
    Router::new()
        .route("/listings/{id}/offers", post(handlers::create_offer))
        .route("/offers", get(handlers::list_offers))
        .route("/offers/{id}", patch(handlers::respond_offer))
}
