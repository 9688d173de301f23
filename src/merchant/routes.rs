use axum::{
    Router,
    routing::{get, post},
};

use super::handlers;
use crate::utils::types::Pool;

pub fn get_routes() -> Router<Pool> {
    Router::new()
        .route("/merchants", post(handlers::register_merchant))
        .route(
            "/merchants/me",
            get(handlers::get_my_profile).patch(handlers::update_my_profile),
        )
        .route(
            "/merchants/{id}",
            get(handlers::get_merchant).delete(handlers::delete_merchant),
        )
}
