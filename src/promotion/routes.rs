use axum::{
    Router,
    routing::{get, post},
};

use super::handlers;
use crate::utils::types::Pool;

pub fn get_routes() -> Router<Pool> {
    Router::new()
        .route(
            "/promotion-options",
            get(handlers::get_promotion_options).post(handlers::create_promotion_option),
        )
        .route("/listings/{id}/promotions", post(handlers::purchase_promotion))
        .route("/promotions/mine", get(handlers::my_promotions))
        .route(
            "/ad-slots",
            get(handlers::get_ad_slots).post(handlers::create_ad_slot),
        )
        .route("/advertisements", post(handlers::purchase_ad))
        .route("/advertisements/mine", get(handlers::my_ads))
}
