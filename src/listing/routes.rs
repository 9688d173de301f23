use axum::{
    Router,
    routing::{get, patch},
};

use super::handlers;
use crate::utils::types::Pool;

pub fn get_routes() -> Router<Pool> {
    Router::new()
        .route(
            "/listings",
            get(handlers::latest_listings).post(handlers::create_listing),
        )
        .route("/listings/mine", get(handlers::get_my_listings))
        .route("/listings/featured", get(handlers::featured_listings))
        .route("/listings/search", get(handlers::search_listings))
        .route(
            "/listings/{id}",
            get(handlers::get_listing).delete(handlers::remove_listing),
        )
        .route("/listings/{id}/status", patch(handlers::set_listing_status))
        .route(
            "/listings/{id}/featured",
            patch(handlers::set_listing_featured),
        )
        .route(
            "/listings/{id}/purchase-contact",
            get(handlers::purchase_contact),
        )
        .route("/categories/{id}/listings", get(handlers::category_listings))
        .route(
            "/business-types/{id}/listings",
            get(handlers::business_type_listings),
        )
}
