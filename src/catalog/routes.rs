use axum::{
    Router,
    routing::{get, post},
};

use super::handlers;
use crate::utils::types::Pool;

pub fn get_routes() -> Router<Pool> {
    Router::new()
        .route(
            "/categories",
            get(handlers::get_categories).post(handlers::create_category),
        )
        .route(
            "/categories/{id}/sub-categories",
            get(handlers::get_sub_categories),
        )
        .route("/sub-categories", post(handlers::create_sub_category))
        .route(
            "/brands",
            get(handlers::get_brands).post(handlers::create_brand),
        )
        .route(
            "/business-types",
            get(handlers::get_business_types).post(handlers::create_business_type),
        )
}
