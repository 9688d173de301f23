use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use std::env;

use crate::utils::types::Pool;

pub async fn get_pool() -> Result<Pool, String> {
    let db_url =
        env::var("DATABASE_URL").map_err(|e| format!("DATABASE_URL must be set: {}", e))?;

    let manager = AsyncDieselConnectionManager::new(db_url);
    bb8::Pool::builder()
        .build(manager)
        .await
        .map_err(|e| format!("failed to create db pool: {}", e))
}
