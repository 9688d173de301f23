use diesel::prelude::*;
use dotenvy::dotenv;
use std::env;

pub mod schema;

/// Sync connection for the embedded migration run at startup; request
/// handlers go through the async pool instead.
pub fn establish_connection() -> PgConnection {
    dotenv().ok();

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    PgConnection::establish(&db_url)
        .unwrap_or_else(|_| panic!("failed to connect to database at {}", db_url))
}
