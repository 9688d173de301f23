mod auth;
mod catalog;
mod listing;
mod merchant;
mod message;
mod offer;
mod payment;
mod pool;
mod promotion;
mod utils;

use axum::Router;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use listenfd::ListenFd;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/");

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("axum_market=info")),
        )
        .init();

    {
        let mut conn = axum_market::establish_connection();
        conn.run_pending_migrations(MIGRATIONS)
            .expect("failed to run pending migrations");
    }

    let pool = pool::get_pool().await.expect("failed to create db pool");

    let routes = Router::new()
        .merge(catalog::routes::get_routes())
        .merge(merchant::routes::get_routes())
        .merge(listing::routes::get_routes())
        .merge(offer::routes::get_routes())
        .merge(message::routes::get_routes())
        .merge(promotion::routes::get_routes())
        .merge(payment::routes::get_routes())
        .with_state(pool);

    let app = Router::new()
        .nest("/api", routes)
        .fallback(utils::handler_404);

    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0).unwrap() {
        // if we are given a tcp listener on listen fd 0, we use that one
        Some(listener) => {
            listener.set_nonblocking(true).unwrap();
            TcpListener::from_std(listener).unwrap()
        }
        // otherwise fall back to local listening
        None => TcpListener::bind("127.0.0.1:3000").await.unwrap(),
    };
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}
