use anyhow::Context;
use axum::Router;
use deadpool::managed::Pool;
use diesel_async::{pooled_connection::AsyncDieselConnectionManager, AsyncPgConnection};

pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod repo;
pub mod schema;

pub type DbPool = Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// Builds the connection pool. Connections are opened lazily, so an
/// unreachable database only surfaces on the first query.
pub fn connect_to_db(db_url: &str, pool_size: usize) -> anyhow::Result<DbPool> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(db_url);
    Pool::builder(manager)
        .max_size(pool_size)
        .build()
        .context("failed to build database pool")
}

pub fn app() -> Router {
    Router::new().nest("/api", api::app())
}
