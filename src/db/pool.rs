use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;

use crate::error::StoreError;

pub type DbPool = Pool<AsyncPgConnection>;

/// Create a Diesel async connection pool.
pub fn connect(database_url: &str, max_connections: usize) -> Result<DbPool, StoreError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    let pool = Pool::builder(manager)
        .max_size(max_connections)
        .build()
        .map_err(|err| StoreError::Initialization(err.to_string()))?;

    tracing::info!(max_connections, "database pool created");

    Ok(pool)
}
