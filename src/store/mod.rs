//! The query surface of the store: one delegate per table, plus
//! transactions and raw SQL on [`Store`] itself.

pub mod attachments;
pub mod contents;
pub mod network_members;
pub mod network_tokens;
pub mod networks;
pub mod post_editors;
pub mod posted_content_attachments;
pub mod posted_contents;
pub mod posts;
pub mod users;

use diesel_async::pooled_connection::deadpool::Object;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use scoped_futures::ScopedBoxFuture;

use crate::config::Config;
use crate::db::pool::{self, DbPool};
use crate::error::StoreError;

pub use attachments::Attachments;
pub use contents::Contents;
pub use network_members::NetworkMembers;
pub use network_tokens::NetworkTokens;
pub use networks::{NetworkFilter, Networks};
pub use post_editors::PostEditors;
pub use posted_content_attachments::PostedContentAttachments;
pub use posted_contents::{PostedContentFilter, PostedContents};
pub use posts::Posts;
pub use users::{UserFilter, Users};

/// A checked-out pooled connection.
pub type PooledConnection = Object<AsyncPgConnection>;

/// Limit/offset pagination for list operations.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Limit is clamped to 1..=500, offset to >= 0.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, 500),
            offset: offset.max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

/// Database client for the Syndica schema.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct Store {
    pool: DbPool,
}

impl Store {
    /// Build the connection pool and verify the database is reachable.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let pool = pool::connect(&config.database_url, config.max_connections)?;

        // Fail fast on a bad URL or unreachable server instead of on the
        // first query.
        pool.get()
            .await
            .map_err(|err| StoreError::Initialization(err.to_string()))?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool. Used by callers that manage their own pool.
    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Check out a connection for composing diesel queries directly.
    pub async fn conn(&self) -> Result<PooledConnection, StoreError> {
        Ok(self.pool.get().await?)
    }

    /// Close the pool. Waiting checkouts fail immediately afterwards.
    pub fn close(&self) {
        self.pool.close();
        tracing::info!("database pool closed");
    }

    /// Run `callback` inside a database transaction. The transaction commits
    /// when the callback returns `Ok` and rolls back on `Err`.
    pub async fn transaction<'a, R, F>(&self, callback: F) -> Result<R, StoreError>
    where
        F: for<'r> FnOnce(
                &'r mut AsyncPgConnection,
            ) -> ScopedBoxFuture<'a, 'r, Result<R, StoreError>>
            + Send
            + 'a,
        R: Send + 'a,
    {
        let mut conn = self.pool.get().await?;
        let conn: &mut AsyncPgConnection = &mut conn;
        conn.transaction(callback).await
    }

    /// Execute a raw SQL statement and return the affected row count.
    pub async fn execute_raw(&self, sql: &str) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await?;
        let affected = diesel::sql_query(sql).execute(&mut conn).await?;
        Ok(affected)
    }

    /// Run a raw SQL query and deserialize the rows by column name.
    pub async fn query_raw<T>(&self, sql: &str) -> Result<Vec<T>, StoreError>
    where
        T: diesel::deserialize::QueryableByName<diesel::pg::Pg> + Send + 'static,
    {
        let mut conn = self.pool.get().await?;
        let rows = diesel::sql_query(sql).load(&mut conn).await?;
        Ok(rows)
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(&self.pool)
    }

    pub fn networks(&self) -> Networks<'_> {
        Networks::new(&self.pool)
    }

    pub fn network_tokens(&self) -> NetworkTokens<'_> {
        NetworkTokens::new(&self.pool)
    }

    pub fn network_members(&self) -> NetworkMembers<'_> {
        NetworkMembers::new(&self.pool)
    }

    pub fn posts(&self) -> Posts<'_> {
        Posts::new(&self.pool)
    }

    pub fn post_editors(&self) -> PostEditors<'_> {
        PostEditors::new(&self.pool)
    }

    pub fn attachments(&self) -> Attachments<'_> {
        Attachments::new(&self.pool)
    }

    pub fn contents(&self) -> Contents<'_> {
        Contents::new(&self.pool)
    }

    pub fn posted_contents(&self) -> PostedContents<'_> {
        PostedContents::new(&self.pool)
    }

    pub fn posted_content_attachments(&self) -> PostedContentAttachments<'_> {
        PostedContentAttachments::new(&self.pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_clamps_limit_and_offset() {
        let page = Page::new(0, -5);
        assert_eq!(page.limit, 1);
        assert_eq!(page.offset, 0);

        let page = Page::new(10_000, 20);
        assert_eq!(page.limit, 500);
        assert_eq!(page.offset, 20);
    }

    #[test]
    fn page_defaults() {
        let page = Page::default();
        assert_eq!(page.limit, 50);
        assert_eq!(page.offset, 0);
    }
}
