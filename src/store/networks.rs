use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::OptionalExtension;
use diesel_async::RunQueryDsl;

use crate::db::pool::DbPool;
use crate::db::schema::networks;
use crate::error::StoreError;
use crate::models::network::{Network, NewNetwork, UpdateNetwork};
use crate::store::Page;

/// Optional criteria for network queries.
#[derive(Debug, Default)]
pub struct NetworkFilter {
    pub owner_id: Option<i32>,
    /// Integration type, e.g. `"mastodon"`.
    pub network_type: Option<String>,
}

/// Query surface for the `networks` table.
pub struct Networks<'a> {
    pool: &'a DbPool,
}

impl<'a> Networks<'a> {
    pub(crate) fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, id: i32) -> Result<Option<Network>, StoreError> {
        let mut conn = self.pool.get().await?;

        let network = networks::table
            .find(id)
            .select(Network::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(network)
    }

    pub async fn get(&self, id: i32) -> Result<Network, StoreError> {
        self.find(id)
            .await?
            .ok_or(StoreError::not_found("network"))
    }

    pub async fn first(&self, filter: &NetworkFilter) -> Result<Option<Network>, StoreError> {
        let mut conn = self.pool.get().await?;

        let network = apply_filter(networks::table.into_boxed(), filter)
            .order(networks::id.asc())
            .first::<Network>(&mut conn)
            .await
            .optional()?;

        Ok(network)
    }

    pub async fn list(
        &self,
        filter: &NetworkFilter,
        page: Page,
    ) -> Result<Vec<Network>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = apply_filter(networks::table.into_boxed(), filter)
            .order(networks::id.asc())
            .limit(page.limit)
            .offset(page.offset)
            .load::<Network>(&mut conn)
            .await?;

        Ok(list)
    }

    /// All networks owned by a user, unpaginated.
    pub async fn list_for_owner(&self, owner_id: i32) -> Result<Vec<Network>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = networks::table
            .filter(networks::owner_id.eq(owner_id))
            .order(networks::id.asc())
            .select(Network::as_select())
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    pub async fn count(&self, filter: &NetworkFilter) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await?;

        let count = apply_filter(networks::table.count().into_boxed(), filter)
            .get_result(&mut conn)
            .await?;

        Ok(count)
    }

    pub async fn create(&self, new: NewNetwork<'_>) -> Result<Network, StoreError> {
        let mut conn = self.pool.get().await?;

        let network = diesel::insert_into(networks::table)
            .values(&new)
            .returning(Network::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(network)
    }

    pub async fn create_many(&self, rows: Vec<NewNetwork<'_>>) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await?;

        let inserted = diesel::insert_into(networks::table)
            .values(&rows)
            .execute(&mut conn)
            .await?;

        Ok(inserted)
    }

    pub async fn update(&self, id: i32, changes: UpdateNetwork) -> Result<Network, StoreError> {
        let mut conn = self.pool.get().await?;

        let network = diesel::update(networks::table.find(id))
            .set(&changes)
            .returning(Network::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?
            .ok_or(StoreError::not_found("network"))?;

        Ok(network)
    }

    /// Delete a network. Tokens, grants, and posted rows cascade.
    pub async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(networks::table.find(id))
            .execute(&mut conn)
            .await?;

        if deleted == 0 {
            return Err(StoreError::not_found("network"));
        }

        Ok(())
    }

    pub async fn delete_for_owner(&self, owner_id: i32) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(networks::table.filter(networks::owner_id.eq(owner_id)))
            .execute(&mut conn)
            .await?;

        Ok(deleted)
    }
}

fn apply_filter<'a, ST>(
    mut query: networks::BoxedQuery<'a, Pg, ST>,
    filter: &NetworkFilter,
) -> networks::BoxedQuery<'a, Pg, ST> {
    if let Some(owner_id) = filter.owner_id {
        query = query.filter(networks::owner_id.eq(owner_id));
    }
    if let Some(ref network_type) = filter.network_type {
        query = query.filter(networks::network_type.eq(network_type.clone()));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_combines_owner_and_type() {
        let filter = NetworkFilter {
            owner_id: Some(7),
            network_type: Some("mastodon".to_string()),
        };
        let query = apply_filter(networks::table.into_boxed::<Pg>(), &filter);
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("\"networks\".\"owner_id\" = $1"), "got: {sql}");
        assert!(
            sql.contains("\"networks\".\"network_type\" = $2"),
            "got: {sql}"
        );
    }
}
