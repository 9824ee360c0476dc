use diesel::prelude::*;
use diesel::result::OptionalExtension;
use diesel_async::RunQueryDsl;

use crate::db::pool::DbPool;
use crate::db::schema::{networks, networks_users};
use crate::error::StoreError;
use crate::models::network::Network;
use crate::models::network_member::{NetworkMember, NewNetworkMember};

/// Query surface for the `networks_users` table: who may do what on a
/// network besides its owner.
pub struct NetworkMembers<'a> {
    pool: &'a DbPool,
}

impl<'a> NetworkMembers<'a> {
    pub(crate) fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    pub async fn find(
        &self,
        networks_id: i32,
        granter_id: i32,
        grantee_id: i32,
    ) -> Result<Option<NetworkMember>, StoreError> {
        let mut conn = self.pool.get().await?;

        let member = networks_users::table
            .find((networks_id, granter_id, grantee_id))
            .select(NetworkMember::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(member)
    }

    pub async fn get(
        &self,
        networks_id: i32,
        granter_id: i32,
        grantee_id: i32,
    ) -> Result<NetworkMember, StoreError> {
        self.find(networks_id, granter_id, grantee_id)
            .await?
            .ok_or(StoreError::not_found("network grant"))
    }

    pub async fn list_for_network(
        &self,
        networks_id: i32,
    ) -> Result<Vec<NetworkMember>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = networks_users::table
            .filter(networks_users::networks_id.eq(networks_id))
            .order((
                networks_users::grantee_id.asc(),
                networks_users::granter_id.asc(),
            ))
            .select(NetworkMember::as_select())
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    pub async fn list_for_grantee(
        &self,
        grantee_id: i32,
    ) -> Result<Vec<NetworkMember>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = networks_users::table
            .filter(networks_users::grantee_id.eq(grantee_id))
            .order(networks_users::networks_id.asc())
            .select(NetworkMember::as_select())
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    /// The networks a user has been granted access to, deduplicated across
    /// granters.
    pub async fn networks_for_user(&self, user_id: i32) -> Result<Vec<Network>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = networks_users::table
            .inner_join(networks::table)
            .filter(networks_users::grantee_id.eq(user_id))
            .order(networks::id.asc())
            .select(Network::as_select())
            .distinct()
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    pub async fn count_for_network(&self, networks_id: i32) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await?;

        let count = networks_users::table
            .filter(networks_users::networks_id.eq(networks_id))
            .count()
            .get_result(&mut conn)
            .await?;

        Ok(count)
    }

    pub async fn create(&self, new: NewNetworkMember) -> Result<NetworkMember, StoreError> {
        let mut conn = self.pool.get().await?;

        let member = diesel::insert_into(networks_users::table)
            .values(&new)
            .returning(NetworkMember::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(member)
    }

    /// Grant access, or replace the permission bits of an existing grant.
    pub async fn upsert(&self, new: NewNetworkMember) -> Result<NetworkMember, StoreError> {
        let mut conn = self.pool.get().await?;

        let member = diesel::insert_into(networks_users::table)
            .values(&new)
            .on_conflict((
                networks_users::networks_id,
                networks_users::granter_id,
                networks_users::grantee_id,
            ))
            .do_update()
            .set(networks_users::permission.eq(new.permission))
            .returning(NetworkMember::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(member)
    }

    pub async fn delete(
        &self,
        networks_id: i32,
        granter_id: i32,
        grantee_id: i32,
    ) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(
            networks_users::table.find((networks_id, granter_id, grantee_id)),
        )
        .execute(&mut conn)
        .await?;

        if deleted == 0 {
            return Err(StoreError::not_found("network grant"));
        }

        Ok(())
    }

    pub async fn delete_for_network(&self, networks_id: i32) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(
            networks_users::table.filter(networks_users::networks_id.eq(networks_id)),
        )
        .execute(&mut conn)
        .await?;

        Ok(deleted)
    }
}
