use diesel::prelude::*;
use diesel::result::OptionalExtension;
use diesel_async::RunQueryDsl;

use crate::db::pool::DbPool;
use crate::db::schema::network_tokens;
use crate::error::StoreError;
use crate::models::network_token::{NetworkToken, NewNetworkToken};

/// Query surface for the `network_tokens` table.
pub struct NetworkTokens<'a> {
    pool: &'a DbPool,
}

impl<'a> NetworkTokens<'a> {
    pub(crate) fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    pub async fn find(
        &self,
        network_id: i32,
        token_name: &str,
    ) -> Result<Option<NetworkToken>, StoreError> {
        let mut conn = self.pool.get().await?;

        let token = network_tokens::table
            .find((network_id, token_name))
            .select(NetworkToken::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(token)
    }

    pub async fn get(
        &self,
        network_id: i32,
        token_name: &str,
    ) -> Result<NetworkToken, StoreError> {
        self.find(network_id, token_name)
            .await?
            .ok_or(StoreError::not_found("network token"))
    }

    pub async fn list_for_network(
        &self,
        network_id: i32,
    ) -> Result<Vec<NetworkToken>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = network_tokens::table
            .filter(network_tokens::network_id.eq(network_id))
            .order(network_tokens::token_name.asc())
            .select(NetworkToken::as_select())
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    pub async fn count_for_network(&self, network_id: i32) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await?;

        let count = network_tokens::table
            .filter(network_tokens::network_id.eq(network_id))
            .count()
            .get_result(&mut conn)
            .await?;

        Ok(count)
    }

    pub async fn create(&self, new: NewNetworkToken<'_>) -> Result<NetworkToken, StoreError> {
        let mut conn = self.pool.get().await?;

        let token = diesel::insert_into(network_tokens::table)
            .values(&new)
            .returning(NetworkToken::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(token)
    }

    /// Store the credential, replacing the value in place when the name is
    /// already taken for this network (token rotation).
    pub async fn upsert(&self, new: NewNetworkToken<'_>) -> Result<NetworkToken, StoreError> {
        let mut conn = self.pool.get().await?;

        let token = diesel::insert_into(network_tokens::table)
            .values(&new)
            .on_conflict((network_tokens::network_id, network_tokens::token_name))
            .do_update()
            .set(network_tokens::token.eq(new.token))
            .returning(NetworkToken::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(token)
    }

    pub async fn delete(&self, network_id: i32, token_name: &str) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(network_tokens::table.find((network_id, token_name)))
            .execute(&mut conn)
            .await?;

        if deleted == 0 {
            return Err(StoreError::not_found("network token"));
        }

        Ok(())
    }

    pub async fn delete_for_network(&self, network_id: i32) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(
            network_tokens::table.filter(network_tokens::network_id.eq(network_id)),
        )
        .execute(&mut conn)
        .await?;

        Ok(deleted)
    }
}
