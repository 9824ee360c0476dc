use diesel::prelude::*;
use diesel::result::OptionalExtension;
use diesel_async::RunQueryDsl;

use crate::db::pool::DbPool;
use crate::db::schema::contents;
use crate::error::StoreError;
use crate::models::content::{Content, NewContent, UpdateContent};

/// Query surface for the `contents` table.
pub struct Contents<'a> {
    pool: &'a DbPool,
}

impl<'a> Contents<'a> {
    pub(crate) fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, id: i32) -> Result<Option<Content>, StoreError> {
        let mut conn = self.pool.get().await?;

        let content = contents::table
            .find(id)
            .select(Content::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(content)
    }

    pub async fn get(&self, id: i32) -> Result<Content, StoreError> {
        self.find(id)
            .await?
            .ok_or(StoreError::not_found("content"))
    }

    pub async fn list_for_post(&self, posts_id: i32) -> Result<Vec<Content>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = contents::table
            .filter(contents::posts_id.eq(posts_id))
            .order(contents::id.asc())
            .select(Content::as_select())
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    pub async fn count_for_post(&self, posts_id: i32) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await?;

        let count = contents::table
            .filter(contents::posts_id.eq(posts_id))
            .count()
            .get_result(&mut conn)
            .await?;

        Ok(count)
    }

    pub async fn create(&self, new: NewContent<'_>) -> Result<Content, StoreError> {
        let mut conn = self.pool.get().await?;

        let content = diesel::insert_into(contents::table)
            .values(&new)
            .returning(Content::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(content)
    }

    pub async fn create_many(&self, rows: Vec<NewContent<'_>>) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await?;

        let inserted = diesel::insert_into(contents::table)
            .values(&rows)
            .execute(&mut conn)
            .await?;

        Ok(inserted)
    }

    pub async fn update(&self, id: i32, changes: UpdateContent) -> Result<Content, StoreError> {
        let mut conn = self.pool.get().await?;

        let content = diesel::update(contents::table.find(id))
            .set(&changes)
            .returning(Content::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?
            .ok_or(StoreError::not_found("content"))?;

        Ok(content)
    }

    /// Delete a content variant. Posted rows that reference it cascade.
    pub async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(contents::table.find(id))
            .execute(&mut conn)
            .await?;

        if deleted == 0 {
            return Err(StoreError::not_found("content"));
        }

        Ok(())
    }

    pub async fn delete_for_post(&self, posts_id: i32) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(contents::table.filter(contents::posts_id.eq(posts_id)))
            .execute(&mut conn)
            .await?;

        Ok(deleted)
    }
}
