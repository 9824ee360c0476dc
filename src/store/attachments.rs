use diesel::prelude::*;
use diesel::result::OptionalExtension;
use diesel_async::RunQueryDsl;

use crate::db::pool::DbPool;
use crate::db::schema::attachments;
use crate::error::StoreError;
use crate::models::attachment::{Attachment, NewAttachment, UpdateAttachment};

/// Query surface for the `attachments` table.
pub struct Attachments<'a> {
    pool: &'a DbPool,
}

impl<'a> Attachments<'a> {
    pub(crate) fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, id: i32) -> Result<Option<Attachment>, StoreError> {
        let mut conn = self.pool.get().await?;

        let attachment = attachments::table
            .find(id)
            .select(Attachment::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(attachment)
    }

    pub async fn get(&self, id: i32) -> Result<Attachment, StoreError> {
        self.find(id)
            .await?
            .ok_or(StoreError::not_found("attachment"))
    }

    pub async fn list_for_post(&self, posts_id: i32) -> Result<Vec<Attachment>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = attachments::table
            .filter(attachments::posts_id.eq(posts_id))
            .order(attachments::id.asc())
            .select(Attachment::as_select())
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    pub async fn count_for_post(&self, posts_id: i32) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await?;

        let count = attachments::table
            .filter(attachments::posts_id.eq(posts_id))
            .count()
            .get_result(&mut conn)
            .await?;

        Ok(count)
    }

    pub async fn create(&self, new: NewAttachment<'_>) -> Result<Attachment, StoreError> {
        let mut conn = self.pool.get().await?;

        let attachment = diesel::insert_into(attachments::table)
            .values(&new)
            .returning(Attachment::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(attachment)
    }

    pub async fn create_many(&self, rows: Vec<NewAttachment<'_>>) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await?;

        let inserted = diesel::insert_into(attachments::table)
            .values(&rows)
            .execute(&mut conn)
            .await?;

        Ok(inserted)
    }

    pub async fn update(
        &self,
        id: i32,
        changes: UpdateAttachment,
    ) -> Result<Attachment, StoreError> {
        let mut conn = self.pool.get().await?;

        let attachment = diesel::update(attachments::table.find(id))
            .set(&changes)
            .returning(Attachment::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?
            .ok_or(StoreError::not_found("attachment"))?;

        Ok(attachment)
    }

    /// Delete an attachment. Links from posted contents cascade.
    pub async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(attachments::table.find(id))
            .execute(&mut conn)
            .await?;

        if deleted == 0 {
            return Err(StoreError::not_found("attachment"));
        }

        Ok(())
    }

    pub async fn delete_for_post(&self, posts_id: i32) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted =
            diesel::delete(attachments::table.filter(attachments::posts_id.eq(posts_id)))
                .execute(&mut conn)
                .await?;

        Ok(deleted)
    }
}
