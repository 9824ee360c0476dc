use diesel::prelude::*;
use diesel::result::OptionalExtension;
use diesel_async::RunQueryDsl;

use crate::db::pool::DbPool;
use crate::db::schema::{attachments, posted_content_attachments};
use crate::error::StoreError;
use crate::models::attachment::Attachment;
use crate::models::posted_content_attachment::{
    NewPostedContentAttachment, PostedContentAttachment,
};

/// Query surface for the `posted_content_attachments` table: which of a
/// post's attachments go out with each network posting.
pub struct PostedContentAttachments<'a> {
    pool: &'a DbPool,
}

impl<'a> PostedContentAttachments<'a> {
    pub(crate) fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    pub async fn find(
        &self,
        posts_id: i32,
        networks_id: i32,
        attachments_id: i32,
    ) -> Result<Option<PostedContentAttachment>, StoreError> {
        let mut conn = self.pool.get().await?;

        let link = posted_content_attachments::table
            .find((posts_id, networks_id, attachments_id))
            .select(PostedContentAttachment::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(link)
    }

    /// Attach a file to a posted content row. Re-attaching is a no-op.
    pub async fn add(&self, new: NewPostedContentAttachment) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(posted_content_attachments::table)
            .values(&new)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    pub async fn list_for_posted_content(
        &self,
        posts_id: i32,
        networks_id: i32,
    ) -> Result<Vec<PostedContentAttachment>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = posted_content_attachments::table
            .filter(posted_content_attachments::posts_id.eq(posts_id))
            .filter(posted_content_attachments::networks_id.eq(networks_id))
            .order(posted_content_attachments::attachments_id.asc())
            .select(PostedContentAttachment::as_select())
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    /// The attachment rows going out with one posted content.
    pub async fn attachments_for_posted_content(
        &self,
        posts_id: i32,
        networks_id: i32,
    ) -> Result<Vec<Attachment>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = posted_content_attachments::table
            .inner_join(attachments::table)
            .filter(posted_content_attachments::posts_id.eq(posts_id))
            .filter(posted_content_attachments::networks_id.eq(networks_id))
            .order(attachments::id.asc())
            .select(Attachment::as_select())
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    pub async fn count_for_posted_content(
        &self,
        posts_id: i32,
        networks_id: i32,
    ) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await?;

        let count = posted_content_attachments::table
            .filter(posted_content_attachments::posts_id.eq(posts_id))
            .filter(posted_content_attachments::networks_id.eq(networks_id))
            .count()
            .get_result(&mut conn)
            .await?;

        Ok(count)
    }

    pub async fn remove(
        &self,
        posts_id: i32,
        networks_id: i32,
        attachments_id: i32,
    ) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(
            posted_content_attachments::table.find((posts_id, networks_id, attachments_id)),
        )
        .execute(&mut conn)
        .await?;

        if deleted == 0 {
            return Err(StoreError::not_found("posted content attachment"));
        }

        Ok(())
    }

    pub async fn delete_for_posted_content(
        &self,
        posts_id: i32,
        networks_id: i32,
    ) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(
            posted_content_attachments::table
                .filter(posted_content_attachments::posts_id.eq(posts_id))
                .filter(posted_content_attachments::networks_id.eq(networks_id)),
        )
        .execute(&mut conn)
        .await?;

        Ok(deleted)
    }
}
