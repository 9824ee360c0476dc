use diesel::prelude::*;
use diesel::result::OptionalExtension;
use diesel_async::RunQueryDsl;

use crate::db::pool::DbPool;
use crate::db::schema::posts;
use crate::error::StoreError;
use crate::models::post::{NewPost, Post};
use crate::store::Page;

/// Query surface for the `posts` table.
pub struct Posts<'a> {
    pool: &'a DbPool,
}

impl<'a> Posts<'a> {
    pub(crate) fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, id: i32) -> Result<Option<Post>, StoreError> {
        let mut conn = self.pool.get().await?;

        let post = posts::table
            .find(id)
            .select(Post::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(post)
    }

    pub async fn get(&self, id: i32) -> Result<Post, StoreError> {
        self.find(id).await?.ok_or(StoreError::not_found("post"))
    }

    pub async fn list(&self, page: Page) -> Result<Vec<Post>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = posts::table
            .order(posts::id.asc())
            .limit(page.limit)
            .offset(page.offset)
            .select(Post::as_select())
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    pub async fn list_for_creator(&self, creator_id: i32) -> Result<Vec<Post>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = posts::table
            .filter(posts::creator_id.eq(creator_id))
            .order(posts::id.asc())
            .select(Post::as_select())
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await?;

        let count = posts::table.count().get_result(&mut conn).await?;

        Ok(count)
    }

    /// Post counts grouped by creator, for users that have at least one post.
    pub async fn count_by_creator(&self) -> Result<Vec<(i32, i64)>, StoreError> {
        let mut conn = self.pool.get().await?;

        let counts = posts::table
            .group_by(posts::creator_id)
            .select((posts::creator_id, diesel::dsl::count_star()))
            .order(posts::creator_id.asc())
            .load(&mut conn)
            .await?;

        Ok(counts)
    }

    pub async fn create(&self, new: NewPost) -> Result<Post, StoreError> {
        let mut conn = self.pool.get().await?;

        let post = diesel::insert_into(posts::table)
            .values(&new)
            .returning(Post::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(post)
    }

    pub async fn create_many(&self, rows: Vec<NewPost>) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await?;

        let inserted = diesel::insert_into(posts::table)
            .values(&rows)
            .execute(&mut conn)
            .await?;

        Ok(inserted)
    }

    /// Delete a post. Contents, attachments, editors, and posted rows cascade.
    pub async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(posts::table.find(id))
            .execute(&mut conn)
            .await?;

        if deleted == 0 {
            return Err(StoreError::not_found("post"));
        }

        Ok(())
    }

    pub async fn delete_for_creator(&self, creator_id: i32) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(posts::table.filter(posts::creator_id.eq(creator_id)))
            .execute(&mut conn)
            .await?;

        Ok(deleted)
    }
}
