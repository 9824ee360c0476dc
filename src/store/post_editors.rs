use diesel::prelude::*;
use diesel::result::OptionalExtension;
use diesel_async::RunQueryDsl;

use crate::db::pool::DbPool;
use crate::db::schema::{post_editors, posts, users};
use crate::error::StoreError;
use crate::models::post::Post;
use crate::models::post_editor::{NewPostEditor, PostEditor};
use crate::models::user::User;

/// Query surface for the `post_editors` table: users allowed to edit a post
/// besides its creator.
pub struct PostEditors<'a> {
    pool: &'a DbPool,
}

impl<'a> PostEditors<'a> {
    pub(crate) fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    pub async fn find(
        &self,
        posts_id: i32,
        editor_id: i32,
    ) -> Result<Option<PostEditor>, StoreError> {
        let mut conn = self.pool.get().await?;

        let editor = post_editors::table
            .find((posts_id, editor_id))
            .select(PostEditor::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(editor)
    }

    /// Grant edit access. Adding an existing editor is a no-op.
    pub async fn add(&self, new: NewPostEditor) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(post_editors::table)
            .values(&new)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    pub async fn editors_for_post(&self, posts_id: i32) -> Result<Vec<User>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = post_editors::table
            .inner_join(users::table)
            .filter(post_editors::posts_id.eq(posts_id))
            .order(users::id.asc())
            .select(User::as_select())
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    pub async fn posts_for_editor(&self, editor_id: i32) -> Result<Vec<Post>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = post_editors::table
            .inner_join(posts::table)
            .filter(post_editors::editor_id.eq(editor_id))
            .order(posts::id.asc())
            .select(Post::as_select())
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    pub async fn count_for_post(&self, posts_id: i32) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await?;

        let count = post_editors::table
            .filter(post_editors::posts_id.eq(posts_id))
            .count()
            .get_result(&mut conn)
            .await?;

        Ok(count)
    }

    pub async fn remove(&self, posts_id: i32, editor_id: i32) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(post_editors::table.find((posts_id, editor_id)))
            .execute(&mut conn)
            .await?;

        if deleted == 0 {
            return Err(StoreError::not_found("post editor"));
        }

        Ok(())
    }

    pub async fn delete_for_post(&self, posts_id: i32) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted =
            diesel::delete(post_editors::table.filter(post_editors::posts_id.eq(posts_id)))
                .execute(&mut conn)
                .await?;

        Ok(deleted)
    }
}
