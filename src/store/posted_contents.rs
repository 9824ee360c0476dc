use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::OptionalExtension;
use diesel_async::RunQueryDsl;

use crate::db::pool::DbPool;
use crate::db::schema::posted_contents;
use crate::error::StoreError;
use crate::models::posted_content::{NewPostedContent, PostedContent, UpdatePostedContent};
use crate::store::Page;

/// Optional criteria for posted-content queries.
#[derive(Debug, Default)]
pub struct PostedContentFilter {
    pub posts_id: Option<i32>,
    pub networks_id: Option<i32>,
    /// `Some(true)` keeps only rows the network has accepted,
    /// `Some(false)` only rows still waiting.
    pub posted: Option<bool>,
    /// Keep unposted rows scheduled at or before this instant.
    pub due_before: Option<DateTime<Utc>>,
}

/// Query surface for the `posted_contents` table: the per-network
/// publication state of each post.
pub struct PostedContents<'a> {
    pool: &'a DbPool,
}

impl<'a> PostedContents<'a> {
    pub(crate) fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    pub async fn find(
        &self,
        posts_id: i32,
        networks_id: i32,
    ) -> Result<Option<PostedContent>, StoreError> {
        let mut conn = self.pool.get().await?;

        let posted = posted_contents::table
            .find((posts_id, networks_id))
            .select(PostedContent::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(posted)
    }

    pub async fn get(
        &self,
        posts_id: i32,
        networks_id: i32,
    ) -> Result<PostedContent, StoreError> {
        self.find(posts_id, networks_id)
            .await?
            .ok_or(StoreError::not_found("posted content"))
    }

    pub async fn first(
        &self,
        filter: &PostedContentFilter,
    ) -> Result<Option<PostedContent>, StoreError> {
        let mut conn = self.pool.get().await?;

        let posted = apply_filter(posted_contents::table.into_boxed(), filter)
            .order((
                posted_contents::posts_id.asc(),
                posted_contents::networks_id.asc(),
            ))
            .first::<PostedContent>(&mut conn)
            .await
            .optional()?;

        Ok(posted)
    }

    pub async fn list(
        &self,
        filter: &PostedContentFilter,
        page: Page,
    ) -> Result<Vec<PostedContent>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = apply_filter(posted_contents::table.into_boxed(), filter)
            .order((
                posted_contents::posts_id.asc(),
                posted_contents::networks_id.asc(),
            ))
            .limit(page.limit)
            .offset(page.offset)
            .load::<PostedContent>(&mut conn)
            .await?;

        Ok(list)
    }

    pub async fn count(&self, filter: &PostedContentFilter) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await?;

        let count = apply_filter(posted_contents::table.count().into_boxed(), filter)
            .get_result(&mut conn)
            .await?;

        Ok(count)
    }

    pub async fn list_for_post(&self, posts_id: i32) -> Result<Vec<PostedContent>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = posted_contents::table
            .filter(posted_contents::posts_id.eq(posts_id))
            .order(posted_contents::networks_id.asc())
            .select(PostedContent::as_select())
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    pub async fn list_for_network(
        &self,
        networks_id: i32,
    ) -> Result<Vec<PostedContent>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = posted_contents::table
            .filter(posted_contents::networks_id.eq(networks_id))
            .order(posted_contents::posts_id.asc())
            .select(PostedContent::as_select())
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    /// Rows scheduled at or before `now` that no network has accepted yet,
    /// oldest first. This is the publisher's work queue.
    pub async fn list_due(&self, now: DateTime<Utc>) -> Result<Vec<PostedContent>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = posted_contents::table
            .filter(posted_contents::actual_post_date.is_null())
            .filter(posted_contents::post_date.le(now))
            .order(posted_contents::post_date.asc())
            .select(PostedContent::as_select())
            .load(&mut conn)
            .await?;

        Ok(list)
    }

    /// Publication counts per network.
    pub async fn count_by_network(&self) -> Result<Vec<(i32, i64)>, StoreError> {
        let mut conn = self.pool.get().await?;

        let counts = posted_contents::table
            .group_by(posted_contents::networks_id)
            .select((posted_contents::networks_id, diesel::dsl::count_star()))
            .order(posted_contents::networks_id.asc())
            .load(&mut conn)
            .await?;

        Ok(counts)
    }

    /// Schedule a post on a network, or reschedule it (new content variant
    /// and publish time) if it is already scheduled there.
    pub async fn schedule(&self, new: NewPostedContent) -> Result<PostedContent, StoreError> {
        let mut conn = self.pool.get().await?;

        let posted = diesel::insert_into(posted_contents::table)
            .values(&new)
            .on_conflict((posted_contents::posts_id, posted_contents::networks_id))
            .do_update()
            .set((
                posted_contents::contents_id.eq(new.contents_id),
                posted_contents::post_date.eq(new.post_date),
            ))
            .returning(PostedContent::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(posted)
    }

    pub async fn update(
        &self,
        posts_id: i32,
        networks_id: i32,
        changes: UpdatePostedContent,
    ) -> Result<PostedContent, StoreError> {
        let mut conn = self.pool.get().await?;

        let posted = diesel::update(posted_contents::table.find((posts_id, networks_id)))
            .set(&changes)
            .returning(PostedContent::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?
            .ok_or(StoreError::not_found("posted content"))?;

        Ok(posted)
    }

    /// Record that the network accepted the post: stamps
    /// `actual_post_date` with the database clock and stores the id the
    /// network assigned.
    pub async fn mark_posted(
        &self,
        posts_id: i32,
        networks_id: i32,
        network_post_id: &str,
    ) -> Result<PostedContent, StoreError> {
        let mut conn = self.pool.get().await?;

        let posted = diesel::update(posted_contents::table.find((posts_id, networks_id)))
            .set((
                posted_contents::actual_post_date.eq(diesel::dsl::now),
                posted_contents::network_post_id.eq(network_post_id),
            ))
            .returning(PostedContent::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?
            .ok_or(StoreError::not_found("posted content"))?;

        Ok(posted)
    }

    pub async fn delete(&self, posts_id: i32, networks_id: i32) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(posted_contents::table.find((posts_id, networks_id)))
            .execute(&mut conn)
            .await?;

        if deleted == 0 {
            return Err(StoreError::not_found("posted content"));
        }

        Ok(())
    }

    pub async fn delete_for_post(&self, posts_id: i32) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(
            posted_contents::table.filter(posted_contents::posts_id.eq(posts_id)),
        )
        .execute(&mut conn)
        .await?;

        Ok(deleted)
    }

    pub async fn delete_for_network(&self, networks_id: i32) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(
            posted_contents::table.filter(posted_contents::networks_id.eq(networks_id)),
        )
        .execute(&mut conn)
        .await?;

        Ok(deleted)
    }
}

fn apply_filter<'a, ST>(
    mut query: posted_contents::BoxedQuery<'a, Pg, ST>,
    filter: &PostedContentFilter,
) -> posted_contents::BoxedQuery<'a, Pg, ST> {
    if let Some(posts_id) = filter.posts_id {
        query = query.filter(posted_contents::posts_id.eq(posts_id));
    }
    if let Some(networks_id) = filter.networks_id {
        query = query.filter(posted_contents::networks_id.eq(networks_id));
    }
    if let Some(posted) = filter.posted {
        query = if posted {
            query.filter(posted_contents::actual_post_date.is_not_null())
        } else {
            query.filter(posted_contents::actual_post_date.is_null())
        };
    }
    if let Some(due_before) = filter.due_before {
        query = query
            .filter(posted_contents::actual_post_date.is_null())
            .filter(posted_contents::post_date.le(due_before));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posted_filter_checks_actual_post_date() {
        let filter = PostedContentFilter {
            posted: Some(false),
            ..Default::default()
        };
        let query = apply_filter(posted_contents::table.into_boxed::<Pg>(), &filter);
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("\"actual_post_date\" IS NULL"), "got: {sql}");
    }

    #[test]
    fn due_filter_bounds_post_date() {
        let filter = PostedContentFilter {
            due_before: Some(Utc::now()),
            ..Default::default()
        };
        let query = apply_filter(posted_contents::table.into_boxed::<Pg>(), &filter);
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("\"actual_post_date\" IS NULL"), "got: {sql}");
        assert!(sql.contains("\"post_date\" <= $1"), "got: {sql}");
    }

    #[test]
    fn key_filters_combine() {
        let filter = PostedContentFilter {
            posts_id: Some(1),
            networks_id: Some(2),
            ..Default::default()
        };
        let query = apply_filter(posted_contents::table.into_boxed::<Pg>(), &filter);
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("\"posts_id\" = $1"), "got: {sql}");
        assert!(sql.contains("\"networks_id\" = $2"), "got: {sql}");
    }
}
