use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::OptionalExtension;
use diesel_async::RunQueryDsl;

use crate::db::pool::DbPool;
use crate::db::schema::users;
use crate::error::StoreError;
use crate::models::user::{NewUser, UpdateUser, User};
use crate::store::Page;

/// Optional criteria for user queries.
#[derive(Debug, Default)]
pub struct UserFilter {
    /// Exact username match.
    pub username: Option<String>,
    /// Case-insensitive substring over username and displayname.
    pub search: Option<String>,
}

/// Query surface for the `users` table.
pub struct Users<'a> {
    pool: &'a DbPool,
}

impl<'a> Users<'a> {
    pub(crate) fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, id: i32) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.get().await?;

        let user = users::table
            .find(id)
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(user)
    }

    /// Like [`find`](Self::find), but a missing row is an error.
    pub async fn get(&self, id: i32) -> Result<User, StoreError> {
        self.find(id).await?.ok_or(StoreError::not_found("user"))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.get().await?;

        let user = users::table
            .filter(users::username.eq(username))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(user)
    }

    pub async fn first(&self, filter: &UserFilter) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.get().await?;

        let user = apply_filter(users::table.into_boxed(), filter)
            .order(users::id.asc())
            .first::<User>(&mut conn)
            .await
            .optional()?;

        Ok(user)
    }

    pub async fn list(&self, filter: &UserFilter, page: Page) -> Result<Vec<User>, StoreError> {
        let mut conn = self.pool.get().await?;

        let list = apply_filter(users::table.into_boxed(), filter)
            .order(users::id.asc())
            .limit(page.limit)
            .offset(page.offset)
            .load::<User>(&mut conn)
            .await?;

        Ok(list)
    }

    pub async fn count(&self, filter: &UserFilter) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await?;

        let count = apply_filter(users::table.count().into_boxed(), filter)
            .get_result(&mut conn)
            .await?;

        Ok(count)
    }

    pub async fn create(&self, new: NewUser<'_>) -> Result<User, StoreError> {
        let mut conn = self.pool.get().await?;

        let user = diesel::insert_into(users::table)
            .values(&new)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(user)
    }

    pub async fn create_many(&self, rows: Vec<NewUser<'_>>) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await?;

        let inserted = diesel::insert_into(users::table)
            .values(&rows)
            .execute(&mut conn)
            .await?;

        Ok(inserted)
    }

    pub async fn update(&self, id: i32, changes: UpdateUser) -> Result<User, StoreError> {
        let mut conn = self.pool.get().await?;

        let user = diesel::update(users::table.find(id))
            .set(&changes)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?
            .ok_or(StoreError::not_found("user"))?;

        Ok(user)
    }

    /// Create the user, or refresh password and displayname if the username
    /// is already taken.
    pub async fn upsert_by_username(&self, new: NewUser<'_>) -> Result<User, StoreError> {
        let mut conn = self.pool.get().await?;

        let user = diesel::insert_into(users::table)
            .values(&new)
            .on_conflict(users::username)
            .do_update()
            .set((
                users::password.eq(new.password),
                users::displayname.eq(new.displayname),
            ))
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(user)
    }

    /// Delete a user. Owned networks, posts, and grants cascade.
    pub async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(users::table.find(id))
            .execute(&mut conn)
            .await?;

        if deleted == 0 {
            return Err(StoreError::not_found("user"));
        }

        Ok(())
    }
}

fn apply_filter<'a, ST>(
    mut query: users::BoxedQuery<'a, Pg, ST>,
    filter: &UserFilter,
) -> users::BoxedQuery<'a, Pg, ST> {
    if let Some(ref username) = filter.username {
        query = query.filter(users::username.eq(username.clone()));
    }
    if let Some(ref term) = filter.search {
        let pattern = format!("%{term}%");
        query = query.filter(
            users::username
                .ilike(pattern.clone())
                .or(users::displayname.ilike(pattern)),
        );
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_builds_expected_sql() {
        let filter = UserFilter {
            username: Some("amelia".to_string()),
            search: None,
        };
        let query = apply_filter(users::table.into_boxed::<Pg>(), &filter);
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("\"users\".\"username\" = $1"), "got: {sql}");
    }

    #[test]
    fn search_filter_matches_both_name_columns() {
        let filter = UserFilter {
            username: None,
            search: Some("mel".to_string()),
        };
        let query = apply_filter(users::table.into_boxed::<Pg>(), &filter);
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("ILIKE"), "got: {sql}");
        assert!(sql.contains("displayname"), "got: {sql}");
    }

    #[test]
    fn empty_filter_adds_no_where_clause() {
        let query = apply_filter(users::table.into_boxed::<Pg>(), &UserFilter::default());
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();
        assert!(!sql.contains("WHERE"), "got: {sql}");
    }
}
