use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::contents;

/// One text variant of a post. A post usually carries one content row per
/// network it targets, since length limits and formatting differ.
#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = contents)]
pub struct Content {
    pub id: i32,
    pub posts_id: i32,
    pub content: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = contents)]
pub struct NewContent<'a> {
    pub posts_id: i32,
    pub content: &'a str,
}

#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = contents)]
pub struct UpdateContent {
    pub content: Option<String>,
}
