use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::posts;

/// A post shell. The per-network text lives in `contents`, files in
/// `attachments`, and publication state in `posted_contents`.
#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = posts)]
pub struct Post {
    pub id: i32,
    pub creator_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = posts)]
pub struct NewPost {
    pub creator_id: i32,
}
