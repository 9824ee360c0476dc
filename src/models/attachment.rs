use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::attachments;

/// A file stored alongside a post. `path` points into the media store.
#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = attachments)]
pub struct Attachment {
    pub id: i32,
    pub posts_id: i32,
    pub path: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = attachments)]
pub struct NewAttachment<'a> {
    pub posts_id: i32,
    pub path: &'a str,
}

#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = attachments)]
pub struct UpdateAttachment {
    pub path: Option<String>,
}
