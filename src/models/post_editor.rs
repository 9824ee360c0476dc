use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::post_editors;

#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = post_editors)]
pub struct PostEditor {
    pub posts_id: i32,
    pub editor_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = post_editors)]
pub struct NewPostEditor {
    pub posts_id: i32,
    pub editor_id: i32,
}
