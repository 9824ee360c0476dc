use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::posted_content_attachments;

/// Links an attachment to one posted content row, so each network posting
/// can carry its own subset of the post's attachments.
#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = posted_content_attachments)]
pub struct PostedContentAttachment {
    pub posts_id: i32,
    pub networks_id: i32,
    pub attachments_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = posted_content_attachments)]
pub struct NewPostedContentAttachment {
    pub posts_id: i32,
    pub networks_id: i32,
    pub attachments_id: i32,
}
