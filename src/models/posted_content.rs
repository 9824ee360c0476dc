use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::posted_contents;

/// The publication of one post on one network: which content variant goes
/// out, when it is scheduled (`post_date`), when the network accepted it
/// (`actual_post_date`), and the id the network assigned
/// (`network_post_id`). A row is *due* once `post_date` has passed and
/// `actual_post_date` is still unset.
#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = posted_contents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostedContent {
    pub posts_id: i32,
    pub networks_id: i32,
    pub contents_id: i32,
    pub post_date: Option<DateTime<Utc>>,
    pub actual_post_date: Option<DateTime<Utc>>,
    pub network_post_id: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = posted_contents)]
pub struct NewPostedContent {
    pub posts_id: i32,
    pub networks_id: i32,
    pub contents_id: i32,
    pub post_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = posted_contents)]
pub struct UpdatePostedContent {
    pub contents_id: Option<i32>,
    pub post_date: Option<DateTime<Utc>>,
    pub actual_post_date: Option<DateTime<Utc>>,
    pub network_post_id: Option<String>,
}
