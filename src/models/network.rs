use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::networks;

/// A target network a user can publish to (e.g. a Mastodon or Bluesky
/// account). `network_type` names the integration, `network_name` the
/// user-facing label.
#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = networks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Network {
    pub id: i32,
    pub owner_id: i32,
    pub network_type: String,
    pub network_name: String,
    pub note: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = networks)]
pub struct NewNetwork<'a> {
    pub owner_id: i32,
    pub network_type: &'a str,
    pub network_name: &'a str,
    pub note: Option<&'a str>,
}

#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = networks)]
pub struct UpdateNetwork {
    pub network_name: Option<String>,
    pub note: Option<String>,
}
