use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::networks_users;

/// A permission grant on a network: `granter_id` gave `grantee_id` the
/// `permission` bits (see [`crate::permissions`]).
#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = networks_users)]
pub struct NetworkMember {
    pub networks_id: i32,
    pub granter_id: i32,
    pub grantee_id: i32,
    pub permission: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = networks_users)]
pub struct NewNetworkMember {
    pub networks_id: i32,
    pub granter_id: i32,
    pub grantee_id: i32,
    pub permission: i64,
}
