use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::network_tokens;

/// A named credential for a network, unique per (network, name).
#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = network_tokens)]
pub struct NetworkToken {
    pub network_id: i32,
    pub token_name: String,
    #[serde(skip)]
    pub token: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = network_tokens)]
pub struct NewNetworkToken<'a> {
    pub network_id: i32,
    pub token_name: &'a str,
    pub token: &'a str,
}
