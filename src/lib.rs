//! Data layer for Syndica: users, their networks, and the posts they
//! syndicate to them. Everything goes through [`Store`].

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod permissions;
pub mod store;

pub use config::Config;
pub use error::StoreError;
pub use store::{Page, Store};
