//! Shared helpers for integration tests.
//!
//! The suite runs against a real PostgreSQL database: set DATABASE_URL (a
//! `_test` suffix is appended to the database name, mirroring the migrate
//! binary's `--test` flag). When DATABASE_URL is not set, every test skips
//! itself so the suite stays runnable without a database.

use std::sync::atomic::{AtomicU32, Ordering};

use diesel::pg::PgConnection;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use syndica_store::models::user::NewUser;
use syndica_store::{Config, Store};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Build a [`Store`] against the `_test` database, running pending
/// migrations first. Returns `None` when DATABASE_URL is not set.
pub async fn test_store() -> Option<Store> {
    let env_path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    let _ = dotenvy::from_path(env_path);
    let _ = dotenvy::dotenv();

    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("skipping: DATABASE_URL not set");
        return None;
    };
    let database_url = with_test_db_suffix(&database_url);

    let migrate_url = database_url.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&migrate_url)
            .expect("failed to connect to the test database");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("failed to run migrations");
    })
    .await
    .expect("migration task panicked");

    let store = Store::connect(&Config::new(database_url))
        .await
        .expect("failed to connect store");

    Some(store)
}

/// A name that is unique across test processes and reruns.
pub fn unique(prefix: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!(
        "{prefix}_{}_{}_{n}",
        std::process::id(),
        chrono::Utc::now().timestamp_micros()
    )
}

/// Create a test user with a unique username.
pub async fn create_test_user(store: &Store, prefix: &str) -> syndica_store::models::user::User {
    let username = unique(prefix);
    store
        .users()
        .create(NewUser {
            username: &username,
            password: "hunter2-hash",
            displayname: "Test User",
        })
        .await
        .expect("create test user")
}

/// Delete a test user. Owned networks, posts, and grants cascade.
pub async fn cleanup_user(store: &Store, user_id: i32) {
    let _ = store.users().delete(user_id).await;
}

fn with_test_db_suffix(database_url: &str) -> String {
    let mut parts = database_url.splitn(2, '?');
    let base = parts.next().unwrap_or(database_url);
    let query = parts.next();

    let mut base_parts = base.rsplitn(2, '/');
    let db_name = base_parts.next().unwrap_or("");
    let prefix = base_parts.next().unwrap_or("");

    if db_name.is_empty() || db_name.ends_with("_test") {
        return database_url.to_string();
    }

    let mut updated = format!("{}/{}", prefix, format!("{db_name}_test"));
    if let Some(query) = query {
        updated.push('?');
        updated.push_str(query);
    }
    updated
}
