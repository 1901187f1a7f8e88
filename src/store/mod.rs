//! Storage access behind a trait so handlers can run against MySQL in
//! production and an in-memory fake in tests.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Book, BookFields, User};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use self::mysql::MySqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(#[from] ::mysql::Error),
    #[error("unique constraint violated on {0}")]
    Constraint(&'static str),
    #[error("blocking worker canceled")]
    Canceled,
}

/// One method per SQL statement the service issues. Every implementation
/// must bind parameters rather than splice them into the statement text.
#[async_trait]
pub trait Store: Send + Sync {
    /// Trivial liveness query, used only by the startup probe.
    async fn ping(&self) -> Result<(), StoreError>;

    /// All books, or only those whose `itemname` exactly matches `name`.
    async fn list_books(&self, name: Option<String>) -> Result<Vec<Book>, StoreError>;
    async fn get_book(&self, id: i32) -> Result<Option<Book>, StoreError>;
    /// Inserts a row and returns the generated id.
    async fn insert_book(&self, fields: BookFields) -> Result<i32, StoreError>;
    /// Full replace of all five mutable columns. Succeeds even when no row
    /// matches `id`; no row-count check is performed (idempotent no-op).
    async fn update_book(&self, id: i32, fields: BookFields) -> Result<(), StoreError>;
    /// Same idempotence caveat as `update_book`.
    async fn delete_book(&self, id: i32) -> Result<(), StoreError>;
    /// Unconditional delete-all. Lab reset only.
    async fn clear_books(&self) -> Result<(), StoreError>;

    /// Duplicate usernames surface as an error from the unique constraint;
    /// there is no pre-check.
    async fn insert_user(&self, user: User) -> Result<(), StoreError>;
    async fn find_user(&self, username: String) -> Result<Option<User>, StoreError>;
}

/// Startup readiness probe: ping until the database answers, waiting
/// `delay` between attempts. Returns false once `attempts` are exhausted;
/// the caller must then exit without binding the listener.
pub async fn wait_for_db(store: &dyn Store, attempts: u32, delay: Duration) -> bool {
    for attempt in 1..=attempts {
        match store.ping().await {
            Ok(()) => {
                info!(attempt, "database ready");
                return true;
            }
            Err(cause) => {
                warn!(attempt, attempts, %cause, "database not ready");
                if attempt < attempts {
                    actix_web::rt::time::sleep(delay).await;
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn probe_succeeds_against_a_live_store() {
        let store = MemoryStore::new();
        assert!(wait_for_db(&store, 1, Duration::from_millis(1)).await);
    }
}
