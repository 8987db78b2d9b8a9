//! # Repository Module
//!
//! Database repository implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  axum handler                                                          │
//! │       │                                                                 │
//! │       │  state.db.categories().create(&draft, &caller.id)              │
//! │       ▼                                                                 │
//! │  CategoryRepository                                                    │
//! │  ├── list(&self)                                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── create(&self, draft, created_by)                                  │
//! │  ├── update(&self, id, draft)                                          │
//! │  └── delete(&self, id)                                                 │
//! │       │                                                                 │
//! │       │  SQL Query (joined with users for the creator projection)      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Rows come back as private *Row structs (sqlx::FromRow) and are        │
//! │  converted into stockroom-core types before leaving the crate.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Accounts and credentials
//! - [`CategoryRepository`](category::CategoryRepository) - Categories and the delete guard
//! - [`InventoryRepository`](inventory::InventoryRepository) - Items and pagination

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

pub mod category;
pub mod inventory;
pub mod user;

/// Generates a new record ID.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Formats a timestamp for storage.
///
/// Always microsecond precision with a `Z` suffix, so stored values have a
/// fixed width and `ORDER BY` on the text column is chronological.
pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::pool::{Database, DbConfig};
    use stockroom_core::{NewUser, Role, User};

    pub async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Inserts a user with a placeholder hash (repositories never check it).
    pub async fn user(db: &Database, email: &str, role: Role) -> User {
        db.users()
            .create(&NewUser {
                name: "Test User".to_string(),
                email: email.to_string(),
                password_hash: "$argon2id$placeholder".to_string(),
                role,
            })
            .await
            .unwrap()
    }
}
