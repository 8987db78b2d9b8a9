//! # User Repository
//!
//! Database operations for user accounts.
//!
//! The password hash column is only ever read by
//! [`UserRepository::find_credentials`]; every other query projects it away.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::{generate_id, timestamp};
use crate::error::{DbError, DbResult};
use stockroom_core::{NewUser, Role, User, UserChanges, UserCredentials};

const USER_COLUMNS: &str = "id, name, email, role, image, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    role: Role,
    image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialsRow {
    id: String,
    email: String,
    password_hash: String,
}

/// Repository for user database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = UserRepository::new(pool);
///
/// let user = repo.create(&new_user).await?;
/// let everyone = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Lists all users, newest first.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Gets a user by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No such user
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    /// Loads what sign-in needs for an email (already normalized).
    pub async fn find_credentials(&self, email: &str) -> DbResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            "SELECT id, email, password_hash FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| UserCredentials {
            id: r.id,
            email: r.email,
            password_hash: r.password_hash,
        }))
    }

    /// Inserts a new user.
    ///
    /// ## Returns
    /// * `Ok(User)` - The stored user (without hash)
    /// * `Err(DbError::UniqueViolation)` - Email already taken
    pub async fn create(&self, user: &NewUser) -> DbResult<User> {
        debug!(email = %user.email, role = %user.role, "Inserting user");

        let id = generate_id();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
        )
        .bind(&id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(timestamp(now))
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).on_duplicate("User with this email", &user.email))?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DbError::not_found("User", &id))
    }

    /// Updates a user's profile, and the password hash when one is given.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such user
    /// * `Err(DbError::UniqueViolation)` - Email belongs to another user
    pub async fn update(&self, id: &str, changes: &UserChanges) -> DbResult<User> {
        debug!(id = %id, password_changed = changes.password_hash.is_some(), "Updating user");

        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = ?2,
                email = ?3,
                role = ?4,
                password_hash = COALESCE(?5, password_hash),
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(changes.role)
        .bind(changes.password_hash.as_deref())
        .bind(timestamp(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).on_duplicate("User with this email", &changes.email))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Deletes a user. Categories and items they created stay, with their
    /// `created_by_id` cleared by the foreign key.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Counts users holding `role`.
    pub async fn count_by_role(&self, role: Role) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?1")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support;

    fn new_user(email: &str, role: Role) -> NewUser {
        NewUser {
            name: "Ada".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = test_support::database().await;
        let repo = db.users();

        let created = repo.create(&new_user("ada@shop.example", Role::Owner)).await.unwrap();
        assert_eq!(created.role, Role::Owner);

        let fetched = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let db = test_support::database().await;
        let repo = db.users();

        repo.create(&new_user("ada@shop.example", Role::Owner)).await.unwrap();
        let err = repo
            .create(&new_user("ada@shop.example", Role::Warehouse))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = test_support::database().await;
        let repo = db.users();

        let first = repo.create(&new_user("a@shop.example", Role::Owner)).await.unwrap();
        let second = repo.create(&new_user("b@shop.example", Role::Shopkeeper)).await.unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_update_keeps_password_unless_given() {
        let db = test_support::database().await;
        let repo = db.users();
        let user = repo.create(&new_user("ada@shop.example", Role::Shopkeeper)).await.unwrap();

        let mut changes = UserChanges {
            name: "Ada L".to_string(),
            email: "ada@shop.example".to_string(),
            role: Role::Warehouse,
            password_hash: None,
        };
        let updated = repo.update(&user.id, &changes).await.unwrap();
        assert_eq!(updated.name, "Ada L");
        assert_eq!(updated.role, Role::Warehouse);

        let creds = repo.find_credentials("ada@shop.example").await.unwrap().unwrap();
        assert_eq!(creds.password_hash, "$argon2id$placeholder");

        changes.password_hash = Some("$argon2id$rotated".to_string());
        repo.update(&user.id, &changes).await.unwrap();
        let creds = repo.find_credentials("ada@shop.example").await.unwrap().unwrap();
        assert_eq!(creds.password_hash, "$argon2id$rotated");

        let err = repo.update("missing", &changes).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_and_count() {
        let db = test_support::database().await;
        let repo = db.users();
        let user = repo.create(&new_user("ada@shop.example", Role::Owner)).await.unwrap();

        assert_eq!(repo.count_by_role(Role::Owner).await.unwrap(), 1);
        repo.delete(&user.id).await.unwrap();
        assert_eq!(repo.count_by_role(Role::Owner).await.unwrap(), 0);

        let err = repo.delete(&user.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
