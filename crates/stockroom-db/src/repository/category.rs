//! # Category Repository
//!
//! Database operations for categories.
//!
//! ## Delete Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DELETE /api/categories/{id}                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │   ├── category exists?            no  ──► DbError::NotFound             │
//! │   ├── COUNT(inventory.category_id) > 0 ──► DbError::Referenced{count}   │
//! │   └── DELETE FROM categories                                            │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  An item inserted between the count and the delete still cannot       │
//! │  orphan: the ON DELETE RESTRICT foreign key rejects the delete, and    │
//! │  that failure is reported as Referenced too.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::{generate_id, timestamp};
use crate::error::{DbError, DbResult};
use stockroom_core::{Category, CategoryDraft, CreatorSummary};

const CATEGORY_SELECT: &str = r#"
    SELECT
        c.id,
        c.name,
        c.description,
        c.created_by_id,
        c.created_at,
        c.updated_at,
        u.name AS creator_name
    FROM categories c
    LEFT JOIN users u ON u.id = c.created_by_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: String,
    name: String,
    description: Option<String>,
    created_by_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    creator_name: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        let creator = row
            .created_by_id
            .clone()
            .zip(row.creator_name)
            .map(|(id, name)| CreatorSummary { id, name });

        Category {
            id: row.id,
            name: row.name,
            description: row.description,
            created_by_id: row.created_by_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            creator,
        }
    }
}

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists all categories by name, each with its creator.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!("{CATEGORY_SELECT} ORDER BY c.name ASC"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed categories");
        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Gets a category by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!("{CATEGORY_SELECT} WHERE c.id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Category::from))
    }

    /// Inserts a new category created by `created_by`.
    ///
    /// ## Returns
    /// * `Ok(Category)` - With creator projection
    /// * `Err(DbError::UniqueViolation)` - Name already taken
    /// * `Err(DbError::Internal)` - `created_by` names no user
    pub async fn create(&self, draft: &CategoryDraft, created_by: &str) -> DbResult<Category> {
        debug!(name = %draft.name, "Inserting category");

        let id = generate_id();

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, created_by_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&id)
        .bind(&draft.name)
        .bind(draft.description.as_deref())
        .bind(created_by)
        .bind(timestamp(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DbError::from(e)
                .on_duplicate("Category name", &draft.name)
                .on_missing_creator()
        })?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", &id))
    }

    /// Replaces a category's name and description.
    ///
    /// Keeping the current name is not a conflict: the UNIQUE constraint
    /// only fires when another row holds the name.
    pub async fn update(&self, id: &str, draft: &CategoryDraft) -> DbResult<Category> {
        debug!(id = %id, name = %draft.name, "Updating category");

        let result = sqlx::query(
            r#"
            UPDATE categories SET
                name = ?2,
                description = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(draft.description.as_deref())
        .bind(timestamp(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).on_duplicate("Category name", &draft.name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Deletes a category that no inventory item references.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such category
    /// * `Err(DbError::Referenced)` - Items still use it; carries the count
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting category");

        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(DbError::not_found("Category", id));
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory WHERE category_id = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if count > 0 {
            return Err(Self::referenced(count));
        }

        let deleted = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await;

        match deleted.map_err(DbError::from) {
            Ok(_) => {}
            Err(DbError::ForeignKeyViolation { .. }) => {
                drop(tx);
                let count = self.count_items(id).await?;
                return Err(Self::referenced(count.max(1)));
            }
            Err(other) => return Err(other),
        }

        tx.commit().await?;
        Ok(())
    }

    /// Counts inventory items in a category.
    pub async fn count_items(&self, id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory WHERE category_id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts all categories.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    fn referenced(count: i64) -> DbError {
        DbError::Referenced {
            entity: "category".to_string(),
            dependents: "inventory item(s)".to_string(),
            count,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support;
    use stockroom_core::{InventoryDraft, Money, Role};

    fn draft(name: &str) -> CategoryDraft {
        CategoryDraft {
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_carries_creator() {
        let db = test_support::database().await;
        let owner = test_support::user(&db, "owner@shop.example", Role::Owner).await;

        let category = db.categories().create(&draft("Pens"), &owner.id).await.unwrap();

        assert_eq!(category.name, "Pens");
        assert_eq!(category.created_by_id.as_deref(), Some(owner.id.as_str()));
        assert_eq!(
            category.creator,
            Some(CreatorSummary {
                id: owner.id.clone(),
                name: owner.name.clone(),
            })
        );
    }

    #[tokio::test]
    async fn test_duplicate_name_and_self_rename() {
        let db = test_support::database().await;
        let owner = test_support::user(&db, "owner@shop.example", Role::Owner).await;
        let repo = db.categories();

        let pens = repo.create(&draft("Pens"), &owner.id).await.unwrap();
        let paper = repo.create(&draft("Paper"), &owner.id).await.unwrap();

        let err = repo.create(&draft("Pens"), &owner.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Category name already exists: 'Pens'");

        // Same name on the same row is fine.
        let kept = repo
            .update(
                &pens.id,
                &CategoryDraft {
                    name: "Pens".to_string(),
                    description: Some("Writing".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(kept.description.as_deref(), Some("Writing"));

        let err = repo.update(&paper.id, &draft("Pens")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let db = test_support::database().await;
        let owner = test_support::user(&db, "owner@shop.example", Role::Owner).await;
        let repo = db.categories();

        for name in ["Toys", "Art", "Paper"] {
            repo.create(&draft(name), &owner.id).await.unwrap();
        }

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Art", "Paper", "Toys"]);
    }

    #[tokio::test]
    async fn test_delete_guard_counts_items() {
        let db = test_support::database().await;
        let owner = test_support::user(&db, "owner@shop.example", Role::Owner).await;
        let category = db.categories().create(&draft("Pens"), &owner.id).await.unwrap();

        for code in ["PEN-1", "PEN-2"] {
            db.inventory()
                .create(
                    &InventoryDraft {
                        item_code: code.to_string(),
                        barcode: None,
                        item_desc: "Pen".to_string(),
                        sale_price: Money::from_cents(150),
                        cost_price: Money::from_cents(80),
                        stock: 1,
                        category_id: Some(category.id.clone()),
                        supplier: None,
                    },
                    &owner.id,
                )
                .await
                .unwrap();
        }

        let err = db.categories().delete(&category.id).await.unwrap_err();
        assert!(matches!(err, DbError::Referenced { count: 2, .. }));
        assert!(db.categories().get_by_id(&category.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_unreferenced_and_missing() {
        let db = test_support::database().await;
        let owner = test_support::user(&db, "owner@shop.example", Role::Owner).await;
        let category = db.categories().create(&draft("Pens"), &owner.id).await.unwrap();

        db.categories().delete(&category.id).await.unwrap();
        assert!(db.categories().get_by_id(&category.id).await.unwrap().is_none());

        let err = db.categories().delete(&category.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_creator_cleared_when_user_deleted() {
        let db = test_support::database().await;
        let clerk = test_support::user(&db, "clerk@shop.example", Role::Shopkeeper).await;
        let category = db.categories().create(&draft("Pens"), &clerk.id).await.unwrap();

        db.users().delete(&clerk.id).await.unwrap();

        let category = db.categories().get_by_id(&category.id).await.unwrap().unwrap();
        assert_eq!(category.created_by_id, None);
        assert_eq!(category.creator, None);
    }

    #[tokio::test]
    async fn test_unknown_creator_is_internal_error() {
        let db = test_support::database().await;

        let err = db
            .categories()
            .create(&draft("Pens"), "deleted-user")
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Internal(_)), "{err}");
        assert!(!err.to_string().starts_with("Foreign key violation"));
    }
}
