//! # Inventory Repository
//!
//! Database operations for inventory items.
//!
//! Every read joins the creator (`{id, name, email}`) and the category
//! (`{id, name, description}`) so handlers never issue follow-up queries.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use super::{generate_id, timestamp};
use crate::error::{DbError, DbResult};
use stockroom_core::{
    CategorySummary, CreatorContact, InventoryDraft, InventoryItem, Money, Page, PageRequest,
};

const INVENTORY_SELECT: &str = r#"
    SELECT
        i.id,
        i.item_code,
        i.barcode,
        i.item_desc,
        i.sale_price,
        i.cost_price,
        i.stock,
        i.category_id,
        i.supplier,
        i.created_by_id,
        i.created_at,
        i.updated_at,
        u.name AS creator_name,
        u.email AS creator_email,
        c.name AS category_name,
        c.description AS category_description
    FROM inventory i
    LEFT JOIN users u ON u.id = i.created_by_id
    LEFT JOIN categories c ON c.id = i.category_id
"#;

#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    id: String,
    item_code: String,
    barcode: Option<String>,
    item_desc: String,
    sale_price: i64,
    cost_price: i64,
    stock: i64,
    category_id: Option<String>,
    supplier: Option<String>,
    created_by_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    creator_name: Option<String>,
    creator_email: Option<String>,
    category_name: Option<String>,
    category_description: Option<String>,
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        let creator = match (&row.created_by_id, row.creator_name, row.creator_email) {
            (Some(id), Some(name), Some(email)) => Some(CreatorContact {
                id: id.clone(),
                name,
                email,
            }),
            _ => None,
        };
        let category = match (&row.category_id, row.category_name) {
            (Some(id), Some(name)) => Some(CategorySummary {
                id: id.clone(),
                name,
                description: row.category_description,
            }),
            _ => None,
        };

        InventoryItem {
            id: row.id,
            item_code: row.item_code,
            barcode: row.barcode,
            item_desc: row.item_desc,
            sale_price: Money::from_cents(row.sale_price),
            cost_price: Money::from_cents(row.cost_price),
            stock: row.stock,
            category_id: row.category_id,
            supplier: row.supplier,
            created_by_id: row.created_by_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            creator,
            category,
        }
    }
}

/// Repository for inventory database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = InventoryRepository::new(pool);
///
/// let page = repo.list_page(PageRequest::new(1, 10)?).await?;
/// let item = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Returns one page of items, most recently updated first.
    ///
    /// A page past the end is empty, not an error.
    pub async fn list_page(&self, request: PageRequest) -> DbResult<Page<InventoryItem>> {
        debug!(page = request.page(), page_size = request.page_size(), "Listing inventory");

        let total = self.count().await?;

        let rows = sqlx::query_as::<_, InventoryRow>(&format!(
            "{INVENTORY_SELECT} ORDER BY i.updated_at DESC, i.rowid DESC LIMIT ?1 OFFSET ?2"
        ))
        .bind(request.limit())
        .bind(request.offset())
        .fetch_all(&self.pool)
        .await?;

        let items = rows.into_iter().map(InventoryItem::from).collect();
        Ok(Page::new(items, total, request))
    }

    /// Gets an item by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        let row = sqlx::query_as::<_, InventoryRow>(&format!("{INVENTORY_SELECT} WHERE i.id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(InventoryItem::from))
    }

    /// Inserts a new item created by `created_by`.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Item code already taken
    /// * `Err(DbError::ForeignKeyViolation)` - `category_id` names no category
    /// * `Err(DbError::Internal)` - `created_by` names no user
    pub async fn create(&self, draft: &InventoryDraft, created_by: &str) -> DbResult<InventoryItem> {
        debug!(item_code = %draft.item_code, "Inserting inventory item");

        let id = generate_id();

        let inserted = sqlx::query(
            r#"
            INSERT INTO inventory (
                id, item_code, barcode, item_desc,
                sale_price, cost_price, stock,
                category_id, supplier, created_by_id,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7,
                ?8, ?9, ?10,
                ?11, ?11
            )
            "#,
        )
        .bind(&id)
        .bind(&draft.item_code)
        .bind(draft.barcode.as_deref())
        .bind(&draft.item_desc)
        .bind(draft.sale_price.cents())
        .bind(draft.cost_price.cents())
        .bind(draft.stock)
        .bind(draft.category_id.as_deref())
        .bind(draft.supplier.as_deref())
        .bind(created_by)
        .bind(timestamp(Utc::now()))
        .execute(&self.pool)
        .await;
        if let Err(e) = inserted {
            return Err(self.write_error(e, draft).await);
        }

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DbError::not_found("Inventory item", &id))
    }

    /// Replaces every editable field of an item.
    ///
    /// Keeping the current item code is not a conflict.
    pub async fn update(&self, id: &str, draft: &InventoryDraft) -> DbResult<InventoryItem> {
        debug!(id = %id, item_code = %draft.item_code, "Updating inventory item");

        let result = sqlx::query(
            r#"
            UPDATE inventory SET
                item_code = ?2,
                barcode = ?3,
                item_desc = ?4,
                sale_price = ?5,
                cost_price = ?6,
                stock = ?7,
                category_id = ?8,
                supplier = ?9,
                updated_at = ?10
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&draft.item_code)
        .bind(draft.barcode.as_deref())
        .bind(&draft.item_desc)
        .bind(draft.sale_price.cents())
        .bind(draft.cost_price.cents())
        .bind(draft.stock)
        .bind(draft.category_id.as_deref())
        .bind(draft.supplier.as_deref())
        .bind(timestamp(Utc::now()))
        .execute(&self.pool)
        .await;
        let result = match result {
            Ok(result) => result,
            Err(e) => return Err(self.write_error(e, draft).await),
        };

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Inventory item", id))
    }

    /// Deletes an item.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting inventory item");

        let result = sqlx::query("DELETE FROM inventory WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }

        Ok(())
    }

    /// Counts all items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Labels constraint failures of an insert/update with the draft's values.
    ///
    /// A foreign key failure is only blamed on `categoryId` when that
    /// category really is missing; otherwise it was the creator reference.
    async fn write_error(&self, err: sqlx::Error, draft: &InventoryDraft) -> DbError {
        let err = DbError::from(err).on_duplicate("Item code", &draft.item_code);
        if !err.is_foreign_key() {
            return err;
        }

        if let Some(category_id) = draft.category_id.as_deref() {
            match self.category_exists(category_id).await {
                Ok(false) => {
                    return DbError::ForeignKeyViolation {
                        message: format!(
                            "categoryId '{}' does not reference an existing category",
                            category_id
                        ),
                    }
                }
                Ok(true) => {}
                Err(lookup) => return lookup,
            }
        }

        err.on_missing_creator()
    }

    async fn category_exists(&self, id: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support;
    use stockroom_core::{CategoryDraft, Role};

    fn draft(code: &str) -> InventoryDraft {
        InventoryDraft {
            item_code: code.to_string(),
            barcode: Some("5901234123457".to_string()),
            item_desc: "Blue ballpoint pen".to_string(),
            sale_price: Money::from_cents(250),
            cost_price: Money::from_cents(120),
            stock: 40,
            category_id: None,
            supplier: Some("Acme".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_joins_creator_and_category() {
        let db = test_support::database().await;
        let owner = test_support::user(&db, "owner@shop.example", Role::Owner).await;
        let category = db
            .categories()
            .create(
                &CategoryDraft {
                    name: "Pens".to_string(),
                    description: Some("Writing".to_string()),
                },
                &owner.id,
            )
            .await
            .unwrap();

        let mut input = draft("PEN-001");
        input.category_id = Some(category.id.clone());
        let item = db.inventory().create(&input, &owner.id).await.unwrap();

        assert_eq!(item.sale_price, Money::from_cents(250));
        assert_eq!(item.stock, 40);
        let creator = item.creator.unwrap();
        assert_eq!(creator.email, "owner@shop.example");
        let summary = item.category.unwrap();
        assert_eq!(summary.name, "Pens");
        assert_eq!(summary.description.as_deref(), Some("Writing"));
    }

    #[tokio::test]
    async fn test_duplicate_code_and_unknown_category() {
        let db = test_support::database().await;
        let owner = test_support::user(&db, "owner@shop.example", Role::Owner).await;
        let repo = db.inventory();

        let item = repo.create(&draft("PEN-001"), &owner.id).await.unwrap();

        let err = repo.create(&draft("PEN-001"), &owner.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Item code already exists: 'PEN-001'");

        let mut orphan = draft("PEN-002");
        orphan.category_id = Some("no-such-category".to_string());
        let err = repo.create(&orphan, &owner.id).await.unwrap_err();
        assert!(err.is_foreign_key());
        assert_eq!(
            err.to_string(),
            "Foreign key violation: categoryId 'no-such-category' does not reference an existing category"
        );

        // Same code on the same row is fine.
        let mut same = draft("PEN-001");
        same.stock = 0;
        let updated = repo.update(&item.id, &same).await.unwrap();
        assert_eq!(updated.stock, 0);
    }

    #[tokio::test]
    async fn test_list_page_slices_and_orders() {
        let db = test_support::database().await;
        let owner = test_support::user(&db, "owner@shop.example", Role::Owner).await;
        let repo = db.inventory();

        let mut ids = Vec::new();
        for n in 0..7 {
            ids.push(repo.create(&draft(&format!("ITEM-{n}")), &owner.id).await.unwrap().id);
        }

        let first = repo.list_page(PageRequest::new(1, 3).unwrap()).await.unwrap();
        assert_eq!(first.total_count, 7);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.items.len(), 3);
        // Most recently updated first.
        assert_eq!(first.items[0].id, ids[6]);

        let last = repo.list_page(PageRequest::new(3, 3).unwrap()).await.unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].id, ids[0]);

        let beyond = repo.list_page(PageRequest::new(4, 3).unwrap()).await.unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_count, 7);
    }

    #[tokio::test]
    async fn test_update_moves_item_to_front() {
        let db = test_support::database().await;
        let owner = test_support::user(&db, "owner@shop.example", Role::Owner).await;
        let repo = db.inventory();

        let older = repo.create(&draft("OLD"), &owner.id).await.unwrap();
        repo.create(&draft("NEW"), &owner.id).await.unwrap();

        std::thread::sleep(std::time::Duration::from_millis(2));
        repo.update(&older.id, &draft("OLD")).await.unwrap();

        let page = repo.list_page(PageRequest::default()).await.unwrap();
        assert_eq!(page.items[0].id, older.id);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_support::database().await;
        let owner = test_support::user(&db, "owner@shop.example", Role::Owner).await;
        let repo = db.inventory();
        let item = repo.create(&draft("PEN-001"), &owner.id).await.unwrap();

        repo.delete(&item.id).await.unwrap();
        assert!(repo.get_by_id(&item.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&item.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_missing_creator_is_not_blamed_on_category() {
        let db = test_support::database().await;
        let owner = test_support::user(&db, "owner@shop.example", Role::Owner).await;
        let category = db
            .categories()
            .create(
                &CategoryDraft {
                    name: "Pens".to_string(),
                    description: None,
                },
                &owner.id,
            )
            .await
            .unwrap();
        let repo = db.inventory();

        let err = repo.create(&draft("PEN-001"), "deleted-user").await.unwrap_err();
        assert!(matches!(err, DbError::Internal(_)), "{err}");

        let mut with_category = draft("PEN-002");
        with_category.category_id = Some(category.id);
        let err = repo.create(&with_category, "deleted-user").await.unwrap_err();
        assert!(matches!(err, DbError::Internal(_)), "{err}");
    }
}
