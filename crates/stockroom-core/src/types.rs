//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │    Category     │   │  InventoryItem  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  created_by_id  │   │  id (UUID)      │       │
//! │  │  email (unique) │   │  name (unique)  │◄──│  category_id    │       │
//! │  │  role           │   │  description    │   │  item_code (uq) │       │
//! │  └─────────────────┘   └─────────────────┘   │  sale/cost price│       │
//! │          ▲                                    │  stock          │       │
//! │          └────────────────────────────────────│  created_by_id  │       │
//! │                                               └─────────────────┘       │
//! │                                                                         │
//! │  Drafts (validated input): CategoryDraft, InventoryDraft,              │
//! │                            NewUser, UserChanges                        │
//! │  Projections (joined data): CreatorSummary, CreatorContact,            │
//! │                             CategorySummary                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Every record serializes in camelCase (`itemCode`, `createdById`) because
//! that is what the dashboard consumes. Prices go out as decimal numbers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Role
// =============================================================================

/// The role a user account holds.
///
/// ## Who Does What
/// ```text
/// OWNER       everything, including user management
/// SHOPKEEPER  front of house: reads stock, maintains categories
/// WAREHOUSE   back of house: maintains inventory and categories
/// ```
/// See [`crate::access`] for the exact policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum Role {
    Owner,
    Shopkeeper,
    Warehouse,
}

impl Role {
    /// All roles, in the order the dashboard lists them.
    pub const ALL: [Role; 3] = [Role::Owner, Role::Shopkeeper, Role::Warehouse];

    /// The wire/database name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "OWNER",
            Role::Shopkeeper => "SHOPKEEPER",
            Role::Warehouse => "WAREHOUSE",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OWNER" => Ok(Role::Owner),
            "SHOPKEEPER" => Ok(Role::Shopkeeper),
            "WAREHOUSE" => Ok(Role::Warehouse),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: Role::ALL.iter().map(|r| r.as_str().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A user account as exposed to clients.
///
/// The password hash is deliberately absent; it only ever travels inside
/// [`UserCredentials`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub image: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// What sign-in needs to check a password.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: String,
    pub email: String,
    /// PHC-format hash string (never a raw password).
    pub password_hash: String,
}

/// A validated user ready for insertion.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// A validated user update. `password_hash` is `None` when the password
/// is left unchanged.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: Option<String>,
}

// =============================================================================
// Projections
// =============================================================================

/// Creator shown next to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreatorSummary {
    pub id: String,
    pub name: String,
}

/// Creator shown next to an inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreatorContact {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Category shown next to an inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub id: String,
    /// Unique across all categories.
    pub name: String,
    pub description: Option<String>,
    /// Cleared when the creating user is deleted.
    pub created_by_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    pub creator: Option<CreatorSummary>,
}

/// Validated category input, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
}

// =============================================================================
// Inventory Item
// =============================================================================

/// A stocked item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryItem {
    pub id: String,
    /// Business identifier, unique across all items.
    pub item_code: String,
    pub barcode: Option<String>,
    pub item_desc: String,
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub sale_price: Money,
    #[serde(with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub cost_price: Money,
    pub stock: i64,
    pub category_id: Option<String>,
    pub supplier: Option<String>,
    pub created_by_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    pub creator: Option<CreatorContact>,
    pub category: Option<CategorySummary>,
}

/// Validated inventory input, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryDraft {
    pub item_code: String,
    pub barcode: Option<String>,
    pub item_desc: String,
    pub sale_price: Money,
    pub cost_price: Money,
    pub stock: i64,
    pub category_id: Option<String>,
    pub supplier: Option<String>,
}

// =============================================================================
// Request Inputs
// =============================================================================
//
// Raw request bodies as the dashboard sends them. Every field is optional so
// that a missing field reaches validation (and gets a proper message) instead
// of failing deserialization. See [`crate::validation`].

/// Body of a category create or update.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Body of an inventory create or update.
///
/// Prices arrive as decimal numbers in major units (`12.5`).
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryInput {
    pub item_code: Option<String>,
    pub barcode: Option<String>,
    pub item_desc: Option<String>,
    pub sale_price: Option<f64>,
    pub cost_price: Option<f64>,
    pub stock: Option<i64>,
    pub category_id: Option<String>,
    pub supplier: Option<String>,
}

/// Body of a user create or update. `password` is required on create and
/// optional on update.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Validated user profile fields. The password travels next to it in
/// plain text only until it is hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    /// Trimmed and lowercased.
    pub email: String,
    pub role: Role,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert_eq!("warehouse".parse::<Role>().unwrap(), Role::Warehouse);
        assert!("ADMIN".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serializes_uppercase() {
        let json = serde_json::to_string(&Role::Shopkeeper).unwrap();
        assert_eq!(json, "\"SHOPKEEPER\"");
    }

    #[test]
    fn test_inventory_item_wire_format() {
        let now = Utc::now();
        let item = InventoryItem {
            id: "i-1".to_string(),
            item_code: "PEN-001".to_string(),
            barcode: None,
            item_desc: "Blue pen".to_string(),
            sale_price: Money::from_cents(250),
            cost_price: Money::from_cents(120),
            stock: 40,
            category_id: None,
            supplier: Some("Acme".to_string()),
            created_by_id: Some("u-1".to_string()),
            created_at: now,
            updated_at: now,
            creator: None,
            category: None,
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["itemCode"], "PEN-001");
        assert_eq!(value["salePrice"], 2.5);
        assert_eq!(value["costPrice"], 1.2);
        assert_eq!(value["createdById"], "u-1");
        assert!(value["category"].is_null());
    }
}
