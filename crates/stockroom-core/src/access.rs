//! # Access Policy
//!
//! Which role may do what, and which dashboard sections each role sees.
//!
//! ```text
//! ┌────────────────────┬───────┬────────────┬───────────┐
//! │ Action             │ OWNER │ SHOPKEEPER │ WAREHOUSE │
//! ├────────────────────┼───────┼────────────┼───────────┤
//! │ read catalog       │   ✓   │     ✓      │     ✓     │
//! │ manage categories  │   ✓   │     ✓      │     ✓     │
//! │ manage inventory   │   ✓   │            │     ✓     │
//! │ manage users       │   ✓   │            │           │
//! └────────────────────┴───────┴────────────┴───────────┘
//! ```
//!
//! Handlers call [`authorize`] before touching the database.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::Role;

/// Something a caller wants to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ReadCatalog,
    ManageCategories,
    ManageInventory,
    ManageUsers,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::ReadCatalog => "read the catalog",
            Action::ManageCategories => "manage categories",
            Action::ManageInventory => "manage inventory",
            Action::ManageUsers => "manage users",
        })
    }
}

/// A dashboard navigation section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Section {
    Dashboard,
    Sales,
    Inventory,
    Users,
    Settings,
}

impl Section {
    /// Navigation order.
    pub const ALL: [Section; 5] = [
        Section::Dashboard,
        Section::Sales,
        Section::Inventory,
        Section::Users,
        Section::Settings,
    ];

    /// Roles that see this section.
    fn roles(&self) -> &'static [Role] {
        match self {
            Section::Dashboard | Section::Settings => &Role::ALL,
            Section::Sales => &[Role::Owner, Role::Shopkeeper],
            Section::Inventory => &[Role::Owner, Role::Warehouse],
            Section::Users => &[Role::Owner],
        }
    }
}

impl Role {
    /// Whether this role may perform `action`.
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::ReadCatalog | Action::ManageCategories => true,
            Action::ManageInventory => matches!(self, Role::Owner | Role::Warehouse),
            Action::ManageUsers => matches!(self, Role::Owner),
        }
    }
}

/// Fails with [`CoreError::PermissionDenied`] unless `role` allows `action`.
///
/// ## Example
/// ```rust
/// use stockroom_core::access::{authorize, Action};
/// use stockroom_core::Role;
///
/// assert!(authorize(Role::Warehouse, Action::ManageInventory).is_ok());
/// assert!(authorize(Role::Shopkeeper, Action::ManageUsers).is_err());
/// ```
pub fn authorize(role: Role, action: Action) -> CoreResult<()> {
    if role.allows(action) {
        Ok(())
    } else {
        Err(CoreError::PermissionDenied { role, action })
    }
}

/// Sections the dashboard shows to `role`, in navigation order.
pub fn visible_sections(role: Role) -> Vec<Section> {
    Section::ALL
        .into_iter()
        .filter(|section| section.roles().contains(&role))
        .collect()
}
