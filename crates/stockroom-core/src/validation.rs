//! # Validation Module
//!
//! Field rules for every write Stockroom accepts.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard forms (external)                                   │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: API handler (Rust)                                           │
//! │  ├── JSON deserialization into *Input types                            │
//! │  └── THIS MODULE: Input → Draft, trimming and checking every field     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE constraints (category name, item code, email)              │
//! │  └── Foreign key constraints (categoryId)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Uniqueness is NOT checked here. It needs the database and is decided by
//! the write itself.
//!
//! ## Usage
//! ```rust
//! use stockroom_core::types::CategoryInput;
//! use stockroom_core::validation::validate_category;
//!
//! let input = CategoryInput {
//!     name: Some("  Pens ".to_string()),
//!     description: Some("".to_string()),
//! };
//! let draft = validate_category(&input).unwrap();
//! assert_eq!(draft.name, "Pens");
//! assert_eq!(draft.description, None);
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CategoryDraft, CategoryInput, InventoryDraft, InventoryInput, Role, UserDraft, UserInput};
use crate::MIN_PASSWORD_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_CATEGORY_NAME: usize = 100;
const MAX_DESCRIPTION: usize = 500;
const MAX_ITEM_CODE: usize = 50;
const MAX_ITEM_DESC: usize = 200;
const MAX_BARCODE: usize = 64;
const MAX_SUPPLIER: usize = 200;
const MIN_USER_NAME: usize = 2;
const MAX_USER_NAME: usize = 100;
const MAX_EMAIL: usize = 254;
const MAX_PASSWORD: usize = 128;

// =============================================================================
// Helpers
// =============================================================================

/// Trims an optional string; blank becomes `None`.
fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Checks a trimmed required string against length bounds.
fn required_text(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<String> {
    let value = value.trim();
    let len = value.chars().count();

    if len == 0 {
        return Err(ValidationError::required(field));
    }
    if len < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

fn max_len(field: &str, value: Option<String>, max: usize) -> ValidationResult<Option<String>> {
    match value {
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        }),
        other => Ok(other),
    }
}

/// Fails with `MissingFields` listing every absent or blank field.
fn require_present(fields: &[(&str, bool)]) -> ValidationResult<()> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields { fields: missing })
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a price given in major units and converts it to cents.
///
/// ## Rules
/// - Must be a finite number
/// - Must be strictly positive after rounding to the cent
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_price;
///
/// assert_eq!(validate_price("salePrice", 12.5).unwrap().cents(), 1250);
/// assert!(validate_price("salePrice", 0.0).is_err());
/// assert!(validate_price("salePrice", 0.004).is_err()); // rounds to zero
/// ```
pub fn validate_price(field: &str, amount: f64) -> ValidationResult<Money> {
    let money = Money::from_decimal(amount).ok_or_else(|| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "not a representable amount".to_string(),
    })?;

    if !money.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(money)
}

/// Validates a stock level: zero or more whole units.
pub fn validate_stock(stock: i64) -> ValidationResult<i64> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }
    Ok(stock)
}

/// Validates and normalizes an email address (trimmed, lowercased).
///
/// This is a shape check, not RFC 5322: one `@`, a non-empty local part,
/// a dotted domain and no whitespace.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_email;
///
/// assert_eq!(validate_email(" Ada@Shop.Example ").unwrap(), "ada@shop.example");
/// assert!(validate_email("ada@localhost").is_err());
/// assert!(validate_email("not an email").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim().to_lowercase();
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }
    if email.len() > MAX_EMAIL {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL,
        });
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid("contains whitespace"));
    }

    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("missing @"))?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid("expected exactly one @ after a local part"));
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid("domain must look like example.com"));
    }

    Ok(email)
}

/// Validates a plain-text password before hashing.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    let len = password.chars().count();

    if len < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }
    if len > MAX_PASSWORD {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: MAX_PASSWORD,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a category body into a [`CategoryDraft`].
///
/// ## Rules
/// - `name`: required, trimmed, at most 100 characters
/// - `description`: optional, blank means none, at most 500 characters
pub fn validate_category(input: &CategoryInput) -> ValidationResult<CategoryDraft> {
    let name = required_text(
        "name",
        input.name.as_deref().unwrap_or_default(),
        1,
        MAX_CATEGORY_NAME,
    )?;
    let description = max_len(
        "description",
        optional_text(input.description.as_deref()),
        MAX_DESCRIPTION,
    )?;

    Ok(CategoryDraft { name, description })
}

/// Validates an inventory body into an [`InventoryDraft`].
///
/// ## Rules
/// - `itemCode`, `itemDesc`, `salePrice`, `costPrice`, `stock` are required;
///   all missing ones are reported together
/// - prices must be positive, stock must not be negative
/// - optional strings (`barcode`, `supplier`, `categoryId`) are trimmed and
///   blank means none
///
/// Whether `categoryId` names an existing category is left to the
/// database foreign key.
pub fn validate_inventory(input: &InventoryInput) -> ValidationResult<InventoryDraft> {
    require_present(&[
        ("itemCode", !is_blank(&input.item_code)),
        ("itemDesc", !is_blank(&input.item_desc)),
        ("salePrice", input.sale_price.is_some()),
        ("costPrice", input.cost_price.is_some()),
        ("stock", input.stock.is_some()),
    ])?;

    let item_code = required_text(
        "itemCode",
        input.item_code.as_deref().unwrap_or_default(),
        1,
        MAX_ITEM_CODE,
    )?;
    let item_desc = required_text(
        "itemDesc",
        input.item_desc.as_deref().unwrap_or_default(),
        1,
        MAX_ITEM_DESC,
    )?;
    let sale_price = validate_price("salePrice", input.sale_price.unwrap_or_default())?;
    let cost_price = validate_price("costPrice", input.cost_price.unwrap_or_default())?;
    let stock = validate_stock(input.stock.unwrap_or_default())?;

    let barcode = max_len("barcode", optional_text(input.barcode.as_deref()), MAX_BARCODE)?;
    let supplier = max_len(
        "supplier",
        optional_text(input.supplier.as_deref()),
        MAX_SUPPLIER,
    )?;
    let category_id = optional_text(input.category_id.as_deref());

    Ok(InventoryDraft {
        item_code,
        barcode,
        item_desc,
        sale_price,
        cost_price,
        stock,
        category_id,
        supplier,
    })
}

/// Validates the profile part of a user body (`name`, `email`, `role`).
fn validate_user_profile(input: &UserInput) -> ValidationResult<UserDraft> {
    let name = required_text(
        "name",
        input.name.as_deref().unwrap_or_default(),
        MIN_USER_NAME,
        MAX_USER_NAME,
    )?;
    let email = validate_email(input.email.as_deref().unwrap_or_default())?;
    let role: Role = input.role.as_deref().unwrap_or_default().parse()?;

    Ok(UserDraft { name, email, role })
}

/// Validates a user create body.
///
/// All of `name`, `email`, `password` and `role` are required. Returns the
/// profile and the plain-text password, which the caller hashes.
///
/// ## Example
/// ```rust
/// use stockroom_core::types::{Role, UserInput};
/// use stockroom_core::validation::validate_new_user;
///
/// let input = UserInput {
///     name: Some("Ada".into()),
///     email: Some("ada@shop.example".into()),
///     password: Some("secret1".into()),
///     role: Some("WAREHOUSE".into()),
/// };
/// let (draft, password) = validate_new_user(&input).unwrap();
/// assert_eq!(draft.role, Role::Warehouse);
/// assert_eq!(password, "secret1");
/// ```
pub fn validate_new_user(input: &UserInput) -> ValidationResult<(UserDraft, String)> {
    require_present(&[
        ("name", !is_blank(&input.name)),
        ("email", !is_blank(&input.email)),
        ("password", input.password.as_deref().map_or(false, |p| !p.is_empty())),
        ("role", !is_blank(&input.role)),
    ])?;

    let draft = validate_user_profile(input)?;
    let password = input.password.clone().unwrap_or_default();
    validate_password(&password)?;

    Ok((draft, password))
}

/// Validates a user update body.
///
/// `name`, `email` and `role` are required. An absent or empty `password`
/// leaves the stored one unchanged.
pub fn validate_user_update(input: &UserInput) -> ValidationResult<(UserDraft, Option<String>)> {
    require_present(&[
        ("name", !is_blank(&input.name)),
        ("email", !is_blank(&input.email)),
        ("role", !is_blank(&input.role)),
    ])?;

    let draft = validate_user_profile(input)?;
    let password = input.password.clone().filter(|p| !p.is_empty());
    if let Some(password) = &password {
        validate_password(password)?;
    }

    Ok((draft, password))
}

/// Validates sign-in credentials. Only presence is checked, so a wrong
/// email shape still gets the generic "invalid credentials" answer.
pub fn validate_sign_in(email: Option<&str>, password: Option<&str>) -> ValidationResult<(String, String)> {
    let email = email.map(str::trim).unwrap_or_default();
    let password = password.unwrap_or_default();

    require_present(&[("email", !email.is_empty()), ("password", !password.is_empty())])?;

    Ok((email.to_lowercase(), password.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
