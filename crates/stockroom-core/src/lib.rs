//! # stockroom-core: Pure Business Logic for Stockroom
//!
//! This crate holds the domain model and every business rule of the
//! inventory administration backend as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Stockroom Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Browser Dashboard (external)                    │   │
//! │  │   Inventory table ── Category settings ── User management       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/api (axum handlers)                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌────────┐ ┌────────────┐ ┌──────────┐ ┌──────┐  │   │
//! │  │   │  types  │ │ money  │ │ validation │ │pagination│ │access│  │   │
//! │  │   └─────────┘ └────────┘ └────────────┘ └──────────┘ └──────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                stockroom-db (Database Layer)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (User, Category, InventoryItem) and projections
//! - [`money`] - Integer-cent money with a decimal wire format
//! - [`validation`] - Field rules for every write
//! - [`pagination`] - Page requests and page arithmetic
//! - [`access`] - Which role may do what, and which dashboard sections it sees
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::pagination::PageRequest;
//!
//! let request = PageRequest::new(2, 10).unwrap();
//! assert_eq!(request.offset(), 10);
//! assert_eq!(PageRequest::total_pages(25, request.page_size()), 3);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod error;
pub mod money;
pub mod pagination;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use access::{Action, Section};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pagination::{Page, PageRequest};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page size used when the client does not send `pageSize`.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on `pageSize` for list endpoints.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Minimum length of a user password.
///
/// ## Business Reason
/// Matches what the dashboard forms enforce, so a password accepted in the
/// browser is never rejected by the server.
pub const MIN_PASSWORD_LENGTH: usize = 6;
