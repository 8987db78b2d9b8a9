//! # Stockroom API
//!
//! JSON-over-HTTP admin backend for a small shop: categories, inventory,
//! user accounts and a live change feed.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Stockroom API                                   │
//! │                                                                         │
//! │  Dashboard ──► axum Router (TraceLayer)                                 │
//! │                    │                                                    │
//! │                    ├── AuthUser / OwnerUser extractors (JWT)            │
//! │                    ├── ApiJson / ApiQuery extractors (400 envelope)     │
//! │                    ▼                                                    │
//! │                route handlers ──► stockroom-core (validation, policy)   │
//! │                    │                                                    │
//! │                    ├──────────► stockroom-db (SQLite repositories)      │
//! │                    │                                                    │
//! │                    └──────────► ChangeFeed ──► GET /api/events (SSE)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`] for the `STOCKROOM_*` environment variables.

pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod extract;
pub mod routes;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::auth::JwtManager;
use crate::config::{AppConfig, BootstrapOwner};
use crate::events::ChangeFeed;
use stockroom_core::validation::{validate_email, validate_password};
use stockroom_core::{NewUser, Role, User};
use stockroom_db::{hash_password, Database};

// Re-exports
pub use config::ConfigError;
pub use error::{ApiError, ApiResult, ErrorKind};
pub use routes::build_router;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub feed: ChangeFeed,
    pub shutdown: Shutdown,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.token_lifetime_secs);

        AppState {
            db,
            jwt: Arc::new(jwt),
            feed: ChangeFeed::new(),
            shutdown: Shutdown::new(),
            config: Arc::new(config),
        }
    }
}

/// Server-wide stop signal.
///
/// `main` triggers it when the process is asked to stop; long-lived
/// responses (the change feed) end when it fires so graceful shutdown
/// does not wait on them forever.
#[derive(Debug, Clone)]
pub struct Shutdown {
    sender: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Shutdown {
            sender: Arc::new(sender),
        }
    }

    /// Marks the server as stopping. Idempotent.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    /// Resolves once [`trigger`](Self::trigger) has been called, including
    /// when it already was.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut receiver = self.sender.subscribe();
        async move {
            loop {
                if *receiver.borrow_and_update() {
                    break;
                }
                if receiver.changed().await.is_err() {
                    break;
                }
            }
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates the configured OWNER account unless that email already exists.
///
/// ## Returns
/// * `Ok(Some(user))` - The account was created
/// * `Ok(None)` - An account with this email already exists
pub async fn ensure_owner(db: &Database, owner: &BootstrapOwner) -> ApiResult<Option<User>> {
    let email = validate_email(&owner.email)?;
    validate_password(&owner.password)?;

    if db.users().find_credentials(&email).await?.is_some() {
        info!(email = %email, "Bootstrap owner already exists");
        return Ok(None);
    }

    if db.users().count_by_role(Role::Owner).await? > 0 {
        warn!(email = %email, "Another owner exists; creating bootstrap owner anyway");
    }

    let user = db
        .users()
        .create(&NewUser {
            name: owner.name.trim().to_string(),
            email,
            password_hash: hash_password(&owner.password)?,
            role: Role::Owner,
        })
        .await?;

    info!(id = %user.id, email = %user.email, "Created bootstrap owner");
    Ok(Some(user))
}
