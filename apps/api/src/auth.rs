//! JWT authentication module.
//!
//! Issues session tokens at sign-in and turns the `Authorization: Bearer`
//! header back into a user on every request.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Authorization: Bearer <jwt>                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  extract_bearer_token ── missing/malformed ──► 401                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  JwtManager::validate_access_token ── bad signature/expired ──► 401     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  users.get_by_id(claims.sub) ── user deleted ──► 401                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AuthUser(user)          OwnerUser(user) ── not OWNER ──► 403           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The user is reloaded from the database on every request, so a role
//! change or a deleted account takes effect immediately even though the
//! token itself still carries the old role.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;
use stockroom_core::access::{authorize, Action};
use stockroom_core::{Role, User};

/// Token type carried by session tokens.
const ACCESS_TOKEN: &str = "access";

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Role at the time the token was issued
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,

    /// Token type (always "access")
    pub token_type: String,
}

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            lifetime_secs,
        }
    }

    /// Seconds a freshly issued token stays valid.
    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Generate a session token for `user`.
    pub fn issue(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user.id.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN.to_string(),
        };

        self.encode(&claims)
    }

    fn encode(&self, claims: &Claims) -> Result<String, ApiError> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected token");
            ApiError::unauthorized("Invalid or expired session")
        })?;

        Ok(token_data.claims)
    }

    /// Validate that a token is a session (access) token.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, ApiError> {
        let claims = self.validate_token(token)?;

        if claims.token_type != ACCESS_TOKEN {
            return Err(ApiError::unauthorized("Expected access token"));
        }

        Ok(claims)
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// =============================================================================
// Extractors
// =============================================================================

/// The signed-in user, reloaded from the database.
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let app_state = AppState::from_ref(state);
        let claims = app_state.jwt.validate_access_token(token)?;

        let user = app_state
            .db
            .users()
            .get_by_id(&claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Session user no longer exists"))?;

        Ok(AuthUser(user))
    }
}

/// The signed-in user, who must hold the OWNER role.
pub struct OwnerUser(pub User);

impl<S> FromRequestParts<S> for OwnerUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        authorize(user.role, Action::ManageUsers)?;
        Ok(OwnerUser(user))
    }
}
