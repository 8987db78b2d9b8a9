//! Sign-in and session handlers.

use std::sync::OnceLock;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::AppState;
use stockroom_core::access::visible_sections;
use stockroom_core::validation::validate_sign_in;
use stockroom_core::{CoreError, Section, User};
use stockroom_db::{hash_password, verify_password};

/// Body of POST /api/auth/signin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignInRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: User,
    /// Dashboard sections the user's role may open.
    pub sections: Vec<Section>,
}

/// POST /api/auth/signin
///
/// Unknown email and wrong password answer with the same 401 after the
/// same amount of argon2 work.
pub async fn sign_in(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignInRequest>,
) -> ApiResult<Json<SignInResponse>> {
    let (email, password) =
        validate_sign_in(request.email.as_deref(), request.password.as_deref())?;

    let credentials = state.db.users().find_credentials(&email).await?;

    let stored_hash = credentials.as_ref().map(|c| c.password_hash.clone());
    let matches = tokio::task::spawn_blocking(move || check_password(&password, stored_hash))
        .await
        .map_err(ApiError::internal)?;

    let Some(credentials) = credentials else {
        warn!(email = %email, "Sign-in for unknown email");
        return Err(CoreError::InvalidCredentials.into());
    };
    if !matches {
        warn!(user_id = %credentials.id, "Sign-in with wrong password");
        return Err(CoreError::InvalidCredentials.into());
    }

    let user = state
        .db
        .users()
        .get_by_id(&credentials.id)
        .await?
        .ok_or(CoreError::InvalidCredentials)?;

    let token = state.jwt.issue(&user)?;
    info!(user_id = %user.id, role = %user.role, "Signed in");

    Ok(Json(SignInResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt.lifetime_secs(),
        user,
    }))
}

/// Verifies `password` against the stored hash, or against a dummy hash
/// when there is no account. Blocking.
fn check_password(password: &str, stored_hash: Option<String>) -> bool {
    match stored_hash {
        Some(hash) => verify_password(password, &hash),
        None => {
            verify_password(password, dummy_hash());
            false
        }
    }
}

/// Argon2 hash of a throwaway password, computed once per process.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_password("stockroom-no-such-account").unwrap_or_default())
}

/// GET /api/auth/me
pub async fn me(AuthUser(user): AuthUser) -> Json<SessionResponse> {
    let sections = visible_sections(user.role);
    Json(SessionResponse { user, sections })
}
