//! User management handlers (OWNER only).
//!
//! Passwords are hashed with argon2 on the blocking pool before anything is
//! written; responses never carry a hash.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::auth::OwnerUser;
use crate::error::{ApiError, ApiResult};
use crate::events::{ChangeAction, ChangeEvent, Resource};
use crate::extract::ApiJson;
use crate::routes::MessageResponse;
use crate::AppState;
use stockroom_core::validation::{validate_new_user, validate_user_update};
use stockroom_core::{CoreError, NewUser, Role, User, UserChanges, UserInput};
use stockroom_db::{hash_password, DbError};

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    OwnerUser(_owner): OwnerUser,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.db.users().list().await?))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    OwnerUser(owner): OwnerUser,
    ApiJson(input): ApiJson<UserInput>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let (draft, password) = validate_new_user(&input)?;
    let password_hash = hash_off_thread(password).await?;

    let user = state
        .db
        .users()
        .create(&NewUser {
            name: draft.name,
            email: draft.email,
            password_hash,
            role: draft.role,
        })
        .await?;
    info!(id = %user.id, email = %user.email, role = %user.role, by = %owner.id, "Created user");

    state.feed.publish(ChangeEvent::new(
        Resource::User,
        ChangeAction::Created,
        &user.id,
        &user.email,
        &owner.id,
    ));

    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/users/{id}
///
/// An empty or missing password leaves the stored hash untouched. Another
/// OWNER keeps the OWNER role; only they can lower it.
pub async fn update_user(
    State(state): State<AppState>,
    OwnerUser(owner): OwnerUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UserInput>,
) -> ApiResult<Json<User>> {
    let (draft, password) = validate_user_update(&input)?;

    if draft.role != Role::Owner && id != owner.id {
        let current = state.db.users().get_by_id(&id).await?;
        if current.is_some_and(|target| target.role == Role::Owner) {
            return Err(CoreError::OwnerDemotion { id }.into());
        }
    }
    let password_hash = match password {
        Some(password) => Some(hash_off_thread(password).await?),
        None => None,
    };

    let user = state
        .db
        .users()
        .update(
            &id,
            &UserChanges {
                name: draft.name,
                email: draft.email,
                role: draft.role,
                password_hash,
            },
        )
        .await?;
    info!(id = %user.id, role = %user.role, by = %owner.id, "Updated user");

    state.feed.publish(ChangeEvent::new(
        Resource::User,
        ChangeAction::Updated,
        &user.id,
        &user.email,
        &owner.id,
    ));

    Ok(Json(user))
}

/// DELETE /api/users/{id}
///
/// OWNER accounts cannot be deleted. Records the user created stay, with
/// their creator cleared.
pub async fn delete_user(
    State(state): State<AppState>,
    OwnerUser(owner): OwnerUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let target = state
        .db
        .users()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| DbError::not_found("User", &id))?;

    if target.role == Role::Owner {
        return Err(CoreError::OwnerProtected { id }.into());
    }

    state.db.users().delete(&id).await?;
    info!(id = %id, by = %owner.id, "Deleted user");

    state.feed.publish(ChangeEvent::new(
        Resource::User,
        ChangeAction::Deleted,
        &id,
        &target.email,
        &owner.id,
    ));

    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Runs argon2 on the blocking pool.
async fn hash_off_thread(password: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::from)
}
