//! Category handlers.
//!
//! Any signed-in role may read and maintain categories. Deleting is always
//! guarded: a category that inventory items still use is refused with 409
//! and the number of items.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::events::{ChangeAction, ChangeEvent, Resource};
use crate::extract::ApiJson;
use crate::routes::MessageResponse;
use crate::AppState;
use stockroom_core::access::{authorize, Action};
use stockroom_core::validation::validate_category;
use stockroom_core::{Category, CategoryInput};
use stockroom_db::DbError;

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<Vec<Category>>> {
    authorize(user.role, Action::ReadCatalog)?;
    Ok(Json(state.db.categories().list().await?))
}

/// GET /api/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Category>> {
    authorize(user.role, Action::ReadCatalog)?;

    let category = state
        .db
        .categories()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| DbError::not_found("Category", &id))?;

    Ok(Json(category))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(input): ApiJson<CategoryInput>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    authorize(user.role, Action::ManageCategories)?;
    let draft = validate_category(&input)?;

    let category = state.db.categories().create(&draft, &user.id).await?;
    info!(id = %category.id, name = %category.name, by = %user.id, "Created category");

    state.feed.publish(ChangeEvent::new(
        Resource::Category,
        ChangeAction::Created,
        &category.id,
        &category.name,
        &user.id,
    ));

    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> ApiResult<Json<Category>> {
    authorize(user.role, Action::ManageCategories)?;
    let draft = validate_category(&input)?;

    let category = state.db.categories().update(&id, &draft).await?;
    info!(id = %category.id, name = %category.name, by = %user.id, "Updated category");

    state.feed.publish(ChangeEvent::new(
        Resource::Category,
        ChangeAction::Updated,
        &category.id,
        &category.name,
        &user.id,
    ));

    Ok(Json(category))
}

/// DELETE /api/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    authorize(user.role, Action::ManageCategories)?;

    let name = state
        .db
        .categories()
        .get_by_id(&id)
        .await?
        .map(|category| category.name)
        .unwrap_or_else(|| id.clone());

    state.db.categories().delete(&id).await?;
    info!(id = %id, by = %user.id, "Deleted category");

    state.feed.publish(ChangeEvent::new(
        Resource::Category,
        ChangeAction::Deleted,
        &id,
        name,
        &user.id,
    ));

    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
