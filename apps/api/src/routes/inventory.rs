//! Inventory handlers.
//!
//! Reads are open to every role; writes need OWNER or WAREHOUSE.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::events::{ChangeAction, ChangeEvent, Resource};
use crate::extract::{ApiJson, ApiQuery};
use crate::routes::MessageResponse;
use crate::AppState;
use stockroom_core::access::{authorize, Action};
use stockroom_core::validation::validate_inventory;
use stockroom_core::{InventoryInput, InventoryItem, Page, PageRequest};
use stockroom_db::DbError;

/// `?page=&pageSize=` on the inventory list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// GET /api/inventory?page&pageSize
pub async fn list_inventory(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Json<Page<InventoryItem>>> {
    authorize(user.role, Action::ReadCatalog)?;
    let request = PageRequest::from_query(params.page, params.page_size)?;

    Ok(Json(state.db.inventory().list_page(request).await?))
}

/// GET /api/inventory/{id}
pub async fn get_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<InventoryItem>> {
    authorize(user.role, Action::ReadCatalog)?;

    let item = state
        .db
        .inventory()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| DbError::not_found("Inventory item", &id))?;

    Ok(Json(item))
}

/// POST /api/inventory
pub async fn create_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(input): ApiJson<InventoryInput>,
) -> ApiResult<(StatusCode, Json<InventoryItem>)> {
    authorize(user.role, Action::ManageInventory)?;
    let draft = validate_inventory(&input)?;

    let item = state.db.inventory().create(&draft, &user.id).await?;
    info!(id = %item.id, item_code = %item.item_code, by = %user.id, "Created inventory item");

    state.feed.publish(ChangeEvent::new(
        Resource::Inventory,
        ChangeAction::Created,
        &item.id,
        &item.item_code,
        &user.id,
    ));

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/inventory/{id}
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<InventoryInput>,
) -> ApiResult<Json<InventoryItem>> {
    authorize(user.role, Action::ManageInventory)?;
    let draft = validate_inventory(&input)?;

    let item = state.db.inventory().update(&id, &draft).await?;
    info!(id = %item.id, item_code = %item.item_code, by = %user.id, "Updated inventory item");

    state.feed.publish(ChangeEvent::new(
        Resource::Inventory,
        ChangeAction::Updated,
        &item.id,
        &item.item_code,
        &user.id,
    ));

    Ok(Json(item))
}

/// DELETE /api/inventory/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    authorize(user.role, Action::ManageInventory)?;

    let item_code = state
        .db
        .inventory()
        .get_by_id(&id)
        .await?
        .map(|item| item.item_code)
        .unwrap_or_else(|| id.clone());

    state.db.inventory().delete(&id).await?;
    info!(id = %id, by = %user.id, "Deleted inventory item");

    state.feed.publish(ChangeEvent::new(
        Resource::Inventory,
        ChangeAction::Deleted,
        &id,
        item_code,
        &user.id,
    ));

    Ok(Json(MessageResponse::new("Inventory item deleted successfully")))
}
