//! Route handlers for the item catalog.

use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::{FieldError, Item, ItemPatch, ItemQuery};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemListing {
    pub items: BTreeMap<i64, Item>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Selection {
    pub query: ItemQuery,
    pub selection: Vec<Item>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Added {
    pub added: Item,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Updated {
    pub updated: Item,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    pub delete: Item,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub version: String,
}

/// GET /
pub async fn list_items(State(state): State<AppState>) -> Json<ItemListing> {
    Json(ItemListing {
        items: state.store.all(),
    })
}

/// GET /items/{item_id}
pub async fn get_item(
    State(state): State<AppState>,
    item_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Item>, ApiError> {
    let Path(item_id) = item_id?;
    let item = state.store.get(item_id)?;
    Ok(Json(item))
}

/// GET /items/
pub async fn find_items(
    State(state): State<AppState>,
    query: Result<Query<ItemQuery>, QueryRejection>,
) -> Result<Json<Selection>, ApiError> {
    let Query(query) = query?;
    let selection = state.store.find(&query);
    tracing::debug!(matched = selection.len(), "Item query evaluated");
    Ok(Json(Selection { query, selection }))
}

/// POST /
pub async fn add_item(
    State(state): State<AppState>,
    item: Result<Json<Item>, JsonRejection>,
) -> Result<Json<Added>, ApiError> {
    let Json(item) = item?;
    let added = state.store.insert(item).inspect_err(|e| {
        tracing::warn!(error = %e, "Rejected item");
    })?;

    tracing::info!(item_id = added.id, name = %added.name, "Item added");
    metrics::record_catalog_size(state.store.len());
    Ok(Json(Added { added }))
}

/// PUT /update/{item_id}
pub async fn update_item(
    State(state): State<AppState>,
    item_id: Result<Path<i64>, PathRejection>,
    patch: Result<Query<ItemPatch>, QueryRejection>,
) -> Result<Json<Updated>, ApiError> {
    let Path(item_id) = item_id?;
    let Query(patch) = patch?;

    let mut problems = Vec::new();
    if item_id < 0 {
        problems.push(FieldError {
            field: "item_id",
            message: "must be greater than or equal to 0".to_string(),
        });
    }
    if let Err(errors) = patch.validate() {
        problems.extend(errors);
    }
    if !problems.is_empty() {
        return Err(problems.into());
    }

    let updated = state.store.update(item_id, &patch)?;
    tracing::info!(item_id, "Item updated");
    Ok(Json(Updated { updated }))
}

/// DELETE /delete/{item_id}
pub async fn delete_item(
    State(state): State<AppState>,
    item_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Deleted>, ApiError> {
    let Path(item_id) = item_id?;
    let delete = state.store.remove(item_id)?;

    tracing::info!(item_id, "Item deleted");
    metrics::record_catalog_size(state.store.len());
    Ok(Json(Deleted { delete }))
}

/// GET /health
pub async fn health() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "operational".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
