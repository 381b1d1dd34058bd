//! Food and workout catalog endpoints.
//!
//! Both catalogs share one set of handlers, instantiated per record type.

use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use lifetrack_core::{CatalogRecord, Food, Workout};

use crate::error::AppError;
use crate::extract::{Authenticated, MaybeAuthenticated};
use crate::json::MessageResponse;
use crate::AppState;

/// Catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_items::<Food>).post(create_item::<Food>))
        .route("/foods/:id", get(get_item::<Food>).delete(delete_item::<Food>))
        .route(
            "/workouts",
            get(list_items::<Workout>).post(create_item::<Workout>),
        )
        .route(
            "/workouts/:id",
            get(get_item::<Workout>).delete(delete_item::<Workout>),
        )
}

/// Items visible to the caller.
async fn list_items<R: CatalogRecord>(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
) -> Result<Json<Vec<R>>, AppError> {
    Ok(Json(state.service.list_visible::<R>(&actor)?))
}

/// A single visible item.
async fn get_item<R: CatalogRecord>(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(id): Path<u64>,
) -> Result<Json<R>, AppError> {
    Ok(Json(state.service.get_visible::<R>(&actor, id)?))
}

/// Submit a new item.
async fn create_item<R: CatalogRecord>(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    payload: Result<Json<R::Draft>, JsonRejection>,
) -> Result<(StatusCode, Json<R>), AppError> {
    let Json(draft) = payload?;
    let item = state.service.add_item::<R>(&actor, draft)?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Delete an item.
async fn delete_item<R: CatalogRecord>(
    State(state): State<AppState>,
    MaybeAuthenticated(actor): MaybeAuthenticated,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>, AppError> {
    let item = state.service.delete_item::<R>(actor.as_ref(), id)?;
    Ok(Json(MessageResponse::ok(format!(
        "{} \"{}\" deleted successfully",
        R::KIND.label(),
        item.name()
    ))))
}
