//! Moderation and account management. Every handler is admin only.

use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use lifetrack_core::{CatalogKind, PendingItems};

use crate::error::AppError;
use crate::extract::Authenticated;
use crate::json::{MessageResponse, SuspendRequest, UserResponse};
use crate::AppState;

/// Admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/pending", get(pending))
        .route("/admin/users/:username/suspend", post(suspend))
        .route("/admin/users/:username/reinstate", post(reinstate))
        .route("/admin/entries/:id/approve", post(approve_entry))
        .route("/admin/entries/:id/reject", post(reject_entry))
        .route("/admin/:kind/:id/approve", post(approve))
        .route("/admin/:kind/:id/reject", post(reject))
}

async fn pending(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
) -> Result<Json<PendingItems>, AppError> {
    Ok(Json(state.service.pending(&actor)?))
}

async fn approve(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path((kind, id)): Path<(CatalogKind, u64)>,
) -> Result<Json<MessageResponse>, AppError> {
    state.service.approve(&actor, kind, id)?;
    Ok(Json(MessageResponse::ok(format!("{} approved", kind.label()))))
}

async fn reject(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path((kind, id)): Path<(CatalogKind, u64)>,
) -> Result<Json<MessageResponse>, AppError> {
    state.service.reject(&actor, kind, id)?;
    Ok(Json(MessageResponse::ok(format!("{} rejected", kind.label()))))
}

async fn approve_entry(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.service.approve_entry(&actor, id)?;
    Ok(Json(MessageResponse::ok("Entry approved")))
}

async fn reject_entry(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.service.reject_entry(&actor, id)?;
    Ok(Json(MessageResponse::ok("Entry rejected and removed")))
}

/// Suspend an account, for the configured length unless overridden.
async fn suspend(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(username): Path<String>,
    payload: Result<Json<SuspendRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let Json(request) = payload?;
    let days = if request.permanent {
        None
    } else {
        Some(
            request
                .days
                .unwrap_or(state.service.config().suspension_days),
        )
    };
    let user = state.service.suspend(&actor, &username, days)?;
    Ok(Json(user.into()))
}

async fn reinstate(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.service.reinstate(&actor, &username)?;
    Ok(Json(user.into()))
}
