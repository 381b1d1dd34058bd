//! Profile endpoints.

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, routing::get, Json, Router};
use lifetrack_core::{Profile, ProfileView};

use crate::error::AppError;
use crate::extract::Authenticated;
use crate::AppState;

/// Profile routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(show_profile).put(update_profile))
}

async fn show_profile(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
) -> Result<Json<ProfileView>, AppError> {
    Ok(Json(state.service.profile(&actor)?))
}

async fn update_profile(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    payload: Result<Json<Profile>, JsonRejection>,
) -> Result<Json<ProfileView>, AppError> {
    let Json(profile) = payload?;
    Ok(Json(state.service.update_profile(&actor, profile)?))
}
