//! Log entry endpoints.

use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use lifetrack_core::{FoodLog, LogEntry, Macros, UserStats, WorkoutLog};

use crate::error::AppError;
use crate::extract::Authenticated;
use crate::json::{EditDateRequest, EntriesResponse, MessageResponse};
use crate::AppState;

/// Entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_entries))
        .route("/entries/foods", post(log_foods))
        .route("/entries/workouts", post(log_workouts))
        .route("/entries/:id", delete(delete_entry))
        .route("/entries/:id/date", put(edit_entry_date))
        .route("/entries/:id/privacy", post(toggle_privacy))
        .route("/entries/macros/:date", get(date_macros))
        .route("/feed", get(feed))
        .route("/stats", get(stats))
}

async fn list_entries(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
) -> Result<Json<Vec<LogEntry>>, AppError> {
    Ok(Json(state.service.list_entries(&actor)?))
}

async fn log_foods(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    payload: Result<Json<Vec<FoodLog>>, JsonRejection>,
) -> Result<(StatusCode, Json<EntriesResponse>), AppError> {
    let Json(items) = payload?;
    let entries = state.service.log_foods(&actor, items)?;
    Ok((StatusCode::CREATED, Json(entries.into())))
}

async fn log_workouts(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    payload: Result<Json<Vec<WorkoutLog>>, JsonRejection>,
) -> Result<(StatusCode, Json<EntriesResponse>), AppError> {
    let Json(items) = payload?;
    let entries = state.service.log_workouts(&actor, items)?;
    Ok((StatusCode::CREATED, Json(entries.into())))
}

async fn delete_entry(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.service.delete_entry(&actor, id)?;
    Ok(Json(MessageResponse::ok("Entry deleted successfully")))
}

async fn edit_entry_date(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(id): Path<u64>,
    payload: Result<Json<EditDateRequest>, JsonRejection>,
) -> Result<Json<LogEntry>, AppError> {
    let Json(request) = payload?;
    Ok(Json(state.service.edit_entry_date(&actor, id, request.date)?))
}

/// Share or unshare an entry.
async fn toggle_privacy(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(id): Path<u64>,
) -> Result<Json<LogEntry>, AppError> {
    Ok(Json(state.service.toggle_entry_privacy(&actor, id)?))
}

async fn date_macros(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Macros>, AppError> {
    Ok(Json(state.service.date_macros(&actor, date)?))
}

/// Approved shared entries plus the caller's own.
async fn feed(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
) -> Result<Json<Vec<LogEntry>>, AppError> {
    Ok(Json(state.service.feed(&actor)?))
}

async fn stats(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
) -> Result<Json<UserStats>, AppError> {
    Ok(Json(state.service.stats(&actor)?))
}
