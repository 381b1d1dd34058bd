//! User registration.

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::error::AppError;
use crate::json::{RegisterRequest, UserResponse};
use crate::AppState;

/// User routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/users", post(register))
}

/// Register a new user.
async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let Json(request) = payload?;
    let user = state.service.register(&request.username)?;
    Ok((StatusCode::CREATED, Json(user.into())))
}
