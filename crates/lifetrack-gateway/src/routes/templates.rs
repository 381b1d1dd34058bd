//! Template endpoints.

use axum::extract::rejection::JsonRejection;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lifetrack_core::{Template, TemplateSummary};

use crate::error::AppError;
use crate::extract::Authenticated;
use crate::json::{CreateTemplateRequest, EntriesResponse, MessageResponse, UpdateTemplateRequest};
use crate::AppState;

/// Template routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/templates", get(list_templates).post(create_template))
        .route(
            "/templates/:name",
            get(template_details)
                .put(update_template)
                .delete(delete_template),
        )
        .route("/templates/:name/use", post(use_template))
}

async fn list_templates(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
) -> Result<Json<Vec<TemplateSummary>>, AppError> {
    Ok(Json(state.service.list_templates(&actor)?))
}

async fn create_template(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    payload: Result<Json<CreateTemplateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Template>), AppError> {
    let Json(request) = payload?;
    let template = state
        .service
        .create_template(&actor, &request.name, request.items)?;
    Ok((StatusCode::CREATED, Json(template)))
}

async fn template_details(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(name): Path<String>,
) -> Result<Json<Template>, AppError> {
    Ok(Json(state.service.template_details(&actor, &name)?))
}

async fn update_template(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(name): Path<String>,
    payload: Result<Json<UpdateTemplateRequest>, JsonRejection>,
) -> Result<Json<Template>, AppError> {
    let Json(request) = payload?;
    Ok(Json(
        state.service.update_template(&actor, &name, request.items)?,
    ))
}

async fn delete_template(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.service.delete_template(&actor, &name)?;
    Ok(Json(MessageResponse::ok("Template deleted successfully")))
}

/// Log today's entries from a template.
async fn use_template(
    State(state): State<AppState>,
    Authenticated(actor): Authenticated,
    Path(name): Path<String>,
) -> Result<(StatusCode, Json<EntriesResponse>), AppError> {
    let entries = state.service.use_template(&actor, &name)?;
    Ok((StatusCode::CREATED, Json(entries.into())))
}
