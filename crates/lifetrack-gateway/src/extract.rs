//! Identity extractors.
//!
//! The acting user comes from the `x-lifetrack-user` header and is resolved
//! against the user store on every request.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lifetrack_core::ActingUser;

use crate::error::AppError;
use crate::AppState;

/// Header carrying the caller's username.
pub const USER_HEADER: &str = "x-lifetrack-user";

fn claimed_user(parts: &Parts) -> Result<Option<&str>, AppError> {
    parts
        .headers
        .get(USER_HEADER)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| AppError::BadRequest(format!("{USER_HEADER} must be valid text")))
        })
        .transpose()
}

/// A resolved, non-suspended user. Rejects the request otherwise.
#[derive(Debug, Clone)]
pub struct Authenticated(pub ActingUser);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claim = claimed_user(parts)?;
        Ok(Authenticated(state.service.authenticate(claim)?))
    }
}

/// The caller's identity, if any header was sent.
///
/// A header naming an unknown or suspended user is still rejected; only a
/// missing header yields `None`.
#[derive(Debug, Clone)]
pub struct MaybeAuthenticated(pub Option<ActingUser>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthenticated {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match claimed_user(parts)? {
            Some(claim) => Ok(MaybeAuthenticated(Some(
                state.service.authenticate(Some(claim))?,
            ))),
            None => Ok(MaybeAuthenticated(None)),
        }
    }
}
