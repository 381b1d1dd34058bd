//! HTTP route handlers.

pub mod admin;
pub mod catalog;
pub mod entries;
pub mod health;
pub mod profile;
pub mod templates;
pub mod users;
