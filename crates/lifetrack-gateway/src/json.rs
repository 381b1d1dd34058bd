//! JSON request and response bodies.

use chrono::NaiveDate;
use lifetrack_core::{ItemRef, LogEntry, Role, UserRecord};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Gateway version.
    pub version: String,
}

/// Generic acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    /// Successful acknowledgement with a message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
}

/// Public view of a user account.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub username: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended_until: Option<String>,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            username: user.username,
            role: user.role,
            suspended_until: user.suspended_until.map(|until| until.to_rfc3339()),
        }
    }
}

/// Template create request.
#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    #[serde(default)]
    pub items: Vec<ItemRef>,
}

/// Template update request.
#[derive(Debug, Deserialize)]
pub struct UpdateTemplateRequest {
    #[serde(default)]
    pub items: Vec<ItemRef>,
}

/// Entries created by one request.
#[derive(Debug, Serialize, Deserialize)]
pub struct EntriesResponse {
    pub created: usize,
    pub entries: Vec<LogEntry>,
}

impl From<Vec<LogEntry>> for EntriesResponse {
    fn from(entries: Vec<LogEntry>) -> Self {
        Self {
            created: entries.len(),
            entries,
        }
    }
}

/// New date for an entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct EditDateRequest {
    pub date: NaiveDate,
}

/// Suspension request. Without `permanent`, the suspension is timed.
#[derive(Debug, Default, Deserialize)]
pub struct SuspendRequest {
    #[serde(default)]
    pub permanent: bool,
    /// Overrides the configured suspension length (1 to
    /// `MAX_SUSPENSION_DAYS`).
    #[serde(default)]
    pub days: Option<u32>,
}
