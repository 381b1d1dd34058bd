//! Request-scoped identity passed into every policy check.

use serde::{Deserialize, Serialize};

use super::error::{SecurityError, SecurityResult};
use crate::model::UserRecord;

/// The user performing an operation.
///
/// Built by the caller from its session/auth provider; never looked up
/// from ambient state by the policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActingUser {
    /// Username.
    pub username: String,
    /// Administrator flag.
    pub is_admin: bool,
}

impl ActingUser {
    /// A regular user.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_admin: false,
        }
    }

    /// An administrator.
    pub fn admin(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_admin: true,
        }
    }

    /// Check if this user is `username`.
    pub fn is(&self, username: &str) -> bool {
        self.username == username
    }

    /// Require admin permission or return an error.
    pub fn require_admin(&self) -> SecurityResult<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(SecurityError::PermissionDenied(
                "admin access is required".to_string(),
            ))
        }
    }
}

impl From<&UserRecord> for ActingUser {
    fn from(user: &UserRecord) -> Self {
        Self {
            username: user.username.clone(),
            is_admin: user.is_admin(),
        }
    }
}
