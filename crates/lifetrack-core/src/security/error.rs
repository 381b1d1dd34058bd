//! Security-specific error types.

use thiserror::Error;

use super::policy::PolicyAction;
use crate::model::{CatalogKind, Visibility};

/// Security-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityError {
    /// The acting user neither owns the item nor qualifies for an override.
    #[error("you don't have permission to {}: it belongs to another user", .action.phrase(.kind, .item))]
    NotOwner {
        /// Attempted action.
        action: PolicyAction,
        /// Catalog the item belongs to.
        kind: CatalogKind,
        /// Item name.
        item: String,
    },

    /// Admin override does not reach items that are private or pending.
    #[error("you don't have permission to {}: it is {visibility}", .action.phrase(.kind, .item))]
    NotEligible {
        /// Attempted action.
        action: PolicyAction,
        /// Catalog the item belongs to.
        kind: CatalogKind,
        /// Item name.
        item: String,
        /// Why the item is not eligible.
        visibility: Visibility,
    },

    /// Permission denied for the requested operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// No (known) identity supplied.
    #[error("authentication required: {0}")]
    Unauthenticated(String),

    /// The account is suspended.
    #[error("account {username} is suspended until {until}")]
    Suspended {
        /// Suspended user.
        username: String,
        /// End of the suspension (RFC 3339).
        until: String,
    },
}

/// Result type for security operations.
pub type SecurityResult<T> = Result<T, SecurityError>;
