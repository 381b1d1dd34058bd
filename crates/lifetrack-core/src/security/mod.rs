//! Security module for LifeTrack.
//!
//! This module decides who may delete catalog items and which items may be
//! composed into templates:
//! - `ActingUser`: request-scoped identity passed explicitly into every check
//! - Policy evaluation over the ownership/visibility/approval attributes
//! - Structured audit logging of moderation actions and denials
//!
//! # Policy
//!
//! Deletion is allowed for the item's creator, and for administrators when
//! the item is approved public. Template composition is allowed for items
//! that are approved public or owned by the acting user.
//!
//! # Example
//!
//! ```
//! use lifetrack_core::security::{ActingUser, policy};
//! use lifetrack_core::Sharing;
//!
//! let item = Sharing { creator: "alice".into(), public: false, pending_approval: false };
//! let admin = ActingUser::admin("root");
//!
//! assert!(policy::can_delete(&item, Some(&admin)).is_deny());
//! assert!(policy::can_use_in_template(&item, &ActingUser::new("alice")).is_allow());
//! ```

pub mod audit;
pub mod context;
pub mod error;
pub mod policy;

// Error types
pub use error::{SecurityError, SecurityResult};

// Context types
pub use context::ActingUser;

// Policy types
pub use policy::{DenyReason, PolicyAction, Shared, Subject, Verdict};

// Audit types
pub use audit::{
    AuditEvent, AuditEventType, AuditLogger, MemoryAuditLogger, NullAuditLogger,
    TracingAuditLogger,
};
