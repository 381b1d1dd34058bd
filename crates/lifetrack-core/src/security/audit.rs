//! Audit logging infrastructure.
//!
//! Records moderation actions, catalog and template writes, and every
//! policy denial.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::context::ActingUser;
use crate::clock::current_timestamp;
use crate::model::CatalogKind;

/// Counter for generating unique event IDs.
static EVENT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Actor name recorded for unauthenticated requests.
pub const ANONYMOUS: &str = "anonymous";

/// Types of audit events.
#[derive(Debug, Clone, PartialEq)]
pub enum AuditEventType {
    /// Catalog item submitted.
    ItemCreated {
        kind: CatalogKind,
        id: u64,
        name: String,
        public: bool,
    },
    /// Catalog item deleted by its creator or an administrator.
    ItemDeleted {
        kind: CatalogKind,
        id: u64,
        name: String,
        /// Deleted through the admin override rather than as creator.
        admin_override: bool,
    },
    /// Pending item approved.
    ItemApproved {
        kind: CatalogKind,
        id: u64,
        name: String,
    },
    /// Pending item rejected and removed.
    ItemRejected {
        kind: CatalogKind,
        id: u64,
        name: String,
    },
    /// Shared log entry approved.
    EntryApproved { id: u64, owner: String },
    /// Shared log entry rejected and removed.
    EntryRejected { id: u64, owner: String },
    /// Template created or replaced.
    TemplateWritten {
        name: String,
        item_count: usize,
        created: bool,
    },
    /// Template removed.
    TemplateDeleted { name: String },
    /// An operation was denied.
    AccessDenied {
        /// Operation that was attempted.
        operation: String,
        /// Target description (if applicable).
        target: Option<String>,
        /// Reason for denial.
        reason: String,
    },
    /// Account suspended.
    UserSuspended {
        username: String,
        /// End of the suspension (RFC 3339).
        until: String,
    },
    /// Suspension lifted.
    UserReinstated { username: String },
}

/// An audit event with metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    /// Unique event ID.
    pub id: u64,
    /// Timestamp (microseconds since epoch) when event occurred.
    pub timestamp: u64,
    /// Username that triggered the event.
    pub actor: String,
    /// Event details.
    pub event_type: AuditEventType,
}

impl AuditEvent {
    /// Create a new audit event.
    pub fn new(actor: Option<&ActingUser>, event_type: AuditEventType) -> Self {
        Self {
            id: EVENT_COUNTER.fetch_add(1, Ordering::Relaxed),
            timestamp: current_timestamp(),
            actor: actor.map_or_else(|| ANONYMOUS.to_string(), |a| a.username.clone()),
            event_type,
        }
    }

    /// Create an access denied event.
    pub fn access_denied(
        actor: Option<&ActingUser>,
        operation: impl Into<String>,
        target: Option<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(
            actor,
            AuditEventType::AccessDenied {
                operation: operation.into(),
                target,
                reason: reason.into(),
            },
        )
    }

    /// Check if this event records a denial.
    pub fn is_denial(&self) -> bool {
        matches!(self.event_type, AuditEventType::AccessDenied { .. })
    }

    /// Format the event as a log line.
    pub fn to_log_line(&self) -> String {
        let event_desc = match &self.event_type {
            AuditEventType::ItemCreated {
                kind,
                id,
                name,
                public,
            } => format!("ITEM_CREATED kind={kind} id={id} name={name:?} public={public}"),
            AuditEventType::ItemDeleted {
                kind,
                id,
                name,
                admin_override,
            } => format!(
                "ITEM_DELETED kind={kind} id={id} name={name:?} admin_override={admin_override}"
            ),
            AuditEventType::ItemApproved { kind, id, name } => {
                format!("ITEM_APPROVED kind={kind} id={id} name={name:?}")
            }
            AuditEventType::ItemRejected { kind, id, name } => {
                format!("ITEM_REJECTED kind={kind} id={id} name={name:?}")
            }
            AuditEventType::EntryApproved { id, owner } => {
                format!("ENTRY_APPROVED id={id} owner={owner}")
            }
            AuditEventType::EntryRejected { id, owner } => {
                format!("ENTRY_REJECTED id={id} owner={owner}")
            }
            AuditEventType::TemplateWritten {
                name,
                item_count,
                created,
            } => format!("TEMPLATE_WRITTEN name={name:?} items={item_count} created={created}"),
            AuditEventType::TemplateDeleted { name } => {
                format!("TEMPLATE_DELETED name={name:?}")
            }
            AuditEventType::AccessDenied {
                operation,
                target,
                reason,
            } => format!("ACCESS_DENIED op={operation} target={target:?} reason={reason}"),
            AuditEventType::UserSuspended { username, until } => {
                format!("USER_SUSPENDED user={username} until={until}")
            }
            AuditEventType::UserReinstated { username } => {
                format!("USER_REINSTATED user={username}")
            }
        };

        format!(
            "{} id={} actor={} {}",
            self.timestamp, self.id, self.actor, event_desc
        )
    }
}

/// Trait for audit log backends.
pub trait AuditLogger: Send + Sync {
    /// Log an audit event.
    fn log(&self, event: AuditEvent);
}

/// In-memory audit logger for testing.
#[derive(Debug, Default, Clone)]
pub struct MemoryAuditLogger {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MemoryAuditLogger {
    /// Create a new memory logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all logged events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }

    /// Get logged denials.
    pub fn denials(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.is_denial())
            .cloned()
            .collect()
    }

    /// Clear all events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Get event count.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl AuditLogger for MemoryAuditLogger {
    fn log(&self, event: AuditEvent) {
        self.events.lock().push(event);
    }
}

/// No-op audit logger that discards all events.
#[derive(Debug, Default)]
pub struct NullAuditLogger;

impl AuditLogger for NullAuditLogger {
    fn log(&self, _event: AuditEvent) {}
}

/// Audit logger that emits events through `tracing` on the
/// `lifetrack::audit` target.
#[derive(Debug, Default)]
pub struct TracingAuditLogger;

impl AuditLogger for TracingAuditLogger {
    fn log(&self, event: AuditEvent) {
        if event.is_denial() {
            tracing::warn!(target: "lifetrack::audit", actor = %event.actor, "{}", event.to_log_line());
        } else {
            tracing::info!(target: "lifetrack::audit", actor = %event.actor, "{}", event.to_log_line());
        }
    }
}
