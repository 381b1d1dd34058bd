//! LifeTrack Core - catalog, templates, authorization policy and storage.
//!
//! This crate provides the backend logic for LifeTrack: shared food and
//! workout catalogs, user templates built from catalog items, daily log
//! entries, and the ownership/visibility/approval policy that decides who
//! may delete or compose which items.

pub mod clock;
pub mod error;
pub mod model;
pub mod security;
pub mod service;
pub mod storage;
pub mod validate;

pub use error::{Error, Result};

pub use model::{
    CatalogKind, CatalogRecord, Food, FoodDraft, Goal, ItemRef, LogEntry, Macros, Profile,
    Recommendation, Role, Sex, Sharing, Template, TemplateSummary, UserRecord, UserStats,
    Visibility, Workout, WorkoutDraft,
};
pub use service::{
    FoodLog, LifeTrack, PendingItems, ProfileView, ServiceConfig, WorkoutLog,
};
pub use storage::{Collection, StorageConfig, Store};

// Security exports
pub use security::{
    ActingUser, AuditEvent, AuditEventType, AuditLogger, DenyReason, MemoryAuditLogger,
    NullAuditLogger, SecurityError, SecurityResult, TracingAuditLogger, Verdict,
};
