//! Service layer: the operations exposed to callers.
//!
//! Every operation takes the acting user explicitly. Policy checks and the
//! writes they guard run inside one sled transaction, so the item a decision
//! was made on cannot change before the write commits.

mod catalog;
mod entry;
mod template;
mod users;

pub use catalog::PendingItems;
pub use entry::{FoodLog, WorkoutLog};
pub use template::TEMPLATE_FOOD_AMOUNT;
pub use users::{ProfileView, MAX_SUSPENSION_DAYS};

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use crate::clock::{today_at, DEFAULT_UTC_OFFSET_SECS};
use crate::error::{Error, Result};
use crate::security::audit::ANONYMOUS;
use crate::security::{
    ActingUser, AuditEvent, AuditEventType, AuditLogger, SecurityError, TracingAuditLogger,
};
use crate::storage::Store;

/// Default suspension length for timed suspensions.
pub const DEFAULT_SUSPENSION_DAYS: u32 = 7;

/// Service-level settings.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Length of a timed suspension.
    pub suspension_days: u32,
    /// UTC offset (seconds) defining "today" for entries and templates.
    pub utc_offset_secs: i32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            suspension_days: DEFAULT_SUSPENSION_DAYS,
            utc_offset_secs: DEFAULT_UTC_OFFSET_SECS,
        }
    }
}

impl ServiceConfig {
    /// Set the timed suspension length.
    pub fn with_suspension_days(mut self, days: u32) -> Self {
        self.suspension_days = days;
        self
    }

    /// Set the UTC offset in whole hours.
    ///
    /// Out-of-range offsets saturate; [`crate::clock::now_at`] treats them as UTC.
    pub fn with_utc_offset_hours(mut self, hours: i32) -> Self {
        self.utc_offset_secs = hours.saturating_mul(3600);
        self
    }
}

/// LifeTrack backend: store, audit log and settings.
#[derive(Clone)]
pub struct LifeTrack {
    store: Arc<Store>,
    audit: Arc<dyn AuditLogger>,
    config: ServiceConfig,
}

impl LifeTrack {
    /// Create a service over `store`, auditing through `tracing`.
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            audit: Arc::new(TracingAuditLogger),
            config: ServiceConfig::default(),
        }
    }

    /// Use a different audit logger.
    pub fn with_audit(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Use different settings.
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Underlying store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Active settings.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn today(&self) -> NaiveDate {
        today_at(self.config.utc_offset_secs)
    }

    fn record(&self, actor: Option<&ActingUser>, event_type: AuditEventType) {
        self.audit.log(AuditEvent::new(actor, event_type));
    }

    /// Record a denial and return it as an error.
    fn deny<T>(
        &self,
        actor: Option<&ActingUser>,
        operation: &str,
        target: Option<String>,
        err: SecurityError,
    ) -> Result<T> {
        warn!(
            actor = actor.map(|a| a.username.as_str()).unwrap_or(ANONYMOUS),
            operation,
            target = target.as_deref().unwrap_or("-"),
            reason = %err,
            "access denied"
        );
        self.audit.log(AuditEvent::access_denied(
            actor,
            operation,
            target,
            err.to_string(),
        ));
        Err(Error::Security(err))
    }

    /// Route security failures through [`Self::deny`], pass others through.
    fn audited<T>(
        &self,
        actor: Option<&ActingUser>,
        operation: &str,
        target: Option<String>,
        result: Result<T>,
    ) -> Result<T> {
        match result {
            Err(Error::Security(err)) => self.deny(actor, operation, target, err),
            other => other,
        }
    }
}
