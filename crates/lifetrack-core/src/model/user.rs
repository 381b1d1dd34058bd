//! User accounts as seen by the backend.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::profile::Profile;

/// Account role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Stored user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub suspended_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub profile: Profile,
}

impl UserRecord {
    /// New regular user.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: Role::User,
            suspended_until: None,
            profile: Profile::default(),
        }
    }

    /// Check if this user is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Check if the user is suspended at `now`.
    pub fn is_suspended_at(&self, now: DateTime<Utc>) -> bool {
        self.suspended_until.is_some_and(|until| until > now)
    }

    /// Suspend for `days`, or permanently when `None`.
    ///
    /// Suspensions never end later than the permanent-ban marker; spans
    /// that overflow the calendar become permanent.
    pub fn suspend(&mut self, now: DateTime<Utc>, days: Option<u32>) {
        let permanent = permanent_suspension();
        self.suspended_until = Some(match days {
            Some(days) => Duration::try_days(i64::from(days))
                .and_then(|span| now.checked_add_signed(span))
                .map_or(permanent, |until| until.min(permanent)),
            None => permanent,
        });
    }

    /// Lift any suspension.
    pub fn reinstate(&mut self) {
        self.suspended_until = None;
    }
}

/// Far-future marker used for permanent bans (9999-12-31).
pub(crate) fn permanent_suspension() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
