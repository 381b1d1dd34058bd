//! User registration, identity resolution and suspensions.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sled::transaction::ConflictableTransactionError;
use tracing::{debug, info};

use super::LifeTrack;
use crate::error::{Error, Result};
use crate::model::{Profile, Recommendation, Role, UserRecord};
use crate::security::{ActingUser, AuditEventType, SecurityError};
use crate::storage::{decode, encode};
use crate::validate;

/// Longest timed suspension, in days.
pub const MAX_SUSPENSION_DAYS: u32 = 36_500;

/// A user's profile with derived recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
    pub profile: Profile,
    /// `None` until height and weight are set.
    pub recommended: Option<Recommendation>,
    pub birthday_today: bool,
}

impl LifeTrack {
    /// Register a new regular user.
    pub fn register(&self, username: &str) -> Result<UserRecord> {
        let username = validate::username(username)?;
        let user = UserRecord::new(&username);

        let swapped = self.store.users().tree().compare_and_swap(
            username.as_bytes(),
            None::<&[u8]>,
            Some(encode(&user)?),
        )?;
        if swapped.is_err() {
            return Err(Error::Conflict("Username already exists".to_string()));
        }

        info!(username = %user.username, "user registered");
        Ok(user)
    }

    /// Create `username` as an administrator, or promote an existing user.
    pub fn ensure_admin(&self, username: &str) -> Result<UserRecord> {
        let username = validate::username(username)?;
        let user = self
            .store
            .users()
            .tree()
            .transaction(|tx| {
                let mut user: UserRecord = match tx.get(username.as_bytes())? {
                    Some(bytes) => decode(&bytes).map_err(ConflictableTransactionError::Abort)?,
                    None => UserRecord::new(&username),
                };
                user.role = Role::Admin;
                let bytes = encode(&user).map_err(ConflictableTransactionError::Abort)?;
                tx.insert(username.as_bytes(), bytes)?;
                Ok(user)
            })
            .map_err(Error::from)?;

        info!(username = %user.username, "administrator ensured");
        Ok(user)
    }

    /// Resolve a claimed username to the acting user.
    ///
    /// Unknown or missing identities are unauthenticated. Suspended accounts
    /// are refused until the suspension ends.
    pub fn authenticate(&self, username: Option<&str>) -> Result<ActingUser> {
        let Some(username) = username.map(str::trim).filter(|name| !name.is_empty()) else {
            return Err(SecurityError::Unauthenticated("no user identity supplied".to_string()).into());
        };
        let Some(user) = self.store.users().get(username)? else {
            debug!(username, "unknown user");
            return Err(SecurityError::Unauthenticated(format!("unknown user {username}")).into());
        };

        if let Some(until) = user.suspended_until.filter(|_| user.is_suspended_at(Utc::now())) {
            return Err(SecurityError::Suspended {
                username: user.username,
                until: until.to_rfc3339(),
            }
            .into());
        }

        Ok(ActingUser::from(&user))
    }

    /// Look up a user record.
    pub fn user(&self, username: &str) -> Result<UserRecord> {
        self.store
            .users()
            .get(username)?
            .ok_or_else(|| Error::NotFound(format!("user {username}")))
    }

    /// Suspend `username` for `days`, or permanently when `None`. Admin only.
    pub fn suspend(&self, actor: &ActingUser, username: &str, days: Option<u32>) -> Result<UserRecord> {
        self.require_admin(actor, "suspend", Some(username.to_string()))?;
        if days.is_some_and(|days| days == 0 || days > MAX_SUSPENSION_DAYS) {
            return Err(Error::Validation(format!(
                "Suspension must last between 1 and {MAX_SUSPENSION_DAYS} days"
            )));
        }

        let user = self.update_user(username, |user| user.suspend(Utc::now(), days))?;
        let until = user
            .suspended_until
            .map(|until| until.to_rfc3339())
            .unwrap_or_default();

        info!(username, until = %until, by = %actor.username, "user suspended");
        self.record(
            Some(actor),
            AuditEventType::UserSuspended {
                username: username.to_string(),
                until,
            },
        );
        Ok(user)
    }

    /// Lift a suspension. Admin only.
    pub fn reinstate(&self, actor: &ActingUser, username: &str) -> Result<UserRecord> {
        self.require_admin(actor, "reinstate", Some(username.to_string()))?;

        let user = self.update_user(username, UserRecord::reinstate)?;

        info!(username, by = %actor.username, "user reinstated");
        self.record(
            Some(actor),
            AuditEventType::UserReinstated {
                username: username.to_string(),
            },
        );
        Ok(user)
    }

    /// `actor`'s profile and recommended intake.
    pub fn profile(&self, actor: &ActingUser) -> Result<ProfileView> {
        let user = self.user(&actor.username)?;
        Ok(self.profile_view(user.profile))
    }

    /// Replace `actor`'s profile.
    pub fn update_profile(&self, actor: &ActingUser, profile: Profile) -> Result<ProfileView> {
        let profile = profile.validated(self.today())?;
        let user = self.update_user(&actor.username, |user| user.profile = profile.clone())?;
        info!(username = %actor.username, "profile updated");
        Ok(self.profile_view(user.profile))
    }

    fn profile_view(&self, profile: Profile) -> ProfileView {
        let today = self.today();
        ProfileView {
            recommended: Recommendation::for_profile(&profile, today),
            birthday_today: profile.is_birthday(today),
            profile,
        }
    }

    fn update_user(&self, username: &str, change: impl Fn(&mut UserRecord)) -> Result<UserRecord> {
        self.store
            .users()
            .tree()
            .transaction(|tx| {
                let Some(bytes) = tx.get(username.as_bytes())? else {
                    return Err(ConflictableTransactionError::Abort(Error::NotFound(format!(
                        "user {username}"
                    ))));
                };
                let mut user: UserRecord =
                    decode(&bytes).map_err(ConflictableTransactionError::Abort)?;
                change(&mut user);
                let bytes = encode(&user).map_err(ConflictableTransactionError::Abort)?;
                tx.insert(username.as_bytes(), bytes)?;
                Ok(user)
            })
            .map_err(Error::from)
    }
}
