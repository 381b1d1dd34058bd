//! Daily log entries.

use chrono::NaiveDate;
use serde::Deserialize;
use sled::transaction::ConflictableTransactionError;
use tracing::info;

use super::LifeTrack;
use crate::error::{Error, Result};
use crate::model::{Food, LogEntry, LoggedFood, LoggedWorkout, Macros, UserStats, Workout};
use crate::security::policy;
use crate::security::{ActingUser, AuditEventType, SecurityError};
use crate::storage::{decode, encode, id_key};

fn entry_not_found(id: u64) -> Error {
    Error::NotFound(format!("entry {id}"))
}

/// A food to log and the eaten amount in grams.
#[derive(Debug, Clone, Deserialize)]
pub struct FoodLog {
    pub food_id: u64,
    pub amount: f64,
}

/// A workout to log with its performance data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutLog {
    pub workout_id: u64,
    #[serde(default)]
    pub sets: u32,
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub speed: Option<f64>,
}

impl LifeTrack {
    /// Log foods for today, one entry per food.
    ///
    /// Every food must be visible to `actor`; nothing is written otherwise.
    pub fn log_foods(&self, actor: &ActingUser, items: Vec<FoodLog>) -> Result<Vec<LogEntry>> {
        if items.is_empty() {
            return Err(Error::Validation("At least one food is required".to_string()));
        }

        let mut logged = Vec::with_capacity(items.len());
        for item in items {
            if !item.amount.is_finite() || item.amount <= 0.0 {
                return Err(Error::Validation("Amount must be greater than 0".to_string()));
            }
            let food: Food = self.get_visible(actor, item.food_id)?;
            logged.push(LoggedFood::from_food(&food, item.amount));
        }

        let today = self.today();
        let mut entries = Vec::with_capacity(logged.len());
        for food in logged {
            let entry = LogEntry::foods(self.store.generate_id()?, &actor.username, today, vec![food]);
            self.store.entries().insert(id_key(entry.id), &entry)?;
            entries.push(entry);
        }

        info!(user = %actor.username, count = entries.len(), "foods logged");
        Ok(entries)
    }

    /// Log workouts for today, one entry per workout.
    pub fn log_workouts(
        &self,
        actor: &ActingUser,
        items: Vec<WorkoutLog>,
    ) -> Result<Vec<LogEntry>> {
        if items.is_empty() {
            return Err(Error::Validation("At least one workout is required".to_string()));
        }

        let mut logged = Vec::with_capacity(items.len());
        for item in items {
            let workout: Workout = self.get_visible(actor, item.workout_id)?;
            logged.push(
                LoggedWorkout {
                    sets: item.sets,
                    reps: item.reps,
                    weight: if item.weight.is_finite() { item.weight } else { 0.0 },
                    duration: if item.duration.is_finite() { item.duration } else { 0.0 },
                    speed: item.speed.filter(|speed| speed.is_finite()),
                    ..LoggedWorkout::from_workout(&workout)
                }
                .clamped(),
            );
        }

        let today = self.today();
        let mut entries = Vec::with_capacity(logged.len());
        for workout in logged {
            let entry =
                LogEntry::workouts(self.store.generate_id()?, &actor.username, today, vec![workout]);
            self.store.entries().insert(id_key(entry.id), &entry)?;
            entries.push(entry);
        }

        info!(user = %actor.username, count = entries.len(), "workouts logged");
        Ok(entries)
    }

    /// `actor`'s entries, newest first.
    pub fn list_entries(&self, actor: &ActingUser) -> Result<Vec<LogEntry>> {
        let mut entries = self.store.entries().filter(|entry| actor.is(&entry.user))?;
        entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(entries)
    }

    /// Delete one of `actor`'s entries.
    pub fn delete_entry(&self, actor: &ActingUser, id: u64) -> Result<()> {
        let key = id_key(id);
        let outcome = self.store.entries().tree().transaction(|tx| {
            let bytes = tx
                .get(key)?
                .ok_or_else(|| ConflictableTransactionError::Abort(entry_not_found(id)))?;
            let entry: LogEntry = decode(&bytes).map_err(ConflictableTransactionError::Abort)?;
            if !actor.is(&entry.user) {
                return Err(ConflictableTransactionError::Abort(Error::Security(
                    SecurityError::PermissionDenied("entry belongs to another user".to_string()),
                )));
            }
            tx.remove(&key[..])?;
            Ok(())
        });

        self.audited(
            Some(actor),
            "delete_entry",
            Some(format!("entry {id}")),
            outcome.map_err(Error::from),
        )?;
        info!(user = %actor.username, id, "entry deleted");
        Ok(())
    }

    /// Move one of `actor`'s entries to another date.
    pub fn edit_entry_date(&self, actor: &ActingUser, id: u64, date: NaiveDate) -> Result<LogEntry> {
        if date > self.today() {
            return Err(Error::Validation("Date cannot be in the future".to_string()));
        }
        let entry = self.change_own_entry(actor, id, "edit_entry_date", |entry| entry.date = date)?;
        info!(user = %actor.username, id, %date, "entry date changed");
        Ok(entry)
    }

    /// Flip one of `actor`'s entries between private and shared.
    ///
    /// A shared entry is hidden from others until an administrator approves it.
    pub fn toggle_entry_privacy(&self, actor: &ActingUser, id: u64) -> Result<LogEntry> {
        let entry = self.change_own_entry(actor, id, "toggle_entry_privacy", |entry| {
            entry.set_public(!entry.public)
        })?;
        info!(user = %actor.username, id, public = entry.public, "entry privacy changed");
        Ok(entry)
    }

    /// Entries `actor` may see: approved shared entries and their own, newest first.
    ///
    /// Uses the catalog visibility rule with the entry owner as creator.
    pub fn feed(&self, actor: &ActingUser) -> Result<Vec<LogEntry>> {
        let mut entries = self
            .store
            .entries()
            .filter(|entry| policy::can_use_in_template(entry, actor).is_allow())?;
        entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(entries)
    }

    /// Macro totals over `actor`'s foods logged on `date`.
    pub fn date_macros(&self, actor: &ActingUser, date: NaiveDate) -> Result<Macros> {
        let foods: Vec<LoggedFood> = self
            .store
            .entries()
            .filter(|entry| actor.is(&entry.user) && entry.date == date)?
            .into_iter()
            .flat_map(|entry| entry.foods)
            .collect();
        Ok(Macros::total(&foods))
    }

    /// Streak, averages and favourites over `actor`'s history.
    pub fn stats(&self, actor: &ActingUser) -> Result<UserStats> {
        let entries = self.store.entries().filter(|entry| actor.is(&entry.user))?;
        Ok(UserStats::compute(&entries, self.today()))
    }

    /// Approve a shared entry. Admin only.
    pub fn approve_entry(&self, actor: &ActingUser, id: u64) -> Result<()> {
        self.moderate_entry(actor, id, true)
    }

    /// Reject (remove) a shared entry. Admin only.
    pub fn reject_entry(&self, actor: &ActingUser, id: u64) -> Result<()> {
        self.moderate_entry(actor, id, false)
    }

    fn moderate_entry(&self, actor: &ActingUser, id: u64, approve: bool) -> Result<()> {
        let operation = if approve { "approve_entry" } else { "reject_entry" };
        self.require_admin(actor, operation, Some(format!("entry {id}")))?;

        let key = id_key(id);
        let entry = self
            .store
            .entries()
            .tree()
            .transaction(|tx| {
                let bytes = tx
                    .get(key)?
                    .ok_or_else(|| ConflictableTransactionError::Abort(entry_not_found(id)))?;
                let mut entry: LogEntry =
                    decode(&bytes).map_err(ConflictableTransactionError::Abort)?;
                if !entry.pending_approval {
                    return Err(ConflictableTransactionError::Abort(Error::NotFound(format!(
                        "pending entry {id}"
                    ))));
                }
                if approve {
                    entry.pending_approval = false;
                    let bytes = encode(&entry).map_err(ConflictableTransactionError::Abort)?;
                    tx.insert(&key[..], bytes)?;
                } else {
                    tx.remove(&key[..])?;
                }
                Ok(entry)
            })
            .map_err(Error::from)?;

        let owner = entry.user;
        info!(id, %owner, approve, by = %actor.username, "entry moderated");
        let event = if approve {
            AuditEventType::EntryApproved { id, owner }
        } else {
            AuditEventType::EntryRejected { id, owner }
        };
        self.record(Some(actor), event);
        Ok(())
    }

    /// Read, check ownership of, change and store one entry atomically.
    fn change_own_entry(
        &self,
        actor: &ActingUser,
        id: u64,
        operation: &str,
        change: impl Fn(&mut LogEntry),
    ) -> Result<LogEntry> {
        let key = id_key(id);
        let outcome = self.store.entries().tree().transaction(|tx| {
            let bytes = tx
                .get(key)?
                .ok_or_else(|| ConflictableTransactionError::Abort(entry_not_found(id)))?;
            let mut entry: LogEntry = decode(&bytes).map_err(ConflictableTransactionError::Abort)?;
            if !actor.is(&entry.user) {
                return Err(ConflictableTransactionError::Abort(Error::Security(
                    SecurityError::PermissionDenied("entry belongs to another user".to_string()),
                )));
            }
            change(&mut entry);
            let bytes = encode(&entry).map_err(ConflictableTransactionError::Abort)?;
            tx.insert(&key[..], bytes)?;
            Ok(entry)
        });

        self.audited(
            Some(actor),
            operation,
            Some(format!("entry {id}")),
            outcome.map_err(Error::from),
        )
    }
}
