//! Catalog operations: submit, list, delete, moderate.

use serde::Serialize;
use sled::transaction::ConflictableTransactionError;
use tracing::info;

use super::LifeTrack;
use crate::error::{Error, Result};
use crate::model::{CatalogKind, CatalogRecord, Food, LogEntry, Workout};
use crate::security::policy::{self, Subject};
use crate::security::{ActingUser, AuditEventType, Shared};
use crate::storage::{decode, encode, id_key};

/// Items waiting for moderation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PendingItems {
    pub foods: Vec<Food>,
    pub workouts: Vec<Workout>,
    /// Log entries their owners shared.
    pub entries: Vec<LogEntry>,
}

fn not_found(kind: CatalogKind, id: u64) -> Error {
    Error::NotFound(format!("{kind} {id}"))
}

impl LifeTrack {
    /// Submit a new catalog item on behalf of `actor`.
    ///
    /// Public submissions enter the moderation queue and must not share a
    /// name (case-insensitively) with another public item of the same kind.
    pub fn add_item<R: CatalogRecord>(&self, actor: &ActingUser, draft: R::Draft) -> Result<R> {
        let id = self.store.generate_id()?;
        let record = R::from_draft(id, &actor.username, draft)?;
        let catalog = self.store.catalog::<R>();

        if record.sharing().public {
            let wanted = record.name().to_lowercase();
            let duplicate = catalog.filter(|existing| {
                existing.sharing().public && existing.name().to_lowercase() == wanted
            })?;
            if !duplicate.is_empty() {
                return Err(Error::Conflict(format!(
                    "A public {} with this name already exists or is pending approval.",
                    R::KIND
                )));
            }
        }

        catalog.insert(id_key(id), &record)?;

        info!(
            kind = %R::KIND,
            id,
            name = record.name(),
            creator = %actor.username,
            public = record.sharing().public,
            "catalog item submitted"
        );
        self.record(
            Some(actor),
            AuditEventType::ItemCreated {
                kind: R::KIND,
                id,
                name: record.name().to_string(),
                public: record.sharing().public,
            },
        );

        Ok(record)
    }

    /// Items `actor` may see and use: approved public ones and their own.
    pub fn list_visible<R: CatalogRecord>(&self, actor: &ActingUser) -> Result<Vec<R>> {
        let mut items = self
            .store
            .catalog::<R>()
            .filter(|item| policy::can_use_in_template(&Subject::of(item), actor).is_allow())?;
        items.sort_by_key(|item| item.name().to_lowercase());
        Ok(items)
    }

    /// A single visible item. Hidden items are reported as not found.
    pub fn get_visible<R: CatalogRecord>(&self, actor: &ActingUser, id: u64) -> Result<R> {
        match self.store.catalog::<R>().get(id_key(id))? {
            Some(item) if policy::can_use_in_template(&Subject::of(&item), actor).is_allow() => {
                Ok(item)
            }
            _ => Err(not_found(R::KIND, id)),
        }
    }

    /// Delete a catalog item if `actor` may.
    ///
    /// The item is read, checked and removed in one transaction.
    pub fn delete_item<R: CatalogRecord>(&self, actor: Option<&ActingUser>, id: u64) -> Result<R> {
        let key = id_key(id);
        let outcome = self.store.catalog_tree(R::KIND).transaction(|tx| {
            let bytes = tx
                .get(key)?
                .ok_or_else(|| ConflictableTransactionError::Abort(not_found(R::KIND, id)))?;
            let record: R = decode(&bytes).map_err(ConflictableTransactionError::Abort)?;

            policy::require_delete(&Subject::of(&record), actor)
                .map_err(|denial| ConflictableTransactionError::Abort(Error::Security(denial)))?;

            tx.remove(&key[..])?;
            Ok(record)
        });

        let record = self.audited(
            actor,
            "delete",
            Some(format!("{} {id}", R::KIND)),
            outcome.map_err(Error::from),
        )?;

        let admin_override = actor.map_or(false, |a| !a.is(&record.sharing().creator));
        info!(kind = %R::KIND, id, name = record.name(), admin_override, "catalog item deleted");
        self.record(
            actor,
            AuditEventType::ItemDeleted {
                kind: R::KIND,
                id,
                name: record.name().to_string(),
                admin_override,
            },
        );

        Ok(record)
    }

    /// All items waiting for moderation. Admin only.
    pub fn pending(&self, actor: &ActingUser) -> Result<PendingItems> {
        self.require_admin(actor, "list_pending", None)?;
        Ok(PendingItems {
            foods: self
                .store
                .foods()
                .filter(|food| food.is_pending_approval())?,
            workouts: self
                .store
                .workouts()
                .filter(|workout| workout.is_pending_approval())?,
            entries: self
                .store
                .entries()
                .filter(|entry| entry.is_pending_approval())?,
        })
    }

    /// Approve a pending item. Admin only.
    pub fn approve(&self, actor: &ActingUser, kind: CatalogKind, id: u64) -> Result<()> {
        match kind {
            CatalogKind::Food => self.approve_item::<Food>(actor, id),
            CatalogKind::Workout => self.approve_item::<Workout>(actor, id),
        }
    }

    /// Reject (remove) a pending item. Admin only.
    pub fn reject(&self, actor: &ActingUser, kind: CatalogKind, id: u64) -> Result<()> {
        match kind {
            CatalogKind::Food => self.reject_item::<Food>(actor, id),
            CatalogKind::Workout => self.reject_item::<Workout>(actor, id),
        }
    }

    fn approve_item<R: CatalogRecord>(&self, actor: &ActingUser, id: u64) -> Result<()> {
        self.require_admin(actor, "approve", Some(format!("{} {id}", R::KIND)))?;

        let key = id_key(id);
        let record = self
            .store
            .catalog_tree(R::KIND)
            .transaction(|tx| {
                let mut record: R = Self::pending_record(tx.get(key)?, R::KIND, id)?;
                record.sharing_mut().pending_approval = false;
                let bytes = encode(&record).map_err(ConflictableTransactionError::Abort)?;
                tx.insert(&key[..], bytes)?;
                Ok(record)
            })
            .map_err(Error::from)?;

        info!(kind = %R::KIND, id, name = record.name(), approved_by = %actor.username, "catalog item approved");
        self.record(
            Some(actor),
            AuditEventType::ItemApproved {
                kind: R::KIND,
                id,
                name: record.name().to_string(),
            },
        );
        Ok(())
    }

    fn reject_item<R: CatalogRecord>(&self, actor: &ActingUser, id: u64) -> Result<()> {
        self.require_admin(actor, "reject", Some(format!("{} {id}", R::KIND)))?;

        let key = id_key(id);
        let record = self
            .store
            .catalog_tree(R::KIND)
            .transaction(|tx| {
                let record: R = Self::pending_record(tx.get(key)?, R::KIND, id)?;
                tx.remove(&key[..])?;
                Ok(record)
            })
            .map_err(Error::from)?;

        info!(kind = %R::KIND, id, name = record.name(), rejected_by = %actor.username, "catalog item rejected");
        self.record(
            Some(actor),
            AuditEventType::ItemRejected {
                kind: R::KIND,
                id,
                name: record.name().to_string(),
            },
        );
        Ok(())
    }

    /// Decode a record that must exist and be pending.
    fn pending_record<R: CatalogRecord>(
        bytes: Option<sled::IVec>,
        kind: CatalogKind,
        id: u64,
    ) -> std::result::Result<R, ConflictableTransactionError<Error>> {
        let bytes = bytes.ok_or_else(|| ConflictableTransactionError::Abort(not_found(kind, id)))?;
        let record: R = decode(&bytes).map_err(ConflictableTransactionError::Abort)?;
        if !record.sharing().pending_approval {
            return Err(ConflictableTransactionError::Abort(Error::NotFound(format!(
                "pending {kind} {id}"
            ))));
        }
        Ok(record)
    }

    pub(super) fn require_admin(
        &self,
        actor: &ActingUser,
        operation: &str,
        target: Option<String>,
    ) -> Result<()> {
        match actor.require_admin() {
            Ok(()) => Ok(()),
            Err(err) => self.deny(Some(actor), operation, target, err),
        }
    }
}
