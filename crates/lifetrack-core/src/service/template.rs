//! Template operations.
//!
//! Templates are keyed by `owner \0 name`, which keeps one owner's templates
//! contiguous and makes the per-owner name check a point lookup inside the
//! write transaction.

use serde::Deserialize;
use sled::transaction::{ConflictableTransactionError, TransactionalTree};
use sled::Transactional;
use tracing::info;

use super::LifeTrack;
use crate::error::{Error, Result};
use crate::model::{
    CatalogKind, ItemRef, LogEntry, LoggedFood, LoggedWorkout, Sharing, Template, TemplateSummary,
};
use crate::security::policy::{self, Subject};
use crate::security::{ActingUser, AuditEventType};
use crate::storage::{decode, encode, id_key};
use crate::validate;

/// Amount (grams) logged for each food when a template is used.
pub const TEMPLATE_FOOD_AMOUNT: f64 = 100.0;

type TxResult<T> = std::result::Result<T, ConflictableTransactionError<Error>>;

/// The part of a catalog document the policy needs.
#[derive(Deserialize)]
struct ItemHeader {
    name: String,
    #[serde(flatten)]
    sharing: Sharing,
}

fn template_prefix(owner: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(owner.len() + 1);
    key.extend_from_slice(owner.as_bytes());
    key.push(0);
    key
}

fn template_key(owner: &str, name: &str) -> Vec<u8> {
    let mut key = template_prefix(owner);
    key.extend_from_slice(name.as_bytes());
    key
}

fn template_not_found(name: &str) -> Error {
    Error::NotFound(format!("template \"{name}\""))
}

fn abort<T>(err: Error) -> TxResult<T> {
    Err(ConflictableTransactionError::Abort(err))
}

/// Load the headers of every referenced item, then check them all.
///
/// A missing item fails with `NotFound`; the first item the actor may not
/// use fails the whole write.
fn check_items(
    foods: &TransactionalTree,
    workouts: &TransactionalTree,
    items: &[ItemRef],
    actor: &ActingUser,
) -> TxResult<()> {
    let mut headers = Vec::with_capacity(items.len());
    for item in items {
        let tree = match item.kind() {
            CatalogKind::Food => foods,
            CatalogKind::Workout => workouts,
        };
        let Some(bytes) = tree.get(id_key(item.id()))? else {
            return abort(Error::NotFound(format!("{} {}", item.kind(), item.id())));
        };
        let header: ItemHeader = decode(&bytes).map_err(ConflictableTransactionError::Abort)?;
        headers.push((item.kind(), header));
    }

    let subjects = headers.iter().map(|(kind, header)| Subject {
        kind: *kind,
        name: &header.name,
        sharing: &header.sharing,
    });
    policy::require_template_items(subjects, actor)
        .map_err(|denial| ConflictableTransactionError::Abort(Error::Security(denial)))
}

impl LifeTrack {
    /// Create a template owned by `actor`.
    ///
    /// Every item must exist and be usable by `actor`. Nothing is written
    /// unless all of them pass.
    pub fn create_template(
        &self,
        actor: &ActingUser,
        name: &str,
        items: Vec<ItemRef>,
    ) -> Result<Template> {
        let name = validate::template_name(name)?;
        let id = self.store.generate_id()?;
        let key = template_key(&actor.username, &name);
        let template = Template {
            id,
            owner: actor.username.clone(),
            name,
            items,
            created_at: self.today(),
        };

        let outcome = (
            self.store.foods().tree(),
            self.store.workouts().tree(),
            self.store.templates().tree(),
        )
            .transaction(|(foods, workouts, templates)| {
                if templates.get(&key[..])?.is_some() {
                    return abort(Error::Conflict("Template name already exists".to_string()));
                }
                check_items(foods, workouts, &template.items, actor)?;
                let bytes = encode(&template).map_err(ConflictableTransactionError::Abort)?;
                templates.insert(&key[..], bytes)?;
                Ok(())
            });

        self.audited(
            Some(actor),
            "create_template",
            Some(template.name.clone()),
            outcome.map_err(Error::from),
        )?;

        info!(owner = %actor.username, name = %template.name, items = template.items.len(), "template created");
        self.record(
            Some(actor),
            AuditEventType::TemplateWritten {
                name: template.name.clone(),
                item_count: template.items.len(),
                created: true,
            },
        );
        Ok(template)
    }

    /// Replace the items of one of `actor`'s templates.
    ///
    /// The same all-or-nothing check as creation applies.
    pub fn update_template(
        &self,
        actor: &ActingUser,
        name: &str,
        items: Vec<ItemRef>,
    ) -> Result<Template> {
        let key = template_key(&actor.username, name);

        let outcome = (
            self.store.foods().tree(),
            self.store.workouts().tree(),
            self.store.templates().tree(),
        )
            .transaction(|(foods, workouts, templates)| {
                let Some(bytes) = templates.get(&key[..])? else {
                    return abort(template_not_found(name));
                };
                let mut template: Template =
                    decode(&bytes).map_err(ConflictableTransactionError::Abort)?;
                check_items(foods, workouts, &items, actor)?;
                template.items = items.clone();
                let bytes = encode(&template).map_err(ConflictableTransactionError::Abort)?;
                templates.insert(&key[..], bytes)?;
                Ok(template)
            });

        let template = self.audited(
            Some(actor),
            "update_template",
            Some(name.to_string()),
            outcome.map_err(Error::from),
        )?;

        info!(owner = %actor.username, name, items = template.items.len(), "template updated");
        self.record(
            Some(actor),
            AuditEventType::TemplateWritten {
                name: template.name.clone(),
                item_count: template.items.len(),
                created: false,
            },
        );
        Ok(template)
    }

    /// Delete one of `actor`'s templates.
    pub fn delete_template(&self, actor: &ActingUser, name: &str) -> Result<()> {
        let key = template_key(&actor.username, name);
        if self.store.templates().remove(&key)?.is_none() {
            return Err(template_not_found(name));
        }

        info!(owner = %actor.username, name, "template deleted");
        self.record(
            Some(actor),
            AuditEventType::TemplateDeleted {
                name: name.to_string(),
            },
        );
        Ok(())
    }

    /// Summaries of `actor`'s templates, ordered by name.
    pub fn list_templates(&self, actor: &ActingUser) -> Result<Vec<TemplateSummary>> {
        self.store
            .templates()
            .tree()
            .scan_prefix(template_prefix(&actor.username))
            .values()
            .map(|bytes| -> Result<TemplateSummary> {
                let template: Template = decode(&bytes?)?;
                Ok(template.summary())
            })
            .collect()
    }

    /// Full contents of one of `actor`'s templates.
    pub fn template_details(&self, actor: &ActingUser, name: &str) -> Result<Template> {
        self.store
            .templates()
            .get(template_key(&actor.username, name))?
            .ok_or_else(|| template_not_found(name))
    }

    /// Log today's entries from one of `actor`'s templates.
    ///
    /// Foods go into one entry at [`TEMPLATE_FOOD_AMOUNT`] grams each and
    /// workouts into another. Items deleted since the template was written
    /// are skipped.
    pub fn use_template(&self, actor: &ActingUser, name: &str) -> Result<Vec<LogEntry>> {
        let template = self.template_details(actor, name)?;

        let mut foods = Vec::new();
        let mut workouts = Vec::new();
        for item in &template.items {
            match item {
                ItemRef::Food { id } => {
                    if let Some(food) = self.store.foods().get(id_key(*id))? {
                        foods.push(LoggedFood::from_food(&food, TEMPLATE_FOOD_AMOUNT));
                    }
                }
                ItemRef::Workout { id } => {
                    if let Some(workout) = self.store.workouts().get(id_key(*id))? {
                        workouts.push(LoggedWorkout::from_workout(&workout));
                    }
                }
            }
        }

        let today = self.today();
        let mut entries = Vec::new();
        if !foods.is_empty() {
            let id = self.store.generate_id()?;
            entries.push(LogEntry::foods(id, &actor.username, today, foods));
        }
        if !workouts.is_empty() {
            let id = self.store.generate_id()?;
            entries.push(LogEntry::workouts(id, &actor.username, today, workouts));
        }
        if entries.is_empty() {
            return Err(Error::Validation(
                "No valid foods or workouts found in template".to_string(),
            ));
        }

        for entry in &entries {
            self.store.entries().insert(id_key(entry.id), entry)?;
        }
        info!(owner = %actor.username, name, entries = entries.len(), "template used");
        Ok(entries)
    }
}
