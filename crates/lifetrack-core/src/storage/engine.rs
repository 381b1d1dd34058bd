//! The LifeTrack store: one sled database, one tree per collection.

use sled::{Db, Tree};
use tracing::debug;

use super::collection::Collection;
use super::config::StorageConfig;
use crate::error::Result;
use crate::model::{CatalogKind, CatalogRecord, Food, LogEntry, Template, UserRecord, Workout};

/// Tree names. Catalog trees are named by [`CatalogKind::collection`].
const TEMPLATES_TREE: &str = "templates";
const USERS_TREE: &str = "users";
const ENTRIES_TREE: &str = "entries";

/// Persistent collections backing LifeTrack.
pub struct Store {
    db: Db,
    foods: Collection<Food>,
    workouts: Collection<Workout>,
    templates: Collection<Template>,
    users: Collection<UserRecord>,
    entries: Collection<LogEntry>,
}

impl Store {
    /// Open or create a store with the given configuration.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let db = config.to_sled_config().open()?;
        let store = Self {
            foods: Collection::open(&db, CatalogKind::Food.collection())?,
            workouts: Collection::open(&db, CatalogKind::Workout.collection())?,
            templates: Collection::open(&db, TEMPLATES_TREE)?,
            users: Collection::open(&db, USERS_TREE)?,
            entries: Collection::open(&db, ENTRIES_TREE)?,
            db,
        };

        debug!(
            path = %config.path.display(),
            temporary = config.temporary,
            recovered = store.db.was_recovered(),
            foods = store.foods.len(),
            workouts = store.workouts.len(),
            "store opened"
        );

        Ok(store)
    }

    /// Open a temporary store (deleted on drop).
    pub fn temporary() -> Result<Self> {
        Self::open(&StorageConfig::temporary())
    }

    /// Allocate a new unique record id.
    pub fn generate_id(&self) -> Result<u64> {
        Ok(self.db.generate_id()?)
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Food catalog.
    pub fn foods(&self) -> &Collection<Food> {
        &self.foods
    }

    /// Workout catalog.
    pub fn workouts(&self) -> &Collection<Workout> {
        &self.workouts
    }

    /// Templates.
    pub fn templates(&self) -> &Collection<Template> {
        &self.templates
    }

    /// User accounts (keyed by username).
    pub fn users(&self) -> &Collection<UserRecord> {
        &self.users
    }

    /// Log entries.
    pub fn entries(&self) -> &Collection<LogEntry> {
        &self.entries
    }

    /// Tree holding the given catalog kind.
    pub fn catalog_tree(&self, kind: CatalogKind) -> &Tree {
        match kind {
            CatalogKind::Food => self.foods.tree(),
            CatalogKind::Workout => self.workouts.tree(),
        }
    }

    /// Typed handle on the catalog holding `R`.
    pub fn catalog<R: CatalogRecord>(&self) -> Collection<R> {
        Collection::from_tree(self.catalog_tree(R::KIND).clone())
    }
}
