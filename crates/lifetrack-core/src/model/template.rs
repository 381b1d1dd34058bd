//! Templates: reusable, ordered collections of catalog item references.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::catalog::CatalogKind;

/// Reference to a catalog item from a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemRef {
    Food { id: u64 },
    Workout { id: u64 },
}

impl ItemRef {
    /// Catalog the referenced item lives in.
    pub fn kind(&self) -> CatalogKind {
        match self {
            ItemRef::Food { .. } => CatalogKind::Food,
            ItemRef::Workout { .. } => CatalogKind::Workout,
        }
    }

    /// Referenced item id.
    pub fn id(&self) -> u64 {
        match self {
            ItemRef::Food { id } | ItemRef::Workout { id } => *id,
        }
    }
}

/// A user-owned template.
///
/// Items are checked when written. Later visibility changes of a referenced
/// item do not touch existing templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: u64,
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<ItemRef>,
    pub created_at: NaiveDate,
}

impl Template {
    /// Number of food references.
    pub fn food_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.kind() == CatalogKind::Food)
            .count()
    }

    /// Number of workout references.
    pub fn workout_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.kind() == CatalogKind::Workout)
            .count()
    }

    /// Lightweight listing view.
    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            name: self.name.clone(),
            foods_count: self.food_count(),
            workouts_count: self.workout_count(),
            created_at: self.created_at,
        }
    }
}

/// Listing view of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub name: String,
    pub foods_count: usize,
    pub workouts_count: usize,
    pub created_at: NaiveDate,
}
