//! Catalog items: foods and workouts.
//!
//! Both kinds carry the same [`Sharing`] block, which is all the
//! authorization policy looks at.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validate;

/// Kind of catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    /// A food with nutrition facts per 100 g.
    Food,
    /// A workout exercise.
    Workout,
}

impl CatalogKind {
    /// Human-readable label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            CatalogKind::Food => "Food",
            CatalogKind::Workout => "Workout",
        }
    }

    /// Name of the collection storing this kind.
    pub fn collection(&self) -> &'static str {
        match self {
            CatalogKind::Food => "foods",
            CatalogKind::Workout => "workouts",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Food => write!(f, "food"),
            CatalogKind::Workout => write!(f, "workout"),
        }
    }
}

fn default_creator() -> String {
    "system".to_string()
}

fn default_public() -> bool {
    true
}

/// Ownership and visibility attributes shared by every catalog item.
///
/// Documents written before visibility existed lack `public` and
/// `pending_approval`; they load as approved public.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sharing {
    /// Username of the submitting user. Never changes after creation.
    #[serde(default = "default_creator")]
    pub creator: String,
    /// Visible to every user once approved.
    #[serde(default = "default_public")]
    pub public: bool,
    /// Waiting for an administrator to approve it.
    #[serde(default)]
    pub pending_approval: bool,
}

impl Sharing {
    /// Sharing block for a new submission.
    ///
    /// Public submissions enter the moderation queue; private ones do not.
    pub fn submitted(creator: impl Into<String>, public: bool) -> Self {
        Self {
            creator: creator.into(),
            public,
            pending_approval: public,
        }
    }
}

impl Default for Sharing {
    fn default() -> Self {
        Self {
            creator: default_creator(),
            public: true,
            pending_approval: false,
        }
    }
}

/// Visibility state derived from [`Sharing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Public and cleared by moderation.
    ApprovedPublic,
    /// Submitted as public, not yet approved.
    PendingApproval,
    /// Only visible to the creator.
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::ApprovedPublic => write!(f, "approved public"),
            Visibility::PendingApproval => write!(f, "not yet approved"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// A record stored in one of the catalog collections.
pub trait CatalogRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Which catalog this record lives in.
    const KIND: CatalogKind;

    /// Request payload used to submit a new record.
    type Draft: DeserializeOwned + Send + 'static;

    /// Build a validated record from a submission.
    fn from_draft(id: u64, creator: &str, draft: Self::Draft) -> Result<Self>;

    /// Record identifier.
    fn id(&self) -> u64;

    /// Display name.
    fn name(&self) -> &str;

    /// Ownership and visibility.
    fn sharing(&self) -> &Sharing;

    /// Mutable ownership and visibility (moderation only).
    fn sharing_mut(&mut self) -> &mut Sharing;
}

/// A food. Nutrition values are per 100 g.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(flatten)]
    pub sharing: Sharing,
}

/// Submission payload for a new food.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoodDraft {
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub public: bool,
}

impl CatalogRecord for Food {
    const KIND: CatalogKind = CatalogKind::Food;
    type Draft = FoodDraft;

    fn from_draft(id: u64, creator: &str, draft: FoodDraft) -> Result<Self> {
        let name = validate::catalog_name(&draft.name, Self::KIND.label())?;
        Ok(Self {
            id,
            name,
            calories: validate::number_in_range(draft.calories, "Calories", 0.0, 10_000.0)?,
            protein: validate::number_in_range(draft.protein, "Protein", 0.0, 1_000.0)?,
            carbs: validate::number_in_range(draft.carbs, "Carbs", 0.0, 1_000.0)?,
            fat: validate::number_in_range(draft.fat, "Fat", 0.0, 1_000.0)?,
            categories: validate::categories(draft.categories),
            sharing: Sharing::submitted(creator, draft.public),
        })
    }

    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn sharing(&self) -> &Sharing {
        &self.sharing
    }

    fn sharing_mut(&mut self) -> &mut Sharing {
        &mut self.sharing
    }
}

/// A workout exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(flatten)]
    pub sharing: Sharing,
}

/// Submission payload for a new workout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutDraft {
    pub name: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub public: bool,
}

impl CatalogRecord for Workout {
    const KIND: CatalogKind = CatalogKind::Workout;
    type Draft = WorkoutDraft;

    fn from_draft(id: u64, creator: &str, draft: WorkoutDraft) -> Result<Self> {
        let name = validate::catalog_name(&draft.name, Self::KIND.label())?;
        Ok(Self {
            id,
            name,
            categories: validate::categories(draft.categories),
            sharing: Sharing::submitted(creator, draft.public),
        })
    }

    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn sharing(&self) -> &Sharing {
        &self.sharing
    }

    fn sharing_mut(&mut self) -> &mut Sharing {
        &mut self.sharing
    }
}
