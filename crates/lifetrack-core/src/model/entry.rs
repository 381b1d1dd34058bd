//! Daily log entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::catalog::{Food, Workout};

/// A food as logged, with the eaten amount in grams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedFood {
    pub food_id: u64,
    pub name: String,
    pub amount: f64,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl LoggedFood {
    /// Snapshot a catalog food at the given amount.
    ///
    /// Values are clamped to the accepted ranges.
    pub fn from_food(food: &Food, amount: f64) -> Self {
        Self {
            food_id: food.id,
            name: food.name.clone(),
            amount: amount.clamp(0.0, 10_000.0),
            calories: food.calories.clamp(0.0, 10_000.0),
            protein: food.protein.clamp(0.0, 1_000.0),
            carbs: food.carbs.clamp(0.0, 1_000.0),
            fat: food.fat.clamp(0.0, 1_000.0),
        }
    }
}

/// A workout as logged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggedWorkout {
    pub workout_id: u64,
    pub name: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub sets: u32,
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl LoggedWorkout {
    /// Snapshot a catalog workout with no performance data.
    pub fn from_workout(workout: &Workout) -> Self {
        Self {
            workout_id: workout.id,
            name: workout.name.clone(),
            categories: workout.categories.clone(),
            ..Default::default()
        }
    }

    /// Clamp performance values to the accepted ranges.
    pub fn clamped(mut self) -> Self {
        self.sets = self.sets.min(100);
        self.reps = self.reps.min(1_000);
        self.weight = self.weight.clamp(0.0, 1_000.0);
        self.duration = self.duration.clamp(0.0, 1_440.0);
        self.speed = self.speed.map(|speed| speed.max(0.0));
        self.categories.truncate(5);
        self
    }
}

/// Macro totals for an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub calories: f64,
}

impl Macros {
    /// Sum per-100 g values scaled by each food's amount.
    ///
    /// Protein, carbs and fat are rounded to 0.1 g, calories to whole kcal.
    pub fn total(foods: &[LoggedFood]) -> Self {
        let raw = foods.iter().fold(Macros::default(), |acc, food| {
            let factor = food.amount / 100.0;
            Macros {
                protein: acc.protein + food.protein * factor,
                carbs: acc.carbs + food.carbs * factor,
                fat: acc.fat + food.fat * factor,
                calories: acc.calories + food.calories * factor,
            }
        });

        Macros {
            protein: round_to(raw.protein, 1),
            carbs: round_to(raw.carbs, 1),
            fat: round_to(raw.fat, 1),
            calories: round_to(raw.calories, 0),
        }
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// A dated log entry owned by one user.
///
/// Entries start private. An owner may share one; shared entries wait for
/// moderation before others see them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub user: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub foods: Vec<LoggedFood>,
    #[serde(default)]
    pub workouts: Vec<LoggedWorkout>,
    #[serde(default)]
    pub totals: Macros,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub pending_approval: bool,
}

impl LogEntry {
    /// Entry holding foods; totals are computed.
    pub fn foods(id: u64, user: impl Into<String>, date: NaiveDate, foods: Vec<LoggedFood>) -> Self {
        let totals = Macros::total(&foods);
        Self {
            id,
            user: user.into(),
            date,
            foods,
            workouts: Vec::new(),
            totals,
            public: false,
            pending_approval: false,
        }
    }

    /// Entry holding workouts.
    pub fn workouts(
        id: u64,
        user: impl Into<String>,
        date: NaiveDate,
        workouts: Vec<LoggedWorkout>,
    ) -> Self {
        Self {
            id,
            user: user.into(),
            date,
            foods: Vec::new(),
            workouts,
            totals: Macros::default(),
            public: false,
            pending_approval: false,
        }
    }

    /// Share or unshare the entry. Sharing re-enters moderation.
    pub fn set_public(&mut self, public: bool) {
        self.public = public;
        self.pending_approval = public;
    }
}
