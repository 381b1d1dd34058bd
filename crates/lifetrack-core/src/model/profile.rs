//! Body profile, nutrition goals and recommended intake.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::entry::round_to;
use crate::error::{Error, Result};
use crate::validate;

/// Age assumed when no birthday is on file.
pub const DEFAULT_AGE: u32 = 25;

/// Weight goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    #[default]
    Maintain,
    Gain,
}

impl Goal {
    /// Multiplier applied to daily energy expenditure.
    fn calorie_factor(self) -> f64 {
        match self {
            Goal::Lose => 0.8,
            Goal::Maintain => 1.0,
            Goal::Gain => 1.15,
        }
    }

    /// Protein grams per kilogram of body weight.
    fn protein_per_kg(self) -> f64 {
        match self {
            Goal::Lose | Goal::Gain => 2.0,
            Goal::Maintain => 1.8,
        }
    }
}

/// Sex used by the BMR equation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

fn default_activity_level() -> f64 {
    1.5
}

/// User-maintained profile. Zero means "not set".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Height in centimetres.
    #[serde(default)]
    pub height: f64,
    /// Weight in kilograms.
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub goal: Goal,
    #[serde(default)]
    pub sex: Sex,
    /// Multiplier from BMR to daily expenditure (1.2 sedentary .. 1.9 very active).
    #[serde(default = "default_activity_level")]
    pub activity_level: f64,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub calorie_goal: u32,
    #[serde(default)]
    pub protein_goal: u32,
    #[serde(default)]
    pub carb_goal: u32,
    #[serde(default)]
    pub fat_goal: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            height: 0.0,
            weight: 0.0,
            goal: Goal::default(),
            sex: Sex::default(),
            activity_level: default_activity_level(),
            birthday: None,
            calorie_goal: 0,
            protein_goal: 0,
            carb_goal: 0,
            fat_goal: 0,
        }
    }
}

fn goal_in_range(value: u32, field: &str, max: u32) -> Result<u32> {
    if value > max {
        return Err(Error::Validation(format!("{field} must be between 0 and {max}")));
    }
    Ok(value)
}

impl Profile {
    /// Check every field against its accepted range.
    pub fn validated(self, today: NaiveDate) -> Result<Self> {
        if self.birthday.is_some_and(|birthday| birthday > today) {
            return Err(Error::Validation("Birthday cannot be in the future".to_string()));
        }
        Ok(Self {
            height: validate::number_in_range(self.height, "Height", 0.0, 300.0)?,
            weight: validate::number_in_range(self.weight, "Weight", 0.0, 500.0)?,
            activity_level: validate::number_in_range(
                self.activity_level,
                "Activity level",
                1.0,
                2.5,
            )?,
            calorie_goal: goal_in_range(self.calorie_goal, "Calorie goal", 10_000)?,
            protein_goal: goal_in_range(self.protein_goal, "Protein goal", 1_000)?,
            carb_goal: goal_in_range(self.carb_goal, "Carb goal", 1_000)?,
            fat_goal: goal_in_range(self.fat_goal, "Fat goal", 1_000)?,
            ..self
        })
    }

    /// Age in whole years on `today`.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        self.birthday
            .and_then(|birthday| today.years_since(birthday))
            .unwrap_or(DEFAULT_AGE)
    }

    /// Whether `today` is the user's birthday.
    pub fn is_birthday(&self, today: NaiveDate) -> bool {
        self.birthday
            .is_some_and(|birthday| birthday.month() == today.month() && birthday.day() == today.day())
    }
}

/// Recommended daily intake.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub calories: f64,
    /// Total daily energy expenditure.
    pub tdee: f64,
    /// Basal metabolic rate (Mifflin-St Jeor).
    pub bmr: f64,
}

impl Recommendation {
    /// Recommendation for `profile`, or `None` until height and weight are set.
    pub fn for_profile(profile: &Profile, today: NaiveDate) -> Option<Self> {
        if profile.weight <= 0.0 || profile.height <= 0.0 {
            return None;
        }

        let weight = profile.weight;
        let sex_offset = match profile.sex {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        };
        let bmr = 10.0 * weight + 6.25 * profile.height - 5.0 * f64::from(profile.age_on(today))
            + sex_offset;
        let tdee = bmr * profile.activity_level;
        let calories = tdee * profile.goal.calorie_factor();

        let protein = weight * profile.goal.protein_per_kg();
        let fat = weight * 0.9;
        let carbs = ((calories - protein * 4.0 - fat * 9.0) / 4.0).max(0.0);

        Some(Self {
            protein: round_to(protein, 1),
            carbs: round_to(carbs, 1),
            fat: round_to(fat, 1),
            calories: round_to(calories, 0),
            tdee: round_to(tdee, 0),
            bmr: round_to(bmr, 0),
        })
    }
}
