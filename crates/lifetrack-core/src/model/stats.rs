//! Per-user statistics derived from log entries.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entry::{LogEntry, Macros};

/// Summary of one user's logging history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    /// Consecutive days with at least one entry, counted back from today.
    pub streak: u32,
    pub total_entries: usize,
    /// Whole kcal per day, over days with any calories logged.
    pub avg_calories: f64,
    pub today_calories: f64,
    pub favorite_food: Option<String>,
    pub favorite_workout: Option<String>,
    /// Macro totals for today's foods.
    pub today: Macros,
}

impl UserStats {
    /// Compute stats over `entries`, all owned by the same user.
    pub fn compute(entries: &[LogEntry], today: NaiveDate) -> Self {
        let mut calories_per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for entry in entries {
            let calories: f64 = entry
                .foods
                .iter()
                .map(|food| food.calories * food.amount / 100.0)
                .sum();
            if calories > 0.0 {
                *calories_per_day.entry(entry.date).or_default() += calories;
            }
        }

        let avg_calories = if calories_per_day.is_empty() {
            0.0
        } else {
            (calories_per_day.values().sum::<f64>() / calories_per_day.len() as f64).floor()
        };

        let todays_foods: Vec<_> = entries
            .iter()
            .filter(|entry| entry.date == today)
            .flat_map(|entry| entry.foods.iter().cloned())
            .collect();

        Self {
            streak: streak(entries, today),
            total_entries: entries.len(),
            avg_calories,
            today_calories: calories_per_day
                .get(&today)
                .map_or(0.0, |calories| calories.round()),
            favorite_food: most_common(
                entries.iter().flat_map(|entry| entry.foods.iter().map(|f| f.name.as_str())),
            ),
            favorite_workout: most_common(
                entries
                    .iter()
                    .flat_map(|entry| entry.workouts.iter().map(|w| w.name.as_str())),
            ),
            today: Macros::total(&todays_foods),
        }
    }
}

fn streak(entries: &[LogEntry], today: NaiveDate) -> u32 {
    let dates: BTreeSet<NaiveDate> = entries.iter().map(|entry| entry.date).collect();
    let mut day = today;
    let mut streak = 0;
    while dates.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}

/// Most frequent name; ties go to the alphabetically first.
fn most_common<'a>(names: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for name in names.filter(|name| !name.is_empty()) {
        *counts.entry(name).or_default() += 1;
    }
    counts
        .into_iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LoggedFood, LoggedWorkout};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn food(name: &str, calories: f64, amount: f64) -> LoggedFood {
        LoggedFood {
            food_id: 1,
            name: name.to_string(),
            amount,
            calories,
            protein: 10.0,
            carbs: 0.0,
            fat: 0.0,
        }
    }

    fn workout(name: &str) -> LoggedWorkout {
        LoggedWorkout {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_stats_over_history() {
        let entries = vec![
            LogEntry::foods(1, "bob", day(10), vec![food("Rice", 130.0, 200.0)]),
            LogEntry::foods(2, "bob", day(10), vec![food("Egg", 150.0, 100.0)]),
            LogEntry::foods(3, "bob", day(9), vec![food("Rice", 130.0, 100.0)]),
            LogEntry::workouts(4, "bob", day(9), vec![workout("Squat")]),
            LogEntry::workouts(5, "bob", day(7), vec![workout("Squat"), workout("Row")]),
        ];
        let stats = UserStats::compute(&entries, day(10));

        assert_eq!(stats.streak, 2);
        assert_eq!(stats.total_entries, 5);
        // (260 + 150 + 130) / 2 days with calories
        assert_eq!(stats.avg_calories, 270.0);
        assert_eq!(stats.today_calories, 410.0);
        assert_eq!(stats.favorite_food.as_deref(), Some("Rice"));
        assert_eq!(stats.favorite_workout.as_deref(), Some("Squat"));
        assert_eq!(stats.today.protein, 30.0);
    }

    #[test]
    fn test_streak_needs_today() {
        let entries = vec![LogEntry::foods(1, "bob", day(9), vec![food("Rice", 130.0, 100.0)])];
        assert_eq!(UserStats::compute(&entries, day(10)).streak, 0);
    }

    #[test]
    fn test_empty_history() {
        let stats = UserStats::compute(&[], day(10));
        assert_eq!(stats.avg_calories, 0.0);
        assert!(stats.favorite_food.is_none());
        assert_eq!(stats.today, Macros::default());
    }

    #[test]
    fn test_favorite_ties_are_alphabetical() {
        let names = ["Pear", "Apple", "Pear", "Apple"];
        assert_eq!(most_common(names.into_iter()).as_deref(), Some("Apple"));
    }
}
