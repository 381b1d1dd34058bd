//! Domain records stored in the LifeTrack collections.

mod catalog;
mod entry;
mod profile;
mod stats;
mod template;
mod user;

pub use catalog::{CatalogKind, CatalogRecord, Food, FoodDraft, Sharing, Visibility, Workout, WorkoutDraft};
pub use entry::{LogEntry, LoggedFood, LoggedWorkout, Macros};
pub use profile::{Goal, Profile, Recommendation, Sex, DEFAULT_AGE};
pub use stats::UserStats;
pub use template::{ItemRef, Template, TemplateSummary};
pub use user::{Role, UserRecord};
