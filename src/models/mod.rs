//! Data models
//!
//! Rust structs representing database entities. JSON field names are
//! camelCase to match the HTTP API.

mod exercise;
mod meal;
mod progress;
pub mod timestamps;
mod user;
mod workout;

pub use exercise::{Exercise, ExerciseCreate};
pub use meal::{Meal, MealCreate, MealFilter, MealType};
pub use progress::{Measurements, Progress, ProgressCreate};
pub use user::{ActivityLevel, User, UserCreate};
pub use workout::{
    Workout, WorkoutCreate, WorkoutExercise, WorkoutExerciseCreate, WorkoutFilter, WorkoutStatus,
};

/// Checks shared by the `*Create` validators
fn require_non_empty(field: &str, value: &str, problems: &mut Vec<String>) {
    if value.trim().is_empty() {
        problems.push(format!("{} is required", field));
    }
}

fn require_non_negative(field: &str, value: f64, problems: &mut Vec<String>) {
    if !value.is_finite() || value < 0.0 {
        problems.push(format!("{} must be a non-negative number", field));
    }
}

fn require_positive(field: &str, value: f64, problems: &mut Vec<String>) {
    if !value.is_finite() || value <= 0.0 {
        problems.push(format!("{} must be greater than 0", field));
    }
}

fn into_validation_result(problems: Vec<String>) -> Result<(), String> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.join("; "))
    }
}
