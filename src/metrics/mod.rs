//! Health metric calculations
//!
//! Pure functions over record snapshots: body metrics (BMI, BMR, calorie
//! target), nutrition totals, workout completion and progress deltas. Nothing
//! here touches the database.

pub mod body;
pub mod nutrition;
pub mod progress;
pub mod workouts;

use thiserror::Error;

use crate::models::WorkoutStatus;

pub use body::{
    activity_multiplier, bmi, bmi_category, bmr, daily_calorie_target, weight_delta, BmiCategory,
    UserMetrics, WeightDelta, WeightDirection,
};
pub use nutrition::{
    aggregate, progress_percent, progress_ratio, totals_by_meal_type, MealTypeTotals,
    NutritionTotals, DEFAULT_DAILY_CALORIE_GOAL,
};
pub use progress::{change, summarize, Change, ChangeDirection, ProgressSummary};
pub use workouts::{
    apply, exercise_completion_ratio, toggle_exercise_completion, weekly_stats, WeeklyStats,
    WorkoutAction,
};

/// Calculation error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Workout has no exercise with id {0}")]
    UnknownExercise(i64),

    #[error("Cannot {action} a workout that is {}", .from.as_str())]
    InvalidTransition {
        from: WorkoutStatus,
        action: &'static str,
    },
}

pub type CalcResult<T> = Result<T, CalcError>;

/// Round to one decimal place for display
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round1() {
        assert_eq!(round1(22.857), 22.9);
        assert_eq!(round1(-2.04), -2.0);
    }

    #[test]
    fn test_transition_error_message() {
        let err = CalcError::InvalidTransition {
            from: WorkoutStatus::Completed,
            action: "start",
        };
        assert_eq!(err.to_string(), "Cannot start a workout that is completed");
    }
}
