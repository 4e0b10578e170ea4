//! Workout completion and weekly statistics
//!
//! A workout with no exercises counts as fully complete: its completion
//! ratio is 1.0 and "every exercise completed" holds vacuously. Completion
//! changes go through [`apply`], which returns a new workout rather than
//! editing one in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CalcError, CalcResult};
use crate::models::{Workout, WorkoutStatus};

/// Summary over a caller-chosen set of workouts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub total: usize,
    pub completed_count: usize,
    pub total_calories: u64,
    pub total_minutes: u64,
}

/// Actions that move a workout through its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkoutAction {
    Start,
    Complete,
    ToggleExercise { workout_exercise_id: i64 },
}

/// Fraction of exercises marked completed, in `[0, 1]`
pub fn exercise_completion_ratio(workout: &Workout) -> f64 {
    if workout.exercises.is_empty() {
        return 1.0;
    }
    let done = workout.exercises.iter().filter(|e| e.completed).count();
    done as f64 / workout.exercises.len() as f64
}

fn all_exercises_completed(workout: &Workout) -> bool {
    workout.exercises.iter().all(|e| e.completed)
}

/// Flip one exercise's completed flag and recompute the workout's state
pub fn toggle_exercise_completion(workout: &Workout, workout_exercise_id: i64) -> CalcResult<Workout> {
    if !workout.exercises.iter().any(|e| e.id == workout_exercise_id) {
        return Err(CalcError::UnknownExercise(workout_exercise_id));
    }

    let mut next = workout.clone();
    for exercise in next.exercises.iter_mut() {
        if exercise.id == workout_exercise_id {
            exercise.completed = !exercise.completed;
        }
    }

    let any_done = next.exercises.iter().any(|e| e.completed);
    next.status = if all_exercises_completed(&next) {
        WorkoutStatus::Completed
    } else if !any_done && workout.status == WorkoutStatus::Scheduled {
        WorkoutStatus::Scheduled
    } else {
        WorkoutStatus::InProgress
    };
    next.completed = next.status.is_completed();

    Ok(next)
}

/// Reducer over the workout lifecycle
pub fn apply(workout: &Workout, action: WorkoutAction) -> CalcResult<Workout> {
    match action {
        WorkoutAction::Start => match workout.status {
            WorkoutStatus::Scheduled | WorkoutStatus::InProgress => {
                let mut next = workout.clone();
                next.status = WorkoutStatus::InProgress;
                next.completed = false;
                Ok(next)
            }
            WorkoutStatus::Completed => Err(CalcError::InvalidTransition {
                from: workout.status,
                action: "start",
            }),
        },
        WorkoutAction::Complete => {
            let mut next = workout.clone();
            next.status = WorkoutStatus::Completed;
            next.completed = true;
            Ok(next)
        }
        WorkoutAction::ToggleExercise { workout_exercise_id } => {
            toggle_exercise_completion(workout, workout_exercise_id)
        }
    }
}

/// Counts and sums over the given workouts; no date filtering
pub fn weekly_stats(workouts: &[Workout]) -> WeeklyStats {
    workouts.iter().fold(WeeklyStats::default(), |mut stats, w| {
        stats.total += 1;
        if w.completed {
            stats.completed_count += 1;
        }
        stats.total_calories += u64::from(w.calories);
        stats.total_minutes += u64::from(w.duration);
        stats
    })
}

/// Not yet completed and dated at or after `now`
pub fn upcoming(workouts: &[Workout], now: DateTime<Utc>) -> Vec<&Workout> {
    workouts
        .iter()
        .filter(|w| !w.completed && w.date >= now)
        .collect()
}

pub fn completed(workouts: &[Workout]) -> Vec<&Workout> {
    workouts.iter().filter(|w| w.completed).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::workout_record;
    use chrono::Duration;

    #[test]
    fn test_completion_ratio() {
        let w = workout_record(&[true, true, false, false], WorkoutStatus::InProgress);
        assert_eq!(exercise_completion_ratio(&w), 0.5);

        let w = workout_record(&[false, false, false], WorkoutStatus::Scheduled);
        assert_eq!(exercise_completion_ratio(&w), 0.0);
    }

    #[test]
    fn test_completion_ratio_empty_workout_is_complete() {
        let w = workout_record(&[], WorkoutStatus::Scheduled);
        assert_eq!(exercise_completion_ratio(&w), 1.0);
    }

    #[test]
    fn test_ratio_stays_in_unit_interval() {
        for n in 0..5 {
            for done in 0..=n {
                let flags: Vec<bool> = (0..n).map(|i| i < done).collect();
                let ratio = exercise_completion_ratio(&workout_record(&flags, WorkoutStatus::Scheduled));
                assert!((0.0..=1.0).contains(&ratio));
            }
        }
    }

    #[test]
    fn test_toggle_all_completes_workout() {
        let mut w = workout_record(&[false, false, false], WorkoutStatus::Scheduled);
        for id in 1..=3 {
            w = toggle_exercise_completion(&w, id).unwrap();
        }
        assert!(w.completed);
        assert_eq!(w.status, WorkoutStatus::Completed);

        let w = toggle_exercise_completion(&w, 2).unwrap();
        assert!(!w.completed);
        assert_eq!(w.status, WorkoutStatus::InProgress);
    }

    #[test]
    fn test_toggle_does_not_modify_input() {
        let original = workout_record(&[false, true], WorkoutStatus::InProgress);
        let toggled = toggle_exercise_completion(&original, 1).unwrap();
        assert!(!original.exercises[0].completed);
        assert!(toggled.exercises[0].completed);
        assert!(toggled.completed);
    }

    #[test]
    fn test_toggle_back_to_nothing_done_keeps_scheduled() {
        let w = workout_record(&[false, false], WorkoutStatus::Scheduled);
        let on = toggle_exercise_completion(&w, 1).unwrap();
        assert_eq!(on.status, WorkoutStatus::InProgress);

        let untouched = workout_record(&[true, false], WorkoutStatus::Scheduled);
        let off = toggle_exercise_completion(&untouched, 1).unwrap();
        assert_eq!(off.status, WorkoutStatus::Scheduled);
    }

    #[test]
    fn test_toggle_unknown_exercise() {
        let w = workout_record(&[false], WorkoutStatus::Scheduled);
        assert_eq!(toggle_exercise_completion(&w, 42), Err(CalcError::UnknownExercise(42)));

        let empty = workout_record(&[], WorkoutStatus::Scheduled);
        assert_eq!(toggle_exercise_completion(&empty, 1), Err(CalcError::UnknownExercise(1)));
    }

    #[test]
    fn test_apply_start_and_complete() {
        let w = workout_record(&[false, false], WorkoutStatus::Scheduled);

        let started = apply(&w, WorkoutAction::Start).unwrap();
        assert_eq!(started.status, WorkoutStatus::InProgress);
        assert_eq!(apply(&started, WorkoutAction::Start).unwrap().status, WorkoutStatus::InProgress);

        let done = apply(&started, WorkoutAction::Complete).unwrap();
        assert!(done.completed);
        // completing does not tick off individual exercises
        assert!(done.exercises.iter().all(|e| !e.completed));

        assert_eq!(
            apply(&done, WorkoutAction::Start),
            Err(CalcError::InvalidTransition { from: WorkoutStatus::Completed, action: "start" })
        );
    }

    #[test]
    fn test_apply_toggle() {
        let w = workout_record(&[false], WorkoutStatus::InProgress);
        let done = apply(&w, WorkoutAction::ToggleExercise { workout_exercise_id: 1 }).unwrap();
        assert_eq!(done.status, WorkoutStatus::Completed);
    }

    #[test]
    fn test_weekly_stats() {
        let mut a = workout_record(&[true], WorkoutStatus::Completed);
        a.calories = 350;
        a.duration = 30;
        let b = workout_record(&[false], WorkoutStatus::Scheduled);
        let c = workout_record(&[], WorkoutStatus::Scheduled);

        let stats = weekly_stats(&[a, b, c]);
        assert_eq!(
            stats,
            WeeklyStats { total: 3, completed_count: 1, total_calories: 990, total_minutes: 120 }
        );
        assert_eq!(weekly_stats(&[]), WeeklyStats::default());
    }

    #[test]
    fn test_upcoming_and_completed_filters() {
        let now = Utc::now();
        let mut tomorrow = workout_record(&[false], WorkoutStatus::Scheduled);
        tomorrow.date = now + Duration::days(1);
        let mut yesterday = workout_record(&[false], WorkoutStatus::Scheduled);
        yesterday.date = now - Duration::days(1);
        let mut done = workout_record(&[true], WorkoutStatus::Completed);
        done.date = now + Duration::days(2);

        let all = vec![tomorrow, yesterday, done];
        assert_eq!(upcoming(&all, now).len(), 1);
        assert_eq!(completed(&all).len(), 1);
    }
}
