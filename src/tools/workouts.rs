//! Workout tools
//!
//! Scheduling workouts, attaching catalog exercises, moving workouts through
//! their lifecycle and weekly statistics.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, Utc};
use rusqlite::TransactionBehavior;
use serde::Serialize;

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::metrics::{self, WeeklyStats, WorkoutAction};
use crate::models::{
    timestamps, Exercise, User, Workout, WorkoutCreate, WorkoutExerciseCreate, WorkoutFilter,
};

/// A workout with its owner and completion ratio
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutView {
    #[serde(flatten)]
    pub workout: Workout,
    pub completion_ratio: f64,
    pub user: User,
}

impl WorkoutView {
    fn new(workout: Workout, user: User) -> Self {
        Self {
            completion_ratio: metrics::exercise_completion_ratio(&workout),
            workout,
            user,
        }
    }
}

/// Workout statistics over a date window
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutStats {
    pub user_id: i64,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    #[serde(flatten)]
    pub stats: WeeklyStats,
    /// completed / total; 0 for an empty window
    pub completion_rate: f64,
    /// Not completed and dated from now on, regardless of the window
    pub upcoming_count: usize,
}

/// Monday 00:00 UTC of the week containing `now`, and the Monday after
pub fn current_week(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = now.date_naive();
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let start = timestamps::start_of_day(monday);
    (start, start + Duration::days(7))
}

fn require_workout(conn: &rusqlite::Connection, workout_id: i64) -> AppResult<Workout> {
    Workout::get_by_id(conn, workout_id)?.ok_or_else(|| AppError::not_found("Workout", workout_id))
}

fn view(conn: &rusqlite::Connection, workout: Workout) -> AppResult<WorkoutView> {
    let user = super::require_user(conn, workout.user_id)?;
    Ok(WorkoutView::new(workout, user))
}

/// Schedule a workout for an existing user
pub fn create_workout(db: &Database, data: &WorkoutCreate) -> AppResult<WorkoutView> {
    super::validated(data.validate())?;
    let conn = db.get_conn()?;
    let user = super::referenced_user(&conn, data.user_id)?;

    let workout = Workout::create(&conn, data)?;
    tracing::info!(workout_id = workout.id, user_id = user.id, "Created workout");
    Ok(WorkoutView::new(workout, user))
}

/// Get one workout
pub fn get_workout(db: &Database, workout_id: i64) -> AppResult<WorkoutView> {
    let conn = db.get_conn()?;
    let workout = require_workout(&conn, workout_id)?;
    view(&conn, workout)
}

/// Attach a catalog exercise to a workout
pub fn add_workout_exercise(
    db: &Database,
    workout_id: i64,
    data: &WorkoutExerciseCreate,
) -> AppResult<WorkoutView> {
    super::validated(data.validate())?;
    let conn = db.get_conn()?;
    require_workout(&conn, workout_id)?;
    if Exercise::get_by_id(&conn, data.exercise_id)?.is_none() {
        return Err(AppError::InvalidInput(format!(
            "exerciseId {} does not exist",
            data.exercise_id
        )));
    }

    let added = Workout::add_exercise(&conn, workout_id, data)?;
    tracing::debug!(workout_id, workout_exercise_id = added.id, "Added exercise to workout");

    let workout = require_workout(&conn, workout_id)?;
    view(&conn, workout)
}

/// List workouts with their owners, newest first
pub fn list_workouts(db: &Database, filter: &WorkoutFilter) -> AppResult<Vec<WorkoutView>> {
    let conn = db.get_conn()?;
    let workouts = Workout::list(&conn, filter)?;

    let mut users: HashMap<i64, User> = HashMap::new();
    let mut result = Vec::with_capacity(workouts.len());
    for workout in workouts {
        let user = match users.get(&workout.user_id) {
            Some(user) => user.clone(),
            None => {
                let user = super::require_user(&conn, workout.user_id)?;
                users.insert(user.id, user.clone());
                user
            }
        };
        result.push(WorkoutView::new(workout, user));
    }

    Ok(result)
}

/// Apply a lifecycle action and persist the resulting workout.
///
/// The read, the transition and the write share one IMMEDIATE transaction,
/// so concurrent actions on the same workout are serialized by SQLite.
pub fn apply_action(db: &Database, workout_id: i64, action: WorkoutAction) -> AppResult<WorkoutView> {
    let mut conn = db.get_conn()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let current = require_workout(&tx, workout_id)?;

    let next = metrics::apply(&current, action)?;
    let saved = Workout::save_progress(&tx, &next)?;
    let result = view(&tx, saved)?;
    tx.commit()?;

    if result.workout.status != current.status {
        tracing::info!(
            workout_id,
            from = current.status.as_str(),
            to = result.workout.status.as_str(),
            "Workout status changed"
        );
    }

    Ok(result)
}

pub fn start_workout(db: &Database, workout_id: i64) -> AppResult<WorkoutView> {
    apply_action(db, workout_id, WorkoutAction::Start)
}

pub fn complete_workout(db: &Database, workout_id: i64) -> AppResult<WorkoutView> {
    apply_action(db, workout_id, WorkoutAction::Complete)
}

pub fn toggle_workout_exercise(
    db: &Database,
    workout_id: i64,
    workout_exercise_id: i64,
) -> AppResult<WorkoutView> {
    apply_action(db, workout_id, WorkoutAction::ToggleExercise { workout_exercise_id })
}

/// Stats for a user's workouts dated in `[from, to)`; defaults to the
/// current week
pub fn workout_stats(
    db: &Database,
    user_id: i64,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> AppResult<WorkoutStats> {
    let now = Utc::now();
    let (week_start, week_end) = current_week(now);
    let from = from.unwrap_or(week_start);
    let to = to.unwrap_or(week_end);
    if to <= from {
        return Err(AppError::InvalidInput("'to' must be after 'from'".to_string()));
    }

    let conn = db.get_conn()?;
    super::require_user(&conn, user_id)?;

    let in_window = Workout::list(
        &conn,
        &WorkoutFilter {
            user_id: Some(user_id),
            from: Some(from),
            to: Some(to),
            ..Default::default()
        },
    )?;
    let pending = Workout::list(
        &conn,
        &WorkoutFilter {
            user_id: Some(user_id),
            completed: Some(false),
            ..Default::default()
        },
    )?;

    let stats = metrics::weekly_stats(&in_window);
    let completion_rate = if stats.total == 0 {
        0.0
    } else {
        stats.completed_count as f64 / stats.total as f64
    };

    Ok(WorkoutStats {
        user_id,
        from,
        to,
        stats,
        completion_rate,
        upcoming_count: metrics::workouts::upcoming(&pending, now).len(),
    })
}
