//! Workout model
//!
//! A scheduled workout session and its exercises. The persisted `status`
//! column is the source of truth; `completed` is derived from it.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::{timestamps, Exercise};

/// Workout lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStatus {
    Scheduled,
    InProgress,
    Completed,
}

impl WorkoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutStatus::Scheduled => "scheduled",
            WorkoutStatus::InProgress => "in_progress",
            WorkoutStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "scheduled" => Some(WorkoutStatus::Scheduled),
            "in_progress" => Some(WorkoutStatus::InProgress),
            "completed" => Some(WorkoutStatus::Completed),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, WorkoutStatus::Completed)
    }
}

/// An exercise within a workout, with its catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExercise {
    pub id: i64,
    pub workout_id: i64,
    pub exercise_id: i64,
    pub sets: u32,
    pub reps: u32,
    /// kg; absent for bodyweight and timed exercises
    pub weight: Option<f64>,
    pub completed: bool,
    pub exercise: Exercise,
}

/// A workout session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    /// minutes
    pub duration: u32,
    /// estimated burn
    pub calories: u32,
    pub date: DateTime<Utc>,
    pub status: WorkoutStatus,
    pub completed: bool,
    pub exercises: Vec<WorkoutExercise>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for scheduling a workout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutCreate {
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub calories: u32,
    #[serde(default, deserialize_with = "timestamps::deserialize_optional")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
}

impl WorkoutCreate {
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();
        super::require_non_empty("name", &self.name, &mut problems);
        super::into_validation_result(problems)
    }
}

/// Data for adding an exercise to a workout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExerciseCreate {
    pub exercise_id: i64,
    #[serde(default)]
    pub sets: u32,
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub weight: Option<f64>,
}

impl WorkoutExerciseCreate {
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();
        if let Some(weight) = self.weight {
            super::require_non_negative("weight", weight, &mut problems);
        }
        super::into_validation_result(problems)
    }
}

/// Filters for listing workouts
#[derive(Debug, Clone, Default)]
pub struct WorkoutFilter {
    pub user_id: Option<i64>,
    pub completed: Option<bool>,
    /// Inclusive lower bound on the workout date
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on the workout date
    pub to: Option<DateTime<Utc>>,
}

const WORKOUT_EXERCISE_SELECT: &str = r#"
    SELECT we.id, we.workout_id, we.exercise_id, we.sets, we.reps, we.weight, we.completed,
           e.name AS exercise_name, e.category AS exercise_category,
           e.description AS exercise_description, e.instructions AS exercise_instructions,
           e.muscle_groups AS exercise_muscle_groups, e.created_at AS exercise_created_at
    FROM workout_exercises we
    JOIN exercises e ON e.id = we.exercise_id
"#;

impl WorkoutExercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let groups: String = row.get("exercise_muscle_groups")?;
        let exercise_id: i64 = row.get("exercise_id")?;

        Ok(Self {
            id: row.get("id")?,
            workout_id: row.get("workout_id")?,
            exercise_id,
            sets: row.get("sets")?,
            reps: row.get("reps")?,
            weight: row.get("weight")?,
            completed: row.get::<_, i32>("completed")? != 0,
            exercise: Exercise {
                id: exercise_id,
                name: row.get("exercise_name")?,
                category: row.get("exercise_category")?,
                description: row.get("exercise_description")?,
                instructions: row.get("exercise_instructions")?,
                muscle_groups: super::exercise::normalize_muscle_groups(groups.split(',')),
                created_at: row.get("exercise_created_at")?,
            },
        })
    }

    /// Get a workout exercise by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let sql = format!("{} WHERE we.id = ?1", WORKOUT_EXERCISE_SELECT);
        let mut stmt = conn.prepare(&sql)?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(we) => Ok(Some(we)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List the exercises of a workout in insertion order
    pub fn list_for_workout(conn: &Connection, workout_id: i64) -> DbResult<Vec<Self>> {
        let sql = format!("{} WHERE we.workout_id = ?1 ORDER BY we.id", WORKOUT_EXERCISE_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let exercises = stmt
            .query_map([workout_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(exercises)
    }
}

/// Workout row without its exercises
struct WorkoutRow {
    id: i64,
    user_id: i64,
    name: String,
    description: String,
    duration: u32,
    calories: u32,
    date: DateTime<Utc>,
    status: WorkoutStatus,
    created_at: String,
    updated_at: String,
}

impl WorkoutRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let status_str: String = row.get("status")?;
        let status = WorkoutStatus::from_str(&status_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                Type::Text,
                format!("unknown workout status: {}", status_str).into(),
            )
        })?;

        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            duration: row.get("duration")?,
            calories: row.get("calories")?,
            date: timestamps::column(row, "date")?,
            status,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn with_exercises(self, exercises: Vec<WorkoutExercise>) -> Workout {
        Workout {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            description: self.description,
            duration: self.duration,
            calories: self.calories,
            date: self.date,
            status: self.status,
            completed: self.status.is_completed(),
            exercises,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Workout {
    /// Schedule a new workout
    pub fn create(conn: &Connection, data: &WorkoutCreate) -> DbResult<Self> {
        let date = data.date.unwrap_or_else(Utc::now);
        let status = if data.completed {
            WorkoutStatus::Completed
        } else {
            WorkoutStatus::Scheduled
        };

        conn.execute(
            r#"
            INSERT INTO workouts (user_id, name, description, duration, calories, date, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.user_id,
                data.name.trim(),
                data.description,
                data.duration,
                data.calories,
                timestamps::to_storage(&date),
                status.as_str(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a workout with its exercises
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?1")?;

        let row = match stmt.query_row([id], WorkoutRow::from_row) {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let exercises = WorkoutExercise::list_for_workout(conn, id)?;
        Ok(Some(row.with_exercises(exercises)))
    }

    /// List workouts with their exercises, newest first
    pub fn list(conn: &Connection, filter: &WorkoutFilter) -> DbResult<Vec<Self>> {
        let mut sql = String::from("SELECT * FROM workouts WHERE 1=1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(user_id) = filter.user_id {
            sql.push_str(&format!(" AND user_id = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(user_id));
        }
        if let Some(completed) = filter.completed {
            let op = if completed { "=" } else { "!=" };
            sql.push_str(&format!(" AND status {} 'completed'", op));
        }
        if let Some(from) = filter.from {
            sql.push_str(&format!(" AND date >= ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(timestamps::to_storage(&from)));
        }
        if let Some(to) = filter.to {
            sql.push_str(&format!(" AND date < ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(timestamps::to_storage(&to)));
        }

        sql.push_str(" ORDER BY date DESC, id DESC");

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_refs.as_slice(), WorkoutRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|row| {
                let exercises = WorkoutExercise::list_for_workout(conn, row.id)?;
                Ok(row.with_exercises(exercises))
            })
            .collect()
    }

    /// Add a catalog exercise to a workout
    pub fn add_exercise(
        conn: &Connection,
        workout_id: i64,
        data: &WorkoutExerciseCreate,
    ) -> DbResult<WorkoutExercise> {
        conn.execute(
            r#"
            INSERT INTO workout_exercises (workout_id, exercise_id, sets, reps, weight)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![workout_id, data.exercise_id, data.sets, data.reps, data.weight],
        )?;

        let id = conn.last_insert_rowid();
        WorkoutExercise::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Persist a workout's status and exercise completion flags.
    ///
    /// Callers run this inside the transaction that read `workout`, so the
    /// flags written are never older than what is stored. Other columns are
    /// left untouched.
    pub fn save_progress(conn: &Connection, workout: &Workout) -> DbResult<Self> {
        conn.execute(
            "UPDATE workouts SET status = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![workout.status.as_str(), workout.id],
        )?;

        for exercise in &workout.exercises {
            conn.execute(
                "UPDATE workout_exercises SET completed = ?1 WHERE id = ?2 AND workout_id = ?3",
                params![exercise.completed as i32, exercise.id, workout.id],
            )?;
        }

        Self::get_by_id(conn, workout.id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }
}
