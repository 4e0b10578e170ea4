//! Workout routes
//!
//! Listing and scheduling workouts, attaching exercises, and the lifecycle
//! actions (start, complete, toggle an exercise).

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::{run_blocking, ApiError};
use crate::db::Database;
use crate::models::{WorkoutCreate, WorkoutExerciseCreate, WorkoutFilter};
use crate::tools::workouts;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkoutsQuery {
    user_id: Option<i64>,
    /// Only the literal `true` selects completed workouts
    completed: Option<String>,
}

impl WorkoutsQuery {
    fn into_filter(self) -> WorkoutFilter {
        WorkoutFilter {
            user_id: self.user_id,
            completed: self.completed.map(|v| v.trim() == "true"),
            ..Default::default()
        }
    }
}

pub struct WorkoutRoutes;

impl WorkoutRoutes {
    pub fn routes(db: Database) -> Router {
        Router::new()
            .route("/workouts", get(Self::handle_list).post(Self::handle_create))
            .route("/workouts/:id", get(Self::handle_get))
            .route("/workouts/:id/exercises", post(Self::handle_add_exercise))
            .route("/workouts/:id/start", post(Self::handle_start))
            .route("/workouts/:id/complete", post(Self::handle_complete))
            .route(
                "/workouts/:id/exercises/:workout_exercise_id/toggle",
                post(Self::handle_toggle),
            )
            .with_state(db)
    }

    async fn handle_list(
        State(db): State<Database>,
        query: Result<Query<WorkoutsQuery>, QueryRejection>,
    ) -> Result<Response, ApiError> {
        let Query(params) = query?;
        let filter = params.into_filter();
        let list = run_blocking(&db, "Failed to fetch workouts", move |db| {
            workouts::list_workouts(db, &filter)
        })
        .await?;
        Ok((StatusCode::OK, Json(list)).into_response())
    }

    async fn handle_create(
        State(db): State<Database>,
        body: Result<Json<WorkoutCreate>, JsonRejection>,
    ) -> Result<Response, ApiError> {
        let Json(data) = body?;
        let workout = run_blocking(&db, "Failed to create workout", move |db| {
            workouts::create_workout(db, &data)
        })
        .await?;
        Ok((StatusCode::CREATED, Json(workout)).into_response())
    }

    async fn handle_get(
        State(db): State<Database>,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, ApiError> {
        let Path(workout_id) = path?;
        let workout = run_blocking(&db, "Failed to fetch workout", move |db| {
            workouts::get_workout(db, workout_id)
        })
        .await?;
        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    async fn handle_add_exercise(
        State(db): State<Database>,
        path: Result<Path<i64>, PathRejection>,
        body: Result<Json<WorkoutExerciseCreate>, JsonRejection>,
    ) -> Result<Response, ApiError> {
        let Path(workout_id) = path?;
        let Json(data) = body?;
        let workout = run_blocking(&db, "Failed to add exercise to workout", move |db| {
            workouts::add_workout_exercise(db, workout_id, &data)
        })
        .await?;
        Ok((StatusCode::CREATED, Json(workout)).into_response())
    }

    async fn handle_start(
        State(db): State<Database>,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, ApiError> {
        let Path(workout_id) = path?;
        let workout = run_blocking(&db, "Failed to start workout", move |db| {
            workouts::start_workout(db, workout_id)
        })
        .await?;
        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    async fn handle_complete(
        State(db): State<Database>,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, ApiError> {
        let Path(workout_id) = path?;
        let workout = run_blocking(&db, "Failed to complete workout", move |db| {
            workouts::complete_workout(db, workout_id)
        })
        .await?;
        Ok((StatusCode::OK, Json(workout)).into_response())
    }

    async fn handle_toggle(
        State(db): State<Database>,
        path: Result<Path<(i64, i64)>, PathRejection>,
    ) -> Result<Response, ApiError> {
        let Path((workout_id, workout_exercise_id)) = path?;
        let workout = run_blocking(&db, "Failed to update workout exercise", move |db| {
            workouts::toggle_workout_exercise(db, workout_id, workout_exercise_id)
        })
        .await?;
        Ok((StatusCode::OK, Json(workout)).into_response())
    }
}
