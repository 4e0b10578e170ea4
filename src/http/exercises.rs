//! Exercise catalog routes

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::{run_blocking, ApiError};
use crate::db::Database;
use crate::models::ExerciseCreate;
use crate::tools::exercises;

pub struct ExerciseRoutes;

impl ExerciseRoutes {
    pub fn routes(db: Database) -> Router {
        Router::new()
            .route("/exercises", get(Self::handle_list).post(Self::handle_create))
            .with_state(db)
    }

    async fn handle_list(State(db): State<Database>) -> Result<Response, ApiError> {
        let list = run_blocking(&db, "Failed to fetch exercises", exercises::list_exercises).await?;
        Ok((StatusCode::OK, Json(list)).into_response())
    }

    async fn handle_create(
        State(db): State<Database>,
        body: Result<Json<ExerciseCreate>, JsonRejection>,
    ) -> Result<Response, ApiError> {
        let Json(data) = body?;
        let exercise = run_blocking(&db, "Failed to create exercise", move |db| {
            exercises::add_exercise(db, &data)
        })
        .await?;
        Ok((StatusCode::CREATED, Json(exercise)).into_response())
    }
}
