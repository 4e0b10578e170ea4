//! User routes
//!
//! `/users` plus the per-user calculator endpoints under `/users/:id`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{parse_timestamp, run_blocking, ApiError};
use crate::db::Database;
use crate::models::UserCreate;
use crate::tools::{meals, progress, users, workouts};

#[derive(Debug, Default, Deserialize)]
struct NutritionQuery {
    date: Option<String>,
    goal: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct StatsQuery {
    from: Option<String>,
    to: Option<String>,
}

pub struct UserRoutes;

impl UserRoutes {
    pub fn routes(db: Database) -> Router {
        Router::new()
            .route("/users", get(Self::handle_list).post(Self::handle_create))
            .route("/users/:id/metrics", get(Self::handle_metrics))
            .route("/users/:id/nutrition", get(Self::handle_nutrition))
            .route("/users/:id/workout-stats", get(Self::handle_workout_stats))
            .route("/users/:id/progress-summary", get(Self::handle_progress_summary))
            .with_state(db)
    }

    async fn handle_list(State(db): State<Database>) -> Result<Response, ApiError> {
        let users = run_blocking(&db, "Failed to fetch users", users::list_users).await?;
        Ok((StatusCode::OK, Json(users)).into_response())
    }

    async fn handle_create(
        State(db): State<Database>,
        body: Result<Json<UserCreate>, JsonRejection>,
    ) -> Result<Response, ApiError> {
        let Json(data) = body?;
        let user = run_blocking(&db, "Failed to create user", move |db| {
            users::create_user(db, &data)
        })
        .await?;
        Ok((StatusCode::CREATED, Json(user)).into_response())
    }

    async fn handle_metrics(
        State(db): State<Database>,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, ApiError> {
        let Path(user_id) = path?;
        let metrics = run_blocking(&db, "Failed to calculate metrics", move |db| {
            users::get_user_metrics(db, user_id)
        })
        .await?;
        Ok((StatusCode::OK, Json(metrics)).into_response())
    }

    async fn handle_nutrition(
        State(db): State<Database>,
        path: Result<Path<i64>, PathRejection>,
        query: Result<Query<NutritionQuery>, QueryRejection>,
    ) -> Result<Response, ApiError> {
        let Path(user_id) = path?;
        let Query(params) = query?;
        let date = parse_timestamp("date", params.date.as_deref())?.map(|d| d.date_naive());

        let summary = run_blocking(&db, "Failed to summarize nutrition", move |db| {
            meals::nutrition_summary(db, user_id, date, params.goal)
        })
        .await?;
        Ok((StatusCode::OK, Json(summary)).into_response())
    }

    async fn handle_workout_stats(
        State(db): State<Database>,
        path: Result<Path<i64>, PathRejection>,
        query: Result<Query<StatsQuery>, QueryRejection>,
    ) -> Result<Response, ApiError> {
        let Path(user_id) = path?;
        let Query(params) = query?;
        let from = parse_timestamp("from", params.from.as_deref())?;
        let to = parse_timestamp("to", params.to.as_deref())?;

        let stats = run_blocking(&db, "Failed to fetch workout stats", move |db| {
            workouts::workout_stats(db, user_id, from, to)
        })
        .await?;
        Ok((StatusCode::OK, Json(stats)).into_response())
    }

    async fn handle_progress_summary(
        State(db): State<Database>,
        path: Result<Path<i64>, PathRejection>,
    ) -> Result<Response, ApiError> {
        let Path(user_id) = path?;
        let summary = run_blocking(&db, "Failed to summarize progress", move |db| {
            progress::progress_summary(db, user_id)
        })
        .await?;
        Ok((StatusCode::OK, Json(summary)).into_response())
    }
}
