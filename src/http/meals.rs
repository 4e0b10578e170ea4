//! Meal routes

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{parse_timestamp, run_blocking, ApiError};
use crate::db::Database;
use crate::models::{MealCreate, MealFilter};
use crate::tools::meals;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MealsQuery {
    user_id: Option<i64>,
    /// `YYYY-MM-DD`; a full timestamp is truncated to its UTC day
    date: Option<String>,
}

pub struct MealRoutes;

impl MealRoutes {
    pub fn routes(db: Database) -> Router {
        Router::new()
            .route("/meals", get(Self::handle_list).post(Self::handle_create))
            .with_state(db)
    }

    async fn handle_list(
        State(db): State<Database>,
        query: Result<Query<MealsQuery>, QueryRejection>,
    ) -> Result<Response, ApiError> {
        let Query(params) = query?;
        let filter = MealFilter {
            user_id: params.user_id,
            date: parse_timestamp("date", params.date.as_deref())?.map(|d| d.date_naive()),
        };

        let meals = run_blocking(&db, "Failed to fetch meals", move |db| {
            meals::list_meals(db, &filter)
        })
        .await?;
        Ok((StatusCode::OK, Json(meals)).into_response())
    }

    async fn handle_create(
        State(db): State<Database>,
        body: Result<Json<MealCreate>, JsonRejection>,
    ) -> Result<Response, ApiError> {
        let Json(data) = body?;
        let meal = run_blocking(&db, "Failed to create meal", move |db| meals::log_meal(db, &data)).await?;
        Ok((StatusCode::CREATED, Json(meal)).into_response())
    }
}
