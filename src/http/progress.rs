//! Progress routes

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

use super::{run_blocking, ApiError};
use crate::db::Database;
use crate::models::ProgressCreate;
use crate::tools::progress;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressQuery {
    user_id: Option<i64>,
}

pub struct ProgressRoutes;

impl ProgressRoutes {
    pub fn routes(db: Database) -> Router {
        Router::new()
            .route("/progress", get(Self::handle_list).post(Self::handle_create))
            .with_state(db)
    }

    async fn handle_list(
        State(db): State<Database>,
        query: Result<Query<ProgressQuery>, QueryRejection>,
    ) -> Result<Response, ApiError> {
        let Query(params) = query?;
        let entries = run_blocking(&db, "Failed to fetch progress", move |db| {
            progress::list_progress(db, params.user_id)
        })
        .await?;
        Ok((StatusCode::OK, Json(entries)).into_response())
    }

    async fn handle_create(
        State(db): State<Database>,
        body: Result<Json<ProgressCreate>, JsonRejection>,
    ) -> Result<Response, ApiError> {
        let Json(data) = body?;
        let entry = run_blocking(&db, "Failed to record progress", move |db| {
            progress::add_progress(db, &data)
        })
        .await?;
        Ok((StatusCode::CREATED, Json(entry)).into_response())
    }
}
