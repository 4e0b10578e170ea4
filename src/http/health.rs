//! Health check route

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::build_info::BuildInfo;

pub struct HealthRoutes;

impl HealthRoutes {
    pub fn routes() -> Router {
        async fn health_handler() -> Json<Value> {
            Json(json!({
                "status": "healthy",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "build": BuildInfo::current(),
            }))
        }

        Router::new().route("/health", get(health_handler))
    }
}
