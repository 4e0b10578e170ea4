//! HTTP transport
//!
//! JSON routes over the tools layer. Each entity gets a routes struct that
//! builds its own `Router`; [`router`] merges them and adds request tracing.

pub mod error;
mod exercises;
mod health;
mod meals;
mod progress;
mod users;
mod workouts;

use axum::Router;
use chrono::{DateTime, Utc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::db::Database;
use crate::error::AppResult;
use crate::models::timestamps;

pub use error::ApiError;

/// Build the application router
pub fn router(db: Database) -> Router {
    Router::new()
        .merge(health::HealthRoutes::routes())
        .merge(users::UserRoutes::routes(db.clone()))
        .merge(meals::MealRoutes::routes(db.clone()))
        .merge(exercises::ExerciseRoutes::routes(db.clone()))
        .merge(workouts::WorkoutRoutes::routes(db.clone()))
        .merge(progress::ProgressRoutes::routes(db))
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until the process is stopped
pub async fn serve(config: &ServerConfig, db: Database) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.http_addr).await?;
    tracing::info!(addr = %config.http_addr, "HTTP server listening");
    axum::serve(listener, router(db)).await
}

/// Run a blocking tools call off the async runtime
async fn run_blocking<T, F>(db: &Database, context: &'static str, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    let db = db.clone();
    tokio::task::spawn_blocking(move || f(&db))
        .await
        .map_err(|e| ApiError::Internal {
            context,
            cause: e.to_string(),
        })?
        .map_err(|e| ApiError::new(context, e))
}

/// Parse an optional date/timestamp query value
fn parse_timestamp(field: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => timestamps::parse(raw)
            .map(Some)
            .ok_or_else(|| ApiError::bad_request(format!("Invalid {}: {}", field, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("date", None).unwrap(), None);
        assert_eq!(parse_timestamp("date", Some("")).unwrap(), None);
        assert_eq!(
            parse_timestamp("date", Some("2025-03-01")).unwrap(),
            timestamps::parse("2025-03-01T00:00:00Z")
        );
        assert!(parse_timestamp("date", Some("yesterday")).is_err());
    }
}
