//! FitTrack tools
//!
//! Service operations shared by the HTTP routes and the MCP server. Each
//! function takes the pool, validates its input, talks to the models and
//! runs the calculators.

pub mod exercises;
pub mod meals;
pub mod progress;
pub mod users;
pub mod workouts;

use rusqlite::Connection;

use crate::error::{AppError, AppResult};
use crate::models::User;

/// Load a user addressed by path/argument, or NotFound
fn require_user(conn: &Connection, user_id: i64) -> AppResult<User> {
    User::get_by_id(conn, user_id)?.ok_or_else(|| AppError::not_found("User", user_id))
}

/// Load a user referenced from a request body, or InvalidInput
fn referenced_user(conn: &Connection, user_id: i64) -> AppResult<User> {
    User::get_by_id(conn, user_id)?
        .ok_or_else(|| AppError::InvalidInput(format!("userId {} does not exist", user_id)))
}

fn validated(result: Result<(), String>) -> AppResult<()> {
    result.map_err(AppError::InvalidInput)
}
