//! Progress tools

use crate::db::Database;
use crate::error::AppResult;
use crate::metrics::{progress, ProgressSummary};
use crate::models::{Progress, ProgressCreate};

/// Record a progress entry for an existing user
pub fn add_progress(db: &Database, data: &ProgressCreate) -> AppResult<Progress> {
    super::validated(data.validate())?;
    let conn = db.get_conn()?;
    super::referenced_user(&conn, data.user_id)?;

    let entry = Progress::create(&conn, data)?;
    tracing::debug!(progress_id = entry.id, user_id = entry.user_id, "Recorded progress");
    Ok(entry)
}

/// List progress entries, oldest first
pub fn list_progress(db: &Database, user_id: Option<i64>) -> AppResult<Vec<Progress>> {
    let conn = db.get_conn()?;
    if let Some(id) = user_id {
        super::require_user(&conn, id)?;
    }
    Ok(Progress::list(&conn, user_id)?)
}

/// Changes between a user's two latest entries
pub fn progress_summary(db: &Database, user_id: i64) -> AppResult<ProgressSummary> {
    let entries = list_progress(db, Some(user_id))?;
    Ok(progress::summarize(&entries))
}
