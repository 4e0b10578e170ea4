//! Progress model
//!
//! Body weight, body fat and tape measurements over time.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::timestamps;

/// Tape measurements in centimetres; missing parts read as 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurements {
    pub chest: f64,
    pub waist: f64,
    pub arms: f64,
    pub thighs: f64,
}

impl Measurements {
    /// (body part, value) pairs in display order
    pub fn parts(&self) -> [(&'static str, f64); 4] {
        [
            ("chest", self.chest),
            ("waist", self.waist),
            ("arms", self.arms),
            ("thighs", self.thighs),
        ]
    }
}

/// A progress entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub id: i64,
    pub user_id: i64,
    pub weight: f64,
    /// percent
    pub body_fat: f64,
    pub measurements: Measurements,
    pub date: DateTime<Utc>,
    pub created_at: String,
}

/// Data for recording progress
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressCreate {
    pub user_id: i64,
    pub weight: f64,
    pub body_fat: f64,
    #[serde(default)]
    pub measurements: Measurements,
    #[serde(default, deserialize_with = "timestamps::deserialize_optional")]
    pub date: Option<DateTime<Utc>>,
}

impl ProgressCreate {
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();
        super::require_positive("weight", self.weight, &mut problems);
        super::require_non_negative("bodyFat", self.body_fat, &mut problems);
        if self.body_fat > 100.0 {
            problems.push("bodyFat must be at most 100".to_string());
        }
        for (part, value) in self.measurements.parts() {
            super::require_non_negative(part, value, &mut problems);
        }
        super::into_validation_result(problems)
    }
}

impl Progress {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let raw: String = row.get("measurements")?;
        let measurements = serde_json::from_str(&raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            weight: row.get("weight")?,
            body_fat: row.get("body_fat")?,
            measurements,
            date: timestamps::column(row, "date")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Record a progress entry
    pub fn create(conn: &Connection, data: &ProgressCreate) -> DbResult<Self> {
        let date = data.date.unwrap_or_else(Utc::now);
        let measurements = serde_json::to_string(&data.measurements)
            .map_err(|e| crate::db::DbError::Decode(e.to_string()))?;

        conn.execute(
            r#"
            INSERT INTO progress (user_id, weight, body_fat, measurements, date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.user_id,
                data.weight,
                data.body_fat,
                measurements,
                timestamps::to_storage(&date),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a progress entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM progress WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List progress entries oldest first, optionally for one user
    pub fn list(conn: &Connection, user_id: Option<i64>) -> DbResult<Vec<Self>> {
        let entries = match user_id {
            Some(user_id) => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM progress WHERE user_id = ?1 ORDER BY date, id",
                )?;
                let rows = stmt.query_map([user_id], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare("SELECT * FROM progress ORDER BY date, id")?;
                let rows = stmt.query_map([], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(entries)
    }
}
