//! User model
//!
//! The body snapshot (age, weight, height, goal, activity) that the metric
//! calculator works from.

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Self-reported activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "light" => Some(ActivityLevel::Light),
            "moderate" => Some(ActivityLevel::Moderate),
            "active" => Some(ActivityLevel::Active),
            "very_active" => Some(ActivityLevel::VeryActive),
            _ => None,
        }
    }
}

/// A tracked user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub age: u32,
    /// kg
    pub weight: f64,
    /// cm
    pub height: f64,
    /// kg
    pub goal_weight: f64,
    pub activity_level: Option<ActivityLevel>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub email: String,
    pub name: String,
    pub age: u32,
    pub weight: f64,
    pub height: f64,
    pub goal_weight: f64,
    #[serde(default)]
    pub activity_level: Option<ActivityLevel>,
}

impl UserCreate {
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();
        super::require_non_empty("name", &self.name, &mut problems);
        super::require_non_empty("email", &self.email, &mut problems);
        if !self.email.trim().is_empty() && !self.email.contains('@') {
            problems.push("email must contain '@'".to_string());
        }
        super::require_positive("weight", self.weight, &mut problems);
        super::require_positive("height", self.height, &mut problems);
        super::require_positive("goalWeight", self.goal_weight, &mut problems);
        super::into_validation_result(problems)
    }
}

impl User {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let level: Option<String> = row.get("activity_level")?;
        let activity_level = match level.as_deref() {
            None => None,
            Some(raw) => Some(ActivityLevel::from_str(raw).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    Type::Text,
                    format!("unknown activity level: {}", raw).into(),
                )
            })?),
        };

        Ok(Self {
            id: row.get("id")?,
            email: row.get("email")?,
            name: row.get("name")?,
            age: row.get("age")?,
            weight: row.get("weight")?,
            height: row.get("height")?,
            goal_weight: row.get("goal_weight")?,
            activity_level,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new user
    pub fn create(conn: &Connection, data: &UserCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO users (email, name, age, weight, height, goal_weight, activity_level)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.email.trim(),
                data.name.trim(),
                data.age,
                data.weight,
                data.height,
                data.goal_weight,
                data.activity_level.map(|l| l.as_str()),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a user by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by email
    pub fn get_by_email(conn: &Connection, email: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE email = ?1")?;

        let result = stmt.query_row([email.trim()], Self::from_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all users in creation order
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::test_support::john;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_create_and_get_user() {
        let conn = conn();
        let user = User::create(&conn, &john()).unwrap();
        assert_eq!(user.name, "John Doe");
        assert_eq!(user.activity_level, Some(ActivityLevel::Moderate));

        let fetched = User::get_by_email(&conn, "john.doe@example.com").unwrap().unwrap();
        assert_eq!(fetched, user);
        assert!(User::get_by_id(&conn, user.id + 1).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let conn = conn();
        User::create(&conn, &john()).unwrap();
        assert!(User::create(&conn, &john()).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(john().validate().is_ok());

        let mut bad = john();
        bad.height = 0.0;
        bad.name = "  ".to_string();
        let err = bad.validate().unwrap_err();
        assert!(err.contains("height"));
        assert!(err.contains("name"));
    }

    #[test]
    fn test_activity_level_strings() {
        for level in ActivityLevel::ALL {
            assert_eq!(ActivityLevel::from_str(level.as_str()), Some(level));
        }
        assert_eq!(ActivityLevel::from_str("couch"), None);
    }

    #[test]
    fn test_user_json_round_trip() {
        let conn = conn();
        let user = User::create(&conn, &john()).unwrap();

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["goalWeight"], 70.0);
        assert_eq!(json["activityLevel"], "moderate");

        let parsed: User = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, user);
    }
}
