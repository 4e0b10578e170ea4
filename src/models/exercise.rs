//! Exercise catalog model
//!
//! Catalog entries are shared by every user; workouts reference them through
//! `workout_exercises`.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Deserializer, Serialize};

use crate::db::DbResult;

/// A catalog exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: String,
    pub instructions: String,
    pub muscle_groups: Vec<String>,
    pub created_at: String,
}

/// Data for adding a catalog exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseCreate {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    /// Accepts `["chest","triceps"]` or `"chest,triceps"`
    #[serde(default, deserialize_with = "deserialize_muscle_groups")]
    pub muscle_groups: Vec<String>,
}

impl ExerciseCreate {
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();
        super::require_non_empty("name", &self.name, &mut problems);
        super::require_non_empty("category", &self.category, &mut problems);
        super::into_validation_result(problems)
    }
}

/// Normalize muscle names: trimmed, lowercased, deduplicated, original order kept
pub fn normalize_muscle_groups<I, S>(groups: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for group in groups {
        let name = group.as_ref().trim().to_lowercase();
        if !name.is_empty() && !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

fn deserialize_muscle_groups<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Groups {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Option::<Groups>::deserialize(deserializer)? {
        Some(Groups::List(list)) => normalize_muscle_groups(list),
        Some(Groups::Joined(joined)) => normalize_muscle_groups(joined.split(',')),
        None => Vec::new(),
    })
}

impl Exercise {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let groups: String = row.get("muscle_groups")?;

        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            category: row.get("category")?,
            description: row.get("description")?,
            instructions: row.get("instructions")?,
            muscle_groups: normalize_muscle_groups(groups.split(',')),
            created_at: row.get("created_at")?,
        })
    }

    /// Add a catalog exercise
    pub fn create(conn: &Connection, data: &ExerciseCreate) -> DbResult<Self> {
        let groups = normalize_muscle_groups(&data.muscle_groups).join(",");

        conn.execute(
            r#"
            INSERT INTO exercises (name, category, description, instructions, muscle_groups)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.name.trim(),
                data.category.trim().to_lowercase(),
                data.description,
                data.instructions,
                groups,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get an exercise by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM exercises WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(exercise) => Ok(Some(exercise)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List the catalog ordered by name
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM exercises ORDER BY name COLLATE NOCASE, id")?;
        let exercises = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(exercises)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{conn, exercise};

    #[test]
    fn test_list_is_ordered_by_name() {
        let conn = conn();
        Exercise::create(&conn, &exercise("Squats", "strength")).unwrap();
        Exercise::create(&conn, &exercise("bench press", "Strength")).unwrap();
        Exercise::create(&conn, &exercise("Running", "cardio")).unwrap();

        let names: Vec<String> = Exercise::list(&conn).unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["bench press", "Running", "Squats"]);
    }

    #[test]
    fn test_muscle_groups_stored_as_set() {
        let conn = conn();
        let mut data = exercise("Pull-ups", "strength");
        data.muscle_groups = vec!["Back".into(), "biceps".into(), "back".into(), " ".into()];

        let created = Exercise::create(&conn, &data).unwrap();
        assert_eq!(created.muscle_groups, vec!["back", "biceps"]);
        assert_eq!(created.category, "strength");
    }

    #[test]
    fn test_muscle_groups_accepts_comma_string() {
        let body = r#"{"name":"Bench Press","category":"strength","muscleGroups":"chest,shoulders, triceps"}"#;
        let data: ExerciseCreate = serde_json::from_str(body).unwrap();
        assert_eq!(data.muscle_groups, vec!["chest", "shoulders", "triceps"]);

        let body = r#"{"name":"Plank","category":"core"}"#;
        let data: ExerciseCreate = serde_json::from_str(body).unwrap();
        assert!(data.muscle_groups.is_empty());
    }
}
