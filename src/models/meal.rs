//! Meal model
//!
//! A logged meal with its calories and macronutrients.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::timestamps;

/// Meal type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" => Some(MealType::Snack),
            _ => None,
        }
    }
}

/// A logged meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub calories: u32,
    pub protein: f64, // grams
    pub carbs: f64,   // grams
    pub fat: f64,     // grams
    pub meal_type: MealType,
    pub date: DateTime<Utc>,
    pub created_at: String,
}

/// Data for logging a meal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealCreate {
    pub user_id: i64,
    pub name: String,
    pub calories: u32,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    pub meal_type: MealType,
    /// Defaults to now
    #[serde(default, deserialize_with = "timestamps::deserialize_optional")]
    pub date: Option<DateTime<Utc>>,
}

impl MealCreate {
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();
        super::require_non_empty("name", &self.name, &mut problems);
        super::require_non_negative("protein", self.protein, &mut problems);
        super::require_non_negative("carbs", self.carbs, &mut problems);
        super::require_non_negative("fat", self.fat, &mut problems);
        super::into_validation_result(problems)
    }
}

/// Filters for listing meals
#[derive(Debug, Clone, Default)]
pub struct MealFilter {
    pub user_id: Option<i64>,
    /// Matches meals dated within `[date, date + 1 day)`
    pub date: Option<NaiveDate>,
}

impl Meal {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type_str: String = row.get("meal_type")?;
        let meal_type = MealType::from_str(&meal_type_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                Type::Text,
                format!("unknown meal type: {}", meal_type_str).into(),
            )
        })?;

        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            carbs: row.get("carbs")?,
            fat: row.get("fat")?,
            meal_type,
            date: timestamps::column(row, "date")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Log a new meal
    pub fn create(conn: &Connection, data: &MealCreate) -> DbResult<Self> {
        let date = data.date.unwrap_or_else(Utc::now);

        conn.execute(
            r#"
            INSERT INTO meals (user_id, name, calories, protein, carbs, fat, meal_type, date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                data.user_id,
                data.name.trim(),
                data.calories,
                data.protein,
                data.carbs,
                data.fat,
                data.meal_type.as_str(),
                timestamps::to_storage(&date),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a meal by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(meal) => Ok(Some(meal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List meals, newest first
    pub fn list(conn: &Connection, filter: &MealFilter) -> DbResult<Vec<Self>> {
        let mut sql = String::from("SELECT * FROM meals WHERE 1=1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(user_id) = filter.user_id {
            sql.push_str(&format!(" AND user_id = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(user_id));
        }
        if let Some(date) = filter.date {
            let start = timestamps::start_of_day(date);
            let end = start + Duration::days(1);
            sql.push_str(&format!(
                " AND date >= ?{} AND date < ?{}",
                params_vec.len() + 1,
                params_vec.len() + 2
            ));
            params_vec.push(Box::new(timestamps::to_storage(&start)));
            params_vec.push(Box::new(timestamps::to_storage(&end)));
        }

        sql.push_str(" ORDER BY date DESC, id DESC");

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let meals = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(meals)
    }

    /// List one user's meals on a calendar day (UTC)
    pub fn list_for_day(conn: &Connection, user_id: i64, date: NaiveDate) -> DbResult<Vec<Self>> {
        Self::list(
            conn,
            &MealFilter {
                user_id: Some(user_id),
                date: Some(date),
            },
        )
    }
}
