//! Meal tools
//!
//! Logging meals, listing them with their owner, and the daily nutrition
//! summary.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::db::Database;
use crate::error::AppResult;
use crate::metrics::{nutrition, MealTypeTotals, NutritionTotals};
use crate::models::{Meal, MealCreate, MealFilter, User};

/// A meal with its owning user embedded
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealWithUser {
    #[serde(flatten)]
    pub meal: Meal,
    pub user: User,
}

/// Totals for one user's day against a calorie goal
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSummary {
    pub user_id: i64,
    pub date: NaiveDate,
    pub meal_count: usize,
    #[serde(flatten)]
    pub totals: NutritionTotals,
    pub calorie_goal: f64,
    pub calorie_progress: f64,
    pub calorie_progress_percent: f64,
    /// Negative once the goal is exceeded
    pub calories_remaining: f64,
    pub by_meal_type: Vec<MealTypeTotals>,
}

/// Log a meal for an existing user
pub fn log_meal(db: &Database, data: &MealCreate) -> AppResult<MealWithUser> {
    super::validated(data.validate())?;
    let conn = db.get_conn()?;
    let user = super::referenced_user(&conn, data.user_id)?;

    let meal = Meal::create(&conn, data)?;
    tracing::debug!(meal_id = meal.id, user_id = user.id, "Logged meal");
    Ok(MealWithUser { meal, user })
}

/// List meals, optionally for one user and one day, newest first
pub fn list_meals(db: &Database, filter: &MealFilter) -> AppResult<Vec<MealWithUser>> {
    let conn = db.get_conn()?;
    let meals = Meal::list(&conn, filter)?;

    let mut users: HashMap<i64, User> = HashMap::new();
    let mut result = Vec::with_capacity(meals.len());
    for meal in meals {
        let user = match users.get(&meal.user_id) {
            Some(user) => user.clone(),
            None => {
                let user = super::require_user(&conn, meal.user_id)?;
                users.insert(user.id, user.clone());
                user
            }
        };
        result.push(MealWithUser { meal, user });
    }

    Ok(result)
}

/// Nutrition summary for a user's day; `date` defaults to today (UTC) and
/// `goal` to the default daily calorie goal
pub fn nutrition_summary(
    db: &Database,
    user_id: i64,
    date: Option<NaiveDate>,
    goal: Option<f64>,
) -> AppResult<NutritionSummary> {
    let date = date.unwrap_or_else(|| Utc::now().date_naive());
    let goal = goal.unwrap_or(nutrition::DEFAULT_DAILY_CALORIE_GOAL);

    let conn = db.get_conn()?;
    super::require_user(&conn, user_id)?;
    let meals = Meal::list_for_day(&conn, user_id, date)?;

    let totals = nutrition::aggregate(&meals);
    let ratio = nutrition::progress_ratio(totals.total_calories as f64, goal)?;

    Ok(NutritionSummary {
        user_id,
        date,
        meal_count: meals.len(),
        totals,
        calorie_goal: goal,
        calorie_progress: ratio,
        calorie_progress_percent: nutrition::progress_percent(ratio),
        calories_remaining: goal - totals.total_calories as f64,
        by_meal_type: nutrition::totals_by_meal_type(&meals),
    })
}
