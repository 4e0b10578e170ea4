//! User tools
//!
//! Creating users, listing them with everything they own, and body metrics.

use serde::Serialize;

use crate::db::{Database, DbError};
use crate::error::{AppError, AppResult};
use crate::metrics::UserMetrics;
use crate::models::{
    Meal, MealFilter, Progress, User, UserCreate, Workout, WorkoutFilter,
};

/// A user with their meals, workouts and progress entries
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub meals: Vec<Meal>,
    pub workouts: Vec<Workout>,
    pub progress: Vec<Progress>,
}

/// Create a user
pub fn create_user(db: &Database, data: &UserCreate) -> AppResult<User> {
    super::validated(data.validate())?;
    let conn = db.get_conn()?;

    if User::get_by_email(&conn, &data.email)?.is_some() {
        return Err(duplicate_email(&data.email));
    }

    // a concurrent insert can still win the race to the UNIQUE index
    let user = User::create(&conn, data).map_err(|e| email_conflict(e, &data.email))?;
    tracing::info!(user_id = user.id, "Created user");
    Ok(user)
}

fn duplicate_email(email: &str) -> AppError {
    AppError::Conflict(format!("A user with email {} already exists", email.trim()))
}

fn email_conflict(err: DbError, email: &str) -> AppError {
    let unique_email = matches!(
        &err,
        DbError::Sqlite(rusqlite::Error::SqliteFailure(e, Some(msg)))
            if e.code == rusqlite::ErrorCode::ConstraintViolation && msg.contains("users.email")
    );
    if unique_email {
        duplicate_email(email)
    } else {
        err.into()
    }
}

/// Get a single user
pub fn get_user(db: &Database, user_id: i64) -> AppResult<User> {
    let conn = db.get_conn()?;
    super::require_user(&conn, user_id)
}

/// List every user with their records
pub fn list_users(db: &Database) -> AppResult<Vec<UserDetail>> {
    let conn = db.get_conn()?;

    User::list(&conn)?
        .into_iter()
        .map(|user| {
            let meals = Meal::list(
                &conn,
                &MealFilter {
                    user_id: Some(user.id),
                    date: None,
                },
            )?;
            let workouts = Workout::list(
                &conn,
                &WorkoutFilter {
                    user_id: Some(user.id),
                    ..Default::default()
                },
            )?;
            let progress = Progress::list(&conn, Some(user.id))?;

            Ok(UserDetail {
                user,
                meals,
                workouts,
                progress,
            })
        })
        .collect()
}

/// BMI, BMR, calorie target and distance to goal for a user
pub fn get_user_metrics(db: &Database, user_id: i64) -> AppResult<UserMetrics> {
    let user = get_user(db, user_id)?;
    Ok(UserMetrics::for_user(&user)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{BmiCategory, WeightDirection};
    use crate::test_support::john;

    #[test]
    fn test_create_user_validates_and_rejects_duplicates() {
        let db = Database::in_memory().unwrap();

        let mut bad = john();
        bad.weight = -1.0;
        assert!(matches!(create_user(&db, &bad), Err(AppError::InvalidInput(_))));

        create_user(&db, &john()).unwrap();
        assert!(matches!(create_user(&db, &john()), Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_unique_email_violation_is_conflict() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();
        User::create(&conn, &john()).unwrap();

        let err = User::create(&conn, &john()).unwrap_err();
        assert!(matches!(email_conflict(err, "john.doe@example.com"), AppError::Conflict(_)));

        let other = DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(email_conflict(other, "x@example.com"), AppError::Persistence(_)));
    }

    #[test]
    fn test_user_metrics_for_demo_user() {
        let db = Database::in_memory().unwrap();
        let user = create_user(&db, &john()).unwrap();

        let metrics = get_user_metrics(&db, user.id).unwrap();
        assert_eq!(metrics.bmr, 1745.0);
        assert_eq!(metrics.daily_calorie_target, 2705);
        assert_eq!(metrics.bmi_category, BmiCategory::Normal);
        assert_eq!(metrics.weight_to_goal.amount_kg, 5.5);
        assert_eq!(metrics.weight_to_goal.direction, WeightDirection::Lose);
    }

    #[test]
    fn test_metrics_for_missing_user() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(get_user_metrics(&db, 12), Err(AppError::NotFound { id: 12, .. })));
    }

    #[test]
    fn test_list_users_embeds_records() {
        let db = Database::in_memory().unwrap();
        create_user(&db, &john()).unwrap();

        let users = list_users(&db).unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].meals.is_empty());

        let json = serde_json::to_value(&users[0]).unwrap();
        assert_eq!(json["email"], "john.doe@example.com");
        assert!(json["workouts"].as_array().unwrap().is_empty());
    }
}
