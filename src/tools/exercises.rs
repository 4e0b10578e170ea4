//! Exercise catalog tools

use crate::db::Database;
use crate::error::AppResult;
use crate::models::{Exercise, ExerciseCreate};

/// Add a catalog exercise
pub fn add_exercise(db: &Database, data: &ExerciseCreate) -> AppResult<Exercise> {
    super::validated(data.validate())?;
    let conn = db.get_conn()?;
    let exercise = Exercise::create(&conn, data)?;
    tracing::info!(exercise_id = exercise.id, name = %exercise.name, "Added exercise");
    Ok(exercise)
}

/// List the catalog by name
pub fn list_exercises(db: &Database) -> AppResult<Vec<Exercise>> {
    let conn = db.get_conn()?;
    Ok(Exercise::list(&conn)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::test_support::exercise;

    #[test]
    fn test_add_and_list() {
        let db = Database::in_memory().unwrap();
        add_exercise(&db, &exercise("Squats", "Strength")).unwrap();
        add_exercise(&db, &exercise("bench press", "strength")).unwrap();

        let names: Vec<String> = list_exercises(&db).unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["bench press", "Squats"]);
    }

    #[test]
    fn test_add_requires_category() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(
            add_exercise(&db, &exercise("Running", " ")),
            Err(AppError::InvalidInput(_))
        ));
    }
}
