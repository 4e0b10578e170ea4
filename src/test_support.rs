//! Fixtures shared by unit tests

use chrono::{Duration, Utc};
use rusqlite::Connection;

use crate::db::migrations::run_migrations;
use crate::models::{
    timestamps, ActivityLevel, Exercise, ExerciseCreate, Meal, MealCreate, MealType, Measurements,
    Progress, UserCreate, Workout, WorkoutCreate, WorkoutExercise, WorkoutStatus,
};

/// Migrated in-memory connection with foreign keys enforced
pub fn conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    run_migrations(&conn).unwrap();
    conn
}

/// The demo user: 28 years, 75.5 kg, 180 cm, goal 70 kg, moderate activity
pub fn john() -> UserCreate {
    UserCreate {
        email: "john.doe@example.com".to_string(),
        name: "John Doe".to_string(),
        age: 28,
        weight: 75.5,
        height: 180.0,
        goal_weight: 70.0,
        activity_level: Some(ActivityLevel::Moderate),
    }
}

pub fn meal(user_id: i64, name: &str, calories: u32, meal_type: MealType, date: &str) -> MealCreate {
    MealCreate {
        user_id,
        name: name.to_string(),
        calories,
        protein: 10.0,
        carbs: 20.0,
        fat: 5.0,
        meal_type,
        date: timestamps::parse(date),
    }
}

pub fn exercise(name: &str, category: &str) -> ExerciseCreate {
    ExerciseCreate {
        name: name.to_string(),
        category: category.to_string(),
        description: String::new(),
        instructions: String::new(),
        muscle_groups: Vec::new(),
    }
}

pub fn workout(user_id: i64, name: &str, date: &str) -> WorkoutCreate {
    WorkoutCreate {
        user_id,
        name: name.to_string(),
        description: String::new(),
        duration: 45,
        calories: 320,
        date: timestamps::parse(date),
        completed: false,
    }
}

/// In-memory meal record, no database involved
pub fn meal_record(calories: u32, protein: f64, carbs: f64, fat: f64, meal_type: MealType) -> Meal {
    Meal {
        id: 0,
        user_id: 1,
        name: "meal".to_string(),
        calories,
        protein,
        carbs,
        fat,
        meal_type,
        date: Utc::now(),
        created_at: String::new(),
    }
}

/// In-memory workout whose exercises carry the given completion flags
pub fn workout_record(flags: &[bool], status: WorkoutStatus) -> Workout {
    let exercises = flags
        .iter()
        .enumerate()
        .map(|(i, &completed)| {
            let id = i as i64 + 1;
            WorkoutExercise {
                id,
                workout_id: 1,
                exercise_id: id,
                sets: 3,
                reps: 10,
                weight: None,
                completed,
                exercise: Exercise {
                    id,
                    name: format!("exercise {}", id),
                    category: "strength".to_string(),
                    description: String::new(),
                    instructions: String::new(),
                    muscle_groups: Vec::new(),
                    created_at: String::new(),
                },
            }
        })
        .collect();

    Workout {
        id: 1,
        user_id: 1,
        name: "workout".to_string(),
        description: String::new(),
        duration: 45,
        calories: 320,
        date: Utc::now(),
        status,
        completed: status.is_completed(),
        exercises,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

/// In-memory progress entry dated `days_ago` days in the past
pub fn progress_record(weight: f64, body_fat: f64, days_ago: i64) -> Progress {
    Progress {
        id: days_ago,
        user_id: 1,
        weight,
        body_fat,
        measurements: Measurements { chest: 102.0, waist: 82.0, arms: 35.0, thighs: 60.0 },
        date: Utc::now() - Duration::days(days_ago),
        created_at: String::new(),
    }
}
