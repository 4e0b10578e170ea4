//! Utility to load a demo user with meals, workouts and progress

use chrono::{Duration, Utc};

use fittrack::config;
use fittrack::db::{self, Database};
use fittrack::models::{
    ActivityLevel, ExerciseCreate, MealCreate, MealType, Measurements, ProgressCreate, User,
    UserCreate, WorkoutCreate, WorkoutExerciseCreate,
};
use fittrack::tools::{exercises, meals, progress, users, workouts};

const DEMO_EMAIL: &str = "john.doe@example.com";

fn exercise(name: &str, category: &str, description: &str, instructions: &str, groups: &[&str]) -> ExerciseCreate {
    ExerciseCreate {
        name: name.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        instructions: instructions.to_string(),
        muscle_groups: groups.iter().map(|g| g.to_string()).collect(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = config::database_path();
    println!("Database path: {}", db_path.display());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&db_path)?;
    database.with_conn(db::migrations::run_migrations)?;

    if database.with_conn(|conn| User::get_by_email(conn, DEMO_EMAIL))?.is_some() {
        println!("Demo data already present ({}), nothing to do", DEMO_EMAIL);
        return Ok(());
    }

    let user = users::create_user(
        &database,
        &UserCreate {
            email: DEMO_EMAIL.to_string(),
            name: "John Doe".to_string(),
            age: 28,
            weight: 75.5,
            height: 180.0,
            goal_weight: 70.0,
            activity_level: Some(ActivityLevel::Moderate),
        },
    )?;
    println!("User: {} (id {})", user.name, user.id);

    let catalog = [
        exercise("Bench Press", "strength", "Classic chest exercise",
            "Lie on bench, lower bar to chest, push up", &["chest", "shoulders", "triceps"]),
        exercise("Squats", "strength", "Fundamental lower body exercise",
            "Stand with feet shoulder-width apart, lower hips, stand back up", &["quadriceps", "hamstrings", "glutes"]),
        exercise("Running", "cardio", "Cardiovascular exercise",
            "Run at steady pace for designated time", &["legs", "core"]),
        exercise("Pull-ups", "strength", "Upper body pulling exercise",
            "Hang from bar, pull body up until chin over bar", &["back", "biceps", "forearms"]),
    ];
    let mut added = Vec::with_capacity(catalog.len());
    for data in &catalog {
        added.push(exercises::add_exercise(&database, data)?);
    }
    println!("Exercises: {}", added.len());

    let now = Utc::now();
    let todays_meals = [
        ("Oatmeal with Berries", 320, 12.0, 45.0, 8.0, MealType::Breakfast),
        ("Grilled Chicken Salad", 450, 35.0, 20.0, 15.0, MealType::Lunch),
        ("Protein Shake", 180, 25.0, 10.0, 3.0, MealType::Snack),
    ];
    for (name, calories, protein, carbs, fat, meal_type) in todays_meals {
        meals::log_meal(
            &database,
            &MealCreate {
                user_id: user.id,
                name: name.to_string(),
                calories,
                protein,
                carbs,
                fat,
                meal_type,
                date: Some(now),
            },
        )?;
    }
    println!("Meals: {}", todays_meals.len());

    let upper = workouts::create_workout(
        &database,
        &WorkoutCreate {
            user_id: user.id,
            name: "Upper Body Strength".to_string(),
            description: "Focus on chest, shoulders, and arms".to_string(),
            duration: 45,
            calories: 320,
            date: Some(now),
            completed: false,
        },
    )?;
    let lower = workouts::create_workout(
        &database,
        &WorkoutCreate {
            user_id: user.id,
            name: "Lower Body Power".to_string(),
            description: "Legs and glutes workout".to_string(),
            duration: 50,
            calories: 400,
            date: Some(now + Duration::days(1)),
            completed: false,
        },
    )?;

    workouts::add_workout_exercise(
        &database,
        upper.workout.id,
        &WorkoutExerciseCreate { exercise_id: added[0].id, sets: 4, reps: 10, weight: Some(60.0) },
    )?;
    workouts::add_workout_exercise(
        &database,
        lower.workout.id,
        &WorkoutExerciseCreate { exercise_id: added[1].id, sets: 4, reps: 12, weight: Some(80.0) },
    )?;
    println!("Workouts: {}, {}", upper.workout.name, lower.workout.name);

    progress::add_progress(
        &database,
        &ProgressCreate {
            user_id: user.id,
            weight: 75.5,
            body_fat: 18.5,
            measurements: Measurements { chest: 102.0, waist: 82.0, arms: 35.0, thighs: 60.0 },
            date: Some(now),
        },
    )?;
    println!("Progress: 1 entry");

    Ok(())
}
