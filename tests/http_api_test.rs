//! HTTP API tests against an in-memory database

mod helpers;

use axum::{http::StatusCode, Router};
use serde_json::{json, Value};

use fittrack::db::Database;
use fittrack::http::router;
use helpers::axum_test::TestRequest;

fn app() -> Router {
    router(Database::in_memory().expect("in-memory database"))
}

fn john() -> Value {
    json!({
        "email": "john.doe@example.com",
        "name": "John Doe",
        "age": 28,
        "weight": 75.5,
        "height": 180,
        "goalWeight": 70,
        "activityLevel": "moderate"
    })
}

async fn create_user(app: &Router) -> i64 {
    let response = TestRequest::post("/users")
        .json(&john())
        .send(app.clone())
        .await
        .assert_status(StatusCode::CREATED);
    response.json()["id"].as_i64().expect("user id")
}

#[tokio::test]
async fn test_health() {
    let response = TestRequest::get("/health").send(app()).await.assert_status(StatusCode::OK);
    assert_eq!(response.json()["status"], "healthy");
    assert_eq!(response.json()["build"]["name"], "fittrack");
}

#[tokio::test]
async fn test_create_user_and_list() {
    let app = app();
    let id = create_user(&app).await;

    let users = TestRequest::get("/users").send(app.clone()).await.assert_status(StatusCode::OK).json();
    assert_eq!(users[0]["id"], id);
    assert_eq!(users[0]["activityLevel"], "moderate");
    assert_eq!(users[0]["meals"], json!([]));

    // duplicate email
    TestRequest::post("/users")
        .json(&john())
        .send(app)
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invalid_enum_is_bad_request() {
    let app = app();
    let mut body = john();
    body["activityLevel"] = json!("couch_potato");

    let response = TestRequest::post("/users").json(&body).send(app.clone()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.json()["error"].is_string());

    let user_id = create_user(&app).await;
    TestRequest::post("/meals")
        .json(&json!({ "userId": user_id, "name": "Brunch", "calories": 500, "mealType": "brunch" }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    TestRequest::post("/meals")
        .raw_json("{ not json")
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_meals_by_day_and_nutrition_summary() {
    let app = app();
    let user_id = create_user(&app).await;

    let meals = [
        ("Oatmeal with Berries", 320, 12, 45, 8, "breakfast", "2025-03-01T07:30:00Z"),
        ("Grilled Chicken Salad", 450, 35, 20, 15, "lunch", "2025-03-01T12:30:00Z"),
        ("Protein Shake", 180, 25, 10, 3, "snack", "2025-03-01T16:00:00Z"),
        ("Pasta", 700, 20, 90, 18, "dinner", "2025-03-02T19:00:00Z"),
    ];
    for (name, calories, protein, carbs, fat, meal_type, date) in meals {
        TestRequest::post("/meals")
            .json(&json!({
                "userId": user_id,
                "name": name,
                "calories": calories,
                "protein": protein,
                "carbs": carbs,
                "fat": fat,
                "mealType": meal_type,
                "date": date
            }))
            .send(app.clone())
            .await
            .assert_status(StatusCode::CREATED);
    }

    let day = TestRequest::get(&format!("/meals?userId={}&date=2025-03-01", user_id))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    let day = day.as_array().expect("meal list");
    assert_eq!(day.len(), 3);
    assert_eq!(day[0]["name"], "Protein Shake");
    assert_eq!(day[0]["user"]["email"], "john.doe@example.com");

    let summary = TestRequest::get(&format!("/users/{}/nutrition?date=2025-03-01", user_id))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(summary["totalCalories"], 950);
    assert_eq!(summary["totalProtein"], 72.0);
    assert_eq!(summary["calorieProgressPercent"], 47.5);

    TestRequest::get(&format!("/users/{}/nutrition?goal=0", user_id))
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_toggling_every_exercise_completes_workout() {
    let app = app();
    let user_id = create_user(&app).await;

    let bench = TestRequest::post("/exercises")
        .json(&json!({ "name": "Bench Press", "category": "strength", "muscleGroups": "chest,shoulders,triceps" }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(bench["muscleGroups"], json!(["chest", "shoulders", "triceps"]));

    let workout = TestRequest::post("/workouts")
        .json(&json!({ "userId": user_id, "name": "Upper Body Strength", "duration": 45, "calories": 320 }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(workout["completed"], false);
    let workout_id = workout["id"].as_i64().expect("workout id");

    let with_exercise = TestRequest::post(&format!("/workouts/{}/exercises", workout_id))
        .json(&json!({ "exerciseId": bench["id"], "sets": 4, "reps": 10, "weight": 60 }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    let we_id = with_exercise["exercises"][0]["id"].as_i64().expect("workout exercise id");
    assert_eq!(with_exercise["exercises"][0]["exercise"]["name"], "Bench Press");

    let toggled = TestRequest::post(&format!("/workouts/{}/exercises/{}/toggle", workout_id, we_id))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(toggled["completed"], true);
    assert_eq!(toggled["status"], "completed");
    assert_eq!(toggled["completionRatio"], 1.0);

    let done = TestRequest::get(&format!("/workouts?userId={}&completed=true", user_id))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(done.as_array().map(Vec::len), Some(1));
    assert_eq!(done[0]["user"]["id"], user_id);

    TestRequest::post(&format!("/workouts/{}/start", workout_id))
        .send(app.clone())
        .await
        .assert_status(StatusCode::CONFLICT);

    TestRequest::post(&format!("/workouts/{}/exercises/999/toggle", workout_id))
        .send(app)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_metrics() {
    let app = app();
    let user_id = create_user(&app).await;

    let metrics = TestRequest::get(&format!("/users/{}/metrics", user_id))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(metrics["bmi"], 23.3);
    assert_eq!(metrics["bmr"], 1745.0);
    assert_eq!(metrics["dailyCalorieTarget"], 2705);
    assert_eq!(metrics["calorieGoal"], 3246);
    assert_eq!(metrics["weightToGoal"]["amountKg"], 5.5);

    TestRequest::get("/users/404/metrics")
        .send(app.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    TestRequest::get("/users/abc/metrics")
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_progress_summary() {
    let app = app();
    let user_id = create_user(&app).await;

    for (weight, body_fat, date) in [(76.0, 19.0, "2025-02-15"), (75.5, 18.5, "2025-03-01")] {
        TestRequest::post("/progress")
            .json(&json!({
                "userId": user_id,
                "weight": weight,
                "bodyFat": body_fat,
                "measurements": { "chest": 102, "waist": 82, "arms": 35, "thighs": 60 },
                "date": date
            }))
            .send(app.clone())
            .await
            .assert_status(StatusCode::CREATED);
    }

    let summary = TestRequest::get(&format!("/users/{}/progress-summary", user_id))
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(summary["entryCount"], 2);
    assert_eq!(summary["weightChange"]["direction"], "down");
    assert_eq!(summary["weightChange"]["value"], 0.5);
}
