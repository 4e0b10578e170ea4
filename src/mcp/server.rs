//! FitTrack MCP Server Implementation
//!
//! Exposes the tools layer as MCP tools over stdio.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::AppError;
use crate::models::{
    timestamps, ActivityLevel, ExerciseCreate, MealCreate, MealFilter, MealType, Measurements,
    ProgressCreate, UserCreate, WorkoutCreate, WorkoutExerciseCreate, WorkoutFilter,
};
use crate::tools::{exercises, meals, progress, users, workouts};

/// FitTrack MCP Service
#[derive(Clone)]
pub struct FitTrackService {
    database: Database,
    tool_router: ToolRouter<FitTrackService>,
}

impl FitTrackService {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_mcp_error(err: AppError) -> McpError {
    match err {
        AppError::InvalidInput(_) | AppError::NotFound { .. } => {
            McpError::invalid_params(err.to_string(), None)
        }
        AppError::Conflict(_) => McpError::invalid_request(err.to_string(), None),
        AppError::Persistence(cause) => {
            tracing::error!(error = %cause, "MCP tool failed");
            McpError::internal_error("Internal error", None)
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<chrono::DateTime<chrono::Utc>>, McpError> {
    match value {
        None => Ok(None),
        Some(raw) => timestamps::parse(raw)
            .map(Some)
            .ok_or_else(|| McpError::invalid_params(format!("Invalid {}: {}", field, raw), None)),
    }
}

// ============================================================================
// User Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateUserParams {
    pub email: String,
    pub name: String,
    pub age: u32,
    /// kg
    pub weight: f64,
    /// cm
    pub height: f64,
    /// kg
    pub goal_weight: f64,
    /// sedentary, light, moderate, active or very_active
    pub activity_level: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserIdParams {
    pub user_id: i64,
}

// ============================================================================
// Meal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    pub user_id: i64,
    pub name: String,
    pub calories: u32,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    /// breakfast, lunch, dinner or snack
    pub meal_type: String,
    /// ISO date or timestamp; defaults to now
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMealsParams {
    pub user_id: Option<i64>,
    /// YYYY-MM-DD
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NutritionSummaryParams {
    pub user_id: i64,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
    /// Daily calorie goal, defaults to 2000
    pub goal: Option<f64>,
}

// ============================================================================
// Exercise & Workout Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddExerciseParams {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateWorkoutParams {
    pub user_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// minutes
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub calories: u32,
    pub date: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddWorkoutExerciseParams {
    pub workout_id: i64,
    pub exercise_id: i64,
    #[serde(default)]
    pub sets: u32,
    #[serde(default)]
    pub reps: u32,
    /// kg
    pub weight: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListWorkoutsParams {
    pub user_id: Option<i64>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WorkoutIdParams {
    pub workout_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ToggleWorkoutExerciseParams {
    pub workout_id: i64,
    pub workout_exercise_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WorkoutStatsParams {
    pub user_id: i64,
    /// Inclusive start; defaults to Monday of the current week
    pub from: Option<String>,
    /// Exclusive end; defaults to the following Monday
    pub to: Option<String>,
}

// ============================================================================
// Progress Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddProgressParams {
    pub user_id: i64,
    pub weight: f64,
    pub body_fat: f64,
    #[serde(default)]
    pub chest: f64,
    #[serde(default)]
    pub waist: f64,
    #[serde(default)]
    pub arms: f64,
    #[serde(default)]
    pub thighs: f64,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListProgressParams {
    pub user_id: Option<i64>,
}

#[tool_router]
impl FitTrackService {
    // --- Users ---

    #[tool(description = "Create a user profile with body measurements and an optional activity level")]
    fn create_user(&self, Parameters(p): Parameters<CreateUserParams>) -> Result<CallToolResult, McpError> {
        let activity_level = match p.activity_level.as_deref() {
            None => None,
            Some(s) => Some(ActivityLevel::from_str(s).ok_or_else(|| {
                McpError::invalid_params(format!("Unknown activity level: {}", s), None)
            })?),
        };
        let data = UserCreate {
            email: p.email,
            name: p.name,
            age: p.age,
            weight: p.weight,
            height: p.height,
            goal_weight: p.goal_weight,
            activity_level,
        };
        let user = users::create_user(&self.database, &data).map_err(to_mcp_error)?;
        json_result(&user)
    }

    #[tool(description = "List all users with their meals, workouts and progress entries")]
    fn list_users(&self) -> Result<CallToolResult, McpError> {
        let result = users::list_users(&self.database).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Get BMI, BMR, daily calorie target and distance to goal weight for a user")]
    fn get_user_metrics(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let metrics = users::get_user_metrics(&self.database, p.user_id).map_err(to_mcp_error)?;
        json_result(&metrics)
    }

    // --- Meals ---

    #[tool(description = "Log a meal with calories and macronutrients (grams)")]
    fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let meal_type = MealType::from_str(&p.meal_type).ok_or_else(|| {
            McpError::invalid_params(format!("Unknown meal type: {}", p.meal_type), None)
        })?;
        let data = MealCreate {
            user_id: p.user_id,
            name: p.name,
            calories: p.calories,
            protein: p.protein,
            carbs: p.carbs,
            fat: p.fat,
            meal_type,
            date: parse_date("date", p.date.as_deref())?,
        };
        let meal = meals::log_meal(&self.database, &data).map_err(to_mcp_error)?;
        json_result(&meal)
    }

    #[tool(description = "List meals, optionally for one user and one day, newest first")]
    fn list_meals(&self, Parameters(p): Parameters<ListMealsParams>) -> Result<CallToolResult, McpError> {
        let filter = MealFilter {
            user_id: p.user_id,
            date: parse_date("date", p.date.as_deref())?.map(|d| d.date_naive()),
        };
        let result = meals::list_meals(&self.database, &filter).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Get a user's calorie and macro totals for a day, by meal type and against a calorie goal")]
    fn get_nutrition_summary(&self, Parameters(p): Parameters<NutritionSummaryParams>) -> Result<CallToolResult, McpError> {
        let date = parse_date("date", p.date.as_deref())?.map(|d| d.date_naive());
        let summary = meals::nutrition_summary(&self.database, p.user_id, date, p.goal)
            .map_err(to_mcp_error)?;
        json_result(&summary)
    }

    // --- Exercises ---

    #[tool(description = "Add an exercise to the shared catalog")]
    fn add_exercise(&self, Parameters(p): Parameters<AddExerciseParams>) -> Result<CallToolResult, McpError> {
        let data = ExerciseCreate {
            name: p.name,
            category: p.category,
            description: p.description,
            instructions: p.instructions,
            muscle_groups: p.muscle_groups,
        };
        let exercise = exercises::add_exercise(&self.database, &data).map_err(to_mcp_error)?;
        json_result(&exercise)
    }

    #[tool(description = "List the exercise catalog by name")]
    fn list_exercises(&self) -> Result<CallToolResult, McpError> {
        let result = exercises::list_exercises(&self.database).map_err(to_mcp_error)?;
        json_result(&result)
    }

    // --- Workouts ---

    #[tool(description = "Schedule a workout for a user")]
    fn create_workout(&self, Parameters(p): Parameters<CreateWorkoutParams>) -> Result<CallToolResult, McpError> {
        let data = WorkoutCreate {
            user_id: p.user_id,
            name: p.name,
            description: p.description,
            duration: p.duration,
            calories: p.calories,
            date: parse_date("date", p.date.as_deref())?,
            completed: p.completed,
        };
        let workout = workouts::create_workout(&self.database, &data).map_err(to_mcp_error)?;
        json_result(&workout)
    }

    #[tool(description = "Add a catalog exercise with sets, reps and weight to a workout")]
    fn add_workout_exercise(&self, Parameters(p): Parameters<AddWorkoutExerciseParams>) -> Result<CallToolResult, McpError> {
        let data = WorkoutExerciseCreate {
            exercise_id: p.exercise_id,
            sets: p.sets,
            reps: p.reps,
            weight: p.weight,
        };
        let workout = workouts::add_workout_exercise(&self.database, p.workout_id, &data)
            .map_err(to_mcp_error)?;
        json_result(&workout)
    }

    #[tool(description = "List workouts, optionally filtered by user and completion, newest first")]
    fn list_workouts(&self, Parameters(p): Parameters<ListWorkoutsParams>) -> Result<CallToolResult, McpError> {
        let filter = WorkoutFilter {
            user_id: p.user_id,
            completed: p.completed,
            ..Default::default()
        };
        let result = workouts::list_workouts(&self.database, &filter).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Mark a scheduled workout as in progress")]
    fn start_workout(&self, Parameters(p): Parameters<WorkoutIdParams>) -> Result<CallToolResult, McpError> {
        let workout = workouts::start_workout(&self.database, p.workout_id).map_err(to_mcp_error)?;
        json_result(&workout)
    }

    #[tool(description = "Mark a workout as completed")]
    fn complete_workout(&self, Parameters(p): Parameters<WorkoutIdParams>) -> Result<CallToolResult, McpError> {
        let workout = workouts::complete_workout(&self.database, p.workout_id).map_err(to_mcp_error)?;
        json_result(&workout)
    }

    #[tool(description = "Toggle one exercise of a workout; the workout completes once every exercise is done")]
    fn toggle_workout_exercise(&self, Parameters(p): Parameters<ToggleWorkoutExerciseParams>) -> Result<CallToolResult, McpError> {
        let workout = workouts::toggle_workout_exercise(&self.database, p.workout_id, p.workout_exercise_id)
            .map_err(to_mcp_error)?;
        json_result(&workout)
    }

    #[tool(description = "Get workout counts, calories and minutes for a user over a date range (defaults to this week)")]
    fn get_workout_stats(&self, Parameters(p): Parameters<WorkoutStatsParams>) -> Result<CallToolResult, McpError> {
        let from = parse_date("from", p.from.as_deref())?;
        let to = parse_date("to", p.to.as_deref())?;
        let stats = workouts::workout_stats(&self.database, p.user_id, from, to).map_err(to_mcp_error)?;
        json_result(&stats)
    }

    // --- Progress ---

    #[tool(description = "Record weight, body fat percentage and tape measurements (cm)")]
    fn add_progress(&self, Parameters(p): Parameters<AddProgressParams>) -> Result<CallToolResult, McpError> {
        let data = ProgressCreate {
            user_id: p.user_id,
            weight: p.weight,
            body_fat: p.body_fat,
            measurements: Measurements {
                chest: p.chest,
                waist: p.waist,
                arms: p.arms,
                thighs: p.thighs,
            },
            date: parse_date("date", p.date.as_deref())?,
        };
        let entry = progress::add_progress(&self.database, &data).map_err(to_mcp_error)?;
        json_result(&entry)
    }

    #[tool(description = "List progress entries, oldest first")]
    fn list_progress(&self, Parameters(p): Parameters<ListProgressParams>) -> Result<CallToolResult, McpError> {
        let result = progress::list_progress(&self.database, p.user_id).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Compare a user's two most recent progress entries")]
    fn get_progress_summary(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let summary = progress::progress_summary(&self.database, p.user_id).map_err(to_mcp_error)?;
        json_result(&summary)
    }
}

#[tool_handler]
impl ServerHandler for FitTrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: crate::build_info::NAME.into(),
                version: crate::build_info::VERSION.into(),
                title: Some("FitTrack".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "FitTrack - fitness and nutrition tracking. \
                 Users: create_user/list_users/get_user_metrics. \
                 Meals: log_meal/list_meals/get_nutrition_summary. \
                 Exercise catalog: add_exercise/list_exercises. \
                 Workouts: create_workout/add_workout_exercise/list_workouts, \
                 start_workout/complete_workout/toggle_workout_exercise, get_workout_stats. \
                 Progress: add_progress/list_progress/get_progress_summary. \
                 Weights are kg, heights and measurements cm, dates ISO 8601 (UTC)."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let err = to_mcp_error(AppError::InvalidInput("name must not be empty".into()));
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);

        let err = to_mcp_error(AppError::not_found("Workout", 3));
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "Workout 3 not found");
    }

    #[test]
    fn test_persistence_error_hides_cause() {
        let cause = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE),
            Some("UNIQUE constraint failed: users.email".to_string()),
        );
        let err = to_mcp_error(AppError::from(cause));
        assert_eq!(err.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
        assert_eq!(err.message, "Internal error");
        assert!(!err.message.contains("users.email"));
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("date", None).unwrap().is_none());
        assert!(parse_date("date", Some("2025-03-01")).unwrap().is_some());
        assert!(parse_date("date", Some("soon")).is_err());
    }

    #[test]
    fn test_tools_are_registered() {
        let service = FitTrackService::new(Database::in_memory().unwrap());
        let tools = service.tool_router.list_all();
        for name in ["create_user", "log_meal", "toggle_workout_exercise", "get_progress_summary"] {
            assert!(tools.iter().any(|t| t.name == name), "missing tool {}", name);
        }
        assert_eq!(tools.len(), 18);
    }
}
