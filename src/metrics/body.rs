//! Body metrics
//!
//! BMI, basal metabolic rate and the daily calorie target derived from a
//! user's snapshot.
//!
//! BMR uses the Mifflin-St Jeor equation for men for every user; users carry
//! no sex field, so there is no female variant.

use serde::{Deserialize, Serialize};

use super::{round1, CalcError, CalcResult};
use crate::models::{ActivityLevel, User};

/// BMI classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

/// Direction of travel towards the goal weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightDirection {
    Lose,
    Maintain,
}

/// Distance from the goal weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightDelta {
    /// kg still to lose; 0 when at or below the goal
    pub amount_kg: f64,
    pub direction: WeightDirection,
}

fn require_positive(name: &str, value: f64) -> CalcResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CalcError::InvalidInput(format!("{} must be greater than 0, got {}", name, value)))
    }
}

/// Body mass index, rounded to one decimal
pub fn bmi(weight_kg: f64, height_cm: f64) -> CalcResult<f64> {
    require_positive("height", height_cm)?;
    require_positive("weight", weight_kg)?;

    let height_m = height_cm / 100.0;
    Ok(round1(weight_kg / (height_m * height_m)))
}

/// Classify a BMI value; each bound belongs to the category above it
pub fn bmi_category(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Basal metabolic rate in kcal/day (Mifflin-St Jeor, male form)
pub fn bmr(weight_kg: f64, height_cm: f64, age_years: u32) -> CalcResult<f64> {
    require_positive("weight", weight_kg)?;
    require_positive("height", height_cm)?;

    Ok(10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years) + 5.0)
}

/// Total energy expenditure multiplier; no level means sedentary
pub fn activity_multiplier(level: Option<ActivityLevel>) -> f64 {
    match level {
        Some(ActivityLevel::Sedentary) | None => 1.2,
        Some(ActivityLevel::Light) => 1.375,
        Some(ActivityLevel::Moderate) => 1.55,
        Some(ActivityLevel::Active) => 1.725,
        Some(ActivityLevel::VeryActive) => 1.9,
    }
}

/// Daily calorie target in whole kcal
pub fn daily_calorie_target(bmr: f64, multiplier: f64) -> i64 {
    (bmr * multiplier).round() as i64
}

/// How far the current weight is above the goal
pub fn weight_delta(current_kg: f64, goal_kg: f64) -> WeightDelta {
    let delta = current_kg - goal_kg;
    if delta > 0.0 {
        WeightDelta {
            amount_kg: round1(delta),
            direction: WeightDirection::Lose,
        }
    } else {
        WeightDelta {
            amount_kg: 0.0,
            direction: WeightDirection::Maintain,
        }
    }
}

/// Every body metric for one user snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetrics {
    pub user_id: i64,
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub bmr: f64,
    pub activity_multiplier: f64,
    pub daily_calorie_target: i64,
    /// Daily target scaled by the sedentary multiplier once more
    pub calorie_goal: i64,
    pub weight_to_goal: WeightDelta,
}

impl UserMetrics {
    pub fn for_user(user: &User) -> CalcResult<Self> {
        let bmi = bmi(user.weight, user.height)?;
        let bmr = bmr(user.weight, user.height, user.age)?;
        let multiplier = activity_multiplier(user.activity_level);
        let target = daily_calorie_target(bmr, multiplier);

        Ok(Self {
            user_id: user.id,
            bmi,
            bmi_category: bmi_category(bmi),
            bmr,
            activity_multiplier: multiplier,
            daily_calorie_target: target,
            calorie_goal: daily_calorie_target(target as f64, activity_multiplier(None)),
            weight_to_goal: weight_delta(user.weight, user.goal_weight),
        })
    }
}
