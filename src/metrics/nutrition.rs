//! Nutrition totals
//!
//! Sums whatever meals the caller passes in; filtering by user or day is the
//! caller's job.

use serde::{Deserialize, Serialize};

use super::{CalcError, CalcResult};
use crate::models::{Meal, MealType};

/// Calorie goal used when the caller does not supply one
pub const DEFAULT_DAILY_CALORIE_GOAL: f64 = 2000.0;

/// Summed calories and macronutrients
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTotals {
    pub total_calories: u64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
}

impl NutritionTotals {
    fn add_meal(mut self, meal: &Meal) -> Self {
        self.total_calories += u64::from(meal.calories);
        self.total_protein += meal.protein;
        self.total_carbs += meal.carbs;
        self.total_fat += meal.fat;
        self
    }
}

/// Totals for one meal type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealTypeTotals {
    pub meal_type: MealType,
    pub meal_count: usize,
    pub totals: NutritionTotals,
}

/// Field-wise sum over the meals; empty input gives zeros
pub fn aggregate(meals: &[Meal]) -> NutritionTotals {
    meals.iter().fold(NutritionTotals::default(), NutritionTotals::add_meal)
}

/// Totals per meal type, in breakfast/lunch/dinner/snack order
pub fn totals_by_meal_type(meals: &[Meal]) -> Vec<MealTypeTotals> {
    MealType::ALL
        .iter()
        .map(|&meal_type| {
            let of_type: Vec<Meal> = meals
                .iter()
                .filter(|m| m.meal_type == meal_type)
                .cloned()
                .collect();
            MealTypeTotals {
                meal_type,
                meal_count: of_type.len(),
                totals: aggregate(&of_type),
            }
        })
        .collect()
}

/// `total / goal`; the goal must be positive
pub fn progress_ratio(total: f64, goal: f64) -> CalcResult<f64> {
    if !goal.is_finite() || goal <= 0.0 {
        return Err(CalcError::InvalidInput(format!(
            "calorie goal must be greater than 0, got {}",
            goal
        )));
    }
    Ok(total / goal)
}

/// Ratio as a percentage clamped to 0..=100 for a progress bar
pub fn progress_percent(ratio: f64) -> f64 {
    (ratio * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::meal_record;

    #[test]
    fn test_aggregate_sums_fields() {
        let meals = vec![
            meal_record(320, 12.0, 45.0, 8.0, MealType::Breakfast),
            meal_record(450, 35.0, 20.0, 15.0, MealType::Lunch),
            meal_record(180, 25.0, 10.0, 3.0, MealType::Snack),
        ];

        let totals = aggregate(&meals);
        assert_eq!(totals.total_calories, 950);
        assert_eq!(totals.total_protein, 72.0);
        assert_eq!(totals.total_carbs, 75.0);
        assert_eq!(totals.total_fat, 26.0);
    }

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(aggregate(&[]), NutritionTotals::default());
    }

    #[test]
    fn test_totals_by_meal_type() {
        let meals = vec![
            meal_record(105, 1.3, 27.0, 0.4, MealType::Snack),
            meal_record(320, 12.0, 45.0, 8.0, MealType::Breakfast),
            meal_record(150, 15.0, 8.0, 4.0, MealType::Snack),
        ];

        let by_type = totals_by_meal_type(&meals);
        assert_eq!(by_type.len(), 4);
        assert_eq!(by_type[0].meal_type, MealType::Breakfast);
        assert_eq!(by_type[0].totals.total_calories, 320);
        assert_eq!(by_type[2].meal_count, 0);
        assert_eq!(by_type[3].meal_count, 2);
        assert_eq!(by_type[3].totals.total_calories, 255);
    }

    #[test]
    fn test_progress_ratio() {
        assert_eq!(progress_ratio(950.0, 2000.0).unwrap(), 0.475);
        assert_eq!(progress_ratio(0.0, 2000.0).unwrap(), 0.0);
        assert!(matches!(progress_ratio(950.0, 0.0), Err(CalcError::InvalidInput(_))));
        assert!(progress_ratio(950.0, -1.0).is_err());
    }

    #[test]
    fn test_progress_percent_clamps() {
        assert_eq!(progress_percent(0.475), 47.5);
        assert_eq!(progress_percent(1.3), 100.0);
    }
}
