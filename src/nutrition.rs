//! Nutrition planning
//!
//! Builds a daily nutrition plan from a user snapshot: Harris-Benedict BMR,
//! TDEE from a step-count activity bucket, goal-adjusted calorie and macro
//! targets, a meal plan keyed on BMI category and goal, a hydration schedule,
//! and supplement recommendations.
//!
//! Every function here is a pure function of its inputs; identical snapshots
//! produce identical plans.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::{ActivityRecord, BmiCategory, Gender, GoalType, UserProfile, WorkoutGoal};

/// Daily activity bucket derived from step count
///
/// Boundaries are inclusive-lower: <5000 Sedentary, <7500 Light,
/// <10000 Moderate, <12500 Active, else VeryActive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    /// Bucket a daily step count
    pub fn from_steps(steps: u32) -> Self {
        if steps < 5000 {
            ActivityLevel::Sedentary
        } else if steps < 7500 {
            ActivityLevel::Light
        } else if steps < 10000 {
            ActivityLevel::Moderate
        } else if steps < 12500 {
            ActivityLevel::Active
        } else {
            ActivityLevel::VeryActive
        }
    }

    /// TDEE multiplier applied to BMR
    pub fn tdee_multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    /// Extra daily water in liters on top of the weight-based baseline
    pub fn hydration_bonus_liters(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 0.0,
            ActivityLevel::Light => 0.5,
            ActivityLevel::Moderate => 1.0,
            ActivityLevel::Active => 1.5,
            ActivityLevel::VeryActive => 2.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "very_active" => Ok(ActivityLevel::VeryActive),
            _ => Err(format!("Invalid activity level: {}", s)),
        }
    }
}

/// Grams plus the advertised share of daily calories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTarget {
    pub grams: u32,

    /// Display share of daily calories. The protein/carb/fat labels are the
    /// fixed values 25/45/30; gram values come from the post-protein calorie
    /// remainder, so the labels are not recomputed from the grams.
    pub percentage: u8,
}

/// Daily macronutrient targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macronutrients {
    pub protein: MacroTarget,
    pub carbohydrates: MacroTarget,
    pub fat: MacroTarget,
}

/// Meal suggestions for the four daily meals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meals {
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
    pub snacks: String,
}

/// Fixed meal timing guidance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealTiming {
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
    pub snacks: String,
}

/// Goal-specific dietary guidance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalAdjustment {
    pub general: String,
    pub tips: Vec<String>,
}

/// Complete meal plan section of a nutrition plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPlan {
    pub meals: Meals,
    pub timing: MealTiming,
    pub goal_adjustment: GoalAdjustment,
}

/// One slot of the daily hydration schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydrationSlot {
    pub time: String,
    pub amount: String,
}

/// Daily hydration section of a nutrition plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrationPlan {
    /// Total daily intake in liters, rounded to 1 decimal
    pub total_liters: f64,

    /// Fixed seven-slot schedule; amounts are literals, not scaled to the total
    pub schedule: Vec<HydrationSlot>,

    pub tips: Vec<String>,
}

/// A recommended supplement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplement {
    pub name: String,
    pub purpose: String,
    pub dosage: String,
}

/// Complete nutrition plan for one user snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionPlan {
    pub daily_calories: u32,
    pub macronutrients: Macronutrients,
    pub meal_plan: MealPlan,
    pub hydration: HydrationPlan,
    pub supplements: Vec<Supplement>,
}

/// Core nutrition planning engine
pub struct NutritionPlanner;

impl NutritionPlanner {
    /// Build the daily plan for a user snapshot
    ///
    /// A missing goal plans as Maintenance; a missing activity record (or a
    /// record without a step count) buckets as Moderate.
    pub fn generate_plan(
        profile: &UserProfile,
        goal: Option<&WorkoutGoal>,
        activity: Option<&ActivityRecord>,
    ) -> NutritionPlan {
        let weight = profile.weight_kg;
        let bmr = Self::basal_metabolic_rate(profile);

        let activity_level = Self::activity_level(activity);
        let tdee = bmr * activity_level.tdee_multiplier();

        let goal_type = goal.map_or(GoalType::Maintenance, |g| g.goal_type);
        let (target_calories, protein_grams) = Self::calorie_and_protein_targets(tdee, weight, goal_type);

        // Carbs and fat split what remains after protein: 45% / 30% of the
        // remainder, at 4 kcal/g and 9 kcal/g.
        let protein_calories = f64::from(protein_grams) * 4.0;
        let remaining_calories = target_calories - protein_calories;
        let carb_grams = (remaining_calories * 0.45 / 4.0).round() as u32;
        let fat_grams = (remaining_calories * 0.30 / 9.0).round() as u32;

        NutritionPlan {
            daily_calories: target_calories.round() as u32,
            macronutrients: Macronutrients {
                protein: MacroTarget {
                    grams: protein_grams,
                    percentage: 25,
                },
                carbohydrates: MacroTarget {
                    grams: carb_grams,
                    percentage: 45,
                },
                fat: MacroTarget {
                    grams: fat_grams,
                    percentage: 30,
                },
            },
            meal_plan: Self::meal_plan(profile.bmi_category(), goal_type),
            hydration: Self::hydration_plan(weight, activity_level),
            supplements: Self::supplements(goal_type),
        }
    }

    /// Harris-Benedict basal metabolic rate
    ///
    /// Male: 88.362 + 13.397·w + 4.799·h − 5.677·a
    /// Female/other: 447.593 + 9.247·w + 3.098·h − 4.330·a
    pub fn basal_metabolic_rate(profile: &UserProfile) -> f64 {
        let weight = profile.weight_kg;
        let height = profile.height_cm;
        let age = f64::from(profile.age);

        match profile.gender {
            Gender::Male => 88.362 + 13.397 * weight + 4.799 * height - 5.677 * age,
            Gender::Female | Gender::Other => {
                447.593 + 9.247 * weight + 3.098 * height - 4.330 * age
            }
        }
    }

    /// Activity bucket for the latest activity record
    pub fn activity_level(activity: Option<&ActivityRecord>) -> ActivityLevel {
        activity
            .and_then(|a| a.steps)
            .map_or(ActivityLevel::Moderate, ActivityLevel::from_steps)
    }

    /// Goal-adjusted calorie target and protein grams
    ///
    /// Protein is weight in pounds (kg × 2.2) times a goal factor, rounded to
    /// the nearest gram.
    fn calorie_and_protein_targets(tdee: f64, weight_kg: f64, goal_type: GoalType) -> (f64, u32) {
        let (calorie_factor, protein_factor) = match goal_type {
            // 20% deficit, higher protein to preserve lean mass
            GoalType::WeightLoss => (0.8, 1.2),
            // 10% surplus
            GoalType::MuscleGain => (1.1, 1.6),
            GoalType::Endurance => (1.0, 1.4),
            GoalType::Maintenance => (1.0, 1.2),
        };

        let protein = (weight_kg * 2.2 * protein_factor).round() as u32;
        (tdee * calorie_factor, protein)
    }

    /// Meal plan lookup keyed on (BMI category, goal type)
    pub fn meal_plan(bmi_category: BmiCategory, goal_type: GoalType) -> MealPlan {
        let breakfast = match bmi_category {
            BmiCategory::Underweight => {
                "High-calorie smoothie with oats, peanut butter, banana, and protein powder"
            }
            BmiCategory::Normal => "Balanced breakfast with eggs, whole grain toast, and avocado",
            BmiCategory::Overweight => {
                "High-protein breakfast with Greek yogurt, berries, and nuts"
            }
            BmiCategory::Obesity => "Low-carb breakfast with vegetables and lean protein",
        };

        let lunch = match bmi_category {
            BmiCategory::Underweight => "Calorie-dense meal with rice, chicken, and healthy fats",
            BmiCategory::Normal => "Balanced meal with lean protein, complex carbs, and vegetables",
            BmiCategory::Overweight => "High-fiber lunch with salad, grilled chicken, and quinoa",
            BmiCategory::Obesity => {
                "Portion-controlled meal with emphasis on vegetables and lean protein"
            }
        };

        let dinner = match bmi_category {
            BmiCategory::Underweight => {
                "Nutrient-rich dinner with salmon, sweet potatoes, and vegetables"
            }
            BmiCategory::Normal => "Light dinner with fish, vegetables, and small portion of carbs",
            BmiCategory::Overweight => "Low-carb dinner with plenty of vegetables and lean protein",
            BmiCategory::Obesity => {
                "Early, light dinner focusing on protein and non-starchy vegetables"
            }
        };

        let snacks = match bmi_category {
            BmiCategory::Underweight => {
                "Frequent high-calorie snacks like nuts, dried fruits, and protein bars"
            }
            BmiCategory::Normal => "Healthy snacks like fruits, yogurt, and nuts between meals",
            BmiCategory::Overweight => {
                "Low-calorie snacks like vegetables, apple slices, or small portion of nuts"
            }
            BmiCategory::Obesity => {
                "Very low-calorie snacks like cucumber, celery, or small protein snack"
            }
        };

        let goal_adjustment = match goal_type {
            GoalType::WeightLoss => GoalAdjustment {
                general: "Focus on calorie deficit, high protein, and fiber-rich foods".to_string(),
                tips: vec![
                    "Increase vegetable intake".to_string(),
                    "Reduce processed foods".to_string(),
                    "Control portion sizes".to_string(),
                ],
            },
            GoalType::MuscleGain => GoalAdjustment {
                general: "Calorie surplus with emphasis on protein timing and quality".to_string(),
                tips: vec![
                    "Eat every 3-4 hours".to_string(),
                    "Post-workout protein within 30 minutes".to_string(),
                    "Stay hydrated".to_string(),
                ],
            },
            GoalType::Endurance => GoalAdjustment {
                general: "Carbohydrate-focused diet for sustained energy".to_string(),
                tips: vec![
                    "Carbo-load before long sessions".to_string(),
                    "Electrolyte balance".to_string(),
                    "Adequate hydration".to_string(),
                ],
            },
            GoalType::Maintenance => GoalAdjustment {
                general: "Balanced diet maintaining current weight and performance".to_string(),
                tips: vec![
                    "Consistent meal timing".to_string(),
                    "Varied nutrient intake".to_string(),
                    "Listen to hunger cues".to_string(),
                ],
            },
        };

        MealPlan {
            meals: Meals {
                breakfast: breakfast.to_string(),
                lunch: lunch.to_string(),
                dinner: dinner.to_string(),
                snacks: snacks.to_string(),
            },
            timing: MealTiming {
                breakfast: "Within 1 hour of waking".to_string(),
                lunch: "4-5 hours after breakfast".to_string(),
                dinner: "3-4 hours before bedtime".to_string(),
                snacks: "Between main meals as needed".to_string(),
            },
            goal_adjustment,
        }
    }

    /// Daily hydration target and schedule
    ///
    /// Baseline 0.033 L per kg of body weight plus an activity bonus.
    pub fn hydration_plan(weight_kg: f64, activity_level: ActivityLevel) -> HydrationPlan {
        let base_water = weight_kg * 0.033;
        let total_liters = base_water + activity_level.hydration_bonus_liters();

        let slot = |time: &str, amount: &str| HydrationSlot {
            time: time.to_string(),
            amount: amount.to_string(),
        };

        HydrationPlan {
            total_liters: (total_liters * 10.0).round() / 10.0,
            schedule: vec![
                slot("Upon waking", "0.5L"),
                slot("Before breakfast", "0.25L"),
                slot("Mid-morning", "0.5L"),
                slot("Before lunch", "0.25L"),
                slot("Afternoon", "0.5L"),
                slot("Before dinner", "0.25L"),
                slot("Evening", "0.25L"),
            ],
            tips: vec![
                "Drink consistently throughout the day".to_string(),
                "Increase intake during workouts".to_string(),
                "Monitor urine color - aim for pale yellow".to_string(),
            ],
        }
    }

    /// Base supplements plus goal-specific additions
    pub fn supplements(goal_type: GoalType) -> Vec<Supplement> {
        let supplement = |name: &str, purpose: &str, dosage: &str| Supplement {
            name: name.to_string(),
            purpose: purpose.to_string(),
            dosage: dosage.to_string(),
        };

        let mut supplements = vec![
            supplement("Multivitamin", "Fill nutritional gaps", "As directed"),
            supplement("Vitamin D", "Bone health and immunity", "1000-2000 IU daily"),
            supplement("Omega-3", "Anti-inflammatory", "1000-2000 mg daily"),
        ];

        match goal_type {
            GoalType::WeightLoss => {
                supplements.push(supplement(
                    "Green Tea Extract",
                    "Metabolism support",
                    "500 mg daily",
                ));
                supplements.push(supplement("Fiber Supplement", "Appetite control", "As needed"));
            }
            GoalType::MuscleGain => {
                supplements.push(supplement(
                    "Whey Protein",
                    "Muscle recovery",
                    "20-30g post-workout",
                ));
                supplements.push(supplement("Creatine", "Strength and power", "5g daily"));
                supplements.push(supplement("BCAAs", "Muscle preservation", "During workouts"));
            }
            GoalType::Endurance => {
                supplements.push(supplement(
                    "Electrolytes",
                    "Hydration balance",
                    "During long sessions",
                ));
                supplements.push(supplement(
                    "Beta-Alanine",
                    "Endurance performance",
                    "3-6g daily",
                ));
            }
            GoalType::Maintenance => {}
        }

        supplements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GoalStatus;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn profile(gender: Gender, weight_kg: f64, height_cm: f64, age: u8) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            first_name: "Test".to_string(),
            last_name: None,
            age,
            gender,
            weight_kg,
            height_cm,
        }
    }

    fn goal(goal_type: GoalType) -> WorkoutGoal {
        WorkoutGoal {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            goal_type,
            target_date: None,
            target_weight_kg: None,
            weekly_workout_days: 4,
            status: GoalStatus::Active,
            notes: None,
        }
    }

    fn activity(steps: Option<u32>) -> ActivityRecord {
        ActivityRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            steps,
            water_intake_liters: Some(2.5),
        }
    }

    #[test]
    fn test_bmr_male_reference_value() {
        let p = profile(Gender::Male, 70.0, 175.0, 30);
        let bmr = NutritionPlanner::basal_metabolic_rate(&p);
        assert!((bmr - 1695.667).abs() < 1e-3);
    }

    #[test]
    fn test_bmr_female_formula() {
        let p = profile(Gender::Female, 60.0, 165.0, 25);
        let bmr = NutritionPlanner::basal_metabolic_rate(&p);
        let expected = 447.593 + 9.247 * 60.0 + 3.098 * 165.0 - 4.330 * 25.0;
        assert!((bmr - expected).abs() < 1e-9);
    }

    #[test]
    fn test_bmr_other_uses_female_coefficients() {
        let f = profile(Gender::Female, 60.0, 165.0, 25);
        let o = profile(Gender::Other, 60.0, 165.0, 25);
        assert_eq!(
            NutritionPlanner::basal_metabolic_rate(&f),
            NutritionPlanner::basal_metabolic_rate(&o)
        );
    }

    #[test]
    fn test_activity_bucket_boundaries() {
        assert_eq!(ActivityLevel::from_steps(4999), ActivityLevel::Sedentary);
        assert_eq!(ActivityLevel::from_steps(5000), ActivityLevel::Light);
        assert_eq!(ActivityLevel::from_steps(7499), ActivityLevel::Light);
        assert_eq!(ActivityLevel::from_steps(7500), ActivityLevel::Moderate);
        assert_eq!(ActivityLevel::from_steps(9999), ActivityLevel::Moderate);
        assert_eq!(ActivityLevel::from_steps(10000), ActivityLevel::Active);
        assert_eq!(ActivityLevel::from_steps(12499), ActivityLevel::Active);
        assert_eq!(ActivityLevel::from_steps(12500), ActivityLevel::VeryActive);
    }

    #[test]
    fn test_missing_activity_defaults_to_moderate() {
        assert_eq!(
            NutritionPlanner::activity_level(None),
            ActivityLevel::Moderate
        );
        assert_eq!(
            NutritionPlanner::activity_level(Some(&activity(None))),
            ActivityLevel::Moderate
        );
        assert_eq!(
            NutritionPlanner::activity_level(Some(&activity(Some(3000)))),
            ActivityLevel::Sedentary
        );
    }

    #[test]
    fn test_protein_rounding_muscle_gain() {
        let p = profile(Gender::Male, 80.0, 180.0, 28);
        let g = goal(GoalType::MuscleGain);
        let plan = NutritionPlanner::generate_plan(&p, Some(&g), None);
        // 80 × 2.2 × 1.6 = 281.6 → 282
        assert_eq!(plan.macronutrients.protein.grams, 282);
    }

    #[test]
    fn test_maintenance_plan_reference_values() {
        let p = profile(Gender::Male, 70.0, 175.0, 30);
        let plan = NutritionPlanner::generate_plan(&p, None, None);

        // BMR 1695.667 × 1.55 = 2628.28385
        assert_eq!(plan.daily_calories, 2628);
        // 70 × 2.2 × 1.2 = 184.8 → 185
        assert_eq!(plan.macronutrients.protein.grams, 185);
        // remainder 1888.28385 → carbs 212 g, fat 63 g
        assert_eq!(plan.macronutrients.carbohydrates.grams, 212);
        assert_eq!(plan.macronutrients.fat.grams, 63);
    }

    #[test]
    fn test_weight_loss_applies_deficit() {
        let p = profile(Gender::Male, 70.0, 175.0, 30);
        let g = goal(GoalType::WeightLoss);
        let plan = NutritionPlanner::generate_plan(&p, Some(&g), None);
        // 2628.28385 × 0.8 = 2102.6
        assert_eq!(plan.daily_calories, 2103);
    }

    #[test]
    fn test_macro_percentage_labels_are_fixed() {
        let p = profile(Gender::Female, 55.0, 160.0, 40);
        for goal_type in [
            GoalType::WeightLoss,
            GoalType::MuscleGain,
            GoalType::Endurance,
            GoalType::Maintenance,
        ] {
            let plan = NutritionPlanner::generate_plan(&p, Some(&goal(goal_type)), None);
            assert_eq!(plan.macronutrients.protein.percentage, 25);
            assert_eq!(plan.macronutrients.carbohydrates.percentage, 45);
            assert_eq!(plan.macronutrients.fat.percentage, 30);
        }
    }

    #[test]
    fn test_meal_plan_fallback_keys() {
        let plan = NutritionPlanner::meal_plan(BmiCategory::Normal, GoalType::Maintenance);
        assert_eq!(
            plan.meals.breakfast,
            "Balanced breakfast with eggs, whole grain toast, and avocado"
        );
        assert_eq!(
            plan.goal_adjustment.general,
            "Balanced diet maintaining current weight and performance"
        );

        let plan = NutritionPlanner::meal_plan(BmiCategory::Obesity, GoalType::WeightLoss);
        assert_eq!(
            plan.meals.dinner,
            "Early, light dinner focusing on protein and non-starchy vegetables"
        );
        assert_eq!(plan.goal_adjustment.tips.len(), 3);
    }

    #[test]
    fn test_hydration_plan() {
        let plan = NutritionPlanner::hydration_plan(70.0, ActivityLevel::Moderate);
        // 70 × 0.033 + 1.0 = 3.31 → 3.3
        assert_eq!(plan.total_liters, 3.3);
        assert_eq!(plan.schedule.len(), 7);
        assert_eq!(plan.schedule[0].time, "Upon waking");
        assert_eq!(plan.schedule[0].amount, "0.5L");
        assert_eq!(plan.tips.len(), 3);
    }

    #[test]
    fn test_supplements_by_goal() {
        assert_eq!(NutritionPlanner::supplements(GoalType::Maintenance).len(), 3);
        assert_eq!(NutritionPlanner::supplements(GoalType::WeightLoss).len(), 5);
        assert_eq!(NutritionPlanner::supplements(GoalType::MuscleGain).len(), 6);
        assert_eq!(NutritionPlanner::supplements(GoalType::Endurance).len(), 5);

        let endurance = NutritionPlanner::supplements(GoalType::Endurance);
        assert!(endurance.iter().any(|s| s.name == "Beta-Alanine"));
    }

    #[test]
    fn test_plan_is_deterministic() {
        let p = profile(Gender::Female, 62.5, 168.0, 33);
        let g = goal(GoalType::Endurance);
        let a = activity(Some(11000));
        let first = NutritionPlanner::generate_plan(&p, Some(&g), Some(&a));
        let second = NutritionPlanner::generate_plan(&p, Some(&g), Some(&a));
        assert_eq!(first, second);
    }
}
