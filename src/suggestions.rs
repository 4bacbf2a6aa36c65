//! Suggestion orchestration
//!
//! Fetches one user's snapshot from the store, fans out to the nutrition and
//! exercise planners, and merges the results with overall recommendations
//! into a single response. The snapshot reads are independent; a missing
//! profile aborts the whole request, while missing goal/sleep/activity data
//! degrade to documented defaults inside the planners.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::exercise::{ExercisePlan, ExercisePlanner};
use crate::models::{
    ActivityRecord, BmiCategory, GoalType, SleepQuality, SleepRecord, TemplateFilter, UserProfile,
    WorkoutGoal,
};
use crate::nutrition::{NutritionPlan, NutritionPlanner};
use crate::sleep::{AnalysisPeriod, SleepAnalyzer, SleepPatternAnalysis};
use crate::store::SnapshotStore;

/// Composite response for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizedSuggestions {
    pub nutrition: NutritionPlan,
    pub exercises: ExercisePlan,
    pub overall_recommendations: Vec<String>,
}

/// Orchestrates snapshot fetches and the planning engines
pub struct SuggestionEngine<'a> {
    store: &'a dyn SnapshotStore,
}

impl<'a> SuggestionEngine<'a> {
    pub fn new(store: &'a dyn SnapshotStore) -> Self {
        Self { store }
    }

    /// Build the composite nutrition + exercise + overall response
    ///
    /// Fail-fast: a missing profile (or any store failure) aborts the whole
    /// request; no partial nutrition-only result is returned.
    pub fn personalized_suggestions(&self, user_id: Uuid) -> Result<PersonalizedSuggestions> {
        let profile = self.store.get_user_profile(user_id)?;
        let goal = self.store.get_active_goal(user_id)?;
        let recent_sleep = self.store.latest_sleep_record(user_id)?;
        let recent_activity = self.store.latest_activity_record(user_id)?;

        let templates = self.store.list_workout_templates(&TemplateFilter {
            bmi_category: profile.bmi_category(),
            goal_type: goal.as_ref().map(|g| g.goal_type),
        })?;

        tracing::debug!(
            user_id = %user_id,
            bmi_category = %profile.bmi_category(),
            has_goal = goal.is_some(),
            has_sleep = recent_sleep.is_some(),
            has_activity = recent_activity.is_some(),
            templates = templates.len(),
            "generating personalized suggestions"
        );

        Ok(PersonalizedSuggestions {
            nutrition: NutritionPlanner::generate_plan(
                &profile,
                goal.as_ref(),
                recent_activity.as_ref(),
            ),
            exercises: ExercisePlanner::generate_plan(
                &profile,
                goal.as_ref(),
                recent_sleep.as_ref(),
                &templates,
            ),
            overall_recommendations: Self::overall_recommendations(
                &profile,
                goal.as_ref(),
                recent_sleep.as_ref(),
                recent_activity.as_ref(),
            ),
        })
    }

    /// Analyze the user's sleep records within the requested window
    pub fn sleep_analysis(
        &self,
        user_id: Uuid,
        period: AnalysisPeriod,
        today: NaiveDate,
    ) -> Result<SleepPatternAnalysis> {
        let since = period.since(today);
        let records = self.store.list_sleep_records(user_id, since)?;

        tracing::debug!(
            user_id = %user_id,
            since = %since,
            records = records.len(),
            "running sleep pattern analysis"
        );

        Ok(SleepAnalyzer::analyze_patterns(&records))
    }

    /// Cross-cutting recommendations from independent rule tables
    ///
    /// BMI rules, then sleep rules, then activity rules, then goal rules;
    /// each appends its fixed strings when its condition fires. Activity
    /// rules skip silently when the record lacks the inspected value.
    pub fn overall_recommendations(
        profile: &UserProfile,
        goal: Option<&WorkoutGoal>,
        recent_sleep: Option<&SleepRecord>,
        recent_activity: Option<&ActivityRecord>,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        match profile.bmi_category() {
            BmiCategory::Underweight => {
                recommendations
                    .push("Focus on calorie surplus with nutrient-dense foods".to_string());
                recommendations
                    .push("Incorporate strength training to build muscle mass".to_string());
            }
            BmiCategory::Overweight | BmiCategory::Obesity => {
                recommendations.push(
                    "Create sustainable calorie deficit through diet and exercise".to_string(),
                );
                recommendations
                    .push("Start with low-impact cardio to build endurance".to_string());
            }
            BmiCategory::Normal => {}
        }

        if let Some(sleep) = recent_sleep {
            if sleep.duration_hours < 7.0 {
                recommendations.push(
                    "Prioritize getting 7-9 hours of sleep for optimal recovery".to_string(),
                );
            }
            if matches!(sleep.quality, SleepQuality::Poor | SleepQuality::Fair) {
                recommendations.push(
                    "Improve sleep hygiene for better recovery and performance".to_string(),
                );
            }
        }

        if let Some(activity) = recent_activity {
            if activity.steps.is_some_and(|steps| steps < 5000) {
                recommendations
                    .push("Increase daily movement - aim for at least 7,500 steps".to_string());
            }
            if activity
                .water_intake_liters
                .is_some_and(|liters| liters < 2.0)
            {
                recommendations.push(
                    "Increase water intake to support metabolism and recovery".to_string(),
                );
            }
        }

        if let Some(goal) = goal {
            match goal.goal_type {
                GoalType::WeightLoss => {
                    recommendations.push(
                        "Combine cardio and strength training for optimal fat loss".to_string(),
                    );
                    recommendations.push(
                        "Track food intake to maintain consistent calorie deficit".to_string(),
                    );
                }
                GoalType::MuscleGain => {
                    recommendations
                        .push("Focus on progressive overload in strength training".to_string());
                    recommendations
                        .push("Ensure adequate protein intake throughout the day".to_string());
                }
                GoalType::Endurance => {
                    recommendations
                        .push("Gradually increase cardio duration and intensity".to_string());
                    recommendations
                        .push("Focus on carbohydrate timing around workouts".to_string());
                }
                GoalType::Maintenance => {}
            }
        }

        recommendations
    }
}
