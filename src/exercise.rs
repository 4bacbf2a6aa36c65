//! Exercise planning
//!
//! Builds a weekly exercise plan from a user snapshot and a pre-filtered
//! workout template catalog. The previous night's sleep modulates intensity:
//! short or poor sleep downgrades template intensity one step and scales
//! durations, following the recovery principle that training load should
//! track readiness.
//!
//! Pure over its inputs; the template catalog arrives already filtered by BMI
//! category (and goal type when a goal exists).

use serde::{Deserialize, Serialize};

use crate::models::{
    BmiCategory, Intensity, SleepQuality, SleepRecord, UserProfile, WorkoutCategory, WorkoutGoal,
    WorkoutTemplate,
};

/// Weekday slot names for the schedule, starting Monday
const DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Intensity modulation derived from the previous night's sleep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityAdjustment {
    /// Multiplier applied to template durations; <1 also downgrades intensity
    pub factor: f64,

    /// Explanation attached to every adjusted workout
    pub reason: &'static str,
}

impl IntensityAdjustment {
    /// Derive the adjustment from sleep quality and duration
    ///
    /// Rules, first match wins: duration<5 or poor quality → 0.7;
    /// duration<6 or fair quality → 0.85; duration>9 → 0.9; else full
    /// intensity.
    pub fn from_sleep(quality: SleepQuality, duration_hours: f64) -> Self {
        if duration_hours < 5.0 || quality == SleepQuality::Poor {
            IntensityAdjustment {
                factor: 0.7,
                reason: "Reduced intensity due to poor sleep quality/duration",
            }
        } else if duration_hours < 6.0 || quality == SleepQuality::Fair {
            IntensityAdjustment {
                factor: 0.85,
                reason: "Slightly reduced intensity due to suboptimal sleep",
            }
        } else if duration_hours > 9.0 {
            IntensityAdjustment {
                factor: 0.9,
                reason: "Slightly reduced intensity - monitor for oversleeping",
            }
        } else {
            IntensityAdjustment {
                factor: 1.0,
                reason: "Optimal sleep - full intensity recommended",
            }
        }
    }
}

/// A template after sleep adjustment, ready to schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedWorkout {
    pub name: String,

    pub category: WorkoutCategory,

    pub intensity: Intensity,

    pub duration_minutes: Option<u16>,

    /// Why the intensity/duration were (or were not) modified
    pub sleep_adjustment: String,

    pub description: Option<String>,
}

/// Adjusted workouts partitioned by category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CategorizedWorkouts {
    pub cardio: Vec<AdjustedWorkout>,
    pub strength: Vec<AdjustedWorkout>,
    pub flexibility: Vec<AdjustedWorkout>,
    pub balance: Vec<AdjustedWorkout>,
}

/// Short flexibility block attached to every third scheduled day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexibilityBlock {
    pub exercises: Vec<AdjustedWorkout>,
    pub duration: String,
}

/// One scheduled training day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// Weekday name ("Monday" .. "Sunday")
    pub day: String,

    pub focus: String,

    pub exercises: Vec<AdjustedWorkout>,

    pub duration: String,

    pub additional: Option<FlexibilityBlock>,
}

/// Complete exercise plan for one user snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePlan {
    pub weekly_schedule: Vec<DayPlan>,
    pub suggestions: CategorizedWorkouts,
    pub recovery_tips: Vec<String>,
    pub precautions: Vec<String>,
}

/// Core exercise planning engine
pub struct ExercisePlanner;

impl ExercisePlanner {
    /// Workout days per week when the user has no goal
    const DEFAULT_WORKOUT_DAYS: u8 = 3;

    /// Build the weekly plan for a user snapshot
    ///
    /// A missing sleep record plans at full intensity (good quality, 7
    /// hours). A missing goal schedules 3 days.
    pub fn generate_plan(
        profile: &UserProfile,
        goal: Option<&WorkoutGoal>,
        recent_sleep: Option<&SleepRecord>,
        templates: &[WorkoutTemplate],
    ) -> ExercisePlan {
        let (quality, duration_hours) = recent_sleep
            .map_or((SleepQuality::Good, 7.0), |s| (s.quality, s.duration_hours));

        let adjustment = IntensityAdjustment::from_sleep(quality, duration_hours);
        let categorized = Self::adjust_and_categorize(templates, adjustment);

        let workout_days = goal.map_or(Self::DEFAULT_WORKOUT_DAYS, |g| g.weekly_workout_days);

        ExercisePlan {
            weekly_schedule: Self::weekly_schedule(&categorized, workout_days),
            suggestions: categorized,
            recovery_tips: Self::recovery_tips(quality, duration_hours),
            precautions: Self::precautions(profile.bmi_category(), profile.age),
        }
    }

    /// Apply the sleep adjustment to every template and partition by category
    pub fn adjust_and_categorize(
        templates: &[WorkoutTemplate],
        adjustment: IntensityAdjustment,
    ) -> CategorizedWorkouts {
        let mut categorized = CategorizedWorkouts::default();

        for template in templates {
            let (intensity, duration_minutes) = if adjustment.factor < 1.0 {
                let scaled = template
                    .duration_minutes
                    .map(|d| (f64::from(d) * adjustment.factor).round() as u16);
                (template.intensity.downgraded(), scaled)
            } else {
                (template.intensity, template.duration_minutes)
            };

            let adjusted = AdjustedWorkout {
                name: template.name.clone(),
                category: template.category,
                intensity,
                duration_minutes,
                sleep_adjustment: adjustment.reason.to_string(),
                description: template.description.clone(),
            };

            match template.category {
                WorkoutCategory::Cardio => categorized.cardio.push(adjusted),
                WorkoutCategory::Strength => categorized.strength.push(adjusted),
                WorkoutCategory::Flexibility => categorized.flexibility.push(adjusted),
                WorkoutCategory::Balance => categorized.balance.push(adjusted),
            }
        }

        categorized
    }

    /// Lay out the week: start Monday, advance two weekday slots per
    /// workout, alternate strength and cardio focus, and attach a
    /// flexibility block every third workout.
    ///
    /// The +2 stepping spreads workouts across the week; for high day
    /// counts it can land on a slot more than once.
    pub fn weekly_schedule(suggestions: &CategorizedWorkouts, workout_days: u8) -> Vec<DayPlan> {
        let mut schedule = Vec::new();
        let mut day_index = 0usize;

        for i in 0..usize::from(workout_days) {
            let day = DAYS[day_index].to_string();

            let mut plan = if i % 2 == 0 {
                DayPlan {
                    day,
                    focus: "Strength Training".to_string(),
                    exercises: suggestions.strength.iter().take(4).cloned().collect(),
                    duration: "45-60 minutes".to_string(),
                    additional: None,
                }
            } else {
                DayPlan {
                    day,
                    focus: "Cardio".to_string(),
                    exercises: suggestions.cardio.iter().take(3).cloned().collect(),
                    duration: "30-45 minutes".to_string(),
                    additional: None,
                }
            };

            if i % 3 == 0 {
                plan.additional = Some(FlexibilityBlock {
                    exercises: suggestions.flexibility.iter().take(2).cloned().collect(),
                    duration: "15 minutes".to_string(),
                });
            }

            schedule.push(plan);
            day_index = (day_index + 2) % 7;
        }

        schedule
    }

    /// Recovery tips keyed on sleep; two base tips always close the list
    pub fn recovery_tips(quality: SleepQuality, duration_hours: f64) -> Vec<String> {
        let mut tips = Vec::new();

        if duration_hours < 7.0 {
            tips.push("Prioritize sleep - aim for 7-9 hours nightly".to_string());
            tips.push("Consider naps of 20-30 minutes if sleep deprived".to_string());
        }

        if matches!(quality, SleepQuality::Poor | SleepQuality::Fair) {
            tips.push("Improve sleep environment: dark, cool, quiet room".to_string());
            tips.push("Establish consistent sleep and wake times".to_string());
            tips.push("Avoid screens 1 hour before bedtime".to_string());
        }

        tips.push("Stay hydrated throughout the day".to_string());
        tips.push("Include active recovery days with light walking or stretching".to_string());

        tips
    }

    /// Precautions keyed on BMI category and age
    pub fn precautions(bmi_category: BmiCategory, age: u8) -> Vec<String> {
        let mut precautions = Vec::new();

        if bmi_category == BmiCategory::Obesity {
            precautions.push("Start with low-impact exercises to protect joints".to_string());
            precautions.push("Monitor for shortness of breath or dizziness".to_string());
            precautions.push(
                "Consider consulting with healthcare provider before intense exercise".to_string(),
            );
        }

        if age > 50 {
            precautions.push("Include proper warm-up and cool-down periods".to_string());
            precautions.push("Focus on balance and flexibility exercises".to_string());
            precautions.push("Listen to your body and adjust intensity as needed".to_string());
        }

        if bmi_category == BmiCategory::Underweight {
            precautions.push("Ensure adequate calorie intake to support exercise".to_string());
            precautions.push("Focus on strength training to build healthy muscle mass".to_string());
        }

        if precautions.is_empty() {
            precautions.push(
                "No specific precautions - listen to your body and stay hydrated".to_string(),
            );
        }

        precautions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, GoalStatus, GoalType, Intensity};
    use chrono::{NaiveDate, NaiveTime};
    use uuid::Uuid;

    fn profile(weight_kg: f64, height_cm: f64, age: u8) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            first_name: "Test".to_string(),
            last_name: None,
            age,
            gender: Gender::Female,
            weight_kg,
            height_cm,
        }
    }

    fn goal(weekly_workout_days: u8) -> WorkoutGoal {
        WorkoutGoal {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            goal_type: GoalType::Maintenance,
            target_date: None,
            target_weight_kg: None,
            weekly_workout_days,
            status: GoalStatus::Active,
            notes: None,
        }
    }

    fn sleep(duration: f64, quality: SleepQuality) -> SleepRecord {
        SleepRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            bedtime: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            waketime: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            duration_hours: duration,
            quality,
            notes: None,
        }
    }

    fn template(
        name: &str,
        category: WorkoutCategory,
        intensity: Intensity,
        duration: Option<u16>,
    ) -> WorkoutTemplate {
        WorkoutTemplate {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category,
            intensity,
            duration_minutes: duration,
            bmi_category: BmiCategory::Normal,
            goal_type: None,
            description: None,
        }
    }

    fn catalog() -> Vec<WorkoutTemplate> {
        vec![
            template("Running", WorkoutCategory::Cardio, Intensity::High, Some(30)),
            template("Cycling", WorkoutCategory::Cardio, Intensity::Moderate, Some(45)),
            template("Squats", WorkoutCategory::Strength, Intensity::High, Some(60)),
            template("Push-ups", WorkoutCategory::Strength, Intensity::Moderate, Some(20)),
            template("Yoga Flow", WorkoutCategory::Flexibility, Intensity::Low, Some(30)),
            template("Single-leg Stand", WorkoutCategory::Balance, Intensity::Low, None),
        ]
    }

    #[test]
    fn test_adjustment_factor_rules() {
        let adj = IntensityAdjustment::from_sleep(SleepQuality::Poor, 8.0);
        assert_eq!(adj.factor, 0.7);
        let adj = IntensityAdjustment::from_sleep(SleepQuality::Good, 4.0);
        assert_eq!(adj.factor, 0.7);
        let adj = IntensityAdjustment::from_sleep(SleepQuality::Fair, 8.0);
        assert_eq!(adj.factor, 0.85);
        let adj = IntensityAdjustment::from_sleep(SleepQuality::Good, 5.5);
        assert_eq!(adj.factor, 0.85);
        let adj = IntensityAdjustment::from_sleep(SleepQuality::Good, 9.5);
        assert_eq!(adj.factor, 0.9);
        let adj = IntensityAdjustment::from_sleep(SleepQuality::Good, 7.0);
        assert_eq!(adj.factor, 1.0);
        assert_eq!(adj.reason, "Optimal sleep - full intensity recommended");
    }

    #[test]
    fn test_poor_sleep_downgrades_and_scales() {
        let templates = vec![template(
            "Intervals",
            WorkoutCategory::Cardio,
            Intensity::High,
            Some(60),
        )];
        let adjustment = IntensityAdjustment::from_sleep(SleepQuality::Poor, 4.0);
        assert_eq!(adjustment.factor, 0.7);

        let categorized = ExercisePlanner::adjust_and_categorize(&templates, adjustment);
        let adjusted = &categorized.cardio[0];
        assert_eq!(adjusted.intensity, Intensity::Moderate);
        assert_eq!(adjusted.duration_minutes, Some(42));
        assert_eq!(
            adjusted.sleep_adjustment,
            "Reduced intensity due to poor sleep quality/duration"
        );
    }

    #[test]
    fn test_low_intensity_never_drops_further() {
        let templates = vec![template(
            "Stretch",
            WorkoutCategory::Flexibility,
            Intensity::Low,
            Some(20),
        )];
        let adjustment = IntensityAdjustment::from_sleep(SleepQuality::Poor, 4.0);
        let categorized = ExercisePlanner::adjust_and_categorize(&templates, adjustment);
        assert_eq!(categorized.flexibility[0].intensity, Intensity::Low);
    }

    #[test]
    fn test_full_intensity_passes_templates_through() {
        let categorized = ExercisePlanner::adjust_and_categorize(
            &catalog(),
            IntensityAdjustment::from_sleep(SleepQuality::Good, 8.0),
        );
        assert_eq!(categorized.cardio[0].intensity, Intensity::High);
        assert_eq!(categorized.cardio[0].duration_minutes, Some(30));
        assert_eq!(categorized.balance.len(), 1);
    }

    #[test]
    fn test_weekly_schedule_day_stepping() {
        let categorized = ExercisePlanner::adjust_and_categorize(
            &catalog(),
            IntensityAdjustment::from_sleep(SleepQuality::Good, 8.0),
        );
        let schedule = ExercisePlanner::weekly_schedule(&categorized, 5);

        let days: Vec<&str> = schedule.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(days, vec!["Monday", "Wednesday", "Friday", "Sunday", "Tuesday"]);

        assert_eq!(schedule[0].focus, "Strength Training");
        assert_eq!(schedule[0].duration, "45-60 minutes");
        assert_eq!(schedule[1].focus, "Cardio");
        assert_eq!(schedule[1].duration, "30-45 minutes");
        assert_eq!(schedule[2].focus, "Strength Training");

        // Flexibility attaches on workouts 0 and 3
        assert!(schedule[0].additional.is_some());
        assert!(schedule[1].additional.is_none());
        assert!(schedule[2].additional.is_none());
        assert!(schedule[3].additional.is_some());
        assert_eq!(
            schedule[0].additional.as_ref().unwrap().duration,
            "15 minutes"
        );
    }

    #[test]
    fn test_schedule_slices_exercise_lists() {
        let mut templates = catalog();
        for i in 0..6 {
            templates.push(template(
                &format!("Lift {}", i),
                WorkoutCategory::Strength,
                Intensity::Moderate,
                Some(30),
            ));
        }
        let categorized = ExercisePlanner::adjust_and_categorize(
            &templates,
            IntensityAdjustment::from_sleep(SleepQuality::Good, 8.0),
        );
        let schedule = ExercisePlanner::weekly_schedule(&categorized, 2);
        assert_eq!(schedule[0].exercises.len(), 4);
        assert!(schedule[1].exercises.len() <= 3);
    }

    #[test]
    fn test_no_goal_defaults_to_three_days() {
        let plan =
            ExercisePlanner::generate_plan(&profile(65.0, 170.0, 30), None, None, &catalog());
        assert_eq!(plan.weekly_schedule.len(), 3);
    }

    #[test]
    fn test_goal_sets_workout_days() {
        let g = goal(6);
        let plan = ExercisePlanner::generate_plan(
            &profile(65.0, 170.0, 30),
            Some(&g),
            None,
            &catalog(),
        );
        assert_eq!(plan.weekly_schedule.len(), 6);
    }

    #[test]
    fn test_missing_sleep_plans_full_intensity() {
        let plan =
            ExercisePlanner::generate_plan(&profile(65.0, 170.0, 30), None, None, &catalog());
        assert_eq!(
            plan.suggestions.cardio[0].sleep_adjustment,
            "Optimal sleep - full intensity recommended"
        );
        assert_eq!(plan.suggestions.cardio[0].intensity, Intensity::High);
    }

    #[test]
    fn test_recovery_tips_rules() {
        let tips = ExercisePlanner::recovery_tips(SleepQuality::Good, 8.0);
        assert_eq!(tips.len(), 2);
        assert_eq!(tips[0], "Stay hydrated throughout the day");

        let tips = ExercisePlanner::recovery_tips(SleepQuality::Poor, 5.0);
        assert_eq!(tips.len(), 7);
        assert_eq!(tips[0], "Prioritize sleep - aim for 7-9 hours nightly");
    }

    #[test]
    fn test_precaution_rules() {
        let p = ExercisePlanner::precautions(BmiCategory::Normal, 30);
        assert_eq!(
            p,
            vec!["No specific precautions - listen to your body and stay hydrated".to_string()]
        );

        let p = ExercisePlanner::precautions(BmiCategory::Obesity, 55);
        assert_eq!(p.len(), 6);

        let p = ExercisePlanner::precautions(BmiCategory::Underweight, 25);
        assert_eq!(p.len(), 2);
        assert_eq!(
            p[0],
            "Ensure adequate calorie intake to support exercise"
        );
    }

    #[test]
    fn test_plan_is_deterministic() {
        let p = profile(90.0, 175.0, 52);
        let g = goal(4);
        let s = sleep(5.5, SleepQuality::Fair);
        let templates = catalog();
        let first = ExercisePlanner::generate_plan(&p, Some(&g), Some(&s), &templates);
        let second = ExercisePlanner::generate_plan(&p, Some(&g), Some(&s), &templates);
        assert_eq!(first, second);
    }
}
