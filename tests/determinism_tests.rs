use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;
use uuid::Uuid;

use wellrs::exercise::ExercisePlanner;
use wellrs::models::{
    ActivityRecord, BmiCategory, Gender, GoalStatus, GoalType, Intensity, SleepQuality,
    SleepRecord, UserProfile, WorkoutCategory, WorkoutGoal, WorkoutTemplate,
};
use wellrs::nutrition::{ActivityLevel, NutritionPlanner};
use wellrs::reminders::{ReminderEngine, Urgency};
use wellrs::sleep::SleepAnalyzer;

/// Property tests for the pure engines: identical snapshots must produce
/// identical output, and score-like values must stay in range.

fn gender_strategy() -> impl Strategy<Value = Gender> {
    prop_oneof![
        Just(Gender::Male),
        Just(Gender::Female),
        Just(Gender::Other)
    ]
}

fn goal_type_strategy() -> impl Strategy<Value = GoalType> {
    prop_oneof![
        Just(GoalType::WeightLoss),
        Just(GoalType::MuscleGain),
        Just(GoalType::Maintenance),
        Just(GoalType::Endurance)
    ]
}

fn quality_strategy() -> impl Strategy<Value = SleepQuality> {
    prop_oneof![
        Just(SleepQuality::Poor),
        Just(SleepQuality::Fair),
        Just(SleepQuality::Good),
        Just(SleepQuality::Excellent)
    ]
}

fn category_strategy() -> impl Strategy<Value = WorkoutCategory> {
    prop_oneof![
        Just(WorkoutCategory::Cardio),
        Just(WorkoutCategory::Strength),
        Just(WorkoutCategory::Flexibility),
        Just(WorkoutCategory::Balance)
    ]
}

fn intensity_strategy() -> impl Strategy<Value = Intensity> {
    prop_oneof![
        Just(Intensity::Low),
        Just(Intensity::Moderate),
        Just(Intensity::High)
    ]
}

fn profile_strategy() -> impl Strategy<Value = UserProfile> {
    (18u8..80, gender_strategy(), 45.0f64..150.0, 150.0f64..200.0).prop_map(
        |(age, gender, weight_kg, height_cm)| UserProfile {
            id: Uuid::nil(),
            first_name: "Prop".to_string(),
            last_name: None,
            age,
            gender,
            weight_kg,
            height_cm,
        },
    )
}

fn goal_strategy() -> impl Strategy<Value = WorkoutGoal> {
    (goal_type_strategy(), 1u8..=7).prop_map(|(goal_type, weekly_workout_days)| WorkoutGoal {
        id: Uuid::nil(),
        user_id: Uuid::nil(),
        goal_type,
        target_date: None,
        target_weight_kg: None,
        weekly_workout_days,
        status: GoalStatus::Active,
        notes: None,
    })
}

fn sleep_strategy() -> impl Strategy<Value = SleepRecord> {
    (1.0f64..14.0, quality_strategy()).prop_map(|(duration_hours, quality)| SleepRecord {
        id: Uuid::nil(),
        user_id: Uuid::nil(),
        date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        bedtime: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
        waketime: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
        duration_hours,
        quality,
        notes: None,
    })
}

fn activity_strategy() -> impl Strategy<Value = ActivityRecord> {
    (
        proptest::option::of(0u32..25000),
        proptest::option::of(0.0f64..5.0),
    )
        .prop_map(|(steps, water_intake_liters)| ActivityRecord {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            steps,
            water_intake_liters,
        })
}

fn template_strategy() -> impl Strategy<Value = WorkoutTemplate> {
    (
        "[A-Z][a-z]{2,10}",
        category_strategy(),
        intensity_strategy(),
        proptest::option::of(5u16..120),
    )
        .prop_map(|(name, category, intensity, duration_minutes)| WorkoutTemplate {
            id: Uuid::nil(),
            name,
            category,
            intensity,
            duration_minutes,
            bmi_category: BmiCategory::Normal,
            goal_type: None,
            description: None,
        })
}

proptest! {
    #[test]
    fn nutrition_plan_is_deterministic(
        profile in profile_strategy(),
        goal in proptest::option::of(goal_strategy()),
        activity in proptest::option::of(activity_strategy()),
    ) {
        let first = NutritionPlanner::generate_plan(&profile, goal.as_ref(), activity.as_ref());
        let second = NutritionPlanner::generate_plan(&profile, goal.as_ref(), activity.as_ref());
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn exercise_plan_is_deterministic(
        profile in profile_strategy(),
        goal in proptest::option::of(goal_strategy()),
        sleep in proptest::option::of(sleep_strategy()),
        templates in proptest::collection::vec(template_strategy(), 0..12),
    ) {
        let first =
            ExercisePlanner::generate_plan(&profile, goal.as_ref(), sleep.as_ref(), &templates);
        let second =
            ExercisePlanner::generate_plan(&profile, goal.as_ref(), sleep.as_ref(), &templates);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn nutrition_targets_stay_positive(
        profile in profile_strategy(),
        goal in proptest::option::of(goal_strategy()),
        activity in proptest::option::of(activity_strategy()),
    ) {
        let plan = NutritionPlanner::generate_plan(&profile, goal.as_ref(), activity.as_ref());
        prop_assert!(plan.daily_calories > 0);
        prop_assert!(plan.macronutrients.protein.grams > 0);
        prop_assert!(plan.hydration.total_liters > 0.0);
        prop_assert_eq!(plan.hydration.schedule.len(), 7);
        prop_assert!(plan.supplements.len() >= 3);
    }

    #[test]
    fn activity_buckets_are_exhaustive_and_ordered(steps in 0u32..50000) {
        let level = ActivityLevel::from_steps(steps);
        let multiplier = level.tdee_multiplier();
        prop_assert!((1.2..=1.9).contains(&multiplier));
        // More steps never yields a smaller multiplier
        let next = ActivityLevel::from_steps(steps + 1);
        prop_assert!(next.tdee_multiplier() >= multiplier);
    }

    #[test]
    fn sleep_analysis_scores_stay_in_range(
        records in proptest::collection::vec(sleep_strategy(), 0..40),
    ) {
        let analysis = SleepAnalyzer::analyze_patterns(&records);
        prop_assert!((0.0..=100.0).contains(&analysis.consistency_score));
        prop_assert!((0.0..=100.0).contains(&analysis.sleep_efficiency));
        prop_assert!((0.0..=100.0).contains(&analysis.optimal_sleep_percentage));
        prop_assert!(!analysis.recommendations.is_empty());

        // Analysis itself is deterministic
        let again = SleepAnalyzer::analyze_patterns(&records);
        prop_assert_eq!(analysis, again);
    }

    #[test]
    fn weekly_schedule_length_matches_workout_days(
        profile in profile_strategy(),
        goal in goal_strategy(),
        templates in proptest::collection::vec(template_strategy(), 0..12),
    ) {
        let plan = ExercisePlanner::generate_plan(&profile, Some(&goal), None, &templates);
        prop_assert_eq!(
            plan.weekly_schedule.len(),
            usize::from(goal.weekly_workout_days)
        );
        prop_assert!(!plan.precautions.is_empty());
    }

    #[test]
    fn undated_goals_never_escalate(progress in 0.0f64..100.0) {
        prop_assert_eq!(ReminderEngine::urgency(None, progress), Urgency::Low);
    }
}
