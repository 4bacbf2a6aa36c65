//! Goal reminders
//!
//! Computes deadline countdowns, progress estimates, urgency tiers, and
//! human-readable reminder messages for a user's active goals. Date
//! arithmetic takes `today` as an argument so the pipeline stays a pure
//! function of its inputs; wall-clock reads belong to the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{GoalType, UserProfile, WorkoutGoal};
use crate::store::SnapshotStore;

/// How far behind the expected progress curve a goal is allowed to fall
/// before escalating
const HIGH_DEFICIT: f64 = 20.0;
const MEDIUM_DEFICIT: f64 = 10.0;

/// Urgency tier for a goal reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        }
    }
}

/// Progress estimate toward a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    /// Percentage toward completion, clamped to 100
    pub percentage: f64,

    /// Progress description embedded in reminder messages
    pub message: String,
}

/// One reminder record per active goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalReminder {
    pub goal_id: Uuid,

    pub goal_type: GoalType,

    pub target_date: Option<NaiveDate>,

    /// Days until the target date; negative when overdue, None when the goal
    /// has no deadline
    pub days_left: Option<i64>,

    pub progress: f64,

    pub message: String,

    pub urgency: Urgency,
}

/// Core goal reminder engine
pub struct ReminderEngine;

impl ReminderEngine {
    /// Fetch a user's snapshot and build reminders for every active goal
    ///
    /// Fails with `ProfileNotFound` when the user does not exist; the
    /// reminders need the current weight for weight-loss progress.
    pub fn for_user(
        store: &dyn SnapshotStore,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<GoalReminder>> {
        let profile = store.get_user_profile(user_id)?;
        let goals = store.list_active_goals(user_id)?;

        tracing::debug!(
            user_id = %user_id,
            active_goals = goals.len(),
            "building goal reminders"
        );

        Ok(Self::goal_reminders(&goals, &profile, today))
    }

    /// Build one reminder per goal from an already-fetched snapshot
    pub fn goal_reminders(
        goals: &[WorkoutGoal],
        profile: &UserProfile,
        today: NaiveDate,
    ) -> Vec<GoalReminder> {
        goals
            .iter()
            .map(|goal| {
                let days_left = Self::days_left(goal.target_date, today);
                let progress = Self::goal_progress(goal, profile);

                GoalReminder {
                    goal_id: goal.id,
                    goal_type: goal.goal_type,
                    target_date: goal.target_date,
                    days_left,
                    progress: progress.percentage,
                    message: Self::reminder_message(goal.goal_type, days_left, &progress),
                    urgency: Self::urgency(days_left, progress.percentage),
                }
            })
            .collect()
    }

    /// Whole days until the target date; negative once the deadline passed
    pub fn days_left(target_date: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
        target_date.map(|target| (target - today).num_days())
    }

    /// Progress toward the goal
    ///
    /// Weight loss uses the current weight as a stand-in for the starting
    /// weight: no baseline is stored, so computed loss is zero and the
    /// percentage reflects only whether a target weight exists. The other
    /// goal types report fixed placeholder percentages until session-level
    /// tracking exists.
    pub fn goal_progress(goal: &WorkoutGoal, profile: &UserProfile) -> GoalProgress {
        match goal.goal_type {
            GoalType::WeightLoss => {
                if let Some(target_weight) = goal.target_weight_kg {
                    let start_weight = profile.weight_kg;
                    let total_to_lose = start_weight - target_weight;
                    let current_loss = start_weight - profile.weight_kg;
                    let percentage = if total_to_lose > 0.0 {
                        (current_loss / total_to_lose * 100.0).min(100.0)
                    } else {
                        0.0
                    };
                    GoalProgress {
                        percentage,
                        message: format!(
                            "Lost {:.1}kg of {:.1}kg target",
                            current_loss, total_to_lose
                        ),
                    }
                } else {
                    GoalProgress {
                        percentage: 0.0,
                        message: String::new(),
                    }
                }
            }
            GoalType::MuscleGain => GoalProgress {
                percentage: 25.0,
                message: "Track your strength progress in workout sessions".to_string(),
            },
            GoalType::Endurance => GoalProgress {
                percentage: 40.0,
                message: "Monitor your cardio performance improvements".to_string(),
            },
            GoalType::Maintenance => GoalProgress {
                percentage: 50.0,
                message: "Keep working towards your goal".to_string(),
            },
        }
    }

    /// Reminder text selected by deadline proximity
    pub fn reminder_message(
        goal_type: GoalType,
        days_left: Option<i64>,
        progress: &GoalProgress,
    ) -> String {
        let Some(days) = days_left else {
            return format!(
                "Continue working on your {} goal. Progress: {}%",
                goal_type.label(),
                progress.percentage
            );
        };

        if days < 0 {
            format!("Goal deadline passed! {}", progress.message)
        } else if days <= 7 {
            format!("Only {} days left! {}", days, progress.message)
        } else if days <= 30 {
            format!(
                "{} days remaining for your goal. Progress: {}%",
                days, progress.percentage
            )
        } else {
            format!(
                "You have {} days to achieve your {} goal",
                days,
                goal_type.label()
            )
        }
    }

    /// Urgency from the deficit against an expected-progress curve
    ///
    /// The curve assumes a 90-day goal horizon: expected = (1 − days/90)·100,
    /// pinned to 100 once the deadline arrives.
    pub fn urgency(days_left: Option<i64>, progress: f64) -> Urgency {
        let Some(days) = days_left else {
            return Urgency::Low;
        };

        let expected = if days > 0 {
            (1.0 - days as f64 / 90.0) * 100.0
        } else {
            100.0
        };

        if progress < expected - HIGH_DEFICIT {
            Urgency::High
        } else if progress < expected - MEDIUM_DEFICIT {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }
}
