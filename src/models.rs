use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Gender as declared on the user profile, used to select the
/// Harris-Benedict coefficient set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(format!("Invalid gender: {}", s)),
        }
    }
}

/// BMI classification buckets
///
/// Boundaries: <18.5 Underweight, <25 Normal, <30 Overweight, ≥30 Obesity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obesity,
}

impl BmiCategory {
    /// Classify a BMI value into its bucket
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obesity
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "underweight",
            BmiCategory::Normal => "normal",
            BmiCategory::Overweight => "overweight",
            BmiCategory::Obesity => "obesity",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BmiCategory::Underweight => write!(f, "Underweight"),
            BmiCategory::Normal => write!(f, "Normal weight"),
            BmiCategory::Overweight => write!(f, "Overweight"),
            BmiCategory::Obesity => write!(f, "Obesity"),
        }
    }
}

impl FromStr for BmiCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "underweight" => Ok(BmiCategory::Underweight),
            "normal" => Ok(BmiCategory::Normal),
            "overweight" => Ok(BmiCategory::Overweight),
            "obesity" => Ok(BmiCategory::Obesity),
            _ => Err(format!("Invalid BMI category: {}", s)),
        }
    }
}

/// Read-only user snapshot consumed by the planning engines
///
/// BMI and its category are derived on every read, never stored, so they
/// cannot go stale against the weight/height they are computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user identifier
    pub id: Uuid,

    pub first_name: String,

    pub last_name: Option<String>,

    /// Age in years
    pub age: u8,

    pub gender: Gender,

    /// Body weight in kilograms
    pub weight_kg: f64,

    /// Height in centimeters
    pub height_cm: f64,
}

impl UserProfile {
    /// Body Mass Index: weight(kg) / (height(m))²
    pub fn bmi(&self) -> f64 {
        let height_m = self.height_cm / 100.0;
        self.weight_kg / (height_m * height_m)
    }

    /// BMI bucket derived from the current weight and height
    pub fn bmi_category(&self) -> BmiCategory {
        BmiCategory::from_bmi(self.bmi())
    }
}

/// Workout goal types supported by the planners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    WeightLoss,
    MuscleGain,
    Maintenance,
    Endurance,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::WeightLoss => "weight_loss",
            GoalType::MuscleGain => "muscle_gain",
            GoalType::Maintenance => "maintenance",
            GoalType::Endurance => "endurance",
        }
    }

    /// Human-readable form used in reminder messages ("weight loss")
    pub fn label(&self) -> &'static str {
        match self {
            GoalType::WeightLoss => "weight loss",
            GoalType::MuscleGain => "muscle gain",
            GoalType::Maintenance => "maintenance",
            GoalType::Endurance => "endurance",
        }
    }
}

impl FromStr for GoalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weight_loss" => Ok(GoalType::WeightLoss),
            "muscle_gain" => Ok(GoalType::MuscleGain),
            "maintenance" => Ok(GoalType::Maintenance),
            "endurance" => Ok(GoalType::Endurance),
            _ => Err(format!("Invalid goal type: {}", s)),
        }
    }
}

/// Goal lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
    Abandoned,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
            GoalStatus::Abandoned => "abandoned",
        }
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(GoalStatus::Active),
            "completed" => Ok(GoalStatus::Completed),
            "abandoned" => Ok(GoalStatus::Abandoned),
            _ => Err(format!("Invalid goal status: {}", s)),
        }
    }
}

/// A user's declared workout goal
///
/// At most one active goal per user is expected for planning purposes; the
/// engine takes the first one found. Multiple active goals is a data-quality
/// condition in the store, not something the engines enforce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutGoal {
    pub id: Uuid,

    pub user_id: Uuid,

    pub goal_type: GoalType,

    /// Deadline for the goal, if one was set
    pub target_date: Option<NaiveDate>,

    /// Target body weight in kilograms (weight-loss goals)
    pub target_weight_kg: Option<f64>,

    /// Planned workout days per week (1-7)
    pub weekly_workout_days: u8,

    pub status: GoalStatus,

    pub notes: Option<String>,
}

impl WorkoutGoal {
    /// Default planned workout days when none were chosen
    pub const DEFAULT_WEEKLY_WORKOUT_DAYS: u8 = 4;
}

/// Subjective sleep quality rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SleepQuality {
    /// Numeric score used by the pattern analyzer: poor=1 .. excellent=4
    pub fn score(&self) -> u8 {
        match self {
            SleepQuality::Poor => 1,
            SleepQuality::Fair => 2,
            SleepQuality::Good => 3,
            SleepQuality::Excellent => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SleepQuality::Poor => "poor",
            SleepQuality::Fair => "fair",
            SleepQuality::Good => "good",
            SleepQuality::Excellent => "excellent",
        }
    }
}

impl FromStr for SleepQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "poor" => Ok(SleepQuality::Poor),
            "fair" => Ok(SleepQuality::Fair),
            "good" => Ok(SleepQuality::Good),
            "excellent" => Ok(SleepQuality::Excellent),
            _ => Err(format!("Invalid sleep quality: {}", s)),
        }
    }
}

/// One night of logged sleep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepRecord {
    pub id: Uuid,

    pub user_id: Uuid,

    pub date: NaiveDate,

    pub bedtime: NaiveTime,

    pub waketime: NaiveTime,

    /// Time asleep in hours
    pub duration_hours: f64,

    pub quality: SleepQuality,

    pub notes: Option<String>,
}

/// One day of logged activity
///
/// Only `steps` (activity-level bucket) and `water_intake_liters` (hydration
/// recommendation trigger) are consumed by the engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: Uuid,

    pub user_id: Uuid,

    pub date: NaiveDate,

    pub steps: Option<u32>,

    pub water_intake_liters: Option<f64>,
}

/// Workout template categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutCategory {
    Cardio,
    Strength,
    Flexibility,
    Balance,
}

impl WorkoutCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutCategory::Cardio => "cardio",
            WorkoutCategory::Strength => "strength",
            WorkoutCategory::Flexibility => "flexibility",
            WorkoutCategory::Balance => "balance",
        }
    }
}

impl FromStr for WorkoutCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cardio" => Ok(WorkoutCategory::Cardio),
            "strength" => Ok(WorkoutCategory::Strength),
            "flexibility" => Ok(WorkoutCategory::Flexibility),
            "balance" => Ok(WorkoutCategory::Balance),
            _ => Err(format!("Invalid workout category: {}", s)),
        }
    }
}

/// Workout intensity on an ordered three-step scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Low,
    Moderate,
    High,
}

impl Intensity {
    /// One step down the scale; Low stays Low
    pub fn downgraded(&self) -> Self {
        match self {
            Intensity::High => Intensity::Moderate,
            Intensity::Moderate => Intensity::Low,
            Intensity::Low => Intensity::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Low => "low",
            Intensity::Moderate => "moderate",
            Intensity::High => "high",
        }
    }
}

impl FromStr for Intensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Intensity::Low),
            "moderate" => Ok(Intensity::Moderate),
            "high" => Ok(Intensity::High),
            _ => Err(format!("Invalid intensity: {}", s)),
        }
    }
}

/// Catalog entry describing a suggestible workout
///
/// Treated as a read-only reference table; the store filters by the user's
/// BMI category and, when a goal exists, the goal type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    pub id: Uuid,

    pub name: String,

    pub category: WorkoutCategory,

    pub intensity: Intensity,

    /// Suggested duration in minutes, when the workout is time-boxed
    pub duration_minutes: Option<u16>,

    /// BMI bucket this template is appropriate for
    pub bmi_category: BmiCategory,

    /// Goal this template targets; None means any goal
    pub goal_type: Option<GoalType>,

    pub description: Option<String>,
}

/// Filter applied when loading the workout template catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateFilter {
    pub bmi_category: BmiCategory,
    pub goal_type: Option<GoalType>,
}

//
// ============================================================================
// MESSAGING ENTITIES
// ============================================================================
//

/// Conversation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationType {
    Direct,
    Group,
}

impl ConversationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationType::Direct => "direct",
            ConversationType::Group => "group",
        }
    }
}

impl FromStr for ConversationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(ConversationType::Direct),
            "group" => Ok(ConversationType::Group),
            _ => Err(format!("Invalid conversation type: {}", s)),
        }
    }
}

/// A direct or group conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,

    pub title: Option<String>,

    pub conversation_type: ConversationType,

    /// Bumped on every message sent; conversations list newest-first by this
    pub last_message_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

/// Role of a participant within a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    Admin,
    Participant,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantRole::Admin => "admin",
            ParticipantRole::Participant => "participant",
        }
    }
}

impl FromStr for ParticipantRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(ParticipantRole::Admin),
            "participant" => Ok(ParticipantRole::Participant),
            _ => Err(format!("Invalid participant role: {}", s)),
        }
    }
}

/// Membership row linking a user to a conversation
///
/// Unique per (conversation_id, user_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationParticipant {
    pub id: Uuid,

    pub conversation_id: Uuid,

    pub user_id: Uuid,

    pub role: ParticipantRole,

    /// High-water mark for unread bookkeeping
    pub last_read_at: DateTime<Utc>,
}

/// Message content kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Text,
    Image,
    File,
    System,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Text => "text",
            MessageType::Image => "image",
            MessageType::File => "file",
            MessageType::System => "system",
        }
    }
}

impl FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(MessageType::Text),
            "image" => Ok(MessageType::Image),
            "file" => Ok(MessageType::File),
            "system" => Ok(MessageType::System),
            _ => Err(format!("Invalid message type: {}", s)),
        }
    }
}

/// A single message within a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,

    pub conversation_id: Uuid,

    pub sender_id: Uuid,

    pub content: String,

    pub message_type: MessageType,

    /// Attachment references (paths or URLs), stored as JSON
    pub attachments: Vec<String>,

    pub created_at: DateTime<Utc>,
}
