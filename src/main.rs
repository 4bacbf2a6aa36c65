use anyhow::Result;
use chrono::{Duration, Local, NaiveTime};
use clap::{Parser, Subcommand};
use colored::*;
use std::fs;
use std::path::PathBuf;
use tabled::{Table, Tabled};
use uuid::Uuid;

use wellrs::config::{default_config_path, AppConfig};
use wellrs::logging::{init_logging, LogLevel};
use wellrs::models::{
    ActivityRecord, BmiCategory, Gender, GoalStatus, GoalType, Intensity, SleepQuality,
    SleepRecord, UserProfile, WorkoutCategory, WorkoutGoal, WorkoutTemplate,
};
use wellrs::reminders::ReminderEngine;
use wellrs::sleep::AnalysisPeriod;
use wellrs::store::SqliteStore;
use wellrs::suggestions::SuggestionEngine;

/// wellrs - Wellness Suggestion Engine CLI
///
/// Rule-based nutrition and exercise suggestions, sleep pattern analysis,
/// and goal reminders over a local wellness database.
#[derive(Parser)]
#[command(name = "wellrs")]
#[command(version = "0.1.0")]
#[command(about = "Wellness Suggestion Engine CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to the wellness database (overrides config)
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Emit results as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate personalized nutrition and exercise suggestions
    Suggest {
        /// User ID
        #[arg(short, long)]
        user: Uuid,
    },

    /// Analyze sleep patterns over a period
    Sleep {
        /// User ID
        #[arg(short, long)]
        user: Uuid,

        /// Analysis period: week, month, year, or a number of days
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Show reminders for active goals
    Reminders {
        /// User ID
        #[arg(short, long)]
        user: Uuid,
    },

    /// Seed the database with a demo user and template catalog
    SeedDemo,

    /// Print the resolved configuration
    Config,
}

#[derive(Tabled)]
struct ScheduleRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Focus")]
    focus: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Exercises")]
    exercises: String,
}

#[derive(Tabled)]
struct ReminderRow {
    #[tabled(rename = "Goal")]
    goal: String,
    #[tabled(rename = "Days left")]
    days_left: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Urgency")]
    urgency: String,
    #[tabled(rename = "Message")]
    message: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config = AppConfig::load_or_default(&config_path)?;

    match cli.verbose {
        0 => {}
        1 => config.logging.level = LogLevel::Info,
        2 => config.logging.level = LogLevel::Debug,
        _ => config.logging.level = LogLevel::Trace,
    }
    init_logging(&config.logging)?;

    if let Commands::Config = cli.command {
        println!("{}", format!("Config file: {}", config_path.display()).dimmed());
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let db_path = cli.db.clone().unwrap_or_else(|| config.database_path());
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::open(&db_path)?;

    match cli.command {
        Commands::Suggest { user } => {
            let engine = SuggestionEngine::new(&store);
            let suggestions = engine.personalized_suggestions(user)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
                return Ok(());
            }

            println!("{}", "Nutrition".green().bold());
            println!(
                "  Daily calories: {}",
                suggestions.nutrition.daily_calories.to_string().bold()
            );
            let macros = &suggestions.nutrition.macronutrients;
            println!(
                "  Macros: {}g protein / {}g carbs / {}g fat",
                macros.protein.grams, macros.carbohydrates.grams, macros.fat.grams
            );
            println!(
                "  Hydration: {} L/day",
                suggestions.nutrition.hydration.total_liters
            );
            println!(
                "  Supplements: {}",
                suggestions
                    .nutrition
                    .supplements
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );

            println!();
            println!("{}", "Weekly schedule".blue().bold());
            let rows: Vec<ScheduleRow> = suggestions
                .exercises
                .weekly_schedule
                .iter()
                .map(|d| ScheduleRow {
                    day: d.day.clone(),
                    focus: d.focus.clone(),
                    duration: d.duration.clone(),
                    exercises: d
                        .exercises
                        .iter()
                        .map(|e| e.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                })
                .collect();
            println!("{}", Table::new(rows));

            if !suggestions.exercises.precautions.is_empty() {
                println!();
                println!("{}", "Precautions".yellow().bold());
                for p in &suggestions.exercises.precautions {
                    println!("  • {}", p);
                }
            }

            if !suggestions.overall_recommendations.is_empty() {
                println!();
                println!("{}", "Overall recommendations".cyan().bold());
                for r in &suggestions.overall_recommendations {
                    println!("  • {}", r);
                }
            }
        }

        Commands::Sleep { user, period } => {
            let period_str =
                period.unwrap_or_else(|| config.settings.default_analysis_period.clone());
            let period: AnalysisPeriod = period_str
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;

            let engine = SuggestionEngine::new(&store);
            let today = Local::now().date_naive();
            let analysis = engine.sleep_analysis(user, period, today)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
                return Ok(());
            }

            println!("{}", "Sleep analysis".blue().bold());
            println!("  Average duration: {} h", analysis.average_duration);
            println!("  Average quality: {} / 4", analysis.average_quality);
            println!("  Consistency: {}", analysis.consistency_score);
            println!("  Trend: {:?}", analysis.quality_trend);
            println!("  Efficiency: {:.1}%", analysis.sleep_efficiency);
            println!(
                "  Optimal nights: {:.0}%",
                analysis.optimal_sleep_percentage
            );

            println!();
            println!("{}", "Recommendations".green().bold());
            for r in &analysis.recommendations {
                println!("  • {}", r);
            }
            if !analysis.risk_factors.is_empty() {
                println!();
                println!("{}", "Risk factors".red().bold());
                for r in &analysis.risk_factors {
                    println!("  • {}", r);
                }
            }
        }

        Commands::Reminders { user } => {
            let today = Local::now().date_naive();
            let reminders = ReminderEngine::for_user(&store, user, today)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&reminders)?);
                return Ok(());
            }

            if reminders.is_empty() {
                println!("{}", "No active goals".dimmed());
                return Ok(());
            }

            let rows: Vec<ReminderRow> = reminders
                .iter()
                .map(|r| ReminderRow {
                    goal: r.goal_type.label().to_string(),
                    days_left: r
                        .days_left
                        .map_or_else(|| "-".to_string(), |d| d.to_string()),
                    progress: format!("{}%", r.progress),
                    urgency: r.urgency.as_str().to_string(),
                    message: r.message.clone(),
                })
                .collect();
            println!("{}", Table::new(rows));
        }

        Commands::SeedDemo => {
            let user_id = seed_demo(&store)?;
            println!("{}", "✓ Demo data seeded".green());
            println!("  User ID: {}", user_id.to_string().bold());
            println!("  Try: wellrs suggest --user {}", user_id);
        }

        Commands::Config => unreachable!("handled above"),
    }

    Ok(())
}

/// Insert a demo user with a weight-loss goal, recent sleep and activity
/// logs, and a small template catalog matching the user's snapshot.
fn seed_demo(store: &SqliteStore) -> Result<Uuid> {
    let today = Local::now().date_naive();

    let profile = UserProfile {
        id: Uuid::new_v4(),
        first_name: "Alex".to_string(),
        last_name: Some("Rivera".to_string()),
        age: 34,
        gender: Gender::Male,
        weight_kg: 82.0,
        height_cm: 178.0,
    };
    store.upsert_user(&profile)?;

    let goal = WorkoutGoal {
        id: Uuid::new_v4(),
        user_id: profile.id,
        goal_type: GoalType::WeightLoss,
        target_date: Some(today + Duration::days(45)),
        target_weight_kg: Some(76.0),
        weekly_workout_days: WorkoutGoal::DEFAULT_WEEKLY_WORKOUT_DAYS,
        status: GoalStatus::Active,
        notes: Some("Summer target".to_string()),
    };
    store.insert_goal(&goal)?;

    let nights = [
        (7.5, SleepQuality::Good),
        (6.0, SleepQuality::Fair),
        (8.0, SleepQuality::Good),
        (5.5, SleepQuality::Poor),
        (7.0, SleepQuality::Good),
        (8.5, SleepQuality::Excellent),
        (6.5, SleepQuality::Fair),
        (7.5, SleepQuality::Good),
        (8.0, SleepQuality::Good),
        (7.0, SleepQuality::Good),
    ];
    for (i, (duration, quality)) in nights.iter().enumerate() {
        let date = today - Duration::days((nights.len() - i) as i64);
        store.insert_sleep_record(&SleepRecord {
            id: Uuid::new_v4(),
            user_id: profile.id,
            date,
            bedtime: NaiveTime::from_hms_opt(23, 0, 0).expect("valid time"),
            waketime: NaiveTime::from_hms_opt(7, 0, 0).expect("valid time"),
            duration_hours: *duration,
            quality: *quality,
            notes: None,
        })?;
    }

    store.insert_activity_record(&ActivityRecord {
        id: Uuid::new_v4(),
        user_id: profile.id,
        date: today - Duration::days(1),
        steps: Some(6500),
        water_intake_liters: Some(1.8),
    })?;

    seed_templates(store, profile.bmi_category(), goal.goal_type)?;

    Ok(profile.id)
}

fn seed_templates(
    store: &SqliteStore,
    bmi_category: BmiCategory,
    goal_type: GoalType,
) -> Result<()> {
    let catalog: [(&str, WorkoutCategory, Intensity, Option<u16>); 10] = [
        ("Brisk Walking", WorkoutCategory::Cardio, Intensity::Low, Some(40)),
        ("Stationary Cycling", WorkoutCategory::Cardio, Intensity::Moderate, Some(35)),
        ("Swimming Laps", WorkoutCategory::Cardio, Intensity::Moderate, Some(30)),
        ("Interval Rowing", WorkoutCategory::Cardio, Intensity::High, Some(25)),
        ("Goblet Squats", WorkoutCategory::Strength, Intensity::Moderate, Some(20)),
        ("Dumbbell Press", WorkoutCategory::Strength, Intensity::Moderate, Some(20)),
        ("Deadlifts", WorkoutCategory::Strength, Intensity::High, Some(25)),
        ("Resistance Band Circuit", WorkoutCategory::Strength, Intensity::Low, Some(30)),
        ("Sun Salutation Flow", WorkoutCategory::Flexibility, Intensity::Low, Some(15)),
        ("Single-leg Balance", WorkoutCategory::Balance, Intensity::Low, Some(10)),
    ];

    for (name, category, intensity, duration_minutes) in catalog {
        store.insert_template(&WorkoutTemplate {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category,
            intensity,
            duration_minutes,
            bmi_category,
            goal_type: Some(goal_type),
            description: None,
        })?;
    }

    Ok(())
}
