//! Sleep pattern analysis
//!
//! Pure analysis over a chronological window of sleep records: duration and
//! quality averages, a consistency score derived from duration variability,
//! a quality trend, per-record efficiency, and rule-based recommendations and
//! risk factors.
//!
//! # Background
//!
//! - **Consistency**: irregular sleep timing disrupts the circadian rhythm.
//!   The score is `max(0, 100 - 20·σ)` where σ is the population standard
//!   deviation of nightly duration in hours.
//! - **Efficiency**: each night scores `(quality × min(duration/8, 1)) / 4`,
//!   normalized to a percentage, with 8 hours treated as optimal.
//! - **Optimal sleep**: a night with duration in [7, 9] hours and quality of
//!   good or excellent.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::str::FromStr;

use chrono::{Duration, Months, NaiveDate};

use crate::models::{SleepQuality, SleepRecord};

/// Direction of the recent duration trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTrend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

/// Result of analyzing a window of sleep records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepPatternAnalysis {
    /// Mean nightly duration in hours, rounded to 2 decimals
    pub average_duration: f64,

    /// Mean quality on the 1-4 scale, rounded to 2 decimals
    pub average_quality: f64,

    /// 0-100; 100 means perfectly regular duration night to night
    pub consistency_score: f64,

    pub quality_trend: QualityTrend,

    /// Mean per-night efficiency percentage
    pub sleep_efficiency: f64,

    /// Percentage of nights hitting the optimal duration/quality window
    pub optimal_sleep_percentage: f64,

    pub recommendations: Vec<String>,

    pub risk_factors: Vec<String>,
}

/// Analysis window requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPeriod {
    Week,
    Month,
    Year,
    /// Custom window of N days
    Days(u32),
}

impl AnalysisPeriod {
    /// Start date of the window ending at `today`
    pub fn since(&self, today: NaiveDate) -> NaiveDate {
        match self {
            AnalysisPeriod::Week => today - Duration::days(7),
            AnalysisPeriod::Month => today
                .checked_sub_months(Months::new(1))
                .unwrap_or(today),
            AnalysisPeriod::Year => today
                .checked_sub_months(Months::new(12))
                .unwrap_or(today),
            AnalysisPeriod::Days(n) => today - Duration::days(i64::from(*n)),
        }
    }
}

impl FromStr for AnalysisPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(AnalysisPeriod::Week),
            "month" => Ok(AnalysisPeriod::Month),
            "year" => Ok(AnalysisPeriod::Year),
            other => other
                .parse::<u32>()
                .map(AnalysisPeriod::Days)
                .map_err(|_| format!("Invalid analysis period: {}", other)),
        }
    }
}

/// Per-record assessment derived from one night's duration and quality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordAssessment {
    pub recommendation: String,
    pub remarks: Vec<String>,
}

/// Core sleep pattern analysis engine
pub struct SleepAnalyzer;

impl SleepAnalyzer {
    /// Analyze a chronologically ascending window of sleep records
    ///
    /// Total function: empty input yields the degenerate
    /// `insufficient_data` result rather than an error.
    pub fn analyze_patterns(records: &[SleepRecord]) -> SleepPatternAnalysis {
        if records.is_empty() {
            return SleepPatternAnalysis {
                average_duration: 0.0,
                average_quality: 0.0,
                consistency_score: 0.0,
                quality_trend: QualityTrend::InsufficientData,
                sleep_efficiency: 0.0,
                optimal_sleep_percentage: 0.0,
                recommendations: vec!["Need more sleep data for analysis".to_string()],
                risk_factors: Vec::new(),
            };
        }

        let durations: Vec<f64> = records.iter().map(|r| r.duration_hours).collect();
        let qualities: Vec<f64> = records.iter().map(|r| f64::from(r.quality.score())).collect();

        let average_duration = durations.iter().sum::<f64>() / durations.len() as f64;
        let average_quality = qualities.iter().sum::<f64>() / qualities.len() as f64;

        let duration_std_dev = durations.iter().population_std_dev();
        let consistency_score = (100.0 - duration_std_dev * 20.0).max(0.0);

        let quality_trend = Self::duration_trend(records);

        let recommendations = Self::recommendations(
            average_duration,
            average_quality,
            consistency_score,
            quality_trend,
        );
        let risk_factors =
            Self::risk_factors(average_duration, average_quality, consistency_score);

        SleepPatternAnalysis {
            average_duration: round2(average_duration),
            average_quality: round2(average_quality),
            consistency_score: round2(consistency_score),
            quality_trend,
            sleep_efficiency: Self::sleep_efficiency(records),
            recommendations,
            risk_factors,
            optimal_sleep_percentage: Self::optimal_sleep_percentage(records),
        }
    }

    /// Compare the last 7 nights against everything before them
    ///
    /// With fewer than 8 records the older window is empty and its mean
    /// defaults to the recent mean, forcing Stable.
    fn duration_trend(records: &[SleepRecord]) -> QualityTrend {
        let split = records.len().saturating_sub(7);
        let (old, recent) = records.split_at(split);

        let recent_avg = if recent.is_empty() {
            0.0
        } else {
            recent.iter().map(|r| r.duration_hours).sum::<f64>() / recent.len() as f64
        };
        let old_avg = if old.is_empty() {
            recent_avg
        } else {
            old.iter().map(|r| r.duration_hours).sum::<f64>() / old.len() as f64
        };

        if recent_avg > old_avg {
            QualityTrend::Improving
        } else if recent_avg < old_avg {
            QualityTrend::Declining
        } else {
            QualityTrend::Stable
        }
    }

    /// Mean of per-night efficiency: (quality × min(duration/8, 1)) / 4 × 100
    fn sleep_efficiency(records: &[SleepRecord]) -> f64 {
        if records.is_empty() {
            return 0.0;
        }

        let total: f64 = records
            .iter()
            .map(|r| {
                let quality_score = f64::from(r.quality.score());
                let duration_score = (r.duration_hours / 8.0).min(1.0);
                quality_score * duration_score / 4.0 * 100.0
            })
            .sum();

        total / records.len() as f64
    }

    /// Percentage of nights with duration in [7, 9] and good/excellent quality
    fn optimal_sleep_percentage(records: &[SleepRecord]) -> f64 {
        let optimal = records
            .iter()
            .filter(|r| {
                r.duration_hours >= 7.0
                    && r.duration_hours <= 9.0
                    && matches!(r.quality, SleepQuality::Good | SleepQuality::Excellent)
            })
            .count();

        optimal as f64 / records.len() as f64 * 100.0
    }

    /// Independent threshold rules; the fallback fires only when none match
    fn recommendations(
        avg_duration: f64,
        avg_quality: f64,
        consistency: f64,
        trend: QualityTrend,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        if avg_duration < 6.0 {
            recommendations.push(
                "Consider increasing sleep duration to 7-9 hours for better recovery".to_string(),
            );
        } else if avg_duration > 9.0 {
            recommendations.push(
                "Monitor if excessive sleep persists, could indicate underlying health issues"
                    .to_string(),
            );
        }

        if avg_quality < 2.5 {
            recommendations.push(
                "Improve sleep environment: dark room, cool temperature, reduce noise".to_string(),
            );
            recommendations.push(
                "Avoid screens 1 hour before bedtime and establish a consistent sleep routine"
                    .to_string(),
            );
        }

        if consistency < 70.0 {
            recommendations.push(
                "Try to maintain consistent sleep and wake times, even on weekends".to_string(),
            );
        }

        if trend == QualityTrend::Declining {
            recommendations.push(
                "Sleep quality is declining. Consider stress management techniques".to_string(),
            );
        }

        if recommendations.is_empty() {
            recommendations.push("Great sleep habits! Maintain your current routine".to_string());
        }

        recommendations
    }

    /// Independent threshold rules; may be empty
    fn risk_factors(avg_duration: f64, avg_quality: f64, consistency: f64) -> Vec<String> {
        let mut risk_factors = Vec::new();

        if avg_duration < 5.0 {
            risk_factors.push("Severe sleep deprivation risk".to_string());
        } else if avg_duration < 6.0 {
            risk_factors.push("Moderate sleep deprivation risk".to_string());
        }

        if avg_quality < 2.0 {
            risk_factors.push("Poor sleep quality affecting daily functioning".to_string());
        }

        if consistency < 50.0 {
            risk_factors.push("Irregular sleep pattern disrupting circadian rhythm".to_string());
        }

        risk_factors
    }

    /// Assess a single night, pairing a recommendation with remarks
    ///
    /// Durations above 9 hours get no duration sentence; only the quality
    /// rules contribute then.
    pub fn assess_record(record: &SleepRecord) -> RecordAssessment {
        let mut recommendation = String::new();
        let mut remarks = Vec::new();

        let duration = record.duration_hours;
        if duration < 6.0 {
            recommendation.push_str(
                "Try to increase your sleep duration to at least 7-8 hours for better health.",
            );
            remarks.push(
                "Short sleep duration can lead to various health issues including impaired cognitive function and weakened immune response."
                    .to_string(),
            );
        } else if duration < 7.0 {
            recommendation.push_str(
                "You are close to the recommended sleep duration. Aim for 7-8 hours for optimal health.",
            );
            remarks.push(
                "Adequate sleep is essential for overall well-being and daily functioning."
                    .to_string(),
            );
        } else if duration <= 9.0 {
            recommendation.push_str("Great job! You are meeting the recommended sleep duration.");
            remarks.push(
                "Maintaining a regular sleep schedule is beneficial for long-term health."
                    .to_string(),
            );
        }

        match record.quality {
            SleepQuality::Poor | SleepQuality::Fair => {
                recommendation.push_str(
                    " Consider improving your sleep quality by maintaining a consistent sleep schedule, creating a restful environment, and avoiding stimulants before bedtime.",
                );
                remarks.push(
                    "Poor sleep quality can affect mood, cognitive function, and overall health."
                        .to_string(),
                );
            }
            SleepQuality::Excellent => {
                remarks.push(
                    "Excellent sleep quality contributes significantly to physical and mental health."
                        .to_string(),
                );
            }
            SleepQuality::Good => {}
        }

        RecordAssessment {
            recommendation,
            remarks,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
