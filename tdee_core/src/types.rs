//! Core domain types for the TDEE calculator.
//!
//! This module defines the types shared across the system:
//! - Closed selector enums (gender, activity level)
//! - Raw form state exactly as the user typed it
//! - Validated calculation input
//! - Persisted history entries

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Selector Types
// ============================================================================

/// Gender as used by the Mifflin-St Jeor equation
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    /// Display label shown by selector prompts
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(format!(
                "unknown gender: {} (expected male or female)",
                other
            )),
        }
    }
}

/// Lifestyle activity bucket with its fixed TDEE multiplier
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(into = "f64", try_from = "f64")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

impl ActivityLevel {
    /// All levels in ascending multiplier order (selector contents)
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    /// Fixed multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    /// Display label shown by selector prompts
    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::LightlyActive => "Lightly active",
            ActivityLevel::ModeratelyActive => "Moderately active",
            ActivityLevel::VeryActive => "Very active",
            ActivityLevel::ExtraActive => "Extra active",
        }
    }

    /// Look up a level by its exact multiplier value.
    ///
    /// The multipliers are canonical constants that survive a JSON round
    /// trip bit-for-bit, so exact comparison is the contract here.
    pub fn from_multiplier(value: f64) -> Option<ActivityLevel> {
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.multiplier() == value)
    }
}

impl From<ActivityLevel> for f64 {
    fn from(level: ActivityLevel) -> f64 {
        level.multiplier()
    }
}

impl TryFrom<f64> for ActivityLevel {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        ActivityLevel::from_multiplier(value)
            .ok_or_else(|| format!("unknown activity multiplier: {}", value))
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "sedentary" => return Ok(ActivityLevel::Sedentary),
            "light" | "lightly active" | "lightly_active" => {
                return Ok(ActivityLevel::LightlyActive)
            }
            "moderate" | "moderately active" | "moderately_active" => {
                return Ok(ActivityLevel::ModeratelyActive)
            }
            "very" | "very active" | "very_active" => return Ok(ActivityLevel::VeryActive),
            "extra" | "extra active" | "extra_active" => return Ok(ActivityLevel::ExtraActive),
            _ => {}
        }

        s.parse::<f64>()
            .ok()
            .and_then(ActivityLevel::from_multiplier)
            .ok_or_else(|| {
                format!(
                    "unknown activity level: {} (expected one of 1.2, 1.375, 1.55, 1.725, 1.9)",
                    s
                )
            })
    }
}

// ============================================================================
// Form and Input Types
// ============================================================================

/// Raw form state exactly as entered, prior to validation.
///
/// The numeric fields stay strings until validation has range-checked them;
/// gender and activity level come from closed selectors and are always one
/// of the fixed values. Defaults mirror a freshly opened form: empty numeric
/// fields, male, sedentary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TdeeForm {
    pub age: String,
    pub weight: String,
    pub height: String,
    pub gender: Gender,
    pub activity: ActivityLevel,
}

/// A fully validated calculation input.
///
/// Only `validate` produces these: every numeric field has already passed
/// its range check by the time a record exists, so the engine never sees an
/// out-of-range value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputRecord {
    /// Years, within 15..=80
    pub age: u32,
    pub gender: Gender,
    /// Kilograms, within 30.0..=300.0
    pub weight: f64,
    /// Centimeters, within 130.0..=230.0
    pub height: f64,
    pub activity: ActivityLevel,
}

// ============================================================================
// History Types
// ============================================================================

/// One persisted TDEE calculation, held newest-first in the history log.
///
/// `date` is the creation time in epoch milliseconds and doubles as the
/// entry's identity; entries are never mutated once created. The serialized
/// field names match the long-standing storage format, hence the camelCase
/// `activityLevel`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub age: u32,
    pub gender: Gender,
    pub weight: f64,
    pub height: f64,
    #[serde(rename = "activityLevel")]
    pub activity: ActivityLevel,
    /// Calories per day, rounded
    pub tdee: u32,
    /// Epoch milliseconds at creation
    pub date: i64,
}
