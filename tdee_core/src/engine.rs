//! TDEE computation using the Mifflin-St Jeor equation.
//!
//! The engine is pure: the clock is passed in by the caller, so the same
//! input and timestamp always produce the same entry.

use crate::types::{Gender, HistoryEntry, InputRecord};
use chrono::{DateTime, Utc};

/// Additive gender terms of the Mifflin-St Jeor equation
const MALE_TERM: f64 = 5.0;
const FEMALE_TERM: f64 = -161.0;

/// Estimated resting energy expenditure in kcal/day.
///
/// Mifflin-St Jeor: `10*weight + 6.25*height - 5*age`, plus 5 for men and
/// minus 161 for women.
pub fn basal_metabolic_rate(input: &InputRecord) -> f64 {
    let gender_term = match input.gender {
        Gender::Male => MALE_TERM,
        Gender::Female => FEMALE_TERM,
    };

    10.0 * input.weight + 6.25 * input.height - 5.0 * f64::from(input.age) + gender_term
}

/// Compute TDEE for a validated input and stamp a history entry.
///
/// The activity multiplier scales BMR to daily expenditure and the product
/// is rounded to the nearest whole calorie, halves away from zero. `now`
/// becomes the entry's `date` (epoch milliseconds), which also serves as
/// its identity in the history log.
pub fn calculate(input: &InputRecord, now: DateTime<Utc>) -> HistoryEntry {
    let bmr = basal_metabolic_rate(input);
    let tdee = (bmr * input.activity.multiplier()).round() as u32;

    tracing::debug!(
        "Computed TDEE {} (BMR {:.2}, multiplier {})",
        tdee,
        bmr,
        input.activity.multiplier()
    );

    HistoryEntry {
        age: input.age,
        gender: input.gender,
        weight: input.weight,
        height: input.height,
        activity: input.activity,
        tdee,
        date: now.timestamp_millis(),
    }
}
