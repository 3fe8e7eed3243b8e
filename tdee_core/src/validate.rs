//! Form validation for calculation input.
//!
//! Each numeric field is required, must parse as a number, and must fall
//! inside its fixed range. Failures collect into a field-keyed message map;
//! an `InputRecord` is only built when every check passes.

use crate::types::{InputRecord, TdeeForm};
use std::collections::BTreeMap;
use std::fmt;

/// Supported age range in whole years
pub const AGE_MIN: i64 = 15;
pub const AGE_MAX: i64 = 80;

/// Supported weight range in kilograms
pub const WEIGHT_MIN: f64 = 30.0;
pub const WEIGHT_MAX: f64 = 300.0;

/// Supported height range in centimeters
pub const HEIGHT_MIN: f64 = 130.0;
pub const HEIGHT_MAX: f64 = 230.0;

/// Form fields that can carry a validation error
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Age,
    Weight,
    Height,
}

impl Field {
    /// Form key for this field
    pub fn key(&self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::Weight => "weight",
            Field::Height => "height",
        }
    }

    /// Capitalized name used inside error messages
    fn display_name(&self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::Weight => "Weight",
            Field::Height => "Height",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Validation messages keyed by the field they belong to
pub type FieldErrors = BTreeMap<Field, String>;

/// Validate raw form input into a calculation-ready record.
///
/// Runs every field check even after the first failure so the caller gets
/// the complete error mapping in one pass. The record is only constructed
/// when the mapping stays empty.
pub fn validate(form: &TdeeForm) -> Result<InputRecord, FieldErrors> {
    let mut errors = FieldErrors::new();

    let age = check_age(&form.age, &mut errors);
    let weight = check_measure(
        Field::Weight,
        &form.weight,
        WEIGHT_MIN,
        WEIGHT_MAX,
        "kg",
        &mut errors,
    );
    let height = check_measure(
        Field::Height,
        &form.height,
        HEIGHT_MIN,
        HEIGHT_MAX,
        "cm",
        &mut errors,
    );

    match (age, weight, height) {
        (Some(age), Some(weight), Some(height)) => Ok(InputRecord {
            age,
            gender: form.gender,
            weight,
            height,
            activity: form.activity,
        }),
        _ => Err(errors),
    }
}

/// Age must be a whole number of years inside the supported range.
///
/// Parsing as an integer means "25.5" is not a valid age, while "-5" still
/// reaches the range check and reports the range message.
fn check_age(raw: &str, errors: &mut FieldErrors) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.insert(
            Field::Age,
            format!("{} is required", Field::Age.display_name()),
        );
        return None;
    }

    match raw.parse::<i64>() {
        Ok(age) if (AGE_MIN..=AGE_MAX).contains(&age) => Some(age as u32),
        Ok(_) => {
            errors.insert(
                Field::Age,
                format!("Age must be between {} and {}", AGE_MIN, AGE_MAX),
            );
            None
        }
        Err(_) => {
            errors.insert(Field::Age, "Age must be a number".to_string());
            None
        }
    }
}

/// Weight and height share the same shape: required, finite number, ranged
fn check_measure(
    field: Field,
    raw: &str,
    min: f64,
    max: f64,
    unit: &str,
    errors: &mut FieldErrors,
) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.insert(field, format!("{} is required", field.display_name()));
        return None;
    }

    match raw.parse::<f64>() {
        // "NaN" and "inf" parse as floats but are no more usable than text
        Ok(value) if value.is_finite() => {
            if (min..=max).contains(&value) {
                Some(value)
            } else {
                errors.insert(
                    field,
                    format!(
                        "{} must be between {} and {} {}",
                        field.display_name(),
                        min,
                        max,
                        unit
                    ),
                );
                None
            }
        }
        _ => {
            errors.insert(field, format!("{} must be a number", field.display_name()));
            None
        }
    }
}
