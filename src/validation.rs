use crate::error::{CoachError, Result};
use crate::models::{GeneratePlanParams, Profile};

pub const MIN_AGE: i32 = 10;
pub const MAX_AGE: i32 = 100;
pub const MIN_HEIGHT_CM: f64 = 100.0;
pub const MAX_HEIGHT_CM: f64 = 250.0;
pub const MIN_WEIGHT_KG: f64 = 30.0;
pub const MAX_WEIGHT_KG: f64 = 200.0;
pub const MIN_SLEEP_HOURS: i32 = 3;
pub const MAX_SLEEP_HOURS: i32 = 12;

/// Maximum accepted length for a follow-up question, in characters.
const MAX_QUESTION_LENGTH: usize = 4000;

/// Input validation for profile collection and follow-up chat.
///
/// Numeric profile fields are clamped to their declared bounds, the same
/// constraint the original form widgets enforce. Enumerated fields are
/// typed at the serde boundary, so an invalid label is rejected before the
/// collector runs.
pub struct InputValidator;

impl InputValidator {
    pub fn new() -> Self {
        Self
    }

    /// Assemble a well-formed profile from raw inputs: missing fields take
    /// the form defaults, out-of-range numerics are clamped to the nearest
    /// bound. Cannot fail; an out-of-range value is never passed through
    /// unmodified.
    pub fn collect_profile(&self, params: &GeneratePlanParams) -> Profile {
        let defaults = Profile::default();
        Profile {
            age: clamp_int("age", params.age.unwrap_or(defaults.age), MIN_AGE, MAX_AGE),
            gender: params.gender.unwrap_or(defaults.gender),
            height_cm: clamp_float(
                "height_cm",
                params.height_cm.unwrap_or(defaults.height_cm),
                MIN_HEIGHT_CM,
                MAX_HEIGHT_CM,
            ),
            weight_kg: clamp_float(
                "weight_kg",
                params.weight_kg.unwrap_or(defaults.weight_kg),
                MIN_WEIGHT_KG,
                MAX_WEIGHT_KG,
            ),
            sleep_hours: clamp_int(
                "sleep_hours",
                params.sleep_hours.unwrap_or(defaults.sleep_hours),
                MIN_SLEEP_HOURS,
                MAX_SLEEP_HOURS,
            ),
            exercise_frequency: params
                .exercise_frequency
                .unwrap_or(defaults.exercise_frequency),
            goal: params.goal.unwrap_or(defaults.goal),
        }
    }

    /// Reject empty or oversized follow-up text before any external call.
    pub fn validate_question(&self, question: &str) -> Result<()> {
        if question.trim().is_empty() {
            return Err(CoachError::Validation {
                field: "question".to_string(),
                reason: "question cannot be empty".to_string(),
            });
        }
        if question.len() > MAX_QUESTION_LENGTH {
            return Err(CoachError::Validation {
                field: "question".to_string(),
                reason: format!(
                    "question exceeds maximum length of {MAX_QUESTION_LENGTH} characters"
                ),
            });
        }
        Ok(())
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_int(field: &str, value: i32, min: i32, max: i32) -> i32 {
    if value < min || value > max {
        tracing::warn!(
            "Profile field '{}' value {} outside [{}, {}], clamping",
            field,
            value,
            min,
            max
        );
    }
    value.clamp(min, max)
}

fn clamp_float(field: &str, value: f64, min: f64, max: f64) -> f64 {
    if value < min || value > max {
        tracing::warn!(
            "Profile field '{}' value {} outside [{}, {}], clamping",
            field,
            value,
            min,
            max
        );
    }
    value.clamp(min, max)
}
