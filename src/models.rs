use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Flexible integer deserializer to handle string, float, or int inputs from different MCP clients
fn deserialize_flexible_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleInt {
        Int(i32),
        Float(f64),
        String(String),
        None,
    }

    let value = FlexibleInt::deserialize(deserializer)?;
    match value {
        FlexibleInt::Int(i) => Ok(Some(i)),
        FlexibleInt::Float(f) => Ok(Some(f as i32)),
        FlexibleInt::String(s) => s.parse::<i32>().map(Some).map_err(serde::de::Error::custom),
        FlexibleInt::None => Ok(None),
    }
}

/// Flexible float deserializer, same contract as the integer variant
fn deserialize_flexible_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleFloat {
        Float(f64),
        Int(i64),
        String(String),
        None,
    }

    let value = FlexibleFloat::deserialize(deserializer)?;
    match value {
        FlexibleFloat::Float(f) => Ok(Some(f)),
        FlexibleFloat::Int(i) => Ok(Some(i as f64)),
        FlexibleFloat::String(s) => s.parse::<f64>().map(Some).map_err(serde::de::Error::custom),
        FlexibleFloat::None => Ok(None),
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, schemars::JsonSchema)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exercise frequency options, serialized with the exact labels the
/// profile form presents. Matching is case-sensitive.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, schemars::JsonSchema)]
pub enum ExerciseFrequency {
    #[serde(rename = "None")]
    None,
    #[serde(rename = "1-2 days/week")]
    OneToTwoDays,
    #[serde(rename = "3-4 days/week")]
    ThreeToFourDays,
    #[serde(rename = "5+ days/week")]
    FivePlusDays,
}

impl ExerciseFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseFrequency::None => "None",
            ExerciseFrequency::OneToTwoDays => "1-2 days/week",
            ExerciseFrequency::ThreeToFourDays => "3-4 days/week",
            ExerciseFrequency::FivePlusDays => "5+ days/week",
        }
    }
}

impl fmt::Display for ExerciseFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, schemars::JsonSchema)]
pub enum Goal {
    #[serde(rename = "Weight Loss")]
    WeightLoss,
    #[serde(rename = "Muscle Gain")]
    MuscleGain,
    #[serde(rename = "Maintain Fitness")]
    MaintainFitness,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::WeightLoss => "Weight Loss",
            Goal::MuscleGain => "Muscle Gain",
            Goal::MaintainFitness => "Maintain Fitness",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured biometric profile driving the initial plan prompt.
/// Immutable once collected; submitting a new one starts a new plan.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Profile {
    pub age: i32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub sleep_hours: i32,
    pub exercise_frequency: ExerciseFrequency,
    pub goal: Goal,
}

impl Default for Profile {
    /// The profile form's widget defaults. Every field has one, so a
    /// well-formed record exists even when the caller omits fields.
    fn default() -> Self {
        Self {
            age: 25,
            gender: Gender::Male,
            height_cm: 170.0,
            weight_kg: 70.0,
            sleep_hours: 7,
            exercise_frequency: ExerciseFrequency::None,
            goal: Goal::WeightLoss,
        }
    }
}

/// Parameters for the coach_plan tool
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GeneratePlanParams {
    #[schemars(description = "Age in years, accepted range 10-100 (default 25)")]
    #[serde(default, deserialize_with = "deserialize_flexible_int")]
    pub age: Option<i32>,

    #[schemars(description = "Gender: 'Male', 'Female', or 'Other' (default 'Male')")]
    pub gender: Option<Gender>,

    #[schemars(description = "Height in centimeters, accepted range 100-250 (default 170)")]
    #[serde(default, deserialize_with = "deserialize_flexible_float")]
    pub height_cm: Option<f64>,

    #[schemars(description = "Weight in kilograms, accepted range 30-200 (default 70)")]
    #[serde(default, deserialize_with = "deserialize_flexible_float")]
    pub weight_kg: Option<f64>,

    #[schemars(description = "Sleep per day in hours, accepted range 3-12 (default 7)")]
    #[serde(default, deserialize_with = "deserialize_flexible_int")]
    pub sleep_hours: Option<i32>,

    #[schemars(
        description = "Exercise frequency: 'None', '1-2 days/week', '3-4 days/week', or '5+ days/week' (default 'None')"
    )]
    pub exercise_frequency: Option<ExerciseFrequency>,

    #[schemars(
        description = "Fitness goal: 'Weight Loss', 'Muscle Gain', or 'Maintain Fitness' (default 'Weight Loss')"
    )]
    pub goal: Option<Goal>,
}

/// Parameters for the coach_ask tool
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AskFollowUpParams {
    #[schemars(description = "Follow-up question about the generated fitness plan")]
    pub question: String,
}

/// Response from the coach_plan tool
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub status: String,
    /// The profile actually used, after defaults and range clamping.
    pub profile: Profile,
    pub plan: String,
    pub generated_at: String,
}

/// Response from the coach_ask tool
#[derive(Debug, Serialize)]
pub struct FollowUpResponse {
    pub status: String,
    pub reply: String,
}

/// Message roles as the completion service understands them
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Groq chat message format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// Groq API request format
#[derive(Debug, Serialize, Clone)]
pub struct GroqRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<serde_json::Value>,
}

// Groq API response format
#[derive(Debug, Deserialize)]
pub struct GroqResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
}
