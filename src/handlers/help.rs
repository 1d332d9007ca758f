use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Result;

/// Parameters for the coach_help tool
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CoachHelpParams {
    #[schemars(
        description = "Optional specific tool to get help for ('coach_plan', 'coach_ask', 'coach_transcript', or leave empty for general help)"
    )]
    pub tool: Option<String>,
}

/// Response structure for help requests
#[derive(Debug, Serialize)]
pub struct HelpResponse {
    pub overview: String,
    pub tools: serde_json::Value,
    pub tips: Vec<String>,
}

/// Handler for help operations
pub struct HelpHandler;

impl HelpHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn help(&self, params: CoachHelpParams) -> HelpResponse {
        match params.tool.as_deref() {
            Some("coach_plan") => self.coach_plan_help(),
            Some("coach_ask") => self.coach_ask_help(),
            Some("coach_transcript") => self.coach_transcript_help(),
            _ => self.general_help(),
        }
    }

    fn general_help(&self) -> HelpResponse {
        HelpResponse {
            overview: "Fitness Coach MCP Server - generates a personalized fitness plan from a biometric profile and answers follow-up questions against it.\n\nAvailable tools:\n• coach_plan - Generate a fitness plan from your profile (resets any previous conversation)\n• coach_ask - Ask a follow-up question once a plan exists\n• coach_transcript - Read the conversation history\n• coach_help - Get help information about the tools".to_string(),

            tools: json!({
                "coach_plan": {
                    "description": "Generate a personalized fitness plan from a biometric profile",
                    "notes": [
                        "All fields are optional and fall back to form defaults",
                        "Numeric fields are clamped into their accepted ranges",
                        "Regenerating a plan discards the previous conversation"
                    ]
                },
                "coach_ask": {
                    "description": "Ask a follow-up question about the generated plan",
                    "notes": [
                        "Only available after coach_plan has succeeded",
                        "The full conversation is replayed to the coach on every question"
                    ]
                },
                "coach_transcript": {
                    "description": "Read the stored conversation in chronological order",
                    "notes": ["Read-only; never triggers a completion call"]
                }
            }),

            tips: vec![
                "Start with coach_plan; coach_ask is rejected until a plan exists".to_string(),
                "Submit a new profile to coach_plan at any time to start over".to_string(),
                "Enumerated fields are matched exactly, including case".to_string(),
            ],
        }
    }

    fn coach_plan_help(&self) -> HelpResponse {
        HelpResponse {
            overview: "coach_plan - Generate a personalized fitness plan from your profile"
                .to_string(),
            tools: json!({
                "parameters": {
                    "age": "Age in years, 10-100, default 25",
                    "gender": "'Male', 'Female', or 'Other', default 'Male'",
                    "height_cm": "Height in centimeters, 100-250, default 170",
                    "weight_kg": "Weight in kilograms, 30-200, default 70",
                    "sleep_hours": "Sleep per day in hours, 3-12, default 7",
                    "exercise_frequency": "'None', '1-2 days/week', '3-4 days/week', or '5+ days/week', default 'None'",
                    "goal": "'Weight Loss', 'Muscle Gain', or 'Maintain Fitness', default 'Weight Loss'"
                },
                "example": {
                    "params": {
                        "age": 25,
                        "gender": "Male",
                        "height_cm": 170,
                        "weight_kg": 70,
                        "sleep_hours": 7,
                        "exercise_frequency": "None",
                        "goal": "Weight Loss"
                    }
                }
            }),
            tips: vec![
                "Out-of-range numbers are clamped to the nearest bound, never rejected".to_string(),
                "Calling coach_plan again replaces the plan and clears follow-up history"
                    .to_string(),
            ],
        }
    }

    fn coach_ask_help(&self) -> HelpResponse {
        HelpResponse {
            overview: "coach_ask - Ask a follow-up question about the generated plan".to_string(),
            tools: json!({
                "parameters": {
                    "question": "Follow-up question text (required, non-empty)"
                },
                "example": {
                    "params": { "question": "How many rest days should I take?" }
                }
            }),
            tips: vec![
                "Rejected until coach_plan has succeeded".to_string(),
                "Each answer is appended to the conversation and replayed on the next question"
                    .to_string(),
            ],
        }
    }

    fn coach_transcript_help(&self) -> HelpResponse {
        HelpResponse {
            overview: "coach_transcript - Read the stored conversation history".to_string(),
            tools: json!({
                "parameters": {
                    "limit": "Optional: return only the most recent N messages"
                }
            }),
            tips: vec![
                "message_count always reflects the full stored history".to_string(),
            ],
        }
    }
}

impl Default for HelpHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for help-related operations
pub trait HelpHandlerTrait {
    /// Handle coach_help tool
    async fn coach_help(&self, params: CoachHelpParams) -> Result<HelpResponse>;
}

impl HelpHandlerTrait for super::CoachHandlers {
    async fn coach_help(&self, params: CoachHelpParams) -> Result<HelpResponse> {
        Ok(self.help.help(params))
    }
}
