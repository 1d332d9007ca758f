use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoachError>;

/// Error taxonomy for the coaching service
#[derive(Error, Debug)]
pub enum CoachError {
    /// Missing or invalid configuration, including an absent Groq credential.
    /// Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error on field '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// Follow-up questions are only accepted once a plan exists.
    #[error("No fitness plan has been generated yet. Call coach_plan first.")]
    PlanNotReady,

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// The external completion call failed for any reason: network error,
    /// auth, rate limit on the provider side, or a malformed response.
    /// Surfaced for the failing turn only; session state is unaffected.
    #[error("Completion service error: {0}")]
    CompletionService(String),
}
