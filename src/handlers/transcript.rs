use serde::Serialize;

use crate::error::Result;
use crate::models::ChatMessage;

/// Parameters for the coach_transcript tool
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct TranscriptParams {
    #[schemars(description = "Optional: return only the most recent N messages")]
    pub limit: Option<usize>,
}

/// Response structure for transcript requests
#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub plan_ready: bool,
    pub message_count: usize,
    /// Chronological history as sent to the completion service, without
    /// the per-request leading system instruction.
    pub messages: Vec<ChatMessage>,
}

/// Trait for transcript read operations
pub trait TranscriptHandler {
    /// Handle coach_transcript tool
    async fn coach_transcript(&self, params: TranscriptParams) -> Result<TranscriptResponse>;
}

impl TranscriptHandler for super::CoachHandlers {
    /// Handle coach_transcript tool
    async fn coach_transcript(&self, params: TranscriptParams) -> Result<TranscriptResponse> {
        let session = self.session.lock().await;
        let transcript = session.transcript();

        let messages = match params.limit {
            Some(limit) if limit < transcript.len() => {
                transcript[transcript.len() - limit..].to_vec()
            }
            _ => transcript.to_vec(),
        };

        Ok(TranscriptResponse {
            plan_ready: session.plan_ready(),
            message_count: transcript.len(),
            messages,
        })
    }
}
