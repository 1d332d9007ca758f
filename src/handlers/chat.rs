use crate::error::Result;
use crate::models::{AskFollowUpParams, FollowUpResponse};

/// Trait for follow-up chat operations
pub trait FollowUpHandler {
    /// Handle coach_ask tool
    async fn coach_ask(&self, params: AskFollowUpParams) -> Result<FollowUpResponse>;
}

impl FollowUpHandler for super::CoachHandlers {
    /// Handle coach_ask tool
    async fn coach_ask(&self, params: AskFollowUpParams) -> Result<FollowUpResponse> {
        self.validator.validate_question(&params.question)?;

        let mut session = self.session.lock().await;
        let reply = self
            .engine
            .ask_follow_up(&mut session, &params.question)
            .await?;

        Ok(FollowUpResponse {
            status: "answered".to_string(),
            reply,
        })
    }
}
