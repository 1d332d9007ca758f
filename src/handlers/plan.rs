use crate::error::Result;
use crate::models::{GeneratePlanParams, PlanResponse};

/// Trait for plan-generation operations
pub trait PlanHandler {
    /// Handle coach_plan tool
    async fn coach_plan(&self, params: GeneratePlanParams) -> Result<PlanResponse>;
}

impl PlanHandler for super::CoachHandlers {
    /// Handle coach_plan tool
    async fn coach_plan(&self, params: GeneratePlanParams) -> Result<PlanResponse> {
        let profile = self.validator.collect_profile(&params);

        tracing::info!(
            "Generating plan: age {}, goal '{}', exercise '{}'",
            profile.age,
            profile.goal,
            profile.exercise_frequency
        );

        // The lock is held across the completion exchange; see CoachHandlers.
        let mut session = self.session.lock().await;
        let plan = self.engine.generate_plan(&mut session, profile).await?;

        Ok(PlanResponse {
            status: "plan_generated".to_string(),
            profile,
            plan,
            generated_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        })
    }
}
