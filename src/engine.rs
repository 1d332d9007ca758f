use std::sync::Arc;

use crate::error::{CoachError, Result};
use crate::models::{ChatMessage, GroqRequest, GroqResponse, Profile};
use crate::prompts;
use crate::session::Session;
use crate::transport::Transport;

/// Conversation engine owning the plan/follow-up state machine.
///
/// Strictly turn-based: callers hold exclusive access to the `Session` for
/// the duration of a call, so at most one request is in flight per session
/// and transcript ordering cannot race.
pub struct CoachEngine {
    tx: Arc<dyn Transport>,
    model: String,
    temperature: f32,
    max_tokens: i32,
}

impl CoachEngine {
    pub fn new(tx: Arc<dyn Transport>, model: String, temperature: f32, max_tokens: i32) -> Self {
        Self {
            tx,
            model,
            temperature,
            max_tokens,
        }
    }

    /// Generate a fresh fitness plan for `profile`.
    ///
    /// Sends exactly two messages: the coach system instruction and the
    /// rendered profile prompt. No prior transcript is included. On success
    /// the session transcript is reset to the single assistant reply and
    /// follow-up chat opens; regenerating discards any existing follow-up
    /// history. On failure the session is left exactly as it was.
    pub async fn generate_plan(&self, session: &mut Session, profile: Profile) -> Result<String> {
        tracing::info!("Generating fitness plan for goal '{}'", profile.goal);

        let request = GroqRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompts::PLAN_SYSTEM_PROMPT),
                ChatMessage::user(prompts::build_plan_prompt(&profile)),
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: None,
        };

        let advice = first_choice(self.tx.chat(&request).await?)?;
        session.install_plan(profile, advice.clone());
        Ok(advice)
    }

    /// Answer a follow-up question against the existing plan.
    ///
    /// Legal only once a plan exists; rejected before any external call
    /// otherwise. The outbound request is the follow-up system instruction,
    /// the full transcript in insertion order, then the new user message.
    /// The turn is committed to the transcript only after the completion
    /// service answers, so a failed call appends nothing.
    pub async fn ask_follow_up(&self, session: &mut Session, question: &str) -> Result<String> {
        if !session.plan_ready() {
            return Err(CoachError::PlanNotReady);
        }

        tracing::info!("Answering follow-up question ({} chars)", question.len());

        let transcript = session.transcript();
        let mut messages = Vec::with_capacity(transcript.len() + 2);
        messages.push(ChatMessage::system(prompts::FOLLOW_UP_SYSTEM_PROMPT));
        messages.extend_from_slice(transcript);
        messages.push(ChatMessage::user(question));

        let request = GroqRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: None,
        };

        let reply = first_choice(self.tx.chat(&request).await?)?;
        session.record_turn(question.to_string(), reply.clone());
        Ok(reply)
    }
}

fn first_choice(response: GroqResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| {
            CoachError::CompletionService("Groq API returned empty choices".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Choice, ExerciseFrequency, Gender, Goal, Role};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // Mock Transport recording outbound requests for assertions
    struct MockTransport {
        responses: Mutex<VecDeque<GroqResponse>>,
        requests: Mutex<Vec<GroqRequest>>,
    }

    impl MockTransport {
        fn new(replies: Vec<&str>) -> Self {
            MockTransport {
                responses: Mutex::new(replies.into_iter().map(assistant_response).collect()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self::new(Vec::new())
        }

        fn recorded_requests(&self) -> Vec<GroqRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    fn assistant_response(content: &str) -> GroqResponse {
        GroqResponse {
            choices: vec![Choice {
                message: ChatMessage::assistant(content),
            }],
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn chat(&self, req: &GroqRequest) -> Result<GroqResponse> {
            self.requests.lock().unwrap().push(req.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| CoachError::CompletionService("No more mock responses".to_string()))
        }
    }

    fn engine_with(transport: Arc<MockTransport>) -> CoachEngine {
        CoachEngine::new(transport, "test-model".to_string(), 0.7, 1024)
    }

    fn sample_profile() -> Profile {
        Profile {
            age: 25,
            gender: Gender::Male,
            height_cm: 170.0,
            weight_kg: 70.0,
            sleep_hours: 7,
            exercise_frequency: ExerciseFrequency::None,
            goal: Goal::WeightLoss,
        }
    }

    #[tokio::test]
    async fn test_generate_plan_sends_exactly_two_messages() {
        let transport = Arc::new(MockTransport::new(vec!["your plan"]));
        let engine = engine_with(Arc::clone(&transport));
        let mut session = Session::new();

        engine
            .generate_plan(&mut session, sample_profile())
            .await
            .unwrap();

        let requests = transport.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages.len(), 2);
        assert_eq!(requests[0].messages[0].role, Role::System);
        assert_eq!(requests[0].messages[1].role, Role::User);
        assert_eq!(requests[0].model, "test-model");
        assert!(requests[0].messages[1].content.contains("Age: 25"));
    }

    #[tokio::test]
    async fn test_generate_plan_resets_transcript_and_opens_chat() {
        let transport = Arc::new(MockTransport::new(vec!["your plan"]));
        let engine = engine_with(transport);
        let mut session = Session::new();

        let advice = engine
            .generate_plan(&mut session, sample_profile())
            .await
            .unwrap();

        assert_eq!(advice, "your plan");
        assert!(session.plan_ready());
        assert_eq!(session.profile(), Some(&sample_profile()));
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].role, Role::Assistant);
        assert_eq!(session.transcript()[0].content, "your plan");
    }

    #[tokio::test]
    async fn test_follow_up_rejected_before_plan() {
        let transport = Arc::new(MockTransport::new(vec!["should not be used"]));
        let engine = engine_with(Arc::clone(&transport));
        let mut session = Session::new();

        let result = engine.ask_follow_up(&mut session, "How many rest days?").await;

        assert!(matches!(result, Err(CoachError::PlanNotReady)));
        // No external call was made
        assert!(transport.recorded_requests().is_empty());
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_follow_up_replays_full_transcript_with_one_system_message() {
        let transport = Arc::new(MockTransport::new(vec!["plan", "answer 1", "answer 2"]));
        let engine = engine_with(Arc::clone(&transport));
        let mut session = Session::new();

        engine
            .generate_plan(&mut session, sample_profile())
            .await
            .unwrap();
        engine.ask_follow_up(&mut session, "q1").await.unwrap();
        engine.ask_follow_up(&mut session, "q2").await.unwrap();

        // N successful follow-ups leave a transcript of 1 + 2N messages
        assert_eq!(session.transcript().len(), 5);

        let requests = transport.recorded_requests();
        let second_follow_up = &requests[2];
        let roles: Vec<Role> = second_follow_up.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::System,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User
            ]
        );
        assert_eq!(second_follow_up.messages[0].content, prompts::FOLLOW_UP_SYSTEM_PROMPT);
        assert_eq!(second_follow_up.messages[1].content, "plan");
        assert_eq!(second_follow_up.messages[2].content, "q1");
        assert_eq!(second_follow_up.messages[3].content, "answer 1");
        assert_eq!(second_follow_up.messages[4].content, "q2");

        // The leading system instruction is never stored
        assert!(
            session
                .transcript()
                .iter()
                .all(|m| m.role != Role::System)
        );
    }

    #[tokio::test]
    async fn test_regenerating_plan_discards_follow_up_history() {
        let transport = Arc::new(MockTransport::new(vec!["plan 1", "answer", "plan 2"]));
        let engine = engine_with(Arc::clone(&transport));
        let mut session = Session::new();

        engine
            .generate_plan(&mut session, sample_profile())
            .await
            .unwrap();
        engine.ask_follow_up(&mut session, "q").await.unwrap();
        assert_eq!(session.transcript().len(), 3);

        engine
            .generate_plan(&mut session, sample_profile())
            .await
            .unwrap();
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].content, "plan 2");

        // Regeneration sends only the two fresh messages, no old transcript
        let requests = transport.recorded_requests();
        assert_eq!(requests[2].messages.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_generate_plan_leaves_session_untouched() {
        let transport = Arc::new(MockTransport::failing());
        let engine = engine_with(transport);
        let mut session = Session::new();

        let result = engine.generate_plan(&mut session, sample_profile()).await;

        assert!(matches!(result, Err(CoachError::CompletionService(_))));
        assert!(!session.plan_ready());
        assert!(session.profile().is_none());
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_failed_follow_up_appends_nothing() {
        let transport = Arc::new(MockTransport::new(vec!["plan"]));
        let engine = engine_with(transport);
        let mut session = Session::new();

        engine
            .generate_plan(&mut session, sample_profile())
            .await
            .unwrap();
        let result = engine.ask_follow_up(&mut session, "q").await;

        assert!(matches!(result, Err(CoachError::CompletionService(_))));
        // The turn was rolled back: no dangling user message
        assert_eq!(session.transcript().len(), 1);
        assert!(session.plan_ready());
    }

    #[tokio::test]
    async fn test_plan_then_follow_up_scenario() {
        let transport = Arc::new(MockTransport::new(vec![
            "Here is your personalized plan.",
            "Take two rest days per week.",
        ]));
        let engine = engine_with(transport);
        let mut session = Session::new();

        engine
            .generate_plan(&mut session, sample_profile())
            .await
            .unwrap();
        assert_eq!(session.transcript().len(), 1);
        assert!(!session.transcript()[0].content.is_empty());

        engine
            .ask_follow_up(&mut session, "How many rest days?")
            .await
            .unwrap();
        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[0].role, Role::Assistant);
        assert_eq!(transcript[1].role, Role::User);
        assert_eq!(transcript[1].content, "How many rest days?");
        assert_eq!(transcript[2].role, Role::Assistant);
        assert_eq!(transcript[2].content, "Take two rest days per week.");
    }

    #[tokio::test]
    async fn test_empty_choices_is_a_completion_error() {
        let transport = Arc::new(MockTransport {
            responses: Mutex::new(VecDeque::from([GroqResponse { choices: vec![] }])),
            requests: Mutex::new(Vec::new()),
        });
        let engine = engine_with(transport);
        let mut session = Session::new();

        let result = engine.generate_plan(&mut session, sample_profile()).await;
        assert!(matches!(result, Err(CoachError::CompletionService(_))));
        assert!(session.transcript().is_empty());
    }
}
