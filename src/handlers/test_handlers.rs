use super::*;
use crate::engine::CoachEngine;
use crate::error::{CoachError, Result};
use crate::handlers::chat::FollowUpHandler;
use crate::handlers::help::{CoachHelpParams, HelpHandlerTrait};
use crate::handlers::plan::PlanHandler;
use crate::handlers::transcript::{TranscriptHandler, TranscriptParams};
use crate::models::{
    AskFollowUpParams, ChatMessage, Choice, GeneratePlanParams, GroqRequest, GroqResponse, Role,
};
use crate::transport::Transport;

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// Mock Transport for driving handler flows without the network
struct MockTransport {
    responses: Mutex<VecDeque<GroqResponse>>,
}

impl MockTransport {
    fn new(replies: Vec<&str>) -> Self {
        MockTransport {
            responses: Mutex::new(
                replies
                    .into_iter()
                    .map(|content| GroqResponse {
                        choices: vec![Choice {
                            message: ChatMessage::assistant(content),
                        }],
                    })
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn chat(&self, _req: &GroqRequest) -> Result<GroqResponse> {
        self.responses
            .lock()
            .expect("Mock transport mutex should not be poisoned")
            .pop_front()
            .ok_or_else(|| CoachError::CompletionService("No more mock responses".to_string()))
    }
}

fn create_test_handlers(replies: Vec<&str>) -> CoachHandlers {
    let transport = Arc::new(MockTransport::new(replies));
    let engine = CoachEngine::new(transport, "test-model".to_string(), 0.7, 1024);
    CoachHandlers::new(engine, Arc::new(InputValidator::new()))
}

fn default_plan_params() -> GeneratePlanParams {
    serde_json::from_str("{}").expect("empty params should deserialize")
}

#[tokio::test]
async fn test_plan_then_ask_flow() {
    let handlers = create_test_handlers(vec!["your plan", "your answer"]);

    let plan = handlers.coach_plan(default_plan_params()).await.unwrap();
    assert_eq!(plan.status, "plan_generated");
    assert_eq!(plan.plan, "your plan");
    assert_eq!(plan.profile.age, 25);

    let reply = handlers
        .coach_ask(AskFollowUpParams {
            question: "How many rest days?".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(reply.status, "answered");
    assert_eq!(reply.reply, "your answer");

    let transcript = handlers
        .coach_transcript(TranscriptParams { limit: None })
        .await
        .unwrap();
    assert!(transcript.plan_ready);
    assert_eq!(transcript.message_count, 3);
    assert_eq!(transcript.messages[1].content, "How many rest days?");
}

#[tokio::test]
async fn test_ask_rejected_before_plan() {
    let handlers = create_test_handlers(vec!["never sent"]);

    let result = handlers
        .coach_ask(AskFollowUpParams {
            question: "Too early?".to_string(),
        })
        .await;
    assert!(matches!(result, Err(CoachError::PlanNotReady)));
}

#[tokio::test]
async fn test_ask_rejects_empty_question_without_touching_session() {
    let handlers = create_test_handlers(vec!["plan"]);
    handlers.coach_plan(default_plan_params()).await.unwrap();

    let result = handlers
        .coach_ask(AskFollowUpParams {
            question: "  ".to_string(),
        })
        .await;
    assert!(matches!(result, Err(CoachError::Validation { .. })));

    let transcript = handlers
        .coach_transcript(TranscriptParams { limit: None })
        .await
        .unwrap();
    assert_eq!(transcript.message_count, 1);
}

#[tokio::test]
async fn test_plan_clamps_out_of_range_fields() {
    let handlers = create_test_handlers(vec!["plan"]);
    let params: GeneratePlanParams =
        serde_json::from_str(r#"{"age": 101, "sleep_hours": 1}"#).unwrap();

    let response = handlers.coach_plan(params).await.unwrap();
    assert_eq!(response.profile.age, 100);
    assert_eq!(response.profile.sleep_hours, 3);
}

#[tokio::test]
async fn test_regeneration_resets_transcript() {
    let handlers = create_test_handlers(vec!["plan 1", "answer", "plan 2"]);

    handlers.coach_plan(default_plan_params()).await.unwrap();
    handlers
        .coach_ask(AskFollowUpParams {
            question: "q".to_string(),
        })
        .await
        .unwrap();
    handlers.coach_plan(default_plan_params()).await.unwrap();

    let transcript = handlers
        .coach_transcript(TranscriptParams { limit: None })
        .await
        .unwrap();
    assert_eq!(transcript.message_count, 1);
    assert_eq!(transcript.messages[0].content, "plan 2");
}

#[tokio::test]
async fn test_transcript_limit_returns_most_recent() {
    let handlers = create_test_handlers(vec!["plan", "a1", "a2"]);

    handlers.coach_plan(default_plan_params()).await.unwrap();
    for q in ["q1", "q2"] {
        handlers
            .coach_ask(AskFollowUpParams {
                question: q.to_string(),
            })
            .await
            .unwrap();
    }

    let transcript = handlers
        .coach_transcript(TranscriptParams { limit: Some(2) })
        .await
        .unwrap();
    assert_eq!(transcript.message_count, 5);
    assert_eq!(transcript.messages.len(), 2);
    assert_eq!(transcript.messages[0].content, "q2");
    assert_eq!(transcript.messages[1].role, Role::Assistant);
}

#[tokio::test]
async fn test_help_covers_every_tool() {
    let handlers = create_test_handlers(vec![]);

    let general = handlers.coach_help(CoachHelpParams { tool: None }).await.unwrap();
    assert!(general.overview.contains("coach_plan"));
    assert!(general.overview.contains("coach_ask"));

    for tool in ["coach_plan", "coach_ask", "coach_transcript"] {
        let help = handlers
            .coach_help(CoachHelpParams {
                tool: Some(tool.to_string()),
            })
            .await
            .unwrap();
        assert!(help.overview.contains(tool));
    }
}
