use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{CallToolResult, Content, ErrorData, ServerCapabilities, ServerInfo},
};
use rmcp_macros::{tool, tool_handler, tool_router};
use std::future::Future;
use std::sync::Arc;

use crate::config::Config;
use crate::engine::CoachEngine;
use crate::error::CoachError;
use crate::handlers::CoachHandlers;
use crate::handlers::chat::FollowUpHandler;
use crate::handlers::help::{CoachHelpParams, HelpHandlerTrait};
use crate::handlers::plan::PlanHandler;
use crate::handlers::transcript::{TranscriptHandler, TranscriptParams};
use crate::models::{AskFollowUpParams, GeneratePlanParams};
use crate::rate_limit::RateLimiter;
use crate::transport::{GroqTransport, Transport};
use crate::validation::InputValidator;

/// Main service struct for the fitness-coach MCP server
#[derive(Clone)]
pub struct FitnessCoachService {
    tool_router: ToolRouter<Self>,
    handlers: Arc<CoachHandlers>,
    rate_limiter: Arc<RateLimiter>,
    instance_id: String,
    config: Arc<Config>,
}

impl FitnessCoachService {
    /// Create a new service instance
    pub fn new(config: Arc<Config>) -> Result<Self, CoachError> {
        let instance_id = std::env::var("COACH_INSTANCE_ID")
            .unwrap_or_else(|_| config.server.default_instance_id.clone());
        tracing::info!(
            "Initializing fitness-coach service for instance: {}",
            instance_id
        );

        let transport = Arc::new(GroqTransport::new(
            config.groq.api_key.clone(),
            config.request_timeout(),
        )?);

        let engine = CoachEngine::new(
            Arc::clone(&transport) as Arc<dyn Transport>,
            config.groq.model.clone(),
            config.groq.temperature,
            config.groq.max_tokens,
        );

        let validator = Arc::new(InputValidator::new());
        let handlers = Arc::new(CoachHandlers::new(engine, validator));

        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limiter.max_requests as usize,
            config.rate_limiter.window_seconds,
        ));

        Ok(Self {
            tool_router: Self::tool_router(),
            handlers,
            rate_limiter,
            instance_id,
            config,
        })
    }
}

#[tool_router]
impl FitnessCoachService {
    #[tool(
        description = "Generate a personalized fitness plan from a biometric profile. Replaces any previous plan and conversation."
    )]
    pub async fn coach_plan(
        &self,
        params: Parameters<GeneratePlanParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        if let Err(e) = self.rate_limiter.check_rate_limit(&self.instance_id).await {
            tracing::warn!("Rate limit hit for instance {}: {}", self.instance_id, e);
            return Err(ErrorData::invalid_params(
                "Rate limit exceeded. Please slow down your requests.".to_string(),
                None,
            ));
        }

        match self.handlers.coach_plan(params.0).await {
            Ok(response) => {
                let content = Content::json(response).map_err(|e| {
                    ErrorData::internal_error(format!("Failed to create JSON content: {e}"), None)
                })?;
                Ok(CallToolResult::success(vec![content]))
            }
            Err(e) => {
                tracing::error!("coach_plan error: {}", e);
                Err(ErrorData::internal_error(e.to_string(), None))
            }
        }
    }

    #[tool(
        description = "Ask a follow-up question about the generated fitness plan. Only available once a plan exists."
    )]
    pub async fn coach_ask(
        &self,
        params: Parameters<AskFollowUpParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        if let Err(e) = self.rate_limiter.check_rate_limit(&self.instance_id).await {
            tracing::warn!("Rate limit hit for instance {}: {}", self.instance_id, e);
            return Err(ErrorData::invalid_params(
                "Rate limit exceeded. Please slow down your requests.".to_string(),
                None,
            ));
        }

        match self.handlers.coach_ask(params.0).await {
            Ok(response) => {
                let content = Content::json(response).map_err(|e| {
                    ErrorData::internal_error(format!("Failed to create JSON content: {e}"), None)
                })?;
                Ok(CallToolResult::success(vec![content]))
            }
            Err(e) => match &e {
                CoachError::PlanNotReady | CoachError::Validation { .. } => {
                    tracing::warn!("coach_ask rejected: {}", e);
                    Err(ErrorData::invalid_params(e.to_string(), None))
                }
                _ => {
                    tracing::error!("coach_ask error: {}", e);
                    Err(ErrorData::internal_error(e.to_string(), None))
                }
            },
        }
    }

    #[tool(description = "Read the stored conversation history in chronological order.")]
    pub async fn coach_transcript(
        &self,
        params: Parameters<TranscriptParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        // Read-only; no rate limit and no completion call
        match self.handlers.coach_transcript(params.0).await {
            Ok(response) => {
                let content = Content::json(response).map_err(|e| {
                    ErrorData::internal_error(format!("Failed to create JSON content: {e}"), None)
                })?;
                Ok(CallToolResult::success(vec![content]))
            }
            Err(e) => {
                tracing::error!("coach_transcript error: {}", e);
                Err(ErrorData::internal_error(e.to_string(), None))
            }
        }
    }

    #[tool(description = "Get help information about available tools and their usage")]
    pub async fn coach_help(
        &self,
        params: Parameters<CoachHelpParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        // No rate limit for help requests
        match self.handlers.coach_help(params.0).await {
            Ok(response) => {
                let content = Content::json(response).map_err(|e| {
                    ErrorData::internal_error(format!("Failed to create JSON content: {e}"), None)
                })?;
                Ok(CallToolResult::success(vec![content]))
            }
            Err(e) => {
                tracing::error!("coach_help error: {}", e);
                Err(ErrorData::internal_error(
                    format!("Error generating help: {e}"),
                    None,
                ))
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for FitnessCoachService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: rmcp::model::ProtocolVersion::V_2024_11_05,
            server_info: rmcp::model::Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
            },
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            instructions: Some(
                "Fitness Coach MCP server: generate a personalized fitness plan from a biometric profile, then ask follow-up questions against it.".into(),
            ),
        }
    }
}
