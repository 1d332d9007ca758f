pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod rate_limit;
pub mod service;
pub mod session;
pub mod transport;
pub mod validation;

use std::sync::Arc;

use crate::config::Config;
use crate::engine::CoachEngine;
use crate::error::Result;
use crate::models::Profile;
use crate::session::Session;
use crate::transport::{GroqTransport, Transport};

/// Headless library facade over the conversation engine, for callers that
/// manage their own [`Session`] instead of going through the MCP surface.
pub struct Coach {
    engine: CoachEngine,
}

impl Coach {
    pub fn new(cfg: &Config) -> Result<Self> {
        let transport = Arc::new(GroqTransport::new(
            cfg.groq.api_key.clone(),
            cfg.request_timeout(),
        )?);

        let engine = CoachEngine::new(
            Arc::clone(&transport) as Arc<dyn Transport>,
            cfg.groq.model.clone(),
            cfg.groq.temperature,
            cfg.groq.max_tokens,
        );

        Ok(Self { engine })
    }

    pub async fn generate_plan(&self, session: &mut Session, profile: Profile) -> Result<String> {
        self.engine.generate_plan(session, profile).await
    }

    pub async fn ask_follow_up(&self, session: &mut Session, question: &str) -> Result<String> {
        self.engine.ask_follow_up(session, question).await
    }
}
