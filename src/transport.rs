use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::{CoachError, Result};
use crate::models::{GroqRequest, GroqResponse};

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

#[async_trait]
pub trait Transport: Send + Sync {
    async fn chat(&self, req: &GroqRequest) -> Result<GroqResponse>;
}

pub struct GroqTransport {
    client: Client,
    api_key: String,
}

impl GroqTransport {
    pub fn new(api_key: String, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| CoachError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl Transport for GroqTransport {
    /// One request, one response. A failure of any kind is surfaced to the
    /// caller for that turn; there is no retry and no backoff.
    async fn chat(&self, req: &GroqRequest) -> Result<GroqResponse> {
        let response = self
            .client
            .post(GROQ_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(req)
            .send()
            .await
            .map_err(|e| {
                CoachError::CompletionService(format!("Failed to send request to Groq API: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CoachError::CompletionService(format!(
                "Groq API error ({status}): {body}"
            )));
        }

        response.json().await.map_err(|e| {
            CoachError::CompletionService(format!("Failed to parse Groq API response: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatMessage;
    use tokio;

    // Exercises the real Groq API; only runs when a key is present in the
    // environment.
    #[tokio::test]
    async fn test_groq_transport_chat_live() {
        if let Ok(api_key) = std::env::var("GROQ_API_KEY") {
            let transport = match GroqTransport::new(api_key, Duration::from_secs(60)) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Failed to create transport in test: {e}");
                    return;
                }
            };
            let req = GroqRequest {
                model: "llama-3.1-8b-instant".to_string(),
                messages: vec![ChatMessage::user("What is the capital of France?")],
                temperature: 0.0,
                max_tokens: 100,
                response_format: None,
            };
            let res = transport.chat(&req).await;
            assert!(res.is_ok());
        }
    }
}
