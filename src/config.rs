use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{CoachError, Result};

/// Main configuration structure for the coaching service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub groq: GroqConfig,
    pub rate_limiter: RateLimiterConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub default_instance_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqConfig {
    /// Resolved from the config file first, then the GROQ_API_KEY
    /// environment variable. Startup fails hard when both are absent.
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: i32,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    pub max_requests: u32,
    pub window_seconds: u64,
}

impl Config {
    /// Load configuration from file with environment variable fallbacks.
    /// An unreadable or unparsable file falls back to defaults; a missing
    /// Groq credential is fatal.
    pub fn load() -> Result<Self> {
        // Load environment variables from .env files; the service may run
        // from the repo root or a subdirectory.
        let env_paths = ["../.env", ".env"];

        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }

        if !env_loaded {
            tracing::warn!(
                "No .env file found in any expected location - continuing with env vars only"
            );
        }

        let config_path =
            env::var("COACH_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            match fs::read_to_string(&config_path) {
                Ok(contents) => match serde_yaml::from_str::<Config>(&contents) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from {}", config_path);
                        config
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to parse config file {}: {} - using defaults",
                            config_path,
                            e
                        );
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to read config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }
            }
        } else {
            tracing::warn!("Config file not found at {} - using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable fallbacks and overrides
    fn apply_env_overrides(&mut self) {
        // Credential preference order: config file first, then process
        // environment. The env var never replaces a key the file provided.
        if self.groq.api_key.is_empty() {
            if let Ok(api_key) = env::var("GROQ_API_KEY") {
                self.groq.api_key = api_key;
            }
        }

        if let Ok(model) = env::var("GROQ_MODEL") {
            self.groq.model = model;
        }
        if let Ok(timeout) = env::var("COACH_REQUEST_TIMEOUT_SECONDS") {
            if let Ok(secs) = timeout.parse() {
                self.groq.request_timeout_seconds = secs;
            }
        }

        if let Ok(name) = env::var("COACH_SERVER_NAME") {
            self.server.name = name;
        }

        if let Ok(max_requests) = env::var("COACH_RATE_LIMIT_MAX_REQUESTS") {
            if let Ok(max) = max_requests.parse() {
                self.rate_limiter.max_requests = max;
            }
        }
        if let Ok(window) = env::var("COACH_RATE_LIMIT_WINDOW_SECONDS") {
            if let Ok(window_secs) = window.parse() {
                self.rate_limiter.window_seconds = window_secs;
            }
        }
    }

    /// Validate configuration. A missing credential or nonsense bounds are
    /// startup failures, not warnings.
    fn validate(&self) -> Result<()> {
        if self.groq.api_key.is_empty() {
            return Err(CoachError::Config(
                "GROQ_API_KEY not found in config file or environment".to_string(),
            ));
        }
        if self.groq.model.is_empty() {
            return Err(CoachError::Config("Groq model cannot be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.groq.temperature) {
            return Err(CoachError::Config(
                "Groq temperature must be between 0.0 and 2.0".to_string(),
            ));
        }
        if self.groq.max_tokens <= 0 {
            return Err(CoachError::Config(
                "Groq max_tokens must be positive".to_string(),
            ));
        }
        if self.groq.request_timeout_seconds == 0 {
            return Err(CoachError::Config(
                "Request timeout cannot be 0".to_string(),
            ));
        }
        if self.rate_limiter.max_requests == 0 {
            return Err(CoachError::Config(
                "Rate limiter max_requests cannot be 0".to_string(),
            ));
        }
        if self.rate_limiter.window_seconds == 0 {
            return Err(CoachError::Config(
                "Rate limiter window_seconds cannot be 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the completion request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.groq.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "fitness-coach".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                default_instance_id: "coach".to_string(),
            },
            groq: GroqConfig {
                api_key: String::new(),
                model: "llama-3.1-8b-instant".to_string(),
                temperature: 0.7,
                max_tokens: 1024,
                request_timeout_seconds: 60,
            },
            rate_limiter: RateLimiterConfig {
                max_requests: 30,
                window_seconds: 60,
            },
        }
    }
}
