use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::error::{CoachError, Result};

/// Sliding-window request limiter keyed by instance id. Protects the
/// completion-bound tools from hammering the Groq quota.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    hits: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window_seconds: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_seconds),
            hits: Mutex::new(HashMap::new()),
        }
    }

    pub async fn check_rate_limit(&self, instance_id: &str) -> Result<()> {
        let now = Instant::now();
        let mut hits = self.hits.lock().await;
        let window_hits = hits.entry(instance_id.to_string()).or_default();

        while let Some(oldest) = window_hits.front() {
            if now.duration_since(*oldest) > self.window {
                window_hits.pop_front();
            } else {
                break;
            }
        }

        if window_hits.len() >= self.max_requests {
            return Err(CoachError::RateLimit(format!(
                "instance '{}' exceeded {} requests per {}s",
                instance_id,
                self.max_requests,
                self.window.as_secs()
            )));
        }

        window_hits.push_back(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allows_up_to_limit() {
        let limiter = RateLimiter::new(3, 60);
        for _ in 0..3 {
            assert!(limiter.check_rate_limit("test").await.is_ok());
        }
        let result = limiter.check_rate_limit("test").await;
        assert!(matches!(result, Err(CoachError::RateLimit(_))));
    }

    #[tokio::test]
    async fn test_instances_are_limited_independently() {
        let limiter = RateLimiter::new(1, 60);
        assert!(limiter.check_rate_limit("a").await.is_ok());
        assert!(limiter.check_rate_limit("b").await.is_ok());
        assert!(limiter.check_rate_limit("a").await.is_err());
    }
}
