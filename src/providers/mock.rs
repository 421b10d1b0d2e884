/*!
 * Mock translation backend for tests and benchmarks.
 *
 * - `MockBackend::uppercase()` - Always succeeds with the uppercased text
 * - `MockBackend::intermittent(n)` - Fails every nth request
 * - `MockBackend::failing()` - Always fails with an error
 *
 * Every backend records how many requests were in flight at the same time.
 */

use async_trait::async_trait;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::TranslationBackend;

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Returns the text uppercased
    Uppercase,
    /// Returns the text tagged with the target language
    Echo,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
}

/// In-process translation backend
#[derive(Debug, Clone)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Upper bound of a random per-request delay
    max_delay_ms: u64,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Requests currently awaiting their answer
    in_flight: Arc<AtomicUsize>,
    /// Highest value `in_flight` ever reached
    high_water_mark: Arc<AtomicUsize>,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            max_delay_ms: 0,
            request_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            high_water_mark: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Backend that uppercases its input
    pub fn uppercase() -> Self {
        Self::new(MockBehavior::Uppercase)
    }

    /// Backend that prefixes its input with the target language
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Backend that fails every `fail_every`th request
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    /// Backend that always fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Sleep a random duration in `0..=max_delay_ms` before answering
    pub fn with_random_delay(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }

    /// Total number of requests received
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Highest number of concurrent requests observed
    pub fn high_water_mark(&self) -> usize {
        self.high_water_mark.load(Ordering::SeqCst)
    }

    fn respond(&self, count: usize, text: &str, target_language: &str) -> Result<String, ProviderError> {
        match self.behavior {
            MockBehavior::Uppercase => Ok(text.to_uppercase()),
            MockBehavior::Echo => Ok(format!("[{}] {}", target_language, text)),
            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        status_code: 500,
                        message: format!("Simulated failure on request {}", count + 1),
                    })
                } else {
                    Ok(text.to_uppercase())
                }
            }
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated connection failure".to_string())),
        }
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn translate(&self, text: &str, _source_language: &str, target_language: &str) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water_mark.fetch_max(current, Ordering::SeqCst);

        if self.max_delay_ms > 0 {
            let delay = rand::rng().random_range(0..=self.max_delay_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        } else {
            tokio::task::yield_now().await;
        }

        let result = self.respond(count, text, target_language);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
