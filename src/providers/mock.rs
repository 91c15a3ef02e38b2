/*!
 * Mock model client for testing.
 *
 * Simulates the behaviors the parser and pipeline must cope with:
 * - `MockModelClient::working()` - returns a valid analysis array
 * - `MockModelClient::prose_wrapped()` - wraps the array in commentary
 * - `MockModelClient::failing()` - always fails the call
 * - `MockModelClient::empty()` - returns unusable text
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ModelCallError;
use crate::providers::ModelClient;

/// Behavior mode for the mock model client
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockModelBehavior {
    /// Returns a fixed valid JSON array response
    Working,
    /// Returns the valid array wrapped in leading/trailing prose
    ProseWrapped,
    /// Always fails with a transport error
    Failing,
    /// Fails with an authentication error
    AuthFailing,
    /// Returns text with no JSON array at all
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock model client with scriptable behavior
#[derive(Debug)]
pub struct MockModelClient {
    /// Behavior mode
    behavior: MockModelBehavior,
    /// Number of generate calls made
    call_count: Arc<AtomicUsize>,
    /// Canned response text, overriding the default fixture
    canned_response: Option<String>,
}

/// Default response fixture: one analyzed scene with an image suggestion
pub const DEFAULT_ANALYSIS: &str = r#"[
  {
    "scene_order": 1,
    "scene_type": "intro",
    "scene_phrase": "A sunrise over mountains",
    "keywords": ["sunrise", "mountains", "calm"],
    "mediaSuggestions": [
      {"type": "Image", "style": "wide establishing shot", "searchQuery": "sunrise mountains"}
    ]
  }
]"#;

impl MockModelClient {
    /// Create a new mock client with the specified behavior
    pub fn new(behavior: MockModelBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            canned_response: None,
        }
    }

    /// Create a working mock that returns the default analysis fixture
    pub fn working() -> Self {
        Self::new(MockModelBehavior::Working)
    }

    /// Create a mock that wraps the response in prose
    pub fn prose_wrapped() -> Self {
        Self::new(MockModelBehavior::ProseWrapped)
    }

    /// Create a failing mock that always errors
    pub fn failing() -> Self {
        Self::new(MockModelBehavior::Failing)
    }

    /// Create a mock that fails with an authentication error
    pub fn auth_failing() -> Self {
        Self::new(MockModelBehavior::AuthFailing)
    }

    /// Create a mock that returns text with no JSON in it
    pub fn empty() -> Self {
        Self::new(MockModelBehavior::Empty)
    }

    /// Set a canned response returned instead of the default fixture
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.canned_response = Some(response.into());
        self
    }

    /// Number of generate calls made so far
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn response_body(&self) -> String {
        self.canned_response
            .clone()
            .unwrap_or_else(|| DEFAULT_ANALYSIS.to_string())
    }
}

impl Clone for MockModelClient {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            call_count: Arc::clone(&self.call_count),
            canned_response: self.canned_response.clone(),
        }
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn generate(&self, _prompt: &str) -> Result<String, ModelCallError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockModelBehavior::Working => Ok(self.response_body()),

            MockModelBehavior::ProseWrapped => Ok(format!(
                "Sure! Here is the analysis you asked for:\n{}\nLet me know if you need anything else.",
                self.response_body()
            )),

            MockModelBehavior::Failing => Err(ModelCallError::RequestFailed(
                "Simulated model transport failure".to_string(),
            )),

            MockModelBehavior::AuthFailing => Err(ModelCallError::AuthenticationError(
                "Simulated invalid API key".to_string(),
            )),

            MockModelBehavior::Empty => {
                Ok("I am sorry, I cannot analyze this script.".to_string())
            }

            MockModelBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.response_body())
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ModelCallError> {
        match self.behavior {
            MockModelBehavior::Failing => Err(ModelCallError::RequestFailed(
                "Simulated model transport failure".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
