/*!
 * Generative model provider implementations.
 *
 * This module contains the client seam the pipeline uses to talk to a
 * language model, plus the concrete implementations:
 * - Gemini: Google Generative Language API
 * - Mock: deterministic client for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ModelCallError;

/// Common trait for generative model clients
///
/// The pipeline treats the model as an untrusted text generator behind this
/// seam, so tests can substitute a deterministic client and the transport
/// can change without touching the pipeline.
#[async_trait]
pub trait ModelClient: Send + Sync + Debug {
    /// Send one prompt and return the raw response text
    ///
    /// # Arguments
    /// * `prompt` - The full instruction payload for this call
    ///
    /// # Returns
    /// * `Result<String, ModelCallError>` - The raw text or a transport/auth error
    async fn generate(&self, prompt: &str) -> Result<String, ModelCallError>;

    /// Test the connection to the model
    async fn test_connection(&self) -> Result<(), ModelCallError>;
}

pub mod gemini;
pub mod mock;
