/*!
 * # scenestock - Scene Analysis & Stock Media Resolution
 *
 * A Rust library for turning a structured video script into per-scene
 * keywords, media suggestions, and resolved stock media.
 *
 * ## Features
 *
 * - Validate and normalize uploaded script documents
 * - Derive per-scene keywords and media suggestions via a generative model
 * - Parse untrusted model output through a strict schema boundary
 * - Resolve suggestions into concrete stock photos and videos (Pexels)
 * - Bounded concurrent resolution with per-suggestion fault isolation
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `script_processor`: Script document parsing and validation
 * - `analysis`: Model-facing stages:
 *   - `analysis::prompt`: Instruction payload construction
 *   - `analysis::parser`: Response extraction and validation
 * - `providers`: Generative model clients:
 *   - `providers::gemini`: Gemini API client
 *   - `providers::mock`: Deterministic client for tests
 * - `media`: Stock media integration:
 *   - `media::pexels`: Pexels search client
 *   - `media::resolver`: Concurrent suggestion resolution
 * - `pipeline`: End-to-end orchestration
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod analysis;
pub mod app_config;
pub mod errors;
pub mod media;
pub mod pipeline;
pub mod providers;
pub mod script_processor;

// Re-export main types for easier usage
pub use analysis::{MediaSuggestion, MediaType, SceneAnalysis};
pub use app_config::Config;
pub use errors::{
    AppError, ModelCallError, ModelResponseError, SuggestionResolutionError, ValidationError,
};
pub use media::{MediaItem, MediaKind};
pub use pipeline::{PipelineResult, PipelineStatus, ScenePipeline};
pub use script_processor::{Scene, ScriptDocument};
