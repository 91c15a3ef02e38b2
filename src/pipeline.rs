/*!
 * Pipeline orchestration.
 *
 * Sequences normalize -> analyze -> resolve -> assemble for one request.
 * Only input validation and a total model failure are pipeline-fatal; every
 * per-scene and per-suggestion failure downgrades to an empty or partial
 * result for that unit.
 */

use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::{MediaSuggestion, PromptBuilder, ResponseParser, SceneAnalysis};
use crate::errors::AppError;
use crate::media::{MediaItem, MediaProvider, MediaResolver};
use crate::media::resolver::ResolverOptions;
use crate::providers::ModelClient;
use crate::script_processor::ScriptDocument;

/// Terminal status of a pipeline run that produced a result
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    /// All stages completed
    Succeeded,
    /// The resolve deadline expired; media lists are partial
    Degraded,
}

/// One scene of the final response: the analyzed scene enriched with its
/// resolved media. Field names follow the consuming interface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedScene {
    /// Order of the scene within the script
    pub scene_order: u32,

    /// Scene classification
    pub scene_type: String,

    /// The scene's narrative text
    pub scene_phrase: String,

    /// Keywords derived by the model
    pub keywords: Vec<String>,

    /// Media suggestions recommended by the model
    #[serde(rename = "mediaSuggestions")]
    pub media_suggestions: Vec<MediaSuggestion>,

    /// Resolved media items, in suggestion order
    pub media: Vec<MediaItem>,
}

/// The final aggregate returned to the caller. Constructed once per
/// request; immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Human-readable status message
    pub message: String,

    /// Terminal status of the run
    pub status: PipelineStatus,

    /// The enriched scenes
    pub scenes: Vec<EnrichedScene>,
}

/// The scene analysis and media resolution pipeline.
///
/// Collaborators are dependency-injected and request-independent; the
/// pipeline itself holds no mutable state across runs.
pub struct ScenePipeline {
    /// Generative model client
    model: Arc<dyn ModelClient>,

    /// Stock media provider
    media_provider: Arc<dyn MediaProvider>,

    /// Prompt construction
    prompt: PromptBuilder,

    /// Model response parsing
    parser: ResponseParser,

    /// Resolver tuning
    resolver_options: ResolverOptions,
}

impl ScenePipeline {
    /// Create a new pipeline with the given collaborators
    pub fn new(
        model: Arc<dyn ModelClient>,
        media_provider: Arc<dyn MediaProvider>,
        resolver_options: ResolverOptions,
    ) -> Self {
        Self {
            model,
            media_provider,
            prompt: PromptBuilder::scene_analyst(),
            parser: ResponseParser::new(),
            resolver_options,
        }
    }

    /// Replace the default prompt template
    pub fn with_prompt(mut self, prompt: PromptBuilder) -> Self {
        self.prompt = prompt;
        self
    }

    /// Run the full pipeline on raw script bytes.
    ///
    /// Fatal failures (`ValidationError`, `ModelCallError`,
    /// `ModelResponseError`) abort the run; media resolution failures are
    /// absorbed and reflected only as missing items in the output.
    pub async fn run(&self, script_bytes: &[u8]) -> Result<PipelineResult, AppError> {
        // Received -> Normalized
        let document = ScriptDocument::from_bytes(script_bytes)?;
        info!("Normalized script with {} scenes", document.len());

        // Normalized -> Analyzed
        let analyses = self.analyze(&document).await?;
        info!("Model returned {} valid scene analyses", analyses.len());

        // Analyzed -> Resolved
        let resolver = MediaResolver::new(
            Arc::clone(&self.media_provider),
            self.resolver_options.clone(),
        );
        let outcome = resolver.resolve_all(&analyses).await;

        // Resolved -> Succeeded
        let status = if outcome.timed_out {
            PipelineStatus::Degraded
        } else {
            PipelineStatus::Succeeded
        };

        Ok(Self::assemble(analyses, outcome.media, status))
    }

    /// Drive the model call and parse its response into typed analyses
    async fn analyze(&self, document: &ScriptDocument) -> Result<Vec<SceneAnalysis>, AppError> {
        let prompt = self.prompt.render(&document.scenes);
        debug!("Sending {} char prompt to model", prompt.len());

        let raw = self.model.generate(&prompt).await?;
        debug!("Model replied with {} chars", raw.len());

        let analyses = self.parser.parse(&raw)?;

        if analyses.len() != document.len() {
            warn!(
                "Model returned {} entries for {} input scenes",
                analyses.len(),
                document.len()
            );
        }

        Ok(analyses)
    }

    /// Assemble the final result, pairing each analysis with its media list
    fn assemble(
        analyses: Vec<SceneAnalysis>,
        media: Vec<Vec<MediaItem>>,
        status: PipelineStatus,
    ) -> PipelineResult {
        let mut scenes: Vec<EnrichedScene> = analyses
            .into_iter()
            .zip(media)
            .map(|(analysis, media)| EnrichedScene {
                scene_order: analysis.scene_order,
                scene_type: analysis.scene_type,
                scene_phrase: analysis.scene_phrase,
                keywords: analysis.keywords,
                media_suggestions: analysis.media_suggestions,
                media,
            })
            .collect();

        scenes.sort_by_key(|s| s.scene_order);

        let message = match status {
            PipelineStatus::Succeeded => "Script processed successfully!".to_string(),
            PipelineStatus::Degraded => {
                "Script processed with partial media results (resolution deadline expired)"
                    .to_string()
            }
        };

        PipelineResult {
            message,
            status,
            scenes,
        }
    }
}
