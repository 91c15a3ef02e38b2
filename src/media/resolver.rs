/*!
 * Concurrent media suggestion resolution.
 *
 * Every (scene, suggestion) pair is an independent task: tasks share no
 * mutable state beyond their own pre-allocated output slot, so they run
 * concurrently under a bounded pool. A failing provider call degrades that
 * one suggestion to an empty result with a warning; it never aborts sibling
 * suggestions or scenes. An overall deadline keeps whatever completed and
 * marks the outcome degraded instead of hanging.
 */

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use log::{debug, warn};
use tokio::sync::Semaphore;
use tokio::time::timeout;

use crate::analysis::{MediaSuggestion, MediaType, SceneAnalysis};
use crate::errors::SuggestionResolutionError;
use crate::media::{MediaItem, MediaProvider};

/// Tuning knobs for the resolver
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Maximum number of concurrent provider calls
    pub concurrent_requests: usize,

    /// Result count requested per query (provider-side cap)
    pub per_query_limit: usize,

    /// Overall deadline for one resolve pass
    pub resolve_timeout: Duration,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            concurrent_requests: 4,
            per_query_limit: 5,
            resolve_timeout: Duration::from_secs(60),
        }
    }
}

/// Result of resolving all suggestions of an analysis batch
#[derive(Debug)]
pub struct ResolveOutcome {
    /// Per-scene media lists, indexed like the input analyses. Within a
    /// scene, items follow the order suggestions appear in the source array.
    pub media: Vec<Vec<MediaItem>>,

    /// Whether the overall deadline expired before all tasks finished
    pub timed_out: bool,
}

/// Resolves media suggestions against a stock media provider
pub struct MediaResolver {
    /// The provider to query
    provider: Arc<dyn MediaProvider>,

    /// Resolver tuning
    options: ResolverOptions,
}

/// One unit of resolution work
struct SuggestionTask {
    scene_idx: usize,
    suggestion_idx: usize,
    suggestion: MediaSuggestion,
}

impl MediaResolver {
    /// Create a new resolver
    pub fn new(provider: Arc<dyn MediaProvider>, options: ResolverOptions) -> Self {
        Self { provider, options }
    }

    /// Resolve the media suggestions of every scene in the batch.
    ///
    /// This cannot fail: provider errors and deadline expiry degrade to
    /// empty lists for the affected suggestions.
    pub async fn resolve_all(&self, analyses: &[SceneAnalysis]) -> ResolveOutcome {
        // One slot per suggestion; None until its task completes
        let slots: Vec<Vec<Option<Vec<MediaItem>>>> = analyses
            .iter()
            .map(|a| vec![None; a.media_suggestions.len()])
            .collect();
        let slots = Arc::new(StdMutex::new(slots));

        let tasks: Vec<SuggestionTask> = analyses
            .iter()
            .enumerate()
            .flat_map(|(scene_idx, analysis)| {
                analysis
                    .media_suggestions
                    .iter()
                    .enumerate()
                    .map(move |(suggestion_idx, suggestion)| SuggestionTask {
                        scene_idx,
                        suggestion_idx,
                        suggestion: suggestion.clone(),
                    })
            })
            .collect();

        let total_tasks = tasks.len();
        debug!(
            "Resolving {} suggestions across {} scenes",
            total_tasks,
            analyses.len()
        );

        let semaphore = Arc::new(Semaphore::new(self.options.concurrent_requests));

        let driver = stream::iter(tasks)
            .map(|task| {
                let provider = Arc::clone(&self.provider);
                let semaphore = Arc::clone(&semaphore);
                let slots = Arc::clone(&slots);
                let limit = self.options.per_query_limit;

                async move {
                    // Closed only if the semaphore is dropped, which cannot happen here
                    let Ok(_permit) = semaphore.acquire().await else {
                        return;
                    };

                    let items = match resolve_suggestion(&*provider, &task.suggestion, limit).await
                    {
                        Ok(items) => items,
                        Err(e) => {
                            warn!(
                                "Suggestion '{}' (scene slot {}) failed to resolve: {}",
                                task.suggestion.search_query,
                                task.scene_idx + 1,
                                e
                            );
                            Vec::new()
                        }
                    };

                    let mut slots = slots.lock().unwrap();
                    slots[task.scene_idx][task.suggestion_idx] = Some(items);
                }
            })
            .buffer_unordered(self.options.concurrent_requests)
            .collect::<Vec<()>>();

        let timed_out = timeout(self.options.resolve_timeout, driver).await.is_err();
        if timed_out {
            warn!(
                "Media resolution deadline ({:?}) expired, returning partial results",
                self.options.resolve_timeout
            );
        }

        // Fold completed slots into per-scene media lists, suggestion order
        // preserved; unfinished slots contribute nothing.
        let slots = slots.lock().unwrap();
        let media = slots
            .iter()
            .map(|scene_slots| {
                scene_slots
                    .iter()
                    .flat_map(|slot| slot.clone().unwrap_or_default())
                    .collect()
            })
            .collect();

        ResolveOutcome { media, timed_out }
    }
}

/// Resolve one suggestion against the provider collection matching its type.
///
/// Unsupported types (Icon, Animation) issue no provider call and yield an
/// empty list; this is a known scope gap, not an error.
async fn resolve_suggestion(
    provider: &dyn MediaProvider,
    suggestion: &MediaSuggestion,
    limit: usize,
) -> Result<Vec<MediaItem>, SuggestionResolutionError> {
    match suggestion.media_type {
        MediaType::Image => provider.search_images(&suggestion.search_query, limit).await,
        MediaType::Video => provider.search_videos(&suggestion.search_query, limit).await,
        other => {
            debug!(
                "Suggestion type {} is not resolvable, passing through '{}'",
                other, suggestion.search_query
            );
            Ok(Vec::new())
        }
    }
}
