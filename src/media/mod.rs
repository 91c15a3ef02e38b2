/*!
 * Stock media provider integration.
 *
 * This module contains the provider seam for stock media search, the
 * normalized media item model, and the resolver that fans suggestion
 * lookups out concurrently:
 * - `pexels`: Pexels photo and video search client
 * - `resolver`: bounded concurrent resolution with per-suggestion isolation
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::SuggestionResolutionError;

pub mod pexels;
pub mod resolver;

pub use resolver::MediaResolver;

/// Kind of a resolved media item, set from the provider collection that
/// answered the query. Never inferred from the URL, which is unreliable for
/// provider-proxied URLs without file extensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// A concrete resolved asset returned by the provider.
///
/// Serialized field names follow the consuming interface: `type`, `url`,
/// `image` (video thumbnail), `photographer`, `source`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaItem {
    /// Image or Video, from the collection queried
    #[serde(rename = "type")]
    pub kind: MediaKind,

    /// Resource location; a playable file for video, a displayable image otherwise
    pub url: String,

    /// Thumbnail image, present for video results
    #[serde(rename = "image", skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    /// Author/photographer name, may be absent
    #[serde(rename = "photographer", skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,

    /// Source identifier, e.g. "Pexels"
    #[serde(rename = "source")]
    pub provider: String,
}

/// Common trait for stock media providers
///
/// The two operations map to the provider's image and video collections.
/// A single credential is supplied out of band at construction time.
#[async_trait]
pub trait MediaProvider: Send + Sync + Debug {
    /// Search the image collection
    ///
    /// # Arguments
    /// * `query` - Search text, used verbatim
    /// * `limit` - Maximum number of results requested from the provider
    async fn search_images(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MediaItem>, SuggestionResolutionError>;

    /// Search the video collection
    async fn search_videos(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MediaItem>, SuggestionResolutionError>;
}
