/*!
 * Scene analysis data model and the model-facing stages.
 *
 * This module contains the typed structures produced by the generative
 * model call, plus the two stages that surround it:
 * - `prompt`: builds the deterministic instruction payload
 * - `parser`: extracts and validates the model's JSON response
 */

use serde::{Deserialize, Serialize};

pub mod parser;
pub mod prompt;

pub use parser::ResponseParser;
pub use prompt::PromptBuilder;

/// Asset category recommended by the model for a scene.
///
/// Only `Image` and `Video` are resolved against the media provider; the
/// other categories pass through unresolved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Video,
    Icon,
    Animation,
}

impl MediaType {
    /// Parse a model-supplied type string, tolerating case variations
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "image" | "photo" | "picture" => Some(Self::Image),
            "video" | "clip" | "footage" => Some(Self::Video),
            "icon" => Some(Self::Icon),
            "animation" | "animated" => Some(Self::Animation),
            _ => None,
        }
    }

    /// Whether this type has a provider collection to query
    pub fn is_resolvable(&self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Image => "Image",
            Self::Video => "Video",
            Self::Icon => "Icon",
            Self::Animation => "Animation",
        };
        write!(f, "{}", name)
    }
}

/// A model-recommended asset lookup for one scene
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaSuggestion {
    /// Asset category to search for
    #[serde(rename = "type")]
    pub media_type: MediaType,

    /// Free-text composition guidance, descriptive only
    pub style: String,

    /// Query text used verbatim against the provider
    #[serde(rename = "searchQuery")]
    pub search_query: String,
}

impl MediaSuggestion {
    /// Create a new suggestion
    pub fn new(
        media_type: MediaType,
        style: impl Into<String>,
        search_query: impl Into<String>,
    ) -> Self {
        Self {
            media_type,
            style: style.into(),
            search_query: search_query.into(),
        }
    }
}

/// One validated entry of the model's response: a scene echoed back with
/// its derived keywords and media suggestions attached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneAnalysis {
    /// Order of the scene this analysis refers to
    pub scene_order: u32,

    /// Scene classification echoed by the model
    pub scene_type: String,

    /// Scene phrase echoed by the model
    pub scene_phrase: String,

    /// Descriptive keywords for the scene, target length 5-8
    pub keywords: Vec<String>,

    /// Recommended asset lookups, one or more per scene
    #[serde(rename = "mediaSuggestions")]
    pub media_suggestions: Vec<MediaSuggestion>,
}
