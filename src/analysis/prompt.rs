/*!
 * Prompt construction for scene analysis.
 *
 * The prompt embeds the full scene list verbatim and restates the output
 * contract on every call: the model is stateless, and the downstream parser
 * cannot reliably separate explanatory prose from data, so the instruction
 * demands JSON-only output in a fixed per-scene schema.
 */

use serde_json::json;

use crate::script_processor::Scene;

/// Instruction template for the scene analysis call.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    /// The template string with placeholders
    template: String,
}

impl PromptBuilder {
    /// The default instruction for per-scene keyword and media analysis.
    pub const SCENE_ANALYST: &'static str = r#"You are a visual researcher preparing stock media searches for a video script.

## Your Task
Analyze each scene of the script below and derive:
- 5 to 8 descriptive keywords capturing locations, actions, objects, moods, and time/weather
- one or more media suggestions, each with an asset type, a style note, and a provider search query

## Script Scenes
{scenes}

## Output Requirements
- Return ONLY a valid JSON array, no prose, no explanations, no code fences
- One object per input scene, each with exactly these fields:
  - "scene_order": the scene's order number (integer)
  - "scene_type": the scene's type string, echoed back
  - "scene_phrase": the scene's phrase, echoed back
  - "keywords": array of 5-8 short keyword strings
  - "mediaSuggestions": array of 1 or more objects, each with:
    - "type": one of "Image", "Video", "Icon", "Animation"
    - "style": a short composition/style note
    - "searchQuery": the exact query to send to a stock media provider

## Quality Standards
- Search queries must be plain descriptive phrases, 2-5 words, no quotes or operators
- Prefer "Image" for static moments and "Video" for motion-heavy scenes
- Keywords are lowercase single words or short bigrams"#;

    /// Create a builder from a custom template. The template must contain
    /// a `{scenes}` placeholder.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default scene analyst builder.
    pub fn scene_analyst() -> Self {
        Self::new(Self::SCENE_ANALYST)
    }

    /// Render the instruction for the given scene list.
    ///
    /// Pure string construction; deterministic for a fixed scene list.
    pub fn render(&self, scenes: &[Scene]) -> String {
        let scene_payload: Vec<_> = scenes
            .iter()
            .map(|s| {
                json!({
                    "scene_order": s.order,
                    "scene_type": s.scene_type,
                    "scene_phrase": s.phrase,
                })
            })
            .collect();

        // Embedding can only fail on non-string map keys, which json! cannot produce
        let serialized = serde_json::to_string_pretty(&scene_payload)
            .unwrap_or_else(|_| "[]".to_string());

        self.template.replace("{scenes}", &serialized)
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::scene_analyst()
    }
}
