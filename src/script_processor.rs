/*!
 * Script document handling and normalization.
 *
 * This module parses the raw uploaded script bytes into an ordered list of
 * scenes, validating the document shape before any external call is made.
 */

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ValidationError;

/// Top-level field names accepted for the scenes array. The original
/// consumer uploads documents keyed by "response"; "scenes" is the
/// canonical name.
const SCENE_ARRAY_FIELDS: [&str; 2] = ["scenes", "response"];

/// One narrative unit of the input script
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    /// Position of the scene within the script, 1-based and unique
    pub order: u32,

    /// Free-text classification of the scene, e.g. "intro"
    pub scene_type: String,

    /// The narrative text to analyze
    pub phrase: String,
}

impl Scene {
    /// Create a new scene
    pub fn new(order: u32, scene_type: impl Into<String>, phrase: impl Into<String>) -> Self {
        Self {
            order,
            scene_type: scene_type.into(),
            phrase: phrase.into(),
        }
    }
}

/// A validated script document holding the ordered scene list
#[derive(Debug, Clone)]
pub struct ScriptDocument {
    /// Ordered scenes extracted from the upload
    pub scenes: Vec<Scene>,
}

/// Raw scene record as it appears in the uploaded JSON. Field names are
/// tolerant of the two shapes seen in the wild: `scene_*` prefixed and bare.
#[derive(Debug, Deserialize)]
struct RawScene {
    #[serde(alias = "scene_order")]
    order: Option<u32>,

    #[serde(default, alias = "scene_type", rename = "type")]
    scene_type: String,

    #[serde(default, alias = "scene_phrase")]
    phrase: String,
}

impl ScriptDocument {
    /// Parse and validate raw upload bytes into a script document.
    ///
    /// Fails with `ValidationError` when the bytes are not JSON, the scenes
    /// array field is missing or not an array, or the array is empty.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        let root: Value = serde_json::from_slice(bytes)
            .map_err(|e| ValidationError::InvalidJson(e.to_string()))?;

        let (field, raw_scenes) = Self::scene_array(&root)?;

        if raw_scenes.is_empty() {
            return Err(ValidationError::EmptyScenes);
        }

        let mut scenes = Vec::with_capacity(raw_scenes.len());
        for (idx, value) in raw_scenes.iter().enumerate() {
            let raw: RawScene = serde_json::from_value(value.clone()).map_err(|e| {
                ValidationError::InvalidJson(format!("scene {} in '{}': {}", idx + 1, field, e))
            })?;

            if raw.phrase.trim().is_empty() {
                return Err(ValidationError::EmptyPhrase(idx + 1));
            }

            // Preserve input position as order when the document is unnumbered
            let order = match raw.order {
                Some(0) => {
                    return Err(ValidationError::InvalidOrder(format!(
                        "scene {} has order 0, orders start at 1",
                        idx + 1
                    )));
                }
                Some(n) => n,
                None => (idx + 1) as u32,
            };

            scenes.push(Scene {
                order,
                scene_type: raw.scene_type,
                phrase: raw.phrase,
            });
        }

        Self::check_unique_orders(&scenes)?;

        Ok(Self { scenes })
    }

    /// Locate the top-level scenes array under one of the accepted field names
    fn scene_array(root: &Value) -> Result<(&'static str, &Vec<Value>), ValidationError> {
        let obj = root.as_object().ok_or(ValidationError::MissingScenes)?;

        for field in SCENE_ARRAY_FIELDS {
            if let Some(value) = obj.get(field) {
                return match value.as_array() {
                    Some(array) => Ok((field, array)),
                    None => Err(ValidationError::NotAnArray(field.to_string())),
                };
            }
        }

        Err(ValidationError::MissingScenes)
    }

    /// Supplied order values must be unique within the document
    fn check_unique_orders(scenes: &[Scene]) -> Result<(), ValidationError> {
        let mut seen = std::collections::HashSet::with_capacity(scenes.len());
        for scene in scenes {
            if !seen.insert(scene.order) {
                return Err(ValidationError::InvalidOrder(format!(
                    "duplicate scene order {}",
                    scene.order
                )));
            }
        }
        Ok(())
    }

    /// Number of scenes in the document
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the document holds no scenes. Cannot happen for a document
    /// built through `from_bytes`.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}
