/*!
 * End-to-end tests for the scene pipeline with mock collaborators.
 *
 * Covers the fatal/non-fatal failure split: validation and model failures
 * abort the run, media resolution failures only thin out the output.
 */

use std::sync::Arc;

use scenestock::errors::AppError;
use scenestock::media::MediaKind;
use scenestock::media::resolver::ResolverOptions;
use scenestock::pipeline::{PipelineStatus, ScenePipeline};
use scenestock::providers::mock::MockModelClient;

use crate::common::mock_providers::{Collection, MockMediaProvider};
use crate::common::{multi_scene_script, single_scene_script};

fn pipeline_with(
    model: &MockModelClient,
    media: &MockMediaProvider,
) -> ScenePipeline {
    ScenePipeline::new(
        Arc::new(model.clone()),
        Arc::new(media.clone()),
        ResolverOptions::default(),
    )
}

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn test_pipeline_singleSceneEndToEnd_shouldEnrichSceneWithImage() {
    let model = MockModelClient::working();
    let media = MockMediaProvider::new();
    let pipeline = pipeline_with(&model, &media);

    let result = pipeline.run(&single_scene_script()).await.unwrap();

    assert_eq!(result.status, PipelineStatus::Succeeded);
    assert_eq!(result.scenes.len(), 1);

    let scene = &result.scenes[0];
    assert_eq!(scene.scene_order, 1);
    assert_eq!(scene.keywords, vec!["sunrise", "mountains", "calm"]);
    assert_eq!(scene.media.len(), 1);
    assert_eq!(scene.media[0].kind, MediaKind::Image);

    // The single image suggestion queried the image collection only
    assert_eq!(media.calls_to(Collection::Images), 1);
    assert_eq!(media.calls_to(Collection::Videos), 0);
}

#[tokio::test]
async fn test_pipeline_withProseWrappedModelOutput_shouldStillSucceed() {
    let model = MockModelClient::prose_wrapped();
    let media = MockMediaProvider::new();
    let pipeline = pipeline_with(&model, &media);

    let result = pipeline.run(&single_scene_script()).await.unwrap();
    assert_eq!(result.scenes.len(), 1);
}

#[tokio::test]
async fn test_pipeline_rerunWithIdenticalCollaborators_shouldBeIdempotent() {
    let model = MockModelClient::working();
    let media = MockMediaProvider::new();
    let pipeline = pipeline_with(&model, &media);

    let first = pipeline.run(&single_scene_script()).await.unwrap();
    let second = pipeline.run(&single_scene_script()).await.unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

// ============================================================================
// Fatal failures
// ============================================================================

#[tokio::test]
async fn test_pipeline_withInvalidDocument_shouldFailBeforeAnyExternalCall() {
    let model = MockModelClient::working();
    let media = MockMediaProvider::new();
    let pipeline = pipeline_with(&model, &media);

    let result = pipeline.run(br#"{"scenes":[]}"#).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(model.calls(), 0);
    assert!(media.calls().is_empty());
}

#[tokio::test]
async fn test_pipeline_withModelTransportFailure_shouldFailAsModelCall() {
    let model = MockModelClient::failing();
    let media = MockMediaProvider::new();
    let pipeline = pipeline_with(&model, &media);

    let result = pipeline.run(&single_scene_script()).await;

    assert!(matches!(result, Err(AppError::ModelCall(_))));
    assert!(media.calls().is_empty());
}

#[tokio::test]
async fn test_pipeline_withUnusableModelOutput_shouldFailAsModelResponse() {
    // Distinct from transport failure so operators can tell "model
    // unreachable" from "model produced unusable output"
    let model = MockModelClient::empty();
    let media = MockMediaProvider::new();
    let pipeline = pipeline_with(&model, &media);

    let result = pipeline.run(&single_scene_script()).await;

    assert!(matches!(result, Err(AppError::ModelResponse(_))));
    assert!(media.calls().is_empty());
}

// ============================================================================
// Degradation, never abort
// ============================================================================

#[tokio::test]
async fn test_pipeline_withOneFailingSuggestion_shouldStillSucceed() {
    let response = r#"[{
        "scene_order": 1,
        "scene_type": "intro",
        "scene_phrase": "A sunrise over mountains",
        "keywords": ["sunrise", "mountains"],
        "mediaSuggestions": [
            {"type": "Image", "style": "wide shot", "searchQuery": "broken query"},
            {"type": "Image", "style": "close-up", "searchQuery": "sunrise mountains"}
        ]
    }]"#;

    let model = MockModelClient::working().with_response(response);
    let media = MockMediaProvider::new().with_failing_query("broken query");
    let pipeline = pipeline_with(&model, &media);

    let result = pipeline.run(&single_scene_script()).await.unwrap();

    assert_eq!(result.status, PipelineStatus::Succeeded);
    assert_eq!(result.scenes[0].media.len(), 1);
    assert!(result.scenes[0].media[0].url.contains("sunrise-mountains"));
}

#[tokio::test]
async fn test_pipeline_withPartiallyInvalidModelEntries_shouldKeepValidOnes() {
    // Second entry is missing its keywords array and gets dropped
    let response = r#"[
        {
            "scene_order": 1,
            "scene_type": "intro",
            "scene_phrase": "A sunrise over mountains",
            "keywords": ["sunrise"],
            "mediaSuggestions": [
                {"type": "Image", "style": "wide", "searchQuery": "sunrise mountains"}
            ]
        },
        {
            "scene_order": 2,
            "scene_type": "action",
            "scene_phrase": "A river rushing through a canyon",
            "mediaSuggestions": []
        },
        {
            "scene_order": 3,
            "scene_type": "outro",
            "scene_phrase": "Stars appear over a quiet valley",
            "keywords": ["stars", "valley", "night"],
            "mediaSuggestions": [
                {"type": "Video", "style": "timelapse", "searchQuery": "night sky timelapse"}
            ]
        }
    ]"#;

    let model = MockModelClient::working().with_response(response);
    let media = MockMediaProvider::new();
    let pipeline = pipeline_with(&model, &media);

    let result = pipeline.run(&multi_scene_script()).await.unwrap();

    assert_eq!(result.scenes.len(), 2);
    assert_eq!(result.scenes[0].scene_order, 1);
    assert_eq!(result.scenes[1].scene_order, 3);
    assert_eq!(result.scenes[1].media[0].kind, MediaKind::Video);
}

#[tokio::test]
async fn test_pipeline_withIconSuggestion_shouldPassThroughUnresolved() {
    let response = r#"[{
        "scene_order": 1,
        "scene_type": "intro",
        "scene_phrase": "A sunrise over mountains",
        "keywords": ["sunrise"],
        "mediaSuggestions": [
            {"type": "Icon", "style": "flat minimal", "searchQuery": "sun icon"}
        ]
    }]"#;

    let model = MockModelClient::working().with_response(response);
    let media = MockMediaProvider::new();
    let pipeline = pipeline_with(&model, &media);

    let result = pipeline.run(&single_scene_script()).await.unwrap();

    // Suggestion is kept in the output, but no media was resolved for it
    assert_eq!(result.scenes[0].media_suggestions.len(), 1);
    assert!(result.scenes[0].media.is_empty());
    assert!(media.calls().is_empty());
}

#[tokio::test]
async fn test_pipeline_whenResolveDeadlineExpires_shouldReturnDegradedResult() {
    let model = MockModelClient::working();
    let media = MockMediaProvider::new().with_delay_ms(500);
    let pipeline = ScenePipeline::new(
        Arc::new(model.clone()),
        Arc::new(media.clone()),
        ResolverOptions {
            resolve_timeout: std::time::Duration::from_millis(50),
            ..Default::default()
        },
    );

    let result = pipeline.run(&single_scene_script()).await.unwrap();

    assert_eq!(result.status, PipelineStatus::Degraded);
    // The analyzed scene is still returned, only its media is missing
    assert_eq!(result.scenes.len(), 1);
    assert!(result.scenes[0].media.is_empty());
}

#[tokio::test]
async fn test_pipeline_withScriptReadFromDisk_shouldProcessUploadBytes() {
    let dir = crate::common::create_temp_dir().unwrap();
    let path = crate::common::create_test_file(
        &dir.path().to_path_buf(),
        "script.json",
        r#"{"response":[{"scene_order":1,"scene_type":"intro","scene_phrase":"A sunrise over mountains"}]}"#,
    )
    .unwrap();

    let model = MockModelClient::working();
    let media = MockMediaProvider::new();
    let pipeline = pipeline_with(&model, &media);

    let bytes = std::fs::read(path).unwrap();
    let result = pipeline.run(&bytes).await.unwrap();

    assert_eq!(result.scenes.len(), 1);
    assert_eq!(result.scenes[0].scene_phrase, "A sunrise over mountains");
}

// ============================================================================
// Output shape
// ============================================================================

#[tokio::test]
async fn test_pipeline_outputJson_shouldUseConsumerFieldNames() {
    let model = MockModelClient::working();
    let media = MockMediaProvider::new();
    let pipeline = pipeline_with(&model, &media);

    let result = pipeline.run(&single_scene_script()).await.unwrap();
    let json = serde_json::to_value(&result).unwrap();

    let scene = &json["scenes"][0];
    assert!(scene.get("scene_order").is_some());
    assert!(scene.get("scene_phrase").is_some());
    assert!(scene.get("mediaSuggestions").is_some());

    let item = &scene["media"][0];
    assert_eq!(item["type"], "image");
    assert_eq!(item["source"], "MockStock");
    assert_eq!(item["photographer"], "Mock Photographer");
}

#[tokio::test]
async fn test_pipeline_scenesInOutput_shouldBeSortedByOrder() {
    // Model returns entries out of order
    let response = r#"[
        {
            "scene_order": 2,
            "scene_type": "action",
            "scene_phrase": "A river rushing through a canyon",
            "keywords": ["river"],
            "mediaSuggestions": [
                {"type": "Image", "style": "wide", "searchQuery": "river canyon"}
            ]
        },
        {
            "scene_order": 1,
            "scene_type": "intro",
            "scene_phrase": "A sunrise over mountains",
            "keywords": ["sunrise"],
            "mediaSuggestions": [
                {"type": "Image", "style": "wide", "searchQuery": "sunrise mountains"}
            ]
        }
    ]"#;

    let model = MockModelClient::working().with_response(response);
    let media = MockMediaProvider::new();
    let pipeline = pipeline_with(&model, &media);

    let result = pipeline.run(&multi_scene_script()).await.unwrap();

    assert_eq!(result.scenes[0].scene_order, 1);
    assert_eq!(result.scenes[1].scene_order, 2);
}
