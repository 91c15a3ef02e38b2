/*!
 * Unit tests for the error taxonomy: display formatting and the wrapping
 * conversions the pipeline relies on.
 */

use scenestock::errors::{
    AppError, ModelCallError, ModelResponseError, SuggestionResolutionError, ValidationError,
};

#[test]
fn test_validationError_display_shouldDescribeFailure() {
    let err = ValidationError::EmptyScenes;
    assert_eq!(err.to_string(), "Script document contains no scenes");
}

#[test]
fn test_modelCallError_apiError_shouldIncludeStatusCode() {
    let err = ModelCallError::ApiError {
        status_code: 503,
        message: "overloaded".to_string(),
    };

    let text = err.to_string();
    assert!(text.contains("503"));
    assert!(text.contains("overloaded"));
}

#[test]
fn test_modelResponseError_noValidEntries_shouldReportDroppedCount() {
    let err = ModelResponseError::NoValidEntries { dropped: 3 };
    assert!(err.to_string().contains("3 entries dropped"));
}

#[test]
fn test_appError_fromValidationError_shouldWrapAsValidation() {
    let err: AppError = ValidationError::MissingScenes.into();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn test_appError_fromModelCallError_shouldWrapAsModelCall() {
    let err: AppError = ModelCallError::RequestFailed("timeout".to_string()).into();
    assert!(matches!(err, AppError::ModelCall(_)));
    assert!(err.to_string().contains("Model call error"));
}

#[test]
fn test_appError_fromModelResponseError_shouldStayDistinctFromModelCall() {
    let err: AppError = ModelResponseError::NoJsonArray.into();
    assert!(matches!(err, AppError::ModelResponse(_)));
}

#[test]
fn test_appError_fromIoError_shouldWrapAsFile() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err: AppError = io_err.into();
    assert!(matches!(err, AppError::File(_)));
}

#[test]
fn test_appError_fromAnyhowError_shouldWrapAsUnknown() {
    let err: AppError = anyhow::anyhow!("something else").into();
    assert!(matches!(err, AppError::Unknown(_)));
}

#[test]
fn test_suggestionResolutionError_display_shouldDescribeProviderFailure() {
    let err = SuggestionResolutionError::MalformedResponse("bad payload".to_string());
    assert!(err.to_string().contains("bad payload"));
}
