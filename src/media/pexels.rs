/*!
 * Pexels search client.
 *
 * Queries the photo and video collections and normalizes the heterogeneous
 * responses into the uniform `MediaItem` shape: photos use the medium
 * rendition, videos use the first available file variant plus its thumbnail.
 */

use std::time::Duration;

use async_trait::async_trait;
use log::{error, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::errors::SuggestionResolutionError;
use crate::media::{MediaItem, MediaKind, MediaProvider};

/// Provider identifier stamped on every normalized item
const PROVIDER_NAME: &str = "Pexels";

/// Pexels client for photo and video search
#[derive(Debug)]
pub struct Pexels {
    /// HTTP client for API requests
    client: Client,
    /// API key sent in the Authorization header
    api_key: String,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
}

/// Photo search response
#[derive(Debug, Deserialize)]
struct PhotoSearchResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

/// One photo result
#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    src: PhotoSources,
    #[serde(default)]
    photographer: Option<String>,
}

/// Available photo renditions
#[derive(Debug, Deserialize)]
struct PhotoSources {
    #[serde(default)]
    medium: Option<String>,
    #[serde(default)]
    original: Option<String>,
}

/// Video search response
#[derive(Debug, Deserialize)]
struct VideoSearchResponse {
    #[serde(default)]
    videos: Vec<PexelsVideo>,
}

/// One video result
#[derive(Debug, Deserialize)]
struct PexelsVideo {
    #[serde(default)]
    video_files: Vec<VideoFile>,
    /// Thumbnail image for the video
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    user: Option<VideoUser>,
}

/// One playable file variant of a video
#[derive(Debug, Deserialize)]
struct VideoFile {
    link: String,
}

/// Video author
#[derive(Debug, Deserialize)]
struct VideoUser {
    #[serde(default)]
    name: Option<String>,
}

impl Pexels {
    /// Create a new Pexels client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn base_url(&self) -> String {
        if self.endpoint.is_empty() {
            "https://api.pexels.com".to_string()
        } else {
            self.endpoint.trim_end_matches('/').to_string()
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &str,
        limit: usize,
    ) -> Result<T, SuggestionResolutionError> {
        let response = self
            .client
            .get(url)
            .header("Authorization", &self.api_key)
            .query(&[("query", query), ("per_page", &limit.to_string())])
            .send()
            .await
            .map_err(|e| {
                SuggestionResolutionError::RequestFailed(format!(
                    "Failed to send request to Pexels API: {}",
                    e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Pexels API error ({}): {}", status, error_text);

            return Err(SuggestionResolutionError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        response.json::<T>().await.map_err(|e| {
            SuggestionResolutionError::MalformedResponse(format!(
                "Failed to parse Pexels API response: {}",
                e
            ))
        })
    }
}

#[async_trait]
impl MediaProvider for Pexels {
    async fn search_images(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MediaItem>, SuggestionResolutionError> {
        let url = format!("{}/v1/search", self.base_url());
        let response: PhotoSearchResponse = self.get_json(&url, query, limit).await?;

        let items = response
            .photos
            .into_iter()
            .filter_map(|photo| {
                // Prefer the medium rendition, fall back to the original
                let url = photo.src.medium.or(photo.src.original)?;
                Some(MediaItem {
                    kind: MediaKind::Image,
                    url,
                    thumbnail: None,
                    attribution: photo.photographer,
                    provider: PROVIDER_NAME.to_string(),
                })
            })
            .collect();

        Ok(items)
    }

    async fn search_videos(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MediaItem>, SuggestionResolutionError> {
        let url = format!("{}/videos/search", self.base_url());
        let response: VideoSearchResponse = self.get_json(&url, query, limit).await?;

        let items = response
            .videos
            .into_iter()
            .filter_map(|video| {
                // Use the first available file variant; entries without one are skipped
                let Some(file) = video.video_files.into_iter().next() else {
                    warn!("Pexels video result for '{}' has no file variants, skipping", query);
                    return None;
                };
                Some(MediaItem {
                    kind: MediaKind::Video,
                    url: file.link,
                    thumbnail: video.image,
                    attribution: video.user.and_then(|u| u.name),
                    provider: PROVIDER_NAME.to_string(),
                })
            })
            .collect();

        Ok(items)
    }
}
