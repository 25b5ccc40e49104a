//! Video endpoints: upload, transcription, and the two search surfaces.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use flow_core::backend::{UploadRequest, VideoApi};
use flow_core::error::{FlowError, Result};
use flow_core::search::SearchHit;
use flow_core::video::VideoRef;

use crate::client::BackendClient;

/// Rejection message when an upload response carries no video id.
pub const UPLOAD_REJECTED_MESSAGE: &str = "Upload failed. Please try again.";
/// Rejection message for a refused transcription. The payload error is
/// not surfaced for this endpoint.
pub const TRANSCRIBE_REJECTED_MESSAGE: &str = "Transcription failed";
/// Rejection message for a refused transcript search.
pub const SEARCH_REJECTED_MESSAGE: &str = "Search failed";
/// Rejection message when the listing endpoint refuses.
pub const LIST_REJECTED_MESSAGE: &str = "Failed to load videos";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoIdBody<'a> {
    video_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TranscriptSearchBody<'a> {
    video_id: &'a str,
    query: &'a str,
}

#[derive(Serialize)]
struct GlobalSearchBody<'a> {
    query: &'a str,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(default, rename = "videoId")]
    video_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct TranscribeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    transcription: Option<String>,
}

#[derive(Deserialize)]
struct TranscriptSearchResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    videos: Vec<VideoRef>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct GlobalSearchResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    results: Vec<VideoRef>,
    #[serde(default)]
    error: Option<String>,
}

fn rejected(error: Option<String>, fallback: &str) -> FlowError {
    let message = error
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| fallback.to_string());
    FlowError::rejected(message)
}

#[async_trait]
impl VideoApi for BackendClient {
    async fn upload_video(&self, request: UploadRequest) -> Result<String> {
        let part = Part::bytes(request.bytes)
            .file_name(request.file_name.clone())
            .mime_str(&request.mime_type)
            .map_err(|e| FlowError::internal(format!("Invalid MIME type for upload: {e}")))?;
        let form = Form::new()
            .part("video", part)
            .text("userId", request.user_id)
            .text("userEmail", request.user_email);

        let response: UploadResponse = self.post_multipart("/upload", form).await?;
        match response.video_id {
            Some(video_id) => Ok(video_id),
            None => Err(rejected(response.error, UPLOAD_REJECTED_MESSAGE)),
        }
    }

    async fn transcribe(&self, video_id: &str) -> Result<String> {
        let response: TranscribeResponse = self
            .post_json("/transcribe-direct-video", &VideoIdBody { video_id })
            .await?;
        match response {
            TranscribeResponse {
                success: true,
                transcription: Some(text),
            } => Ok(text),
            _ => Err(FlowError::rejected(TRANSCRIBE_REJECTED_MESSAGE)),
        }
    }

    async fn search_transcript(&self, video_id: &str, query: &str) -> Result<Vec<SearchHit>> {
        let response: TranscriptSearchResponse = self
            .post_json("/search", &TranscriptSearchBody { video_id, query })
            .await?;
        if response.success {
            Ok(response.results)
        } else {
            Err(FlowError::rejected(SEARCH_REJECTED_MESSAGE))
        }
    }

    async fn list_videos(&self, user_id: Option<&str>) -> Result<Vec<VideoRef>> {
        let query: Vec<(&str, &str)> = match user_id {
            Some(id) => vec![("userId", id)],
            None => Vec::new(),
        };
        let response: VideoListResponse = self.get_json("/videos", &query).await?;
        if response.success {
            Ok(response.videos)
        } else {
            Err(rejected(response.error, LIST_REJECTED_MESSAGE))
        }
    }

    async fn global_search(&self, query: &str, user_id: Option<&str>) -> Result<Vec<VideoRef>> {
        let response: GlobalSearchResponse = self
            .post_json("/global-search", &GlobalSearchBody { query, user_id })
            .await?;
        if response.success {
            Ok(response.results)
        } else {
            Err(rejected(response.error, SEARCH_REJECTED_MESSAGE))
        }
    }
}
