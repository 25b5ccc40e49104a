//! Service seams for the Footage Flow backend.
//!
//! Use cases depend on these traits rather than the HTTP client directly,
//! so tests can substitute in-memory implementations.

use async_trait::async_trait;

use crate::emotion::EmotionReading;
use crate::error::Result;
use crate::journey::ContrastingStories;
use crate::search::SearchHit;
use crate::story::{GeneratedStory, InspirationMode, RenderedVideo, StoryMode, StoryScene};
use crate::tags::Tag;
use crate::video::VideoRef;

/// A probed local file ready to be sent to the backend.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    /// Account key the backend files the video under.
    pub user_id: String,
    pub user_email: String,
}

/// Both halves of a journey response; either may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JourneyReading {
    pub emotional_analysis: String,
    pub contrasting_stories: ContrastingStories,
}

/// Account checks and registration.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Pre-registration duplicate check.
    async fn email_exists(&self, email: &str) -> Result<bool>;

    /// Duplicate re-check used after a failed registration to tell a
    /// conflict apart from a generic failure.
    async fn email_exists_fallback(&self, email: &str) -> Result<bool>;

    async fn register(&self, email: &str, name: &str, password: &str) -> Result<()>;
}

/// Video ingestion, transcription, and lookup.
#[async_trait]
pub trait VideoApi: Send + Sync {
    /// Uploads the file and returns the backend's id for it.
    async fn upload_video(&self, request: UploadRequest) -> Result<String>;

    async fn transcribe(&self, video_id: &str) -> Result<String>;

    async fn search_transcript(&self, video_id: &str, query: &str) -> Result<Vec<SearchHit>>;

    async fn list_videos(&self, user_id: Option<&str>) -> Result<Vec<VideoRef>>;

    async fn global_search(&self, query: &str, user_id: Option<&str>) -> Result<Vec<VideoRef>>;
}

/// Story generation and rendering.
#[async_trait]
pub trait StoryApi: Send + Sync {
    async fn generate_story(
        &self,
        video_id: &str,
        prompt: &str,
        mode: StoryMode,
    ) -> Result<GeneratedStory>;

    async fn generate_inspiration(
        &self,
        video_id: &str,
        mode: InspirationMode,
        prompt: &str,
    ) -> Result<String>;

    async fn render_story(
        &self,
        video_id: &str,
        scenes: &[StoryScene],
        transition_duration: f64,
    ) -> Result<RenderedVideo>;
}

/// Tagging, emotion analysis, and the journey document.
#[async_trait]
pub trait InsightApi: Send + Sync {
    async fn generate_tags(&self, video_id: &str) -> Result<Vec<Tag>>;

    async fn analyze_emotions(&self, video_id: &str, transcript: &str) -> Result<EmotionReading>;

    async fn generate_journey(&self, video_id: &str) -> Result<JourneyReading>;
}
