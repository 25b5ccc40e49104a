//! The per-video pipeline: upload, transcribe, and every analysis that
//! hangs off the active video.
//!
//! Each stage races a per-stage cancellation token. Starting a stage again
//! cancels the previous run, and a run that finishes after its video was
//! replaced publishes nothing, so no result from an old video can land on
//! the current one.

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use flow_core::backend::{InsightApi, StoryApi, UploadRequest, VideoApi};
use flow_core::emotion::EmotionAnalysis;
use flow_core::error::{FlowError, Result};
use flow_core::journey::JourneyDocument;
use flow_core::player::{jump_error_message, jump_message, scene_jump_message, Player};
use flow_core::search::SearchHit;
use flow_core::story::{GeneratedStory, InspirationMode, RenderOutcome, StoryMode};
use flow_core::tags::{sort_for_display, Tag};
use flow_core::video::VideoRef;
use flow_core::workflow::{ActiveVideo, StageKind, StageState, WorkflowState};
use flow_infrastructure::probe_video;

use crate::session_usecase::SessionUseCase;

/// Toast shown after a successful upload.
pub const UPLOADED_NOTIFICATION: &str = "Video uploaded successfully!";
/// Toast shown after tags come back.
pub const TAGS_NOTIFICATION: &str = "AI tags generated successfully!";
/// Toast shown after the emotional arc is ready, live or demo.
pub const EMOTIONS_NOTIFICATION: &str = "Emotional journey analyzed!";

/// Shown when the upload command is given no file.
pub const NO_FILE_SELECTED_MESSAGE: &str = "Please select a file to upload";
pub const UPLOAD_RETRY_MESSAGE: &str = "Upload failed. Please try again.";
pub const NO_VIDEO_MESSAGE: &str = "No video uploaded";
pub const TRANSCRIBE_RETRY_MESSAGE: &str = "Transcription failed. Please try again.";
pub const SEARCH_PRECONDITION_MESSAGE: &str = "Please upload a video and enter a search query";
pub const SEARCH_FALLBACK_MESSAGE: &str = "Search failed";
pub const GLOBAL_SEARCH_PRECONDITION_MESSAGE: &str = "Please enter a search query";
pub const GLOBAL_SEARCH_FALLBACK_MESSAGE: &str = "Global search failed";
pub const NO_CURRENT_VIDEO_MESSAGE: &str = "No current video to show";
pub const VIDEO_DETAILS_FAILED_MESSAGE: &str = "Failed to get video details";
pub const VIDEO_DETAILS_RETRY_MESSAGE: &str = "Failed to get current video details";
pub const UPLOAD_FIRST_MESSAGE: &str = "Please upload a video first";
pub const TAGS_FALLBACK_MESSAGE: &str = "Failed to generate tags";
pub const EMOTIONS_FALLBACK_MESSAGE: &str = "Emotion analysis failed";
pub const STORY_PRECONDITION_MESSAGE: &str = "Please upload a video and enter a story prompt";
pub const RENDER_STORY_FIRST_MESSAGE: &str = "Please generate a story first";
pub const RENDER_RETRY_MESSAGE: &str = "Video rendering failed. Please try again.";
pub const INSPIRATION_PRECONDITION_MESSAGE: &str =
    "Please upload a video first to generate content-based stories";
pub const INSPIRATION_RETRY_MESSAGE: &str =
    "Failed to generate content-based story. Make sure you have uploaded a video.";
pub const JOURNEY_PRECONDITION_MESSAGE: &str =
    "Please upload a video first to generate content-based emotional journey.";
pub const JOURNEY_EMPTY_MESSAGE: &str = "Failed to generate content-based emotional journey";
pub const JOURNEY_RETRY_MESSAGE: &str =
    "Failed to generate content-based emotional journey. Make sure you have uploaded a video.";

/// Drives the upload → transcribe → analyze pipeline against one active
/// video, exactly as the dashboard does.
pub struct WorkflowUseCase {
    videos: Arc<dyn VideoApi>,
    stories: Arc<dyn StoryApi>,
    insights: Arc<dyn InsightApi>,
    sessions: Arc<SessionUseCase>,
    player: Arc<dyn Player>,
    state: RwLock<WorkflowState>,
    stage_tokens: Mutex<HashMap<StageKind, CancellationToken>>,
}

impl WorkflowUseCase {
    pub fn new(
        videos: Arc<dyn VideoApi>,
        stories: Arc<dyn StoryApi>,
        insights: Arc<dyn InsightApi>,
        sessions: Arc<SessionUseCase>,
        player: Arc<dyn Player>,
    ) -> Self {
        Self {
            videos,
            stories,
            insights,
            sessions,
            player,
            state: RwLock::new(WorkflowState::default()),
            stage_tokens: Mutex::new(HashMap::new()),
        }
    }

    /// A copy of the full pipeline state for display.
    pub async fn snapshot(&self) -> WorkflowState {
        self.state.read().await.clone()
    }

    /// Registers a fresh cancellation token for `kind`, cancelling any
    /// in-flight run of the same stage.
    async fn begin_stage(&self, kind: StageKind) -> CancellationToken {
        let token = CancellationToken::new();
        let mut tokens = self.stage_tokens.lock().await;
        if let Some(previous) = tokens.insert(kind, token.clone()) {
            previous.cancel();
        }
        token
    }

    /// Uploads the file at `path` and makes it the active video.
    ///
    /// The probe and whitelist check run before any bytes are read, so an
    /// invalid file never touches the network. Adopting the new video
    /// clears every stage result from the previous one.
    pub async fn upload(&self, path: &Path) -> Result<ActiveVideo> {
        let session = self.sessions.require().await?;
        let candidate = probe_video(path)?;
        if let Err(err) = candidate.validate() {
            let mut state = self.state.write().await;
            state.upload_failed(err.to_string());
            return Err(err);
        }

        {
            let mut state = self.state.write().await;
            state.upload = StageState::Loading;
        }
        let token = self.begin_stage(StageKind::Upload).await;

        let outcome = race(&token, StageKind::Upload, async {
            let bytes = tokio::fs::read(path).await?;
            let request = UploadRequest {
                file_name: candidate.filename.clone(),
                mime_type: candidate.mime_type.clone(),
                bytes,
                user_id: session.email.clone(),
                user_email: session.email.clone(),
            };
            self.videos.upload_video(request).await
        })
        .await;

        let mut state = self.state.write().await;
        if token.is_cancelled() {
            return Err(superseded(StageKind::Upload));
        }
        match outcome {
            Ok(video_id) => {
                tracing::info!(
                    "[WorkflowUseCase] Uploaded {} ({} bytes) as {}",
                    candidate.filename,
                    candidate.size_bytes,
                    video_id
                );
                let video = ActiveVideo {
                    video_id,
                    filename: candidate.filename,
                    size_bytes: candidate.size_bytes,
                };
                state.adopt_video(video.clone());
                Ok(video)
            }
            Err(err) if err.is_cancelled() => Err(err),
            Err(err) => {
                tracing::warn!("[WorkflowUseCase] Upload failed: {err}");
                let message = backend_error_message(&err, UPLOAD_RETRY_MESSAGE);
                state.upload_failed(message.clone());
                Err(FlowError::rejected(message))
            }
        }
    }

    /// Transcribes the active video and stores the transcript.
    pub async fn transcribe(&self) -> Result<String> {
        let video_id = {
            let mut state = self.state.write().await;
            match state.video_id().map(str::to_string) {
                Some(id) => {
                    state.transcription = StageState::Loading;
                    id
                }
                None => {
                    state.transcription = StageState::Failed(NO_VIDEO_MESSAGE.to_string());
                    return Err(FlowError::validation(NO_VIDEO_MESSAGE));
                }
            }
        };
        let token = self.begin_stage(StageKind::Transcribe).await;
        let outcome = race(
            &token,
            StageKind::Transcribe,
            self.videos.transcribe(&video_id),
        )
        .await;

        let mut state = self.state.write().await;
        if !still_current(&state, &token, &video_id) {
            return Err(superseded(StageKind::Transcribe));
        }
        match outcome {
            Ok(text) => {
                tracing::info!(
                    "[WorkflowUseCase] Transcribed {video_id} ({} chars)",
                    text.len()
                );
                state.complete_transcription(text.clone());
                Ok(text)
            }
            Err(err) if err.is_cancelled() => Err(err),
            Err(err) => {
                let message = match &err {
                    FlowError::Rejected(m) if !m.is_empty() => m.clone(),
                    _ => TRANSCRIBE_RETRY_MESSAGE.to_string(),
                };
                state.transcription = StageState::Failed(message.clone());
                Err(FlowError::rejected(message))
            }
        }
    }

    /// Searches the active video's transcript and stores the hits.
    ///
    /// The query is sent exactly as typed; only the emptiness check trims.
    pub async fn search_transcript(&self, query: &str) -> Result<Vec<SearchHit>> {
        let video_id = {
            let mut state = self.state.write().await;
            match state.video_id().map(str::to_string) {
                Some(id) if !query.trim().is_empty() => {
                    state.search_query = query.to_string();
                    state.search = StageState::Loading;
                    id
                }
                _ => {
                    state.search = StageState::Failed(SEARCH_PRECONDITION_MESSAGE.to_string());
                    return Err(FlowError::validation(SEARCH_PRECONDITION_MESSAGE));
                }
            }
        };
        let token = self.begin_stage(StageKind::Search).await;
        let outcome = race(
            &token,
            StageKind::Search,
            self.videos.search_transcript(&video_id, query),
        )
        .await;

        let mut state = self.state.write().await;
        if !still_current(&state, &token, &video_id) {
            return Err(superseded(StageKind::Search));
        }
        match outcome {
            Ok(hits) => {
                state.search = StageState::Ready(hits.clone());
                Ok(hits)
            }
            Err(err) if err.is_cancelled() => Err(err),
            Err(err) => {
                let message = backend_error_message(&err, SEARCH_FALLBACK_MESSAGE);
                state.search = StageState::Failed(message.clone());
                Err(FlowError::rejected(message))
            }
        }
    }

    /// Seeks the player to search hit `index` (zero-based) and reports the
    /// outcome in the dashboard's words.
    pub async fn jump_to_hit(&self, index: usize) -> Result<String> {
        let seconds = {
            let state = self.state.read().await;
            let hits = state
                .search
                .value()
                .ok_or_else(|| FlowError::validation("No search results to jump to"))?;
            let hit = hits
                .get(index)
                .ok_or_else(|| FlowError::not_found("search result", (index + 1).to_string()))?;
            hit.start_time
        };
        Ok(self.seek(seconds, false).await)
    }

    /// Seeks the player to a story scene. Scene numbering runs through the
    /// positive branch first in contrast mode.
    pub async fn jump_to_scene(&self, index: usize) -> Result<String> {
        let seconds = {
            let state = self.state.read().await;
            let story = state
                .story
                .value()
                .ok_or_else(|| FlowError::validation("No story scenes to jump to"))?;
            let scene = match story {
                GeneratedStory::Single(branch) => branch.scenes.get(index),
                GeneratedStory::Contrast { positive, negative } => {
                    if index < positive.scenes.len() {
                        positive.scenes.get(index)
                    } else {
                        negative.scenes.get(index - positive.scenes.len())
                    }
                }
            }
            .ok_or_else(|| FlowError::not_found("story scene", (index + 1).to_string()))?;
            scene.start
        };
        Ok(self.seek(seconds, true).await)
    }

    /// Seeks and plays, folding the outcome into the jump feedback text.
    /// A blocked `play` still counts as a successful seek.
    async fn seek(&self, seconds: f64, scene: bool) -> String {
        if let Err(err) = self.player.seek(seconds).await {
            return jump_error_message(&err.to_string());
        }
        let played = self.player.play().await.unwrap_or(false);
        if scene {
            scene_jump_message(seconds, played)
        } else {
            jump_message(seconds, played)
        }
    }

    /// Searches across every video stored for the signed-in account.
    pub async fn global_search(&self, query: &str) -> Result<Vec<VideoRef>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(FlowError::validation(GLOBAL_SEARCH_PRECONDITION_MESSAGE));
        }
        let session = self.sessions.require().await?;
        self.videos
            .global_search(trimmed, Some(&session.email))
            .await
            .map_err(|err| {
                let message = match &err {
                    FlowError::Backend {
                        status: Some(_),
                        message,
                        ..
                    } if !message.is_empty() => message.clone(),
                    _ => GLOBAL_SEARCH_FALLBACK_MESSAGE.to_string(),
                };
                FlowError::rejected(message)
            })
    }

    /// Looks the active video up in the account's stored listing.
    pub async fn current_video_details(&self) -> Result<VideoRef> {
        let video_id = {
            let state = self.state.read().await;
            match state.video_id() {
                Some(id) => id.to_string(),
                None => return Err(FlowError::validation(NO_CURRENT_VIDEO_MESSAGE)),
            }
        };
        let session = self.sessions.require().await?;
        let videos = self
            .videos
            .list_videos(Some(&session.email))
            .await
            .map_err(|err| {
                FlowError::rejected(match err {
                    FlowError::Rejected(_) => VIDEO_DETAILS_FAILED_MESSAGE.to_string(),
                    _ => VIDEO_DETAILS_RETRY_MESSAGE.to_string(),
                })
            })?;
        videos
            .iter()
            .find(|video| video.video_id == video_id)
            .cloned()
            .ok_or_else(|| {
                FlowError::rejected(format!(
                    "Current video not found in database. Available videos: {}",
                    videos.len()
                ))
            })
    }

    /// Generates AI tags for the active video, ordered for display.
    pub async fn generate_tags(&self) -> Result<Vec<Tag>> {
        let video_id = {
            let mut state = self.state.write().await;
            match state.video_id().map(str::to_string) {
                Some(id) => {
                    state.tags = StageState::Loading;
                    id
                }
                None => {
                    state.tags = StageState::Failed(UPLOAD_FIRST_MESSAGE.to_string());
                    return Err(FlowError::validation(UPLOAD_FIRST_MESSAGE));
                }
            }
        };
        let token = self.begin_stage(StageKind::Tags).await;
        let outcome = race(
            &token,
            StageKind::Tags,
            self.insights.generate_tags(&video_id),
        )
        .await;

        let mut state = self.state.write().await;
        if !still_current(&state, &token, &video_id) {
            return Err(superseded(StageKind::Tags));
        }
        match outcome {
            Ok(mut tags) => {
                sort_for_display(&mut tags);
                state.tags = StageState::Ready(tags.clone());
                Ok(tags)
            }
            Err(err) if err.is_cancelled() => Err(err),
            Err(err) => {
                let message = backend_error_message(&err, TAGS_FALLBACK_MESSAGE);
                state.tags = StageState::Failed(message.clone());
                Err(FlowError::rejected(message))
            }
        }
    }

    /// Analyzes the emotional arc of the active video.
    ///
    /// An unreachable analyzer falls back to the fixed demo dataset so the
    /// emotion section still has something to draw; a reachable backend
    /// that refuses the request surfaces its error instead.
    pub async fn analyze_emotions(&self) -> Result<EmotionAnalysis> {
        let (video_id, transcript) = {
            let mut state = self.state.write().await;
            match state.video_id().map(str::to_string) {
                Some(id) => {
                    let transcript = state.transcription.value().cloned().unwrap_or_default();
                    state.emotions = StageState::Loading;
                    (id, transcript)
                }
                None => {
                    state.emotions = StageState::Failed(UPLOAD_FIRST_MESSAGE.to_string());
                    return Err(FlowError::validation(UPLOAD_FIRST_MESSAGE));
                }
            }
        };
        let token = self.begin_stage(StageKind::Emotions).await;
        let outcome = race(
            &token,
            StageKind::Emotions,
            self.insights.analyze_emotions(&video_id, &transcript),
        )
        .await;

        let mut state = self.state.write().await;
        if !still_current(&state, &token, &video_id) {
            return Err(superseded(StageKind::Emotions));
        }
        match outcome {
            Ok(reading) => {
                let analysis = EmotionAnalysis::live(reading);
                state.emotions = StageState::Ready(analysis.clone());
                Ok(analysis)
            }
            Err(err) if err.is_cancelled() => Err(err),
            Err(FlowError::Backend { .. }) => {
                tracing::warn!("[WorkflowUseCase] Emotion analyzer unreachable, using demo data");
                let analysis = EmotionAnalysis::demo();
                state.emotions = StageState::Ready(analysis.clone());
                Ok(analysis)
            }
            Err(err) => {
                let message = match &err {
                    FlowError::Rejected(m) if !m.is_empty() => m.clone(),
                    _ => EMOTIONS_FALLBACK_MESSAGE.to_string(),
                };
                state.emotions = StageState::Failed(message.clone());
                Err(FlowError::rejected(message))
            }
        }
    }

    /// Generates a story timeline from the prompt in the selected tone.
    pub async fn generate_story(&self, prompt: &str) -> Result<GeneratedStory> {
        let (video_id, mode) = {
            let mut state = self.state.write().await;
            match state.video_id().map(str::to_string) {
                Some(id) if !prompt.is_empty() => {
                    state.story = StageState::Loading;
                    (id, state.story_mode)
                }
                _ => {
                    state.story = StageState::Failed(STORY_PRECONDITION_MESSAGE.to_string());
                    return Err(FlowError::validation(STORY_PRECONDITION_MESSAGE));
                }
            }
        };
        let token = self.begin_stage(StageKind::Story).await;
        let outcome = race(
            &token,
            StageKind::Story,
            self.stories.generate_story(&video_id, prompt, mode),
        )
        .await;

        let mut state = self.state.write().await;
        if !still_current(&state, &token, &video_id) {
            return Err(superseded(StageKind::Story));
        }
        match outcome {
            Ok(story) => {
                tracing::info!(
                    "[WorkflowUseCase] Generated {} story with {} scenes",
                    mode,
                    story.scene_count()
                );
                state.story = StageState::Ready(story.clone());
                Ok(story)
            }
            Err(err) if err.is_cancelled() => Err(err),
            Err(err) => {
                let message = match &err {
                    FlowError::Rejected(m) if !m.is_empty() => m.clone(),
                    FlowError::Backend { message, .. } if !message.is_empty() => {
                        format!("Story generation failed: {message}")
                    }
                    other => format!("Story generation failed: {other}"),
                };
                state.story = StageState::Failed(message.clone());
                Err(FlowError::rejected(message))
            }
        }
    }

    /// Renders the generated story into finished video, one per telling.
    pub async fn render_video(&self) -> Result<RenderOutcome> {
        let (video_id, story, transition) = {
            let mut state = self.state.write().await;
            let Some(id) = state.video_id().map(str::to_string) else {
                state.render = StageState::Failed(UPLOAD_FIRST_MESSAGE.to_string());
                return Err(FlowError::validation(UPLOAD_FIRST_MESSAGE));
            };
            let story = match state.story.value() {
                Some(story) if story.has_renderable_scenes() => story.clone(),
                _ => {
                    state.render = StageState::Failed(RENDER_STORY_FIRST_MESSAGE.to_string());
                    return Err(FlowError::validation(RENDER_STORY_FIRST_MESSAGE));
                }
            };
            state.render = StageState::Loading;
            (id, story, state.transition_duration)
        };
        let token = self.begin_stage(StageKind::Render).await;
        let outcome = race(
            &token,
            StageKind::Render,
            self.run_render(&video_id, &story, transition),
        )
        .await;

        let mut state = self.state.write().await;
        if !still_current(&state, &token, &video_id) {
            return Err(superseded(StageKind::Render));
        }
        match outcome {
            Ok(rendered) => {
                state.render = StageState::Ready(rendered.clone());
                Ok(rendered)
            }
            Err(err) if err.is_cancelled() => Err(err),
            Err(err) => {
                let message = backend_error_message(&err, RENDER_RETRY_MESSAGE);
                state.render = StageState::Failed(message.clone());
                Err(FlowError::rejected(message))
            }
        }
    }

    /// One render call per telling; contrast mode renders both in parallel
    /// and fails if either side does.
    async fn run_render(
        &self,
        video_id: &str,
        story: &GeneratedStory,
        transition_duration: f64,
    ) -> Result<RenderOutcome> {
        match story {
            GeneratedStory::Single(branch) => {
                let rendered = self
                    .stories
                    .render_story(video_id, &branch.scenes, transition_duration)
                    .await?;
                Ok(RenderOutcome::Single(rendered))
            }
            GeneratedStory::Contrast { positive, negative } => {
                let (positive, negative) = tokio::try_join!(
                    self.stories
                        .render_story(video_id, &positive.scenes, transition_duration),
                    self.stories
                        .render_story(video_id, &negative.scenes, transition_duration),
                )?;
                Ok(RenderOutcome::Contrast { positive, negative })
            }
        }
    }

    /// Generates a free-form story from the prompt in the selected tone.
    pub async fn generate_inspiration(&self, prompt: &str) -> Result<String> {
        let (video_id, mode) = {
            let mut state = self.state.write().await;
            match state.video_id().map(str::to_string) {
                Some(id) => {
                    state.inspiration = StageState::Loading;
                    (id, state.inspiration_mode)
                }
                None => {
                    state.inspiration =
                        StageState::Failed(INSPIRATION_PRECONDITION_MESSAGE.to_string());
                    return Err(FlowError::validation(INSPIRATION_PRECONDITION_MESSAGE));
                }
            }
        };
        let token = self.begin_stage(StageKind::Inspiration).await;
        let outcome = race(
            &token,
            StageKind::Inspiration,
            self.stories.generate_inspiration(&video_id, mode, prompt.trim()),
        )
        .await;

        let mut state = self.state.write().await;
        if !still_current(&state, &token, &video_id) {
            return Err(superseded(StageKind::Inspiration));
        }
        match outcome {
            Ok(story) => {
                state.inspiration = StageState::Ready(story.clone());
                Ok(story)
            }
            Err(err) if err.is_cancelled() => Err(err),
            Err(err) => {
                let message = match &err {
                    FlowError::Backend {
                        status: Some(_),
                        message,
                        ..
                    } if !message.is_empty() => message.clone(),
                    _ => INSPIRATION_RETRY_MESSAGE.to_string(),
                };
                state.inspiration = StageState::Failed(message.clone());
                Err(FlowError::rejected(message))
            }
        }
    }

    /// Builds the combined emotional journey document for the active video.
    pub async fn generate_journey(&self) -> Result<JourneyDocument> {
        let video_id = {
            let mut state = self.state.write().await;
            match state.video_id().map(str::to_string) {
                Some(id) => {
                    state.journey = StageState::Loading;
                    id
                }
                None => {
                    state.journey = StageState::Failed(JOURNEY_PRECONDITION_MESSAGE.to_string());
                    return Err(FlowError::validation(JOURNEY_PRECONDITION_MESSAGE));
                }
            }
        };
        let token = self.begin_stage(StageKind::Journey).await;
        let outcome = race(
            &token,
            StageKind::Journey,
            self.insights.generate_journey(&video_id),
        )
        .await;

        let mut state = self.state.write().await;
        if !still_current(&state, &token, &video_id) {
            return Err(superseded(StageKind::Journey));
        }
        match outcome {
            Ok(reading) => {
                match JourneyDocument::compose(reading.emotional_analysis, reading.contrasting_stories)
                {
                    Some(document) => {
                        state.journey = StageState::Ready(document.clone());
                        Ok(document)
                    }
                    None => {
                        state.journey = StageState::Failed(JOURNEY_EMPTY_MESSAGE.to_string());
                        Err(FlowError::rejected(JOURNEY_EMPTY_MESSAGE))
                    }
                }
            }
            Err(err) if err.is_cancelled() => Err(err),
            Err(err) => {
                let message = match &err {
                    FlowError::Backend {
                        status: Some(_),
                        message,
                        ..
                    } if !message.is_empty() => message.clone(),
                    _ => JOURNEY_RETRY_MESSAGE.to_string(),
                };
                state.journey = StageState::Failed(message.clone());
                Err(FlowError::rejected(message))
            }
        }
    }

    /// Switches story tone. A changed tone drops the generated story.
    pub async fn set_story_mode(&self, mode: StoryMode) {
        self.state.write().await.set_story_mode(mode);
    }

    pub async fn set_inspiration_mode(&self, mode: InspirationMode) {
        self.state.write().await.set_inspiration_mode(mode);
    }

    /// Sets the scene transition duration, clamped to the supported range.
    pub async fn set_transition_duration(&self, value: f64) {
        self.state.write().await.set_transition_duration(value);
    }
}

/// Races a stage call against its cancellation token.
async fn race<T>(
    token: &CancellationToken,
    kind: StageKind,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        _ = token.cancelled() => Err(superseded(kind)),
        result = call => result,
    }
}

fn superseded(kind: StageKind) -> FlowError {
    FlowError::cancelled(format!("{kind} superseded by a newer request"))
}

/// True when a finished stage may publish its result: its token was not
/// cancelled and the state still points at the same video.
fn still_current(state: &WorkflowState, token: &CancellationToken, video_id: &str) -> bool {
    !token.is_cancelled() && state.video_id() == Some(video_id)
}

/// The displayable message for a failed backend call: the refusal or the
/// server's own error text when present, otherwise `fallback`.
fn backend_error_message(err: &FlowError, fallback: &str) -> String {
    match err {
        FlowError::Rejected(message) if !message.is_empty() => message.clone(),
        FlowError::Backend {
            status: Some(_),
            message,
            ..
        } if !message.is_empty() => message.clone(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;
    use std::sync::Mutex as CallLog;

    use async_trait::async_trait;
    use tempfile::TempDir;
    use tokio::sync::Notify;

    use flow_core::backend::JourneyReading;
    use flow_core::emotion::EmotionReading;
    use flow_core::journey::ContrastingStories;
    use flow_core::search::MatchType;
    use flow_core::session::Session;
    use flow_core::story::{RenderedVideo, StoryBranch, StoryScene};
    use flow_core::tags::TagSource;
    use flow_core::video::INVALID_TYPE_MESSAGE;

    use crate::testing::MemorySessionStore;

    /// Two-sided gate: the fake signals `entered` when the call arrives and
    /// parks until the test fires `release`.
    #[derive(Default)]
    struct Gate {
        entered: Notify,
        release: Notify,
    }

    struct FakeVideos {
        upload: Result<String>,
        transcribe: Result<String>,
        search: Result<Vec<SearchHit>>,
        listing: Result<Vec<VideoRef>>,
        global: Result<Vec<VideoRef>>,
        uploads: CallLog<Vec<(String, String, String)>>,
        queries: CallLog<Vec<String>>,
        global_calls: CallLog<Vec<(String, Option<String>)>>,
        transcribe_gate: Option<Arc<Gate>>,
    }

    impl Default for FakeVideos {
        fn default() -> Self {
            Self {
                upload: Ok("vid-1".to_string()),
                transcribe: Ok("the transcript".to_string()),
                search: Ok(vec![]),
                listing: Ok(vec![]),
                global: Ok(vec![]),
                uploads: CallLog::new(vec![]),
                queries: CallLog::new(vec![]),
                global_calls: CallLog::new(vec![]),
                transcribe_gate: None,
            }
        }
    }

    #[async_trait]
    impl VideoApi for FakeVideos {
        async fn upload_video(&self, request: UploadRequest) -> Result<String> {
            self.uploads.lock().unwrap().push((
                request.file_name,
                request.user_id,
                request.user_email,
            ));
            self.upload.clone()
        }

        async fn transcribe(&self, _video_id: &str) -> Result<String> {
            if let Some(gate) = &self.transcribe_gate {
                gate.entered.notify_one();
                gate.release.notified().await;
            }
            self.transcribe.clone()
        }

        async fn search_transcript(&self, _video_id: &str, query: &str) -> Result<Vec<SearchHit>> {
            self.queries.lock().unwrap().push(query.to_string());
            self.search.clone()
        }

        async fn list_videos(&self, _user_id: Option<&str>) -> Result<Vec<VideoRef>> {
            self.listing.clone()
        }

        async fn global_search(&self, query: &str, user_id: Option<&str>) -> Result<Vec<VideoRef>> {
            self.global_calls
                .lock()
                .unwrap()
                .push((query.to_string(), user_id.map(str::to_string)));
            self.global.clone()
        }
    }

    struct FakeStories {
        story: Result<GeneratedStory>,
        inspiration: Result<String>,
        render: Result<RenderedVideo>,
        renders: CallLog<Vec<usize>>,
    }

    impl Default for FakeStories {
        fn default() -> Self {
            Self {
                story: Ok(single_story()),
                inspiration: Ok("A hopeful tale.".to_string()),
                render: Ok(rendered("r1")),
                renders: CallLog::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl StoryApi for FakeStories {
        async fn generate_story(
            &self,
            _video_id: &str,
            _prompt: &str,
            _mode: StoryMode,
        ) -> Result<GeneratedStory> {
            self.story.clone()
        }

        async fn generate_inspiration(
            &self,
            _video_id: &str,
            _mode: InspirationMode,
            _prompt: &str,
        ) -> Result<String> {
            self.inspiration.clone()
        }

        async fn render_story(
            &self,
            _video_id: &str,
            scenes: &[StoryScene],
            _transition_duration: f64,
        ) -> Result<RenderedVideo> {
            self.renders.lock().unwrap().push(scenes.len());
            self.render.clone()
        }
    }

    struct FakeInsights {
        tags: Result<Vec<Tag>>,
        emotions: Result<EmotionReading>,
        journey: Result<JourneyReading>,
        transcripts: CallLog<Vec<String>>,
    }

    impl Default for FakeInsights {
        fn default() -> Self {
            Self {
                tags: Ok(vec![]),
                emotions: Ok(EmotionReading {
                    points: vec![],
                    good_side: vec![],
                    bad_side: vec![],
                }),
                journey: Ok(JourneyReading::default()),
                transcripts: CallLog::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl InsightApi for FakeInsights {
        async fn generate_tags(&self, _video_id: &str) -> Result<Vec<Tag>> {
            self.tags.clone()
        }

        async fn analyze_emotions(
            &self,
            _video_id: &str,
            transcript: &str,
        ) -> Result<EmotionReading> {
            self.transcripts.lock().unwrap().push(transcript.to_string());
            self.emotions.clone()
        }

        async fn generate_journey(&self, _video_id: &str) -> Result<JourneyReading> {
            self.journey.clone()
        }
    }

    struct FakePlayer {
        seeks: CallLog<Vec<f64>>,
        play: Result<bool>,
    }

    impl Default for FakePlayer {
        fn default() -> Self {
            Self {
                seeks: CallLog::new(vec![]),
                play: Ok(true),
            }
        }
    }

    #[async_trait]
    impl Player for FakePlayer {
        async fn seek(&self, seconds: f64) -> Result<()> {
            self.seeks.lock().unwrap().push(seconds);
            Ok(())
        }

        async fn play(&self) -> Result<bool> {
            self.play.clone()
        }
    }

    struct Harness {
        videos: Arc<FakeVideos>,
        stories: Arc<FakeStories>,
        insights: Arc<FakeInsights>,
        player: Arc<FakePlayer>,
        store: Arc<MemorySessionStore>,
        usecase: Arc<WorkflowUseCase>,
    }

    fn build(videos: FakeVideos, stories: FakeStories, insights: FakeInsights) -> Harness {
        let videos = Arc::new(videos);
        let stories = Arc::new(stories);
        let insights = Arc::new(insights);
        let player = Arc::new(FakePlayer::default());
        let store = Arc::new(MemorySessionStore::default());
        let sessions = Arc::new(SessionUseCase::new(store.clone()));
        let usecase = Arc::new(WorkflowUseCase::new(
            videos.clone(),
            stories.clone(),
            insights.clone(),
            sessions,
            player.clone(),
        ));
        Harness {
            videos,
            stories,
            insights,
            player,
            store,
            usecase,
        }
    }

    async fn signed_in(videos: FakeVideos, stories: FakeStories, insights: FakeInsights) -> Harness {
        let harness = build(videos, stories, insights);
        harness
            .store
            .set(Session::from_sign_in("casey@example.com"))
            .await;
        harness
    }

    async fn with_video(harness: &Harness, id: &str) {
        harness.usecase.state.write().await.adopt_video(ActiveVideo {
            video_id: id.to_string(),
            filename: format!("{id}.mp4"),
            size_bytes: 1024,
        });
    }

    fn single_story() -> GeneratedStory {
        GeneratedStory::Single(StoryBranch {
            story_id: Some("s1".to_string()),
            scenes: vec![scene(0.0, 4.0)],
        })
    }

    fn scene(start: f64, end: f64) -> StoryScene {
        StoryScene {
            start,
            end,
            caption: "beat".to_string(),
            narration: "It happens.".to_string(),
        }
    }

    fn rendered(id: &str) -> RenderedVideo {
        RenderedVideo {
            render_id: id.to_string(),
            video_url: format!("http://localhost:5000/rendered/{id}.mp4"),
            message: None,
        }
    }

    fn hit(start_time: f64) -> SearchHit {
        SearchHit {
            match_type: MatchType::WordMatch,
            start_time,
            end_time: start_time + 2.0,
            score: 0.9,
            preview_text: "...the waves...".to_string(),
            full_text: None,
            matched_word: Some("waves".to_string()),
        }
    }

    fn tag(name: &str, confidence: f64) -> Tag {
        Tag {
            tag: name.to_string(),
            source: TagSource::Visual,
            confidence: Some(confidence),
            score: None,
            occurrences: None,
        }
    }

    fn transport_error() -> FlowError {
        FlowError::Backend {
            status: None,
            message: "connection refused".to_string(),
            retryable: true,
        }
    }

    fn server_error(message: &str) -> FlowError {
        FlowError::Backend {
            status: Some(500),
            message: message.to_string(),
            retryable: false,
        }
    }

    fn temp_clip(dir: &TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"not really video bytes").unwrap();
        path
    }

    #[tokio::test]
    async fn upload_requires_a_signed_in_user() {
        let harness = build(
            FakeVideos::default(),
            FakeStories::default(),
            FakeInsights::default(),
        );
        let dir = TempDir::new().unwrap();
        let err = harness.usecase.upload(&temp_clip(&dir, "clip.mp4")).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(harness.videos.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_adopts_the_new_video_under_the_account_email() {
        let harness = signed_in(
            FakeVideos::default(),
            FakeStories::default(),
            FakeInsights::default(),
        )
        .await;
        let dir = TempDir::new().unwrap();

        let video = harness.usecase.upload(&temp_clip(&dir, "clip.mp4")).await.unwrap();
        assert_eq!(video.video_id, "vid-1");
        assert_eq!(video.filename, "clip.mp4");

        let state = harness.usecase.snapshot().await;
        assert_eq!(state.step.number(), 2);
        assert!(state.upload.is_ready());

        let uploads = harness.videos.uploads.lock().unwrap();
        assert_eq!(
            uploads[0],
            (
                "clip.mp4".to_string(),
                "casey@example.com".to_string(),
                "casey@example.com".to_string()
            )
        );
    }

    #[tokio::test]
    async fn upload_whitelist_runs_before_any_bytes_move() {
        let harness = signed_in(
            FakeVideos::default(),
            FakeStories::default(),
            FakeInsights::default(),
        )
        .await;
        let dir = TempDir::new().unwrap();

        let err = harness.usecase.upload(&temp_clip(&dir, "notes.txt")).await.unwrap_err();
        assert_eq!(err.to_string(), INVALID_TYPE_MESSAGE);
        assert!(harness.videos.uploads.lock().unwrap().is_empty());

        let state = harness.usecase.snapshot().await;
        assert_eq!(state.upload.error(), Some(INVALID_TYPE_MESSAGE));
    }

    #[tokio::test]
    async fn upload_failure_surfaces_the_server_reason() {
        let videos = FakeVideos {
            upload: Err(FlowError::rejected("No file uploaded")),
            ..FakeVideos::default()
        };
        let harness = signed_in(videos, FakeStories::default(), FakeInsights::default()).await;
        let dir = TempDir::new().unwrap();

        let err = harness.usecase.upload(&temp_clip(&dir, "clip.mp4")).await.unwrap_err();
        assert_eq!(err.user_message(), Some("No file uploaded"));

        let state = harness.usecase.snapshot().await;
        assert_eq!(state.upload.error(), Some("No file uploaded"));
        assert!(state.video.is_none());
    }

    #[tokio::test]
    async fn upload_transport_failure_asks_for_a_retry() {
        let videos = FakeVideos {
            upload: Err(transport_error()),
            ..FakeVideos::default()
        };
        let harness = signed_in(videos, FakeStories::default(), FakeInsights::default()).await;
        let dir = TempDir::new().unwrap();

        let err = harness.usecase.upload(&temp_clip(&dir, "clip.mp4")).await.unwrap_err();
        assert_eq!(err.user_message(), Some(UPLOAD_RETRY_MESSAGE));
    }

    #[tokio::test]
    async fn transcribe_needs_a_video() {
        let harness = signed_in(
            FakeVideos::default(),
            FakeStories::default(),
            FakeInsights::default(),
        )
        .await;
        let err = harness.usecase.transcribe().await.unwrap_err();
        assert_eq!(err.to_string(), NO_VIDEO_MESSAGE);
        assert_eq!(
            harness.usecase.snapshot().await.transcription.error(),
            Some(NO_VIDEO_MESSAGE)
        );
    }

    #[tokio::test]
    async fn transcribe_stores_the_transcript_and_advances() {
        let harness = signed_in(
            FakeVideos::default(),
            FakeStories::default(),
            FakeInsights::default(),
        )
        .await;
        with_video(&harness, "vid-1").await;

        let text = harness.usecase.transcribe().await.unwrap();
        assert_eq!(text, "the transcript");

        let state = harness.usecase.snapshot().await;
        assert_eq!(state.step.number(), 3);
        assert_eq!(
            state.transcription.value().map(String::as_str),
            Some("the transcript")
        );
    }

    #[tokio::test]
    async fn transcribe_refusal_keeps_its_text_and_transport_asks_for_retry() {
        let videos = FakeVideos {
            transcribe: Err(FlowError::rejected("Transcription failed")),
            ..FakeVideos::default()
        };
        let harness = signed_in(videos, FakeStories::default(), FakeInsights::default()).await;
        with_video(&harness, "vid-1").await;
        let err = harness.usecase.transcribe().await.unwrap_err();
        assert_eq!(err.user_message(), Some("Transcription failed"));

        let videos = FakeVideos {
            transcribe: Err(transport_error()),
            ..FakeVideos::default()
        };
        let harness = signed_in(videos, FakeStories::default(), FakeInsights::default()).await;
        with_video(&harness, "vid-1").await;
        let err = harness.usecase.transcribe().await.unwrap_err();
        assert_eq!(err.user_message(), Some(TRANSCRIBE_RETRY_MESSAGE));
    }

    #[tokio::test]
    async fn late_transcript_from_a_replaced_video_is_discarded() {
        let gate = Arc::new(Gate::default());
        let videos = FakeVideos {
            transcribe_gate: Some(gate.clone()),
            ..FakeVideos::default()
        };
        let harness = signed_in(videos, FakeStories::default(), FakeInsights::default()).await;
        with_video(&harness, "old").await;

        let task = tokio::spawn({
            let usecase = harness.usecase.clone();
            async move { usecase.transcribe().await }
        });
        gate.entered.notified().await;

        with_video(&harness, "new").await;
        gate.release.notify_one();

        let err = task.await.unwrap().unwrap_err();
        assert!(err.is_cancelled());

        // The stale transcript never lands on the new video.
        let state = harness.usecase.snapshot().await;
        assert!(state.transcription.is_idle());
        assert_eq!(state.video_id(), Some("new"));
    }

    #[tokio::test]
    async fn search_requires_a_video_and_a_query() {
        let harness = signed_in(
            FakeVideos::default(),
            FakeStories::default(),
            FakeInsights::default(),
        )
        .await;
        let err = harness.usecase.search_transcript("waves").await.unwrap_err();
        assert_eq!(err.to_string(), SEARCH_PRECONDITION_MESSAGE);

        with_video(&harness, "vid-1").await;
        let err = harness.usecase.search_transcript("   ").await.unwrap_err();
        assert_eq!(err.to_string(), SEARCH_PRECONDITION_MESSAGE);
    }

    #[tokio::test]
    async fn search_sends_the_query_verbatim_and_stores_hits() {
        let videos = FakeVideos {
            search: Ok(vec![hit(5.0)]),
            ..FakeVideos::default()
        };
        let harness = signed_in(videos, FakeStories::default(), FakeInsights::default()).await;
        with_video(&harness, "vid-1").await;

        let hits = harness.usecase.search_transcript(" waves ").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(harness.videos.queries.lock().unwrap()[0], " waves ");

        let state = harness.usecase.snapshot().await;
        assert_eq!(state.search_query, " waves ");
        assert!(state.search.is_ready());
    }

    #[tokio::test]
    async fn jump_reports_the_hit_timestamp() {
        let harness = signed_in(
            FakeVideos::default(),
            FakeStories::default(),
            FakeInsights::default(),
        )
        .await;
        with_video(&harness, "vid-1").await;
        harness.usecase.state.write().await.search = StageState::Ready(vec![hit(83.0)]);

        let message = harness.usecase.jump_to_hit(0).await.unwrap();
        assert_eq!(message, "✅ Jumped to 1:23");
        assert_eq!(*harness.player.seeks.lock().unwrap(), vec![83.0]);
    }

    #[tokio::test]
    async fn blocked_playback_still_counts_as_a_jump() {
        // Autoplay-style block: the seek lands but play does not start.
        let player = Arc::new(FakePlayer {
            play: Ok(false),
            ..FakePlayer::default()
        });
        let usecase = WorkflowUseCase::new(
            Arc::new(FakeVideos::default()),
            Arc::new(FakeStories::default()),
            Arc::new(FakeInsights::default()),
            Arc::new(SessionUseCase::new(Arc::new(MemorySessionStore::default()))),
            player.clone(),
        );
        usecase.state.write().await.search = StageState::Ready(vec![hit(5.0)]);

        let message = usecase.jump_to_hit(0).await.unwrap();
        assert_eq!(message, "✅ Jumped to 0:05 (seeking worked)");
        assert_eq!(*player.seeks.lock().unwrap(), vec![5.0]);
    }

    #[tokio::test]
    async fn scene_jump_crosses_into_the_negative_branch() {
        let harness = signed_in(
            FakeVideos::default(),
            FakeStories::default(),
            FakeInsights::default(),
        )
        .await;
        with_video(&harness, "vid-1").await;
        harness.usecase.state.write().await.story = StageState::Ready(GeneratedStory::Contrast {
            positive: StoryBranch {
                story_id: None,
                scenes: vec![scene(2.0, 5.0)],
            },
            negative: StoryBranch {
                story_id: None,
                scenes: vec![scene(9.0, 12.0)],
            },
        });

        let message = harness.usecase.jump_to_scene(1).await.unwrap();
        assert_eq!(message, "✅ Jumped to scene at 0:09");
        assert_eq!(*harness.player.seeks.lock().unwrap(), vec![9.0]);
    }

    #[tokio::test]
    async fn global_search_scopes_to_the_account() {
        let harness = signed_in(
            FakeVideos::default(),
            FakeStories::default(),
            FakeInsights::default(),
        )
        .await;

        harness.usecase.global_search(" sunset ").await.unwrap();
        assert_eq!(
            harness.videos.global_calls.lock().unwrap()[0],
            ("sunset".to_string(), Some("casey@example.com".to_string()))
        );

        let err = harness.usecase.global_search("   ").await.unwrap_err();
        assert_eq!(err.to_string(), GLOBAL_SEARCH_PRECONDITION_MESSAGE);
    }

    #[tokio::test]
    async fn global_search_refusals_flatten_to_one_message() {
        let videos = FakeVideos {
            global: Err(FlowError::rejected("Search failed")),
            ..FakeVideos::default()
        };
        let harness = signed_in(videos, FakeStories::default(), FakeInsights::default()).await;
        let err = harness.usecase.global_search("sunset").await.unwrap_err();
        assert_eq!(err.user_message(), Some(GLOBAL_SEARCH_FALLBACK_MESSAGE));
    }

    #[tokio::test]
    async fn current_video_details_counts_the_library_on_a_miss() {
        let videos = FakeVideos {
            listing: Ok(vec![VideoRef {
                video_id: "other".to_string(),
                filename: "other.mp4".to_string(),
                duration: None,
                file_size: None,
                status: None,
                created_at: None,
                local_path: None,
                transcript_preview: None,
                visual_tags: None,
                story_count: None,
                relevance_score: None,
            }]),
            ..FakeVideos::default()
        };
        let harness = signed_in(videos, FakeStories::default(), FakeInsights::default()).await;
        with_video(&harness, "vid-1").await;

        let err = harness.usecase.current_video_details().await.unwrap_err();
        assert_eq!(
            err.user_message(),
            Some("Current video not found in database. Available videos: 1")
        );
    }

    #[tokio::test]
    async fn tags_come_back_sorted_for_display() {
        let insights = FakeInsights {
            tags: Ok(vec![tag("beach", 0.4), tag("sunset", 0.9)]),
            ..FakeInsights::default()
        };
        let harness = signed_in(FakeVideos::default(), FakeStories::default(), insights).await;
        with_video(&harness, "vid-1").await;

        let tags = harness.usecase.generate_tags().await.unwrap();
        assert_eq!(tags[0].tag, "sunset");
        assert_eq!(tags[1].tag, "beach");
    }

    #[tokio::test]
    async fn tag_failure_uses_the_server_text() {
        let insights = FakeInsights {
            tags: Err(server_error("Tagging failed")),
            ..FakeInsights::default()
        };
        let harness = signed_in(FakeVideos::default(), FakeStories::default(), insights).await;
        with_video(&harness, "vid-1").await;

        let err = harness.usecase.generate_tags().await.unwrap_err();
        assert_eq!(err.user_message(), Some("Tagging failed"));
    }

    #[tokio::test]
    async fn emotions_pass_the_stored_transcript_along() {
        let harness = signed_in(
            FakeVideos::default(),
            FakeStories::default(),
            FakeInsights::default(),
        )
        .await;
        with_video(&harness, "vid-1").await;
        harness
            .usecase
            .state
            .write()
            .await
            .complete_transcription("the words".to_string());

        let analysis = harness.usecase.analyze_emotions().await.unwrap();
        assert!(!analysis.is_demo());
        assert_eq!(harness.insights.transcripts.lock().unwrap()[0], "the words");
    }

    #[tokio::test]
    async fn unreachable_emotion_analyzer_falls_back_to_demo_data() {
        let insights = FakeInsights {
            emotions: Err(transport_error()),
            ..FakeInsights::default()
        };
        let harness = signed_in(FakeVideos::default(), FakeStories::default(), insights).await;
        with_video(&harness, "vid-1").await;

        let analysis = harness.usecase.analyze_emotions().await.unwrap();
        assert!(analysis.is_demo());
        assert!(!analysis.points.is_empty());
        assert!(harness.usecase.snapshot().await.emotions.is_ready());
    }

    #[tokio::test]
    async fn emotion_refusal_is_an_error_not_demo_data() {
        let insights = FakeInsights {
            emotions: Err(FlowError::rejected("Emotion analysis failed")),
            ..FakeInsights::default()
        };
        let harness = signed_in(FakeVideos::default(), FakeStories::default(), insights).await;
        with_video(&harness, "vid-1").await;

        let err = harness.usecase.analyze_emotions().await.unwrap_err();
        assert_eq!(err.user_message(), Some("Emotion analysis failed"));
        assert!(harness.usecase.snapshot().await.emotions.is_failed());
    }

    #[tokio::test]
    async fn story_needs_a_video_and_a_prompt() {
        let harness = signed_in(
            FakeVideos::default(),
            FakeStories::default(),
            FakeInsights::default(),
        )
        .await;
        with_video(&harness, "vid-1").await;
        let err = harness.usecase.generate_story("").await.unwrap_err();
        assert_eq!(err.to_string(), STORY_PRECONDITION_MESSAGE);
    }

    #[tokio::test]
    async fn story_failure_prefixes_the_server_reason() {
        let stories = FakeStories {
            story: Err(server_error("Gemini quota exhausted")),
            ..FakeStories::default()
        };
        let harness = signed_in(FakeVideos::default(), stories, FakeInsights::default()).await;
        with_video(&harness, "vid-1").await;

        let err = harness.usecase.generate_story("a day out").await.unwrap_err();
        assert_eq!(
            err.user_message(),
            Some("Story generation failed: Gemini quota exhausted")
        );
    }

    #[tokio::test]
    async fn render_requires_a_story_with_scenes() {
        let harness = signed_in(
            FakeVideos::default(),
            FakeStories::default(),
            FakeInsights::default(),
        )
        .await;
        with_video(&harness, "vid-1").await;
        harness.usecase.state.write().await.story =
            StageState::Ready(GeneratedStory::Single(StoryBranch {
                story_id: None,
                scenes: vec![],
            }));

        let err = harness.usecase.render_video().await.unwrap_err();
        assert_eq!(err.to_string(), RENDER_STORY_FIRST_MESSAGE);
        assert!(harness.stories.renders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn contrast_stories_render_both_tellings() {
        let harness = signed_in(
            FakeVideos::default(),
            FakeStories::default(),
            FakeInsights::default(),
        )
        .await;
        with_video(&harness, "vid-1").await;
        harness.usecase.state.write().await.story = StageState::Ready(GeneratedStory::Contrast {
            positive: StoryBranch {
                story_id: None,
                scenes: vec![scene(0.0, 3.0)],
            },
            negative: StoryBranch {
                story_id: None,
                scenes: vec![scene(3.0, 6.0), scene(6.0, 9.0)],
            },
        });

        let outcome = harness.usecase.render_video().await.unwrap();
        assert!(matches!(outcome, RenderOutcome::Contrast { .. }));
        let mut calls = harness.stories.renders.lock().unwrap().clone();
        calls.sort_unstable();
        assert_eq!(calls, vec![1, 2]);
    }

    #[tokio::test]
    async fn inspiration_requires_a_video() {
        let harness = signed_in(
            FakeVideos::default(),
            FakeStories::default(),
            FakeInsights::default(),
        )
        .await;
        let err = harness.usecase.generate_inspiration("hope").await.unwrap_err();
        assert_eq!(err.to_string(), INSPIRATION_PRECONDITION_MESSAGE);
    }

    #[tokio::test]
    async fn journey_composes_both_halves() {
        let insights = FakeInsights {
            journey: Ok(JourneyReading {
                emotional_analysis: "Starts tense.".to_string(),
                contrasting_stories: ContrastingStories {
                    positive_path: Some("It gets better.".to_string()),
                    negative_path: Some("It gets worse.".to_string()),
                },
            }),
            ..FakeInsights::default()
        };
        let harness = signed_in(FakeVideos::default(), FakeStories::default(), insights).await;
        with_video(&harness, "vid-1").await;

        let document = harness.usecase.generate_journey().await.unwrap();
        assert!(document.text.starts_with("EMOTIONAL ANALYSIS:"));
        assert!(document.text.contains("It gets worse."));
    }

    #[tokio::test]
    async fn empty_journey_is_a_failure() {
        let harness = signed_in(
            FakeVideos::default(),
            FakeStories::default(),
            FakeInsights::default(),
        )
        .await;
        with_video(&harness, "vid-1").await;

        let err = harness.usecase.generate_journey().await.unwrap_err();
        assert_eq!(err.user_message(), Some(JOURNEY_EMPTY_MESSAGE));
    }

    #[tokio::test]
    async fn changing_story_mode_invalidates_the_story() {
        let harness = signed_in(
            FakeVideos::default(),
            FakeStories::default(),
            FakeInsights::default(),
        )
        .await;
        with_video(&harness, "vid-1").await;
        harness.usecase.generate_story("a day out").await.unwrap();
        assert!(harness.usecase.snapshot().await.story.is_ready());

        harness.usecase.set_story_mode(StoryMode::Contrast).await;
        assert!(harness.usecase.snapshot().await.story.is_idle());
    }
}
