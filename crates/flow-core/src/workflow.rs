//! Per-video pipeline state.
//!
//! Every AI stage hangs off the active video. Adopting a new video resets
//! all stage results in one step so no result from a previous video can be
//! shown against the current one.

use std::fmt;

use crate::emotion::EmotionAnalysis;
use crate::journey::JourneyDocument;
use crate::search::SearchHit;
use crate::story::{
    clamp_transition_duration, GeneratedStory, InspirationMode, RenderOutcome, StoryMode,
    DEFAULT_TRANSITION_DURATION,
};
use crate::tags::Tag;

/// Lifecycle of one asynchronous stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum StageState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> StageState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The completed value, if the stage finished successfully.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, if the stage failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// The stages that run against the active video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Upload,
    Transcribe,
    Search,
    Tags,
    Emotions,
    Story,
    Render,
    Inspiration,
    Journey,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Upload => "upload",
            Self::Transcribe => "transcribe",
            Self::Search => "search",
            Self::Tags => "tags",
            Self::Emotions => "emotions",
            Self::Story => "story",
            Self::Render => "render",
            Self::Inspiration => "inspiration",
            Self::Journey => "journey",
        };
        f.write_str(name)
    }
}

/// Where the user is in the three-step flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowStep {
    #[default]
    AwaitingUpload,
    Uploaded,
    Transcribed,
}

impl WorkflowStep {
    /// Step number as shown to the user (1-based).
    pub fn number(&self) -> u8 {
        match self {
            Self::AwaitingUpload => 1,
            Self::Uploaded => 2,
            Self::Transcribed => 3,
        }
    }
}

/// The video the pipeline currently operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveVideo {
    pub video_id: String,
    pub filename: String,
    pub size_bytes: u64,
}

/// Everything the dashboard tracks for the active video.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowState {
    pub video: Option<ActiveVideo>,
    pub step: WorkflowStep,
    pub upload: StageState<()>,
    pub transcription: StageState<String>,
    pub search_query: String,
    pub search: StageState<Vec<SearchHit>>,
    pub tags: StageState<Vec<Tag>>,
    pub emotions: StageState<EmotionAnalysis>,
    pub story_mode: StoryMode,
    pub story: StageState<GeneratedStory>,
    pub transition_duration: f64,
    pub render: StageState<RenderOutcome>,
    pub inspiration_mode: InspirationMode,
    pub inspiration: StageState<String>,
    pub journey: StageState<JourneyDocument>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            video: None,
            step: WorkflowStep::default(),
            upload: StageState::Idle,
            transcription: StageState::Idle,
            search_query: String::new(),
            search: StageState::Idle,
            tags: StageState::Idle,
            emotions: StageState::Idle,
            story_mode: StoryMode::default(),
            story: StageState::Idle,
            transition_duration: DEFAULT_TRANSITION_DURATION,
            render: StageState::Idle,
            inspiration_mode: InspirationMode::default(),
            inspiration: StageState::Idle,
            journey: StageState::Idle,
        }
    }
}

impl WorkflowState {
    pub fn video_id(&self) -> Option<&str> {
        self.video.as_ref().map(|v| v.video_id.as_str())
    }

    /// Installs a freshly uploaded video and clears every stage result in
    /// the same step. Mode selections and the transition duration are user
    /// preferences and survive the switch.
    pub fn adopt_video(&mut self, video: ActiveVideo) {
        self.video = Some(video);
        self.step = WorkflowStep::Uploaded;
        self.upload = StageState::Ready(());
        self.transcription = StageState::Idle;
        self.search_query.clear();
        self.search = StageState::Idle;
        self.tags = StageState::Idle;
        self.emotions = StageState::Idle;
        self.story = StageState::Idle;
        self.render = StageState::Idle;
        self.inspiration = StageState::Idle;
        self.journey = StageState::Idle;
    }

    /// Records a failed upload without touching the previously active video.
    pub fn upload_failed(&mut self, message: impl Into<String>) {
        self.upload = StageState::Failed(message.into());
    }

    /// Stores the transcript and advances to the final step.
    pub fn complete_transcription(&mut self, text: String) {
        self.transcription = StageState::Ready(text);
        self.step = WorkflowStep::Transcribed;
    }

    /// Switches story tone. A changed tone invalidates the generated story.
    pub fn set_story_mode(&mut self, mode: StoryMode) {
        if self.story_mode != mode {
            self.story_mode = mode;
            self.story = StageState::Idle;
        }
    }

    pub fn set_inspiration_mode(&mut self, mode: InspirationMode) {
        self.inspiration_mode = mode;
    }

    /// Stores the scene transition duration, clamped to the supported range.
    pub fn set_transition_duration(&mut self, value: f64) {
        self.transition_duration = clamp_transition_duration(value);
    }
}
