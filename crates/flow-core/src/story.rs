//! Generated stories, rendering outcomes, and their modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// Tone for timeline story generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryMode {
    Normal,
    #[default]
    Positive,
    Negative,
    /// Generates a positive and a negative telling of the same footage.
    Contrast,
}

impl StoryMode {
    pub const ALL: [StoryMode; 4] = [
        StoryMode::Normal,
        StoryMode::Positive,
        StoryMode::Negative,
        StoryMode::Contrast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Contrast => "contrast",
        }
    }
}

impl fmt::Display for StoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryMode {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "contrast" => Ok(Self::Contrast),
            other => Err(FlowError::validation(format!(
                "Unknown story mode '{other}'. Choose one of: normal, positive, negative, contrast"
            ))),
        }
    }
}

/// Tone for prompt-based inspirational stories. The wire format uses the
/// capitalized names as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InspirationMode {
    #[default]
    Hopeful,
    Motivational,
    Funny,
    Emotional,
    Reflective,
}

impl InspirationMode {
    pub const ALL: [InspirationMode; 5] = [
        InspirationMode::Hopeful,
        InspirationMode::Motivational,
        InspirationMode::Funny,
        InspirationMode::Emotional,
        InspirationMode::Reflective,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hopeful => "Hopeful",
            Self::Motivational => "Motivational",
            Self::Funny => "Funny",
            Self::Emotional => "Emotional",
            Self::Reflective => "Reflective",
        }
    }
}

impl fmt::Display for InspirationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InspirationMode {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hopeful" => Ok(Self::Hopeful),
            "motivational" => Ok(Self::Motivational),
            "funny" => Ok(Self::Funny),
            "emotional" => Ok(Self::Emotional),
            "reflective" => Ok(Self::Reflective),
            other => Err(FlowError::validation(format!(
                "Unknown inspiration mode '{other}'. Choose one of: Hopeful, Motivational, Funny, Emotional, Reflective"
            ))),
        }
    }
}

/// One story beat mapped onto a span of the source footage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryScene {
    pub start: f64,
    pub end: f64,
    pub caption: String,
    pub narration: String,
}

/// A single telling: its scenes plus the backend's story id when assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryBranch {
    #[serde(
        default,
        rename = "storyId",
        skip_serializing_if = "Option::is_none"
    )]
    pub story_id: Option<String>,
    pub scenes: Vec<StoryScene>,
}

impl StoryBranch {
    /// The scene narrations joined into one readable passage.
    pub fn narrative(&self) -> String {
        self.scenes
            .iter()
            .map(|scene| scene.narration.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A generated story: one telling, or a positive/negative pair in
/// contrast mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeneratedStory {
    Single(StoryBranch),
    Contrast {
        positive: StoryBranch,
        negative: StoryBranch,
    },
}

impl GeneratedStory {
    /// True when every telling has at least one scene to cut from, which is
    /// the precondition for rendering.
    pub fn has_renderable_scenes(&self) -> bool {
        match self {
            Self::Single(branch) => !branch.scenes.is_empty(),
            Self::Contrast { positive, negative } => {
                !positive.scenes.is_empty() && !negative.scenes.is_empty()
            }
        }
    }

    pub fn scene_count(&self) -> usize {
        match self {
            Self::Single(branch) => branch.scenes.len(),
            Self::Contrast { positive, negative } => {
                positive.scenes.len() + negative.scenes.len()
            }
        }
    }
}

/// A finished render: the backend's id for it and a playable URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedVideo {
    pub render_id: String,
    pub video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// What rendering produced: one video, or a pair in contrast mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderOutcome {
    Single(RenderedVideo),
    Contrast {
        positive: RenderedVideo,
        negative: RenderedVideo,
    },
}

/// Seconds of crossfade between scenes in a rendered story.
pub const DEFAULT_TRANSITION_DURATION: f64 = 0.5;
pub const MAX_TRANSITION_DURATION: f64 = 2.0;

/// Clamps a requested transition duration to the supported 0-2s range.
/// Non-finite input falls back to the default.
pub fn clamp_transition_duration(value: f64) -> f64 {
    if !value.is_finite() {
        return DEFAULT_TRANSITION_DURATION;
    }
    value.clamp(0.0, MAX_TRANSITION_DURATION)
}
