//! Insight endpoints: visual tags, emotion analysis, and the combined
//! emotional journey.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use flow_core::backend::{InsightApi, JourneyReading};
use flow_core::emotion::{EmotionPoint, EmotionReading, WeightedEmotion};
use flow_core::error::{FlowError, Result};
use flow_core::journey::ContrastingStories;
use flow_core::tags::Tag;

use crate::client::BackendClient;

/// Rejection message when tag generation refuses without a reason.
pub const TAGS_REJECTED_MESSAGE: &str = "Failed to generate tags";
/// Rejection message when the emotion endpoint answers without data.
pub const EMOTIONS_REJECTED_MESSAGE: &str = "Emotion analysis failed";

/// The journey endpoint can return analysis only, stories only, or both.
/// We always ask for both and let the caller compose what came back.
const ANALYSIS_TYPE_BOTH: &str = "both";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoIdBody<'a> {
    video_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmotionRequest<'a> {
    video_id: &'a str,
    transcript: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JourneyRequest<'a> {
    video_id: &'a str,
    analysis_type: &'a str,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    tags: Vec<Tag>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct EmotionsResponse {
    #[serde(default)]
    emotions: Option<Vec<EmotionPoint>>,
    #[serde(default, rename = "goodSide")]
    good_side: Vec<WeightedEmotion>,
    #[serde(default, rename = "badSide")]
    bad_side: Vec<WeightedEmotion>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct JourneyResponse {
    #[serde(default, rename = "emotionalAnalysis")]
    emotional_analysis: Option<String>,
    #[serde(default, rename = "contrastingStories")]
    contrasting_stories: Option<ContrastingStories>,
}

fn rejected(error: Option<String>, fallback: &str) -> FlowError {
    let message = error
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| fallback.to_string());
    FlowError::rejected(message)
}

#[async_trait]
impl InsightApi for BackendClient {
    async fn generate_tags(&self, video_id: &str) -> Result<Vec<Tag>> {
        let response: TagsResponse = self
            .post_json("/generate-tags", &VideoIdBody { video_id })
            .await?;
        if response.success {
            Ok(response.tags)
        } else {
            Err(rejected(response.error, TAGS_REJECTED_MESSAGE))
        }
    }

    async fn analyze_emotions(&self, video_id: &str, transcript: &str) -> Result<EmotionReading> {
        let response: EmotionsResponse = self
            .post_json(
                "/analyze-emotions",
                &EmotionRequest {
                    video_id,
                    transcript,
                },
            )
            .await?;
        match response.emotions {
            Some(points) => Ok(EmotionReading {
                points,
                good_side: response.good_side,
                bad_side: response.bad_side,
            }),
            None => Err(rejected(response.error, EMOTIONS_REJECTED_MESSAGE)),
        }
    }

    async fn generate_journey(&self, video_id: &str) -> Result<JourneyReading> {
        let response: JourneyResponse = self
            .post_json(
                "/generate-content-emotional-journey",
                &JourneyRequest {
                    video_id,
                    analysis_type: ANALYSIS_TYPE_BOTH,
                },
            )
            .await?;
        Ok(JourneyReading {
            emotional_analysis: response.emotional_analysis.unwrap_or_default(),
            contrasting_stories: response.contrasting_stories.unwrap_or_default(),
        })
    }
}
