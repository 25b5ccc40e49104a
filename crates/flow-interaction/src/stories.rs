//! Story endpoints: generation, content-based inspiration, and rendering.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use flow_core::backend::StoryApi;
use flow_core::error::{FlowError, Result};
use flow_core::story::{
    GeneratedStory, InspirationMode, RenderedVideo, StoryBranch, StoryMode, StoryScene,
};

use crate::client::BackendClient;

/// Rejection message for a refused story generation. The payload error is
/// not surfaced for this endpoint.
pub const STORY_REJECTED_MESSAGE: &str = "Story generation failed";
/// Rejection message for a refused render. The payload error is not
/// surfaced for this endpoint.
pub const RENDER_REJECTED_MESSAGE: &str = "Video rendering failed";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoryRequest<'a> {
    video_id: &'a str,
    prompt: &'a str,
    mode: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InspirationRequest<'a> {
    video_id: &'a str,
    mode: &'a str,
    prompt: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderRequest<'a> {
    video_id: &'a str,
    scenes: &'a [StoryScene],
    transition_duration: f64,
}

#[derive(Deserialize)]
struct StoryResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, rename = "storyId")]
    story_id: Option<String>,
    #[serde(default)]
    scenes: Option<Vec<StoryScene>>,
    #[serde(default, rename = "positiveStory")]
    positive_story: Option<StoryBranch>,
    #[serde(default, rename = "negativeStory")]
    negative_story: Option<StoryBranch>,
}

#[derive(Deserialize)]
struct InspirationResponse {
    #[serde(default)]
    story: Option<String>,
}

#[derive(Deserialize)]
struct RenderResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, rename = "renderId")]
    render_id: Option<String>,
    #[serde(default, rename = "videoUrl")]
    video_url: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[async_trait]
impl StoryApi for BackendClient {
    async fn generate_story(
        &self,
        video_id: &str,
        prompt: &str,
        mode: StoryMode,
    ) -> Result<GeneratedStory> {
        let response: StoryResponse = self
            .post_json(
                "/generate-story",
                &StoryRequest {
                    video_id,
                    prompt,
                    mode: mode.as_str(),
                },
            )
            .await?;

        if !response.success {
            return Err(FlowError::rejected(STORY_REJECTED_MESSAGE));
        }
        if let (Some(positive), Some(negative)) =
            (response.positive_story, response.negative_story)
        {
            return Ok(GeneratedStory::Contrast { positive, negative });
        }
        match response.scenes {
            Some(scenes) => Ok(GeneratedStory::Single(StoryBranch {
                story_id: response.story_id,
                scenes,
            })),
            None => Err(FlowError::rejected(STORY_REJECTED_MESSAGE)),
        }
    }

    async fn generate_inspiration(
        &self,
        video_id: &str,
        mode: InspirationMode,
        prompt: &str,
    ) -> Result<String> {
        let response: InspirationResponse = self
            .post_json(
                "/generate-content-story",
                &InspirationRequest {
                    video_id,
                    mode: mode.as_str(),
                    prompt,
                },
            )
            .await?;
        Ok(response.story.unwrap_or_default())
    }

    async fn render_story(
        &self,
        video_id: &str,
        scenes: &[StoryScene],
        transition_duration: f64,
    ) -> Result<RenderedVideo> {
        let response: RenderResponse = self
            .post_json(
                "/render-story",
                &RenderRequest {
                    video_id,
                    scenes,
                    transition_duration,
                },
            )
            .await?;

        match response {
            RenderResponse {
                success: true,
                render_id: Some(render_id),
                video_url: Some(video_url),
                message,
            } => Ok(RenderedVideo {
                render_id,
                video_url: self.absolute_media_url(&video_url),
                message,
            }),
            _ => Err(FlowError::rejected(RENDER_REJECTED_MESSAGE)),
        }
    }
}
