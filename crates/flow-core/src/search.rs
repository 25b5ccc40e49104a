//! Transcript search results within a single video.

use serde::{Deserialize, Serialize};

/// How a hit matched the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    WordMatch,
    SentenceMatch,
}

impl MatchType {
    /// Badge text shown next to a hit.
    pub fn label(&self) -> &'static str {
        match self {
            Self::WordMatch => "Word Match",
            Self::SentenceMatch => "Sentence",
        }
    }
}

/// A single transcript match with its position in the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "type")]
    pub match_type: MatchType,
    pub start_time: f64,
    pub end_time: f64,
    pub score: f64,
    #[serde(rename = "text")]
    pub preview_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(default, rename = "word", skip_serializing_if = "Option::is_none")]
    pub matched_word: Option<String>,
}
