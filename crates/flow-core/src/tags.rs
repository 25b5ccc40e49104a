//! AI-generated video tags.

use serde::{Deserialize, Serialize};

/// Where a tag came from: the transcript text or the visual track.
///
/// Unrecognized sources are preserved and styled like visual tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TagSource {
    Visual,
    Text,
    Other(String),
}

impl TagSource {
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Visual => "visual",
            Self::Text => "text",
            Self::Other(s) => s,
        }
    }
}

impl Default for TagSource {
    fn default() -> Self {
        Self::Visual
    }
}

impl From<String> for TagSource {
    fn from(value: String) -> Self {
        match value.as_str() {
            "visual" => Self::Visual,
            "text" => Self::Text,
            _ => Self::Other(value),
        }
    }
}

impl From<TagSource> for String {
    fn from(value: TagSource) -> Self {
        value.as_str().to_string()
    }
}

/// One tag as returned by the backend. Confidence and score are
/// alternative names for the same signal depending on the analyzer that
/// produced the tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub tag: String,
    #[serde(default)]
    pub source: TagSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrences: Option<u32>,
}

impl Tag {
    /// Confidence for display and ordering, whichever field carries it.
    pub fn effective_confidence(&self) -> f64 {
        self.confidence.or(self.score).unwrap_or(0.0)
    }
}

/// Orders tags for display: highest confidence first, occurrence count as
/// the tie-breaker. The sort is stable, so equal tags keep backend order.
pub fn sort_for_display(tags: &mut [Tag]) {
    tags.sort_by(|a, b| {
        b.effective_confidence()
            .total_cmp(&a.effective_confidence())
            .then_with(|| b.occurrences.unwrap_or(0).cmp(&a.occurrences.unwrap_or(0)))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, confidence: Option<f64>, occurrences: Option<u32>) -> Tag {
        Tag {
            tag: name.to_string(),
            source: TagSource::Visual,
            confidence,
            score: None,
            occurrences,
        }
    }

    #[test]
    fn sorts_by_confidence_then_occurrences() {
        let mut tags = vec![
            tag("one", Some(0.9), Some(1)),
            tag("five", Some(0.4), Some(5)),
            tag("three", Some(0.9), Some(3)),
        ];
        sort_for_display(&mut tags);
        let order: Vec<&str> = tags.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(order, ["three", "one", "five"]);
    }

    #[test]
    fn score_stands_in_for_missing_confidence() {
        let mut scored = tag("scored", None, None);
        scored.score = Some(0.8);
        let mut tags = vec![tag("low", Some(0.2), None), scored];
        sort_for_display(&mut tags);
        assert_eq!(tags[0].tag, "scored");
        assert_eq!(tags[0].effective_confidence(), 0.8);
    }

    #[test]
    fn unknown_source_is_not_textual() {
        let parsed: Tag =
            serde_json::from_str(r#"{"tag": "sunset", "source": "audio"}"#).unwrap();
        assert_eq!(parsed.source, TagSource::Other("audio".to_string()));
        assert!(!parsed.source.is_text());
    }

    #[test]
    fn source_defaults_to_visual() {
        let parsed: Tag = serde_json::from_str(r#"{"tag": "beach"}"#).unwrap();
        assert_eq!(parsed.source, TagSource::Visual);
    }
}
