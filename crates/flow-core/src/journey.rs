//! The combined emotional journey document.

use serde::{Deserialize, Serialize};

/// The contrasting positive/negative tellings returned alongside an
/// emotional analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastingStories {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_path: Option<String>,
}

impl ContrastingStories {
    pub fn has_content(&self) -> bool {
        self.positive_path.as_deref().is_some_and(|s| !s.is_empty())
            || self.negative_path.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// The assembled journey text plus the parts it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyDocument {
    pub emotional_analysis: String,
    pub stories: Option<ContrastingStories>,
    /// The display text: both parts combined when stories are present,
    /// otherwise the analysis alone.
    pub text: String,
}

impl JourneyDocument {
    /// Assembles the display document from whatever the backend returned.
    ///
    /// Returns `None` when there is nothing to show (no analysis and no
    /// story paths).
    pub fn compose(emotional_analysis: String, stories: ContrastingStories) -> Option<Self> {
        if stories.has_content() {
            let text = format!(
                "EMOTIONAL ANALYSIS:\n\n{}\n\n\nCONTRASTING STORIES:\n\nPOSITIVE PATH:\n{}\n\nNEGATIVE PATH:\n{}",
                emotional_analysis,
                stories.positive_path.as_deref().unwrap_or(""),
                stories.negative_path.as_deref().unwrap_or(""),
            );
            Some(Self {
                emotional_analysis,
                stories: Some(stories),
                text,
            })
        } else if !emotional_analysis.is_empty() {
            Some(Self {
                text: emotional_analysis.clone(),
                emotional_analysis,
                stories: None,
            })
        } else {
            None
        }
    }

    /// The document split into display blocks.
    pub fn blocks(&self) -> Vec<JourneyBlock> {
        split_blocks(&self.text)
    }
}

/// A display block of the journey text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyBlock {
    Heading(String),
    Paragraph(String),
}

/// Splits journey text on blank lines. Blocks mentioning "path" or
/// "journey" render as headings, the rest as paragraphs.
pub fn split_blocks(text: &str) -> Vec<JourneyBlock> {
    text.split("\n\n")
        .filter_map(|paragraph| {
            let trimmed = paragraph.trim();
            if trimmed.is_empty() {
                return None;
            }
            let lower = trimmed.to_lowercase();
            if lower.contains("path") || lower.contains("journey") {
                Some(JourneyBlock::Heading(trimmed.to_string()))
            } else {
                Some(JourneyBlock::Paragraph(trimmed.to_string()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_combined_document_when_stories_present() {
        let stories = ContrastingStories {
            positive_path: Some("Things looked up.".to_string()),
            negative_path: Some("Things fell apart.".to_string()),
        };
        let doc = JourneyDocument::compose("A tense opening.".to_string(), stories).unwrap();
        assert_eq!(
            doc.text,
            "EMOTIONAL ANALYSIS:\n\nA tense opening.\n\n\nCONTRASTING STORIES:\n\nPOSITIVE PATH:\nThings looked up.\n\nNEGATIVE PATH:\nThings fell apart."
        );
    }

    #[test]
    fn one_sided_stories_still_compose() {
        let stories = ContrastingStories {
            positive_path: Some("Only the bright side.".to_string()),
            negative_path: None,
        };
        let doc = JourneyDocument::compose("Analysis.".to_string(), stories).unwrap();
        assert!(doc.text.contains("POSITIVE PATH:\nOnly the bright side."));
        assert!(doc.text.contains("NEGATIVE PATH:\n"));
    }

    #[test]
    fn analysis_alone_is_the_whole_text() {
        let doc =
            JourneyDocument::compose("Just analysis.".to_string(), ContrastingStories::default())
                .unwrap();
        assert_eq!(doc.text, "Just analysis.");
        assert!(doc.stories.is_none());
    }

    #[test]
    fn nothing_to_show_returns_none() {
        assert!(JourneyDocument::compose(String::new(), ContrastingStories::default()).is_none());
    }

    #[test]
    fn path_and_journey_blocks_become_headings() {
        let blocks = split_blocks(
            "POSITIVE PATH:\nrise\n\nAn ordinary paragraph.\n\nThe journey continues\n\n   ",
        );
        assert_eq!(
            blocks,
            vec![
                JourneyBlock::Heading("POSITIVE PATH:\nrise".to_string()),
                JourneyBlock::Paragraph("An ordinary paragraph.".to_string()),
                JourneyBlock::Heading("The journey continues".to_string()),
            ]
        );
    }
}
