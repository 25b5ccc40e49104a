//! Video upload validation and the library listing model.

use serde::{Deserialize, Serialize};

use crate::error::{FlowError, Result};

/// Upload size cap enforced before any bytes leave the machine.
pub const MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

/// MIME types accepted for upload.
///
/// The first six are the forms the product has always accepted; the rest
/// are the equivalent names produced by extension-based probing (`.avi`
/// reports as `video/x-msvideo`, `.mov` as `video/quicktime`, and so on).
pub const ALLOWED_VIDEO_TYPES: &[&str] = &[
    "video/mp4",
    "video/avi",
    "video/mov",
    "video/wmv",
    "video/flv",
    "video/webm",
    "video/x-msvideo",
    "video/quicktime",
    "video/x-ms-wmv",
    "video/x-flv",
];

pub const INVALID_TYPE_MESSAGE: &str = "Please select a valid video file";
pub const FILE_TOO_LARGE_MESSAGE: &str = "File size must be less than 500MB";

/// A local file staged for upload, after probing but before any network IO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl UploadCandidate {
    /// Rejects non-video types and oversized files.
    ///
    /// Runs before the file is read or any request is made, so an invalid
    /// candidate never touches the network.
    pub fn validate(&self) -> Result<()> {
        if !ALLOWED_VIDEO_TYPES.contains(&self.mime_type.as_str()) {
            return Err(FlowError::validation(INVALID_TYPE_MESSAGE));
        }
        if self.size_bytes > MAX_UPLOAD_BYTES {
            return Err(FlowError::validation(FILE_TOO_LARGE_MESSAGE));
        }
        Ok(())
    }
}

/// Processing status reported by the backend for a stored video.
///
/// Round-trips unrecognized values so a listing never fails to parse when
/// the backend grows a new status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VideoStatus {
    Uploaded,
    Processing,
    Other(String),
}

impl VideoStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Uploaded => "uploaded",
            Self::Processing => "processing",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for VideoStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "uploaded" => Self::Uploaded,
            "processing" => Self::Processing,
            _ => Self::Other(value),
        }
    }
}

impl From<VideoStatus> for String {
    fn from(value: VideoStatus) -> Self {
        value.as_str().to_string()
    }
}

/// A stored video as returned by the listing and global search endpoints.
///
/// The backend mixes camelCase and snake_case keys in this payload; the
/// explicit renames below pin the exact wire names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRef {
    pub video_id: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VideoStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
    #[serde(
        default,
        rename = "transcript_preview",
        skip_serializing_if = "Option::is_none"
    )]
    pub transcript_preview: Option<String>,
    #[serde(default, rename = "visual_tags", skip_serializing_if = "Option::is_none")]
    pub visual_tags: Option<Vec<String>>,
    #[serde(default, rename = "story_count", skip_serializing_if = "Option::is_none")]
    pub story_count: Option<u32>,
    #[serde(
        default,
        rename = "relevance_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub relevance_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(mime: &str, size: u64) -> UploadCandidate {
        UploadCandidate {
            filename: "clip.mp4".to_string(),
            mime_type: mime.to_string(),
            size_bytes: size,
        }
    }

    #[test]
    fn accepts_supported_video_types() {
        for mime in ["video/mp4", "video/webm", "video/quicktime"] {
            assert!(candidate(mime, 1024).validate().is_ok(), "rejected {mime}");
        }
    }

    #[test]
    fn rejects_non_video_type_with_exact_message() {
        let err = candidate("application/pdf", 1024).validate().unwrap_err();
        assert_eq!(err.to_string(), INVALID_TYPE_MESSAGE);
        assert!(err.is_validation());
    }

    #[test]
    fn rejects_oversized_file_with_exact_message() {
        let err = candidate("video/mp4", MAX_UPLOAD_BYTES + 1)
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), FILE_TOO_LARGE_MESSAGE);
    }

    #[test]
    fn size_cap_is_inclusive() {
        assert!(candidate("video/mp4", MAX_UPLOAD_BYTES).validate().is_ok());
    }

    #[test]
    fn unknown_status_round_trips() {
        let status: VideoStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, VideoStatus::Other("archived".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"archived\"");
    }

    #[test]
    fn listing_entry_parses_mixed_key_styles() {
        let json = r#"{
            "videoId": "vid-42",
            "filename": "beach.mp4",
            "duration": 93.5,
            "fileSize": 10485760,
            "status": "uploaded",
            "createdAt": "2024-05-01T10:20:30",
            "transcript_preview": "waves crashing on the",
            "visual_tags": ["beach", "sunset"],
            "story_count": 2,
            "relevance_score": 0.91
        }"#;
        let video: VideoRef = serde_json::from_str(json).unwrap();
        assert_eq!(video.video_id, "vid-42");
        assert_eq!(video.status, Some(VideoStatus::Uploaded));
        assert_eq!(video.visual_tags.as_deref(), Some(&["beach".to_string(), "sunset".to_string()][..]));
        assert_eq!(video.story_count, Some(2));
    }

    #[test]
    fn listing_entry_tolerates_sparse_payload() {
        let video: VideoRef =
            serde_json::from_str(r#"{"videoId": "v1", "filename": "a.mp4"}"#).unwrap();
        assert_eq!(video.status, None);
        assert_eq!(video.duration, None);
    }
}
