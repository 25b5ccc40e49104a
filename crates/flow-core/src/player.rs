//! Playback seam and jump feedback messages.

use async_trait::async_trait;

use crate::error::Result;
use crate::format::format_timestamp;

/// Wherever the video plays back. The console ships a position-tracking
/// implementation; a real player window would implement the same seam.
#[async_trait]
pub trait Player: Send + Sync {
    /// Moves the playhead to `seconds` into the video.
    async fn seek(&self, seconds: f64) -> Result<()>;

    /// Starts playback after a seek. Returns `Ok(false)` when playback was
    /// blocked but the seek itself took effect.
    async fn play(&self) -> Result<bool>;
}

/// Feedback after jumping to a search hit.
pub fn jump_message(seconds: f64, played: bool) -> String {
    if played {
        format!("✅ Jumped to {}", format_timestamp(seconds))
    } else {
        format!("✅ Jumped to {} (seeking worked)", format_timestamp(seconds))
    }
}

/// Feedback after jumping to a story scene.
pub fn scene_jump_message(seconds: f64, played: bool) -> String {
    if played {
        format!("✅ Jumped to scene at {}", format_timestamp(seconds))
    } else {
        format!(
            "✅ Jumped to scene at {} (seeking worked)",
            format_timestamp(seconds)
        )
    }
}

/// Feedback when seeking itself failed.
pub fn jump_error_message(error: &str) -> String {
    format!("❌ Error: {error}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_messages_carry_the_timestamp() {
        assert_eq!(jump_message(83.0, true), "✅ Jumped to 1:23");
        assert_eq!(
            jump_message(83.0, false),
            "✅ Jumped to 1:23 (seeking worked)"
        );
    }

    #[test]
    fn scene_jumps_read_differently() {
        assert_eq!(scene_jump_message(5.0, true), "✅ Jumped to scene at 0:05");
        assert_eq!(
            scene_jump_message(5.0, false),
            "✅ Jumped to scene at 0:05 (seeking worked)"
        );
    }
}
