//! Position-tracking player for the console.

use async_trait::async_trait;
use tokio::sync::Mutex;

use flow_core::error::Result;
use flow_core::player::Player;

/// Stands in for the dashboard's video element. It remembers where the
/// playhead was moved but has nothing to actually play, so `play` reports
/// the blocked-playback outcome and jumps read as "(seeking worked)".
#[derive(Default)]
pub struct ConsolePlayer {
    position: Mutex<Option<f64>>,
}

impl ConsolePlayer {
    /// Where the playhead was last moved, if anywhere.
    pub async fn position(&self) -> Option<f64> {
        *self.position.lock().await
    }
}

#[async_trait]
impl Player for ConsolePlayer {
    async fn seek(&self, seconds: f64) -> Result<()> {
        *self.position.lock().await = Some(seconds);
        Ok(())
    }

    async fn play(&self) -> Result<bool> {
        Ok(false)
    }
}
