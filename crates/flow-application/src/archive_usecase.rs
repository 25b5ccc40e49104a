//! The video library: full listing and cross-video search.

use std::sync::Arc;

use tokio::sync::RwLock;

use flow_core::backend::VideoApi;
use flow_core::error::{FlowError, Result};
use flow_core::video::VideoRef;

/// Shown when the backend refuses to list the library.
pub const LOAD_VIDEOS_FAILED_MESSAGE: &str = "Failed to load videos";
/// Shown when the library cannot be fetched at all.
pub const LOAD_VIDEOS_RETRY_MESSAGE: &str = "Failed to load videos. Please try again.";
/// Shown when the backend refuses a library search.
pub const LIBRARY_SEARCH_FAILED_MESSAGE: &str = "Search failed";
/// Shown when a library search cannot be sent.
pub const LIBRARY_SEARCH_RETRY_MESSAGE: &str = "Search failed. Please try again.";

/// Lists and searches everything ever uploaded, across all accounts.
///
/// The last successful listing is kept so clearing a search falls back to
/// it without touching the network.
pub struct ArchiveUseCase {
    videos: Arc<dyn VideoApi>,
    catalog: RwLock<Option<Vec<VideoRef>>>,
}

impl ArchiveUseCase {
    pub fn new(videos: Arc<dyn VideoApi>) -> Self {
        Self {
            videos,
            catalog: RwLock::new(None),
        }
    }

    /// Fetches the full library listing and remembers it.
    pub async fn load_videos(&self) -> Result<Vec<VideoRef>> {
        match self.videos.list_videos(None).await {
            Ok(videos) => {
                tracing::debug!("[ArchiveUseCase] Loaded {} videos", videos.len());
                *self.catalog.write().await = Some(videos.clone());
                Ok(videos)
            }
            Err(err) => {
                tracing::warn!("[ArchiveUseCase] Listing failed: {err}");
                let message = match err {
                    FlowError::Rejected(_) => LOAD_VIDEOS_FAILED_MESSAGE,
                    _ => LOAD_VIDEOS_RETRY_MESSAGE,
                };
                Err(FlowError::rejected(message))
            }
        }
    }

    /// Searches the whole library. A blank query clears the search instead
    /// of hitting the backend.
    pub async fn search(&self, query: &str) -> Result<Vec<VideoRef>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(self.clear_search().await);
        }

        match self.videos.global_search(trimmed, None).await {
            Ok(results) => Ok(results),
            Err(err) => {
                tracing::warn!("[ArchiveUseCase] Library search failed: {err}");
                let message = match err {
                    FlowError::Rejected(_) => LIBRARY_SEARCH_FAILED_MESSAGE,
                    _ => LIBRARY_SEARCH_RETRY_MESSAGE,
                };
                Err(FlowError::rejected(message))
            }
        }
    }

    /// Drops search results and returns the last loaded listing.
    pub async fn clear_search(&self) -> Vec<VideoRef> {
        self.catalog.read().await.clone().unwrap_or_default()
    }
}
