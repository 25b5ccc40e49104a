pub mod backend;
pub mod emotion;
pub mod error;
pub mod format;
pub mod journey;
pub mod player;
pub mod search;
pub mod session;
pub mod story;
pub mod tags;
pub mod video;
pub mod workflow;

// Re-export common error type
pub use error::{FlowError, Result};
