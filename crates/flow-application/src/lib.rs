//! Use cases for the Footage Flow client.
//!
//! Each use case owns one surface of the product: signing in, the video
//! library, and the per-video pipeline. They speak to the backend through
//! the traits in `flow-core` and never touch HTTP directly.

pub mod archive_usecase;
pub mod auth_usecase;
pub mod session_usecase;
pub mod workflow_usecase;

#[cfg(test)]
pub(crate) mod testing;

pub use archive_usecase::ArchiveUseCase;
pub use auth_usecase::{AuthOutcome, AuthUseCase};
pub use session_usecase::SessionUseCase;
pub use workflow_usecase::WorkflowUseCase;
