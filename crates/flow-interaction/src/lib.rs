pub mod auth;
pub mod client;
pub mod identity;
pub mod insights;
pub mod stories;
pub mod videos;

pub use crate::client::BackendClient;
pub use crate::identity::{IdentityClaims, decode_identity_claims};
