//! The signed-in user profile.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Profile picture used when the identity provider supplies none.
pub const PLACEHOLDER_PICTURE_URL: &str = "https://via.placeholder.com/150";

/// The active sign-in, persisted across restarts.
///
/// Serialized with camelCase keys so the stored form matches the wire
/// shape used when the profile is sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub picture_url: String,
}

impl Session {
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        picture_url: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            name: name.into(),
            picture_url: picture_url.into(),
        }
    }

    /// Session for a plain email/password sign-in.
    ///
    /// The user id is minted locally (`user-<millis>`) and the display name
    /// falls back to the part of the email before the `@`.
    pub fn from_sign_in(email: &str) -> Self {
        Self::new(
            local_user_id(),
            email,
            display_name_from_email(email),
            PLACEHOLDER_PICTURE_URL,
        )
    }

    /// Session for a freshly registered account.
    ///
    /// An empty name falls back to the email prefix, matching what the
    /// backend stores for the account.
    pub fn from_registration(email: &str, name: &str) -> Self {
        let name = if name.trim().is_empty() {
            display_name_from_email(email).to_string()
        } else {
            name.trim().to_string()
        };
        Self::new(local_user_id(), email, name, PLACEHOLDER_PICTURE_URL)
    }
}

/// Locally minted user id for non-federated sign-ins.
pub fn local_user_id() -> String {
    format!("user-{}", Utc::now().timestamp_millis())
}

/// Fallback user id when a federated credential carries no subject.
pub fn federated_user_id() -> String {
    format!("google-user-{}", Utc::now().timestamp_millis())
}

/// The part of an email address before the `@`, used as a display name.
pub fn display_name_from_email(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
