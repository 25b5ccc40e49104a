//! Sign-in, registration, and federated sign-in.
//!
//! The backend treats accounts loosely: plain sign-in is accepted for any
//! credentials, while registration really talks to the server and has to
//! tell "this email is taken" apart from everything else that can go
//! wrong. Every error leaving this module carries a message fit for
//! direct display.

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use flow_core::backend::AuthApi;
use flow_core::error::{FlowError, Result};
use flow_core::session::{
    PLACEHOLDER_PICTURE_URL, Session, SessionStore, federated_user_id,
};
use flow_interaction::decode_identity_claims;

/// Shown when the chosen email is already registered.
pub const DUPLICATE_EMAIL_MESSAGE: &str =
    "An account with this email already exists. Please sign in.";
/// Shown when plain sign-in fails for any reason.
pub const SIGN_IN_FAILED_MESSAGE: &str = "Login failed. Please try again.";
/// Shown when registration fails and no clearer reason is available.
pub const SIGN_UP_FAILED_MESSAGE: &str = "Signup failed. Please try again.";
/// Shown when a federated credential cannot be turned into a session.
pub const FEDERATED_SIGN_IN_FAILED_MESSAGE: &str =
    "Google authentication error. Please try again.";

static EMAIL_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// How a successful registration attempt resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    SignedIn(Session),
    /// The email is already registered; the caller should offer sign-in
    /// instead.
    DuplicateEmail,
}

pub struct AuthUseCase {
    auth: Arc<dyn AuthApi>,
    sessions: Arc<dyn SessionStore>,
}

impl AuthUseCase {
    pub fn new(auth: Arc<dyn AuthApi>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { auth, sessions }
    }

    /// Signs in with email and password.
    ///
    /// The backend does not check credentials for plain sign-in, so this
    /// mints a local session after a short pause and persists it.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        validate_credentials(email, password)?;
        tokio::time::sleep(Duration::from_secs(1)).await;

        let session = Session::from_sign_in(email);
        if let Err(err) = self.sessions.save(&session).await {
            tracing::warn!("[AuthUseCase] Failed to persist sign-in: {err}");
            return Err(FlowError::validation(SIGN_IN_FAILED_MESSAGE));
        }
        tracing::info!("[AuthUseCase] Signed in as {}", session.email);
        Ok(session)
    }

    /// Registers a new account and signs it in.
    ///
    /// The duplicate pre-check is best effort: when it cannot be reached,
    /// registration proceeds and conflicts are recognized from the
    /// registration response instead.
    pub async fn sign_up(&self, email: &str, name: &str, password: &str) -> Result<AuthOutcome> {
        validate_credentials(email, password)?;
        let normalized = email.trim().to_lowercase();

        if let Ok(true) = self.auth.email_exists(&normalized).await {
            return Ok(AuthOutcome::DuplicateEmail);
        }

        let effective_name = if name.is_empty() {
            flow_core::session::display_name_from_email(&normalized)
        } else {
            name
        };

        match self.auth.register(&normalized, effective_name, password).await {
            Ok(()) => {
                let session = Session::from_registration(&normalized, name);
                if let Err(err) = self.sessions.save(&session).await {
                    tracing::warn!("[AuthUseCase] Failed to persist registration: {err}");
                    return Err(FlowError::validation(SIGN_UP_FAILED_MESSAGE));
                }
                tracing::info!("[AuthUseCase] Registered {}", session.email);
                Ok(AuthOutcome::SignedIn(session))
            }
            Err(err) => self.resolve_registration_failure(&normalized, err).await,
        }
    }

    /// Classifies a failed registration.
    ///
    /// Conflicts can surface three ways: a refusal mentioning the email is
    /// taken, an HTTP 409, or an unreadable failure that a re-check of the
    /// email then explains.
    async fn resolve_registration_failure(
        &self,
        email: &str,
        err: FlowError,
    ) -> Result<AuthOutcome> {
        if let FlowError::Rejected(message) = &err {
            if message.to_lowercase().contains("already exists") {
                return Ok(AuthOutcome::DuplicateEmail);
            }
            return Err(err);
        }
        if err.has_status(409) {
            return Ok(AuthOutcome::DuplicateEmail);
        }
        if let FlowError::Backend {
            status: Some(_),
            message,
            ..
        } = &err
        {
            if !message.is_empty() {
                return Err(FlowError::rejected(message.clone()));
            }
        }

        tracing::debug!("[AuthUseCase] Registration failed without a server message: {err}");
        match self.auth.email_exists_fallback(email).await {
            Ok(true) => Ok(AuthOutcome::DuplicateEmail),
            _ => Err(FlowError::validation(SIGN_UP_FAILED_MESSAGE)),
        }
    }

    /// Signs in from a federated identity credential.
    ///
    /// The credential's profile claims are decoded locally; each missing
    /// claim falls back field by field so a sparse token still signs in.
    pub async fn federated_sign_in(&self, credential: &str) -> Result<Session> {
        let claims = match decode_identity_claims(credential) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::warn!("[AuthUseCase] Could not decode credential: {err}");
                return Err(FlowError::validation(FEDERATED_SIGN_IN_FAILED_MESSAGE));
            }
        };

        let user_id = claims
            .sub
            .filter(|s| !s.is_empty())
            .unwrap_or_else(federated_user_id);
        let email = claims
            .email
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "user@gmail.com".to_string());
        let name = claims
            .name
            .filter(|s| !s.is_empty())
            .or(claims.given_name.filter(|s| !s.is_empty()))
            .unwrap_or_else(|| "Google User".to_string());
        let picture = claims
            .picture
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_PICTURE_URL.to_string());

        let session = Session::new(user_id, email, name, picture);
        if let Err(err) = self.sessions.save(&session).await {
            tracing::warn!("[AuthUseCase] Failed to persist federated sign-in: {err}");
            return Err(FlowError::validation(FEDERATED_SIGN_IN_FAILED_MESSAGE));
        }
        tracing::info!("[AuthUseCase] Signed in as {} (federated)", session.email);
        Ok(session)
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(FlowError::validation("Email and password are required."));
    }
    if !EMAIL_FORMAT.is_match(email.trim()) {
        return Err(FlowError::validation("Please enter a valid email address."));
    }
    Ok(())
}
