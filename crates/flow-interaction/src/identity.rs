//! Decoding of federated identity credentials.
//!
//! The credential is a JWT whose payload segment carries the profile
//! claims. The signature is not checked here: the token is only mined
//! for display fields, never trusted for authorization.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use flow_core::error::{FlowError, Result};

/// Profile claims carried in a federated credential. Everything is
/// optional; callers fall back field by field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Extracts the profile claims from a dot-separated credential.
pub fn decode_identity_claims(credential: &str) -> Result<IdentityClaims> {
    let payload = credential
        .split('.')
        .nth(1)
        .ok_or_else(|| FlowError::validation("Credential has no payload segment"))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| FlowError::validation(format!("Credential payload is not base64: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| FlowError::validation(format!("Credential payload is not valid JSON: {e}")))
}
