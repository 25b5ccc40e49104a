//! Account endpoints: duplicate checks and registration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use flow_core::backend::AuthApi;
use flow_core::error::{FlowError, Result};

use crate::client::BackendClient;

/// Rejection message when registration fails without a reason.
pub const REGISTRATION_REJECTED_MESSAGE: &str = "Failed to create account.";

#[derive(Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    name: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Deserialize)]
struct CheckEmailResponse {
    #[serde(default)]
    exists: bool,
}

#[derive(Deserialize)]
struct RegisterResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl AuthApi for BackendClient {
    async fn email_exists(&self, email: &str) -> Result<bool> {
        let response: CheckEmailResponse = self
            .get_json("/auth/check-email", &[("email", email)])
            .await?;
        Ok(response.exists)
    }

    async fn email_exists_fallback(&self, email: &str) -> Result<bool> {
        let response: CheckEmailResponse = self
            .post_json("/auth/check-email", &EmailBody { email })
            .await?;
        Ok(response.exists)
    }

    async fn register(&self, email: &str, name: &str, password: &str) -> Result<()> {
        let response: RegisterResponse = self
            .post_json(
                "/auth/register",
                &RegisterRequest {
                    email,
                    name,
                    password,
                },
            )
            .await?;

        if response.success {
            Ok(())
        } else {
            let message = response
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| REGISTRATION_REJECTED_MESSAGE.to_string());
            Err(FlowError::rejected(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_uses_plain_keys() {
        let body = RegisterRequest {
            email: "casey@example.com",
            name: "casey",
            password: "hunter2",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["email"], "casey@example.com");
        assert_eq!(json["name"], "casey");
        assert_eq!(json["password"], "hunter2");
    }

    #[test]
    fn check_email_defaults_to_not_existing() {
        let parsed: CheckEmailResponse = serde_json::from_str("{}").unwrap();
        assert!(!parsed.exists);

        let parsed: CheckEmailResponse = serde_json::from_str(r#"{"exists": true}"#).unwrap();
        assert!(parsed.exists);
    }

    #[test]
    fn register_response_parses_failure_payload() {
        let parsed: RegisterResponse =
            serde_json::from_str(r#"{"success": false, "error": "Email already exists"}"#).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.error.as_deref(), Some("Email already exists"));
    }
}
