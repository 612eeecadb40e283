//! Authentication endpoints (`/api/auth/*`).

use async_trait::async_trait;
use blitzshop_core::{Email, User};
use reqwest::Method;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::ApiClient;
use crate::error::ClientError;

/// Sign-up request body.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub email: Email,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("username", &self.username)
            .finish()
    }
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthWire {
    message: Option<String>,
    user: User,
    access_token: String,
    refresh_token: Option<String>,
}

/// Successful login or registration.
#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub message: Option<String>,
    pub user: User,
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
}

impl From<AuthWire> for AuthResponse {
    fn from(wire: AuthWire) -> Self {
        Self {
            message: wire.message,
            user: wire.user,
            access_token: SecretString::from(wire.access_token),
            refresh_token: wire.refresh_token.map(SecretString::from),
        }
    }
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

/// Credential exchange used by the session store.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a token and profile.
    async fn login(&self, email: &Email, password: &str) -> Result<AuthResponse, ClientError>;

    /// Create an account and sign in.
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError>;
}

#[async_trait]
impl AuthApi for ApiClient {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(&self, email: &Email, password: &str) -> Result<AuthResponse, ClientError> {
        let body = LoginBody {
            email: email.as_str(),
            password,
        };
        let request = self
            .request(Method::POST, "api/auth/login", &[], None)?
            .json(&body);
        let wire: AuthWire = self.send(request, "Login failed").await?;
        Ok(wire.into())
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        let builder = self
            .request(Method::POST, "api/auth/register", &[], None)?
            .json(request);
        let wire: AuthWire = self.send(builder, "Registration failed").await?;
        Ok(wire.into())
    }
}

impl ApiClient {
    /// Fetch the profile behind a token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip(self, token))]
    pub async fn current_user(&self, token: &SecretString) -> Result<User, ClientError> {
        let request = self.request(Method::GET, "api/auth/profile", &[], Some(token))?;
        let envelope: UserEnvelope = self.send(request, "Failed to load profile").await?;
        Ok(envelope.user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_register_body_omits_missing_username() {
        let request = RegisterRequest {
            email: Email::parse("ana@example.com").unwrap(),
            password: "secret1".into(),
            first_name: "Ana".into(),
            last_name: "Ruiz".into(),
            username: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "email": "ana@example.com",
                "password": "secret1",
                "first_name": "Ana",
                "last_name": "Ruiz"
            })
        );
        assert!(!format!("{request:?}").contains("secret1"));
    }

    #[test]
    fn test_auth_response_wraps_tokens() {
        let wire: AuthWire = serde_json::from_value(json!({
            "message": "Login successful",
            "user": { "id": 1, "email": "ana@example.com" },
            "access_token": "jwt-access",
            "refresh_token": "jwt-refresh"
        }))
        .unwrap();
        let response = AuthResponse::from(wire);
        assert!(!format!("{response:?}").contains("jwt-access"));
        assert!(response.refresh_token.is_some());
    }
}
