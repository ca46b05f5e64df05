//! Anonymous sessions against a user-pool auth service
//!
//! Players never type credentials. The first submission for a name signs up
//! a guest user with a password derived from the name, then signs in; the
//! sign-up error is ignored since the user usually exists already. Tokens are
//! cached per name for the rest of the page session.

use std::cell::RefCell;

use serde::Deserialize;
use serde_json::json;

use super::transport::Transport;
use crate::error::RemoteError;
use crate::settings::LeaderboardConfig;

const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const SIGN_UP_TARGET: &str = "AWSCognitoIdentityProviderService.SignUp";
const INITIATE_AUTH_TARGET: &str = "AWSCognitoIdentityProviderService.InitiateAuth";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    authentication_result: Option<AuthenticationResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    id_token: String,
}

/// Token cache plus the sign-up/sign-in dance
#[derive(Debug)]
pub struct AnonymousAuth {
    config: LeaderboardConfig,
    session: RefCell<Option<(String, String)>>,
}

impl AnonymousAuth {
    pub fn new(config: LeaderboardConfig) -> Self {
        Self {
            config,
            session: RefCell::new(None),
        }
    }

    /// Guest password for `username`
    pub fn guest_password(&self, username: &str) -> String {
        format!("Guest_{}_{}", username, self.config.guest_password_salt)
    }

    /// Token of the current session if it belongs to `username`
    pub fn cached_token(&self, username: &str) -> Option<String> {
        self.session
            .borrow()
            .as_ref()
            .filter(|(name, _)| name == username)
            .map(|(_, token)| token.clone())
    }

    /// Any signed-in token, for read-only requests
    pub fn current_token(&self) -> Option<String> {
        self.session.borrow().as_ref().map(|(_, token)| token.clone())
    }

    /// Return a token for `username`, signing up and in when needed
    pub async fn token_for(
        &self,
        transport: &impl Transport,
        username: &str,
    ) -> Result<String, RemoteError> {
        if let Some(token) = self.cached_token(username) {
            return Ok(token);
        }
        if self.config.auth_endpoint.is_empty() {
            return Err(RemoteError::NotConfigured);
        }

        let password = self.guest_password(username);
        if let Err(e) = self.sign_up(transport, username, &password).await {
            log::info!("Guest sign-up for '{}' skipped: {}", username, e);
        }
        let token = self.sign_in(transport, username, &password).await?;

        log::info!("Anonymous session established for '{}'", username);
        *self.session.borrow_mut() = Some((username.to_string(), token.clone()));
        Ok(token)
    }

    async fn sign_up(
        &self,
        transport: &impl Transport,
        username: &str,
        password: &str,
    ) -> Result<(), RemoteError> {
        let body = json!({
            "ClientId": self.config.client_id,
            "Username": username,
            "Password": password,
            "UserAttributes": [{ "Name": "name", "Value": username }],
        });
        transport
            .post_json(
                &self.config.auth_endpoint,
                &[("Content-Type", CONTENT_TYPE), ("X-Amz-Target", SIGN_UP_TARGET)],
                body.to_string(),
            )
            .await?;
        Ok(())
    }

    async fn sign_in(
        &self,
        transport: &impl Transport,
        username: &str,
        password: &str,
    ) -> Result<String, RemoteError> {
        let body = json!({
            "AuthFlow": "USER_PASSWORD_AUTH",
            "ClientId": self.config.client_id,
            "AuthParameters": { "USERNAME": username, "PASSWORD": password },
        });
        let response = transport
            .post_json(
                &self.config.auth_endpoint,
                &[
                    ("Content-Type", CONTENT_TYPE),
                    ("X-Amz-Target", INITIATE_AUTH_TARGET),
                ],
                body.to_string(),
            )
            .await
            .map_err(|e| RemoteError::Auth(e.to_string()))?;

        let parsed: InitiateAuthResponse = serde_json::from_str(&response)?;
        parsed
            .authentication_result
            .map(|r| r.id_token)
            .ok_or_else(|| {
                RemoteError::Auth("no authentication result (challenge required)".into())
            })
    }
}
