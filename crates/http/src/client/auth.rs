//! Authentication API client methods

use super::{ApiClient, ClientError};
use batteries_core::{AccessToken, MessageResponse, UserPublic};
use serde::Serialize;

/// OAuth2 password grant form; `username` carries the email address
#[derive(Serialize)]
struct PasswordGrant<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct ResetPasswordLinkRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordRequest<'a> {
    token_key: &'a str,
    new_password: &'a str,
}

impl ApiClient {
    /// Fetch the profile of the user owning the current credential
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn me(&self) -> Result<UserPublic, ClientError> {
        self.get("auth/me").await
    }

    /// Exchange email and password for an access token
    ///
    /// # Errors
    ///
    /// Wrong credentials arrive as a [`ClientError::Status`] whose payload carries a
    /// `nonfield` message. See [`ApiClient::execute`].
    pub async fn access_token(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccessToken, ClientError> {
        let form = PasswordGrant {
            username: email,
            password,
        };
        self.post_form("auth/access-token", &form).await
    }

    /// Ask the server to email a reset-password link
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn send_reset_password_link(
        &self,
        email: &str,
    ) -> Result<MessageResponse, ClientError> {
        self.post_json(
            "auth/send-reset-password-link",
            &ResetPasswordLinkRequest { email },
        )
        .await
    }

    /// Set a new password using the key from a reset-password link
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn reset_password(
        &self,
        token_key: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ClientError> {
        self.post_json(
            "auth/reset-password",
            &ResetPasswordRequest {
                token_key,
                new_password,
            },
        )
        .await
    }
}
