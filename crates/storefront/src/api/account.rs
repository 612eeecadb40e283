//! Account endpoints (`/api/users/*`).

use blitzshop_core::{AddressBook, NotificationSettings, ProfileUpdate, User};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{Ack, ApiClient};
use crate::error::ClientError;

#[derive(Deserialize)]
struct ProfileEnvelope {
    user: User,
}

#[derive(Serialize)]
struct ChangePasswordBody<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

#[derive(Serialize)]
struct DeleteAccountBody<'a> {
    password: &'a str,
}

impl ApiClient {
    /// Full profile of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn profile(&self, token: &SecretString) -> Result<User, ClientError> {
        let request = self.request(Method::GET, "api/users/profile", &[], Some(token))?;
        self.send(request, "Failed to load profile").await
    }

    /// Update profile fields; only the fields set in `update` are sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects a field or the request fails.
    #[instrument(skip(self, token, update))]
    pub async fn update_profile(
        &self,
        token: &SecretString,
        update: &ProfileUpdate,
    ) -> Result<User, ClientError> {
        let request = self
            .request(Method::PUT, "api/users/profile", &[], Some(token))?
            .json(update);
        let envelope: ProfileEnvelope = self.send(request, "Failed to update profile").await?;
        Ok(envelope.user)
    }

    /// Stored postal address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn address(&self, token: &SecretString) -> Result<AddressBook, ClientError> {
        let request = self.request(Method::GET, "api/users/address", &[], Some(token))?;
        self.send(request, "Failed to load address").await
    }

    /// Change the password. Callers validate the form first.
    ///
    /// # Errors
    ///
    /// Returns "Current password is incorrect" when the server rejects it.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        token: &SecretString,
        current: &SecretString,
        new: &SecretString,
    ) -> Result<Ack, ClientError> {
        let request = self
            .request(Method::PUT, "api/users/change-password", &[], Some(token))?
            .json(&ChangePasswordBody {
                current_password: current.expose_secret(),
                new_password: new.expose_secret(),
            });
        self.send(request, "Failed to change password").await
    }

    /// Deactivate the account.
    ///
    /// # Errors
    ///
    /// Returns "Incorrect password" when the password does not match.
    #[instrument(skip_all)]
    pub async fn delete_account(
        &self,
        token: &SecretString,
        password: &SecretString,
    ) -> Result<Ack, ClientError> {
        let request = self
            .request(Method::DELETE, "api/users/delete-account", &[], Some(token))?
            .json(&DeleteAccountBody {
                password: password.expose_secret(),
            });
        self.send(request, "Failed to delete account").await
    }

    /// Notification preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn notifications(
        &self,
        token: &SecretString,
    ) -> Result<NotificationSettings, ClientError> {
        let request = self.request(Method::GET, "api/users/notifications", &[], Some(token))?;
        self.send(request, "Failed to load notification settings").await
    }

    /// Update notification preferences, returning the stored values.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn update_notifications(
        &self,
        token: &SecretString,
        settings: NotificationSettings,
    ) -> Result<NotificationSettings, ClientError> {
        let request = self
            .request(Method::PUT, "api/users/notifications", &[], Some(token))?
            .json(&settings);
        self.send(request, "Failed to update notification settings")
            .await
    }
}
