//! Telegram client wrapper backed by `grammers`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::DateTime;
use grammers_client::types::{LoginToken, PasswordToken};
use grammers_client::{Client, Config as ClientConfig, InitParams, SignInError};
use grammers_session::Session;
use grammers_tl_types as tl;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::error::UpstreamError;

use super::types::Presence;
use super::PresenceSource;

/// Telegram account session used to look up the account's own presence.
#[derive(Clone)]
pub struct TelegramPresence {
    /// Connected grammers client.
    client: Client,
    /// Where the session is persisted.
    session_path: PathBuf,
}

/// Outcome of submitting a login code.
pub enum CodeOutcome {
    /// Signed in; the session may be saved.
    SignedIn,
    /// Two-step verification is enabled and a password is needed.
    PasswordRequired(PasswordToken),
}

impl TelegramPresence {
    /// Open (or create) the session file and connect with the configured API
    /// credentials. Connecting does not require an authorized session.
    pub async fn connect(config: &Config) -> Result<Self, UpstreamError> {
        let session_path = config.storage.session.clone();
        let session = Session::load_file_or_create(&session_path).map_err(UpstreamError::Session)?;

        debug!(session = %session_path.display(), "connecting to telegram");
        let client = Client::connect(ClientConfig {
            session,
            api_id: config.api.id,
            api_hash: config.api.hash.clone(),
            params: InitParams::default(),
        })
        .await
        .map_err(|e| UpstreamError::Connect(e.to_string()))?;

        info!("Connected to Telegram");

        Ok(Self {
            client,
            session_path,
        })
    }

    /// Path of the session file.
    pub fn session_path(&self) -> &Path {
        &self.session_path
    }

    /// Whether the session belongs to a signed-in account.
    pub async fn is_authorized(&self) -> Result<bool, UpstreamError> {
        self.client
            .is_authorized()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))
    }

    /// Ask Telegram to send a login code to `phone`.
    pub async fn request_login_code(&self, phone: &str) -> Result<LoginToken, UpstreamError> {
        self.client
            .request_login_code(phone)
            .await
            .map_err(|e| UpstreamError::SignIn(e.to_string()))
    }

    /// Submit the login code received for `token`.
    pub async fn sign_in(&self, token: &LoginToken, code: &str) -> Result<CodeOutcome, UpstreamError> {
        match self.client.sign_in(token, code).await {
            Ok(_) => Ok(CodeOutcome::SignedIn),
            Err(SignInError::PasswordRequired(password_token)) => {
                Ok(CodeOutcome::PasswordRequired(password_token))
            }
            Err(e) => Err(UpstreamError::SignIn(e.to_string())),
        }
    }

    /// Complete two-step verification.
    pub async fn check_password(
        &self,
        password_token: PasswordToken,
        password: &str,
    ) -> Result<(), UpstreamError> {
        self.client
            .check_password(password_token, password)
            .await
            .map(|_| ())
            .map_err(|e| UpstreamError::SignIn(e.to_string()))
    }

    /// Persist the session so the server can reuse it.
    pub fn save_session(&self) -> Result<(), UpstreamError> {
        self.client
            .session()
            .save_to_file(&self.session_path)
            .map_err(UpstreamError::Session)
    }
}

#[async_trait]
impl PresenceSource for TelegramPresence {
    #[instrument(skip(self))]
    async fn fetch_presence(&self) -> Result<Presence, UpstreamError> {
        if !self.is_authorized().await? {
            return Err(UpstreamError::Unauthorized);
        }

        let me = self
            .client
            .get_me()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        let presence = presence_from_status(me.raw.status.as_ref());
        debug!(?presence, "fetched own presence");
        Ok(presence)
    }
}

/// Map a raw Telegram user status onto [`Presence`].
pub fn presence_from_status(status: Option<&tl::enums::UserStatus>) -> Presence {
    match status {
        Some(tl::enums::UserStatus::Online(_)) => Presence::Online,
        Some(tl::enums::UserStatus::Offline(offline)) => {
            match DateTime::from_timestamp(i64::from(offline.was_online), 0) {
                Some(last_seen) => Presence::Offline { last_seen },
                None => Presence::Hidden,
            }
        }
        _ => Presence::Hidden,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn online_status_maps_to_online() {
        let status = tl::enums::UserStatus::Online(tl::types::UserStatusOnline { expires: 0 });
        assert_eq!(presence_from_status(Some(&status)), Presence::Online);
    }

    #[test]
    fn offline_status_carries_last_seen() {
        let status = tl::enums::UserStatus::Offline(tl::types::UserStatusOffline {
            was_online: 1_700_000_000,
        });

        match presence_from_status(Some(&status)) {
            Presence::Offline { last_seen } => assert_eq!(last_seen.timestamp(), 1_700_000_000),
            other => panic!("expected offline, got {:?}", other),
        }
    }

    #[test]
    fn missing_or_coarse_status_is_hidden() {
        assert_eq!(presence_from_status(None), Presence::Hidden);
        assert_eq!(
            presence_from_status(Some(&tl::enums::UserStatus::Empty)),
            Presence::Hidden
        );
    }
}
